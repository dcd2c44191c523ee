use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::loose;

/// Kinds of record in a batched response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    User,
    Section,
    Structure,
    Event,
    Index,
    Unknown,
}

impl RecordKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "user" => RecordKind::User,
            "section" | "stufe" => RecordKind::Section,
            "structure" | "kalender" => RecordKind::Structure,
            "event" => RecordKind::Event,
            "index" => RecordKind::Index,
            _ => RecordKind::Unknown,
        }
    }
}

/// One `{type, content}` entry of a batched response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggedRecord {
    #[serde(rename = "type", deserialize_with = "loose::string")]
    pub tag: String,
    pub content: Value,
}

impl TaggedRecord {
    pub fn kind(&self) -> RecordKind {
        RecordKind::from_tag(&self.tag)
    }

    /// Decode the content as `R`. Content that is not an object decodes as
    /// an empty one.
    pub fn decode<R: DeserializeOwned>(&self) -> Result<R, serde_json::Error> {
        match &self.content {
            Value::Object(_) => R::deserialize(&self.content),
            _ => R::deserialize(Value::Object(Map::new())),
        }
    }
}
