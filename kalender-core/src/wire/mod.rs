//! Typed records for the JSON the calendar service sends and accepts.
//!
//! Field names follow the service verbatim. Every field is optional on input
//! and decodes leniently (see [`loose`]); unset numeric ids travel as `-1`.

pub mod loose;
mod tagged;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use loose::{KeywordMap, UNSET_ID};
pub use tagged::{RecordKind, TaggedRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRecord {
    #[serde(
        rename = "ID",
        deserialize_with = "loose::id",
        serialize_with = "loose::id_or_sentinel"
    )]
    pub id: Option<i64>,
    /// Older responses carry the id as `UID`; never sent back.
    #[serde(rename = "UID", deserialize_with = "loose::id", skip_serializing)]
    pub uid: Option<i64>,
    #[serde(rename = "Title", deserialize_with = "loose::string")]
    pub title: String,
    #[serde(rename = "Organizer", deserialize_with = "loose::string")]
    pub organizer: String,
    #[serde(rename = "Target_Group", deserialize_with = "loose::string")]
    pub target_group: String,
    #[serde(rename = "Start", deserialize_with = "loose::int")]
    pub start: i64,
    #[serde(rename = "End", deserialize_with = "loose::int")]
    pub end: i64,
    #[serde(rename = "All_Day", deserialize_with = "loose::boolean")]
    pub all_day: bool,
    #[serde(rename = "ZIP", deserialize_with = "loose::string")]
    pub zip: String,
    #[serde(rename = "Location", deserialize_with = "loose::string")]
    pub location: String,
    #[serde(rename = "URL_Text", deserialize_with = "loose::string")]
    pub url_text: String,
    #[serde(rename = "URL", deserialize_with = "loose::string")]
    pub url: String,
    #[serde(rename = "Description", deserialize_with = "loose::string")]
    pub description: String,
    #[serde(rename = "Stufen", deserialize_with = "loose::id_list")]
    pub sections: Vec<i64>,
    #[serde(rename = "Keywords", deserialize_with = "loose::keyword_map")]
    pub keywords: KeywordMap,
    #[serde(
        rename = "Custom_Keywords",
        deserialize_with = "loose::string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub custom_keywords: Vec<String>,
    #[serde(
        rename = "Kalender",
        deserialize_with = "loose::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub structure: Option<i64>,
    #[serde(rename = "Last_Modified_By", deserialize_with = "loose::opt_string")]
    pub changed_by: Option<String>,
    #[serde(rename = "Last_Modified_At", deserialize_with = "loose::int")]
    pub changed_at: i64,
    #[serde(rename = "Created_By", deserialize_with = "loose::opt_string")]
    pub created_by: Option<String>,
    #[serde(rename = "Created_At", deserialize_with = "loose::int")]
    pub created_at: i64,
}

impl EventRecord {
    /// `ID`, falling back to the legacy `UID`.
    pub fn event_id(&self) -> Option<i64> {
        self.id.or(self.uid)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureRecord {
    #[serde(
        rename = "ID",
        deserialize_with = "loose::id",
        serialize_with = "loose::id_or_sentinel"
    )]
    pub id: Option<i64>,
    #[serde(rename = "Ebene", deserialize_with = "loose::string")]
    pub level: String,
    #[serde(rename = "Name", deserialize_with = "loose::string")]
    pub name: String,
    #[serde(rename = "Verband", deserialize_with = "loose::string")]
    pub federation: String,
    #[serde(rename = "Ident", deserialize_with = "loose::string")]
    pub ident: String,
    #[serde(rename = "Ebene_Id", deserialize_with = "loose::int32")]
    pub level_rank: i32,
    #[serde(rename = "Used_Kategories", deserialize_with = "loose::keyword_map")]
    pub used_categories: KeywordMap,
    #[serde(
        rename = "Forced_Kategories",
        deserialize_with = "loose::slotted_keyword_map"
    )]
    pub forced_categories: BTreeMap<String, KeywordMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionRecord {
    #[serde(deserialize_with = "loose::id", serialize_with = "loose::id_or_sentinel")]
    pub id: Option<i64>,
    #[serde(rename = "verband", deserialize_with = "loose::string")]
    pub federation: String,
    #[serde(rename = "bezeichnung", deserialize_with = "loose::string")]
    pub name: String,
    #[serde(rename = "farbe", deserialize_with = "loose::string")]
    pub color: String,
    #[serde(rename = "startalter", deserialize_with = "loose::int32")]
    pub start_age: i32,
    #[serde(rename = "endalter", deserialize_with = "loose::int32")]
    pub end_age: i32,
    #[serde(
        rename = "Keywords_ID",
        deserialize_with = "loose::id",
        serialize_with = "loose::id_or_sentinel"
    )]
    pub category: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    #[serde(rename = "userid", deserialize_with = "loose::string")]
    pub username: String,
    #[serde(rename = "firstname", deserialize_with = "loose::string")]
    pub first_name: String,
    #[serde(rename = "surname", deserialize_with = "loose::string")]
    pub last_name: String,
    #[serde(deserialize_with = "loose::string")]
    pub sex: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexRecord {
    #[serde(deserialize_with = "loose::id", serialize_with = "loose::id_or_sentinel")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "loose::string")]
    pub number: String,
    #[serde(rename = "ebene", deserialize_with = "loose::string")]
    pub level: String,
    #[serde(deserialize_with = "loose::string")]
    pub name: String,
    #[serde(rename = "ort", deserialize_with = "loose::string")]
    pub locality: String,
    #[serde(rename = "plz", deserialize_with = "loose::string")]
    pub postal_code: String,
    #[serde(deserialize_with = "loose::string")]
    pub url: String,
    #[serde(deserialize_with = "loose::opt_float")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "loose::opt_float")]
    pub longitude: Option<f64>,
    /// `null` for roots.
    #[serde(deserialize_with = "loose::id")]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRecord {
    #[serde(
        rename = "ID",
        deserialize_with = "loose::id",
        serialize_with = "loose::id_or_sentinel"
    )]
    pub id: Option<i64>,
    #[serde(rename = "Text", deserialize_with = "loose::string")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionRecord {
    #[serde(deserialize_with = "loose::int")]
    pub code: i64,
    #[serde(deserialize_with = "loose::string")]
    pub text: String,
    #[serde(rename = "type", deserialize_with = "loose::string")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_record_from_empty_object() {
        let record: EventRecord = serde_json::from_value(json!({})).unwrap();
        assert_eq!(record, EventRecord::default());
        assert_eq!(record.event_id(), None);
    }

    #[test]
    fn test_event_record_accepts_legacy_uid() {
        let record: EventRecord =
            serde_json::from_value(json!({"UID": "17", "Title": "Lager"})).unwrap();
        assert_eq!(record.event_id(), Some(17));

        let record: EventRecord = serde_json::from_value(json!({"ID": 3, "UID": 17})).unwrap();
        assert_eq!(record.event_id(), Some(3));
    }

    #[test]
    fn test_event_record_serializes_in_wire_order() {
        let record = EventRecord {
            title: "Lager".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();

        assert_eq!(value["ID"], json!(-1));
        assert_eq!(keys.first(), Some(&"ID"));
        assert_eq!(keys.last(), Some(&"Created_At"));
        assert!(!keys.contains(&"UID"));
        assert!(!keys.contains(&"Custom_Keywords"));
        assert!(!keys.contains(&"Kalender"));
    }

    #[test]
    fn test_structure_record_accepts_php_empty_arrays() {
        let record: StructureRecord = serde_json::from_value(json!({
            "ID": "4",
            "Ebene": "Stamm",
            "Ebene_Id": "7",
            "Used_Kategories": [],
            "Forced_Kategories": {"sections": {"1": "Woelflinge"}, "extra": []}
        }))
        .unwrap();

        assert_eq!(record.id, Some(4));
        assert_eq!(record.level_rank, 7);
        assert!(record.used_categories.is_empty());
        assert_eq!(record.forced_categories["sections"][&1], "Woelflinge");
        assert!(record.forced_categories["extra"].is_empty());
    }

    #[test]
    fn test_index_record_keeps_null_parent() {
        let record: IndexRecord = serde_json::from_value(json!({
            "id": 1,
            "parent_id": null,
            "latitude": "50.1",
            "longitude": 8.6
        }))
        .unwrap();

        assert_eq!(record.parent_id, None);
        assert_eq!(record.latitude, Some(50.1));
        assert_eq!(record.longitude, Some(8.6));
    }
}
