//! Lenient field decoders for records produced by a loosely typed server.
//!
//! Numbers may arrive as numeric strings, booleans as `0`/`"1"`, and empty
//! maps as `[]`. `null` always decodes to the field's default. None of these
//! decoders reject a value: anything unusable becomes the default.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Wire sentinel for "no id yet".
pub const UNSET_ID: i64 = -1;

pub type KeywordMap = BTreeMap<i64, String>;

pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

pub fn as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        _ => String::new(),
    }
}

fn as_id(value: &Value) -> Option<i64> {
    as_i64(value).filter(|id| *id >= 0)
}

fn entries(value: Value) -> Vec<(Option<i64>, Value)> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Some(i as i64), v))
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| (k.trim().parse().ok(), v))
            .collect(),
        _ => Vec::new(),
    }
}

pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(as_string(&Value::deserialize(d)?))
}

/// Empty strings decode to `None`.
pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let s = as_string(&Value::deserialize(d)?);
    Ok((!s.is_empty()).then_some(s))
}

pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(as_i64(&Value::deserialize(d)?).unwrap_or(0))
}

pub fn int32<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    Ok(as_i64(&Value::deserialize(d)?)
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(0))
}

pub fn opt_float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim(), "1" | "true"),
        _ => false,
    })
}

/// Negative ids (the `-1` sentinel) decode to `None`.
pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(as_id(&Value::deserialize(d)?))
}

pub fn id_or_sentinel<S: Serializer>(id: &Option<i64>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(id.unwrap_or(UNSET_ID))
}

/// A list of ids given either as an array or as an index-keyed object.
pub fn id_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<i64>, D::Error> {
    Ok(entries(Value::deserialize(d)?)
        .iter()
        .filter_map(|(_, v)| as_id(v))
        .collect())
}

pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(entries(Value::deserialize(d)?)
        .iter()
        .map(|(_, v)| as_string(v))
        .filter(|s| !s.is_empty())
        .collect())
}

/// `{id: text}`; entries with non-numeric keys are dropped.
pub fn keyword_map<'de, D: Deserializer<'de>>(d: D) -> Result<KeywordMap, D::Error> {
    Ok(keyword_entries(Value::deserialize(d)?))
}

fn keyword_entries(value: Value) -> KeywordMap {
    entries(value)
        .into_iter()
        .filter_map(|(id, text)| Some((id?, as_string(&text))))
        .collect()
}

/// `{slot: {id: text}}`.
pub fn slotted_keyword_map<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<BTreeMap<String, KeywordMap>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Object(map) => map
            .into_iter()
            .map(|(slot, inner)| (slot, keyword_entries(inner)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "id")]
        id: Option<i64>,
        #[serde(deserialize_with = "boolean")]
        flag: bool,
        #[serde(deserialize_with = "string")]
        text: String,
        #[serde(deserialize_with = "id_list")]
        ids: Vec<i64>,
        #[serde(deserialize_with = "keyword_map")]
        keywords: KeywordMap,
        #[serde(deserialize_with = "opt_float")]
        lat: Option<f64>,
    }

    #[test]
    fn test_numeric_strings_and_nulls() {
        let sample: Sample = serde_json::from_value(json!({
            "id": "42",
            "flag": "1",
            "text": null,
            "ids": ["3", 4, "x"],
            "keywords": {"7": "Lager", "x": "dropped"},
            "lat": "50.5"
        }))
        .unwrap();

        assert_eq!(sample.id, Some(42));
        assert!(sample.flag);
        assert_eq!(sample.text, "");
        assert_eq!(sample.ids, vec![3, 4]);
        assert_eq!(sample.keywords, KeywordMap::from([(7, "Lager".to_string())]));
        assert_eq!(sample.lat, Some(50.5));
    }

    #[test]
    fn test_sentinel_and_empty_php_arrays() {
        let sample: Sample = serde_json::from_value(json!({
            "id": -1,
            "flag": 0,
            "text": 12,
            "ids": {"0": 9, "1": "10"},
            "keywords": []
        }))
        .unwrap();

        assert_eq!(sample.id, None);
        assert!(!sample.flag);
        assert_eq!(sample.text, "12");
        assert_eq!(sample.ids, vec![9, 10]);
        assert!(sample.keywords.is_empty());
        assert_eq!(sample.lat, None);
    }
}
