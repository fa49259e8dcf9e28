//! Document and field value types.
//!
//! A document is addressed by `(index_name, id)` and carries a flat map of
//! typed field values. Values are validated when they are built, so nothing
//! downstream has to cast or re-check them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::types::geohash::Geohash;

/// Field name to value mapping stored in a document's source.
pub type Fields = BTreeMap<String, FieldValue>;

/// Errors from building or decoding field values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldValueError {
    #[error("Number {0} is not finite")]
    NonFiniteNumber(f64),

    #[error("Unsupported field value of type {0}")]
    Unsupported(&'static str),

    #[error("Field '{field}' holds an unsupported value of type {kind}")]
    UnsupportedField { field: String, kind: &'static str },
}

/// A single typed field value.
///
/// On the wire every variant is a JSON scalar: timestamps are RFC 3339 strings
/// and geohashes are plain strings. Sources read back from the store therefore
/// come back as [`FieldValue::String`]; use [`FieldValue::as_timestamp`] and
/// [`FieldValue::as_geohash`] to reinterpret them.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(Number),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Geohash(Geohash),
}

impl FieldValue {
    /// Build a floating point value, rejecting NaN and infinities.
    pub fn float(value: f64) -> Result<Self, FieldValueError> {
        Number::from_f64(value)
            .map(Self::Number)
            .ok_or(FieldValueError::NonFiniteNumber(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Geohash(hash) => Some(hash.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Timestamp value, parsing RFC 3339 strings read back from the store.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            Self::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|ts| ts.with_timezone(&Utc)),
            _ => None,
        }
    }

    /// Geohash value, parsing strings read back from the store.
    pub fn as_geohash(&self) -> Option<Geohash> {
        match self {
            Self::Geohash(hash) => Some(hash.clone()),
            Self::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// JSON representation sent to the store.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Timestamp(ts) => Value::String(format_timestamp(ts)),
            Self::Geohash(hash) => Value::String(hash.as_str().to_string()),
        }
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl TryFrom<Value> for FieldValue {
    type Error = FieldValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Self::String(s)),
            Value::Number(n) => Ok(Self::Number(n)),
            Value::Bool(b) => Ok(Self::Bool(b)),
            other => Err(FieldValueError::Unsupported(json_kind(&other))),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Geohash> for FieldValue {
    fn from(value: Geohash) -> Self {
        Self::Geohash(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Timestamp(ts) => f.write_str(&format_timestamp(ts)),
            Self::Geohash(hash) => write!(f, "{}", hash),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Number(n) => n.serialize(serializer),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Timestamp(ts) => serializer.serialize_str(&format_timestamp(ts)),
            Self::Geohash(hash) => serializer.serialize_str(hash.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FieldValue::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// Convert fields into the JSON object sent as a document source.
pub fn fields_to_json(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect()
}

/// A document source decoded from the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceFields {
    /// Every field with a scalar value.
    pub fields: Fields,
    /// Fields left out because they hold an array or an object.
    pub skipped: Vec<FieldValueError>,
}

/// Decode a document source returned by the store.
///
/// Other writers may store values this crate cannot represent. Null fields are
/// dropped, array and object fields are reported in `skipped`, and the rest of
/// the document is still returned.
pub fn fields_from_json(source: Map<String, Value>) -> SourceFields {
    let mut decoded = SourceFields::default();
    for (field, value) in source {
        if value.is_null() {
            continue;
        }
        let kind = json_kind(&value);
        match FieldValue::try_from(value) {
            Ok(value) => {
                decoded.fields.insert(field, value);
            }
            Err(_) => decoded
                .skipped
                .push(FieldValueError::UnsupportedField { field, kind }),
        }
    }
    decoded
}

/// A document addressed by index name and caller-supplied id.
///
/// Indexing a document with an existing `(index_name, id)` replaces the stored
/// document entirely.
///
/// # Example
///
/// ```
/// use docstore_shared::{Document, Geohash};
///
/// let doc = Document::new("demoitem", "X")
///     .with_field("title", "Phone")
///     .with_field("level", 3)
///     .with_field("location", Geohash::from_lon_lat(126.88, 36.60).unwrap());
///
/// assert_eq!(doc.fields.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub index_name: String,
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Create a document with no fields.
    pub fn new(index_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            id: id.into(),
            fields: Fields::new(),
        }
    }

    /// Add a field, replacing any previous value under the same name.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Insert a field and return the previous value, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(name.into(), value.into())
    }

    /// The JSON source body for this document.
    pub fn source(&self) -> Value {
        Value::Object(fields_to_json(&self.fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_document_builder() {
        let doc = Document::new("demoitem", "X")
            .with_field("title", "Phone")
            .with_field("description", "Like new")
            .with_field("level", 3);

        assert_eq!(doc.index_name, "demoitem");
        assert_eq!(doc.id, "X");
        assert_eq!(doc.fields["title"], FieldValue::from("Phone"));
        assert_eq!(doc.fields["level"].as_i64(), Some(3));
    }

    #[test]
    fn test_insert_replaces_value() {
        let mut doc = Document::new("demoitem", "X").with_field("title", "Phone");
        let previous = doc.insert("title", "Tablet");
        assert_eq!(previous, Some(FieldValue::from("Phone")));
        assert_eq!(doc.fields["title"].as_str(), Some("Tablet"));
    }

    #[test]
    fn test_source_encoding() {
        let registered = Utc.with_ymd_and_hms(2020, 8, 1, 12, 30, 0).unwrap();
        let location = Geohash::from_lon_lat(126.88, 36.60).unwrap();
        let doc = Document::new("demoitem", "X")
            .with_field("title", "Phone")
            .with_field("level", 3)
            .with_field("used", true)
            .with_field("price", FieldValue::float(12.5).unwrap())
            .with_field("registered", registered)
            .with_field("location", location);

        assert_eq!(
            doc.source(),
            json!({
                "title": "Phone",
                "level": 3,
                "used": true,
                "price": 12.5,
                "registered": "2020-08-01T12:30:00.000Z",
                "location": "wyd0pnz4qq90"
            })
        );
    }

    #[test]
    fn test_float_rejects_non_finite() {
        assert_eq!(
            FieldValue::float(f64::NAN).map_err(|e| e.to_string()),
            Err("Number NaN is not finite".to_string())
        );
        assert!(FieldValue::float(f64::INFINITY).is_err());
    }

    #[test]
    fn test_fields_from_json() {
        let source = json!({
            "title": "Phone",
            "level": 3,
            "location": "wyd0p",
            "registered": "2020-08-01T12:30:00.000Z"
        });
        let Value::Object(map) = source else {
            panic!("expected object");
        };

        let fields = fields_from_json(map).fields;
        assert_eq!(fields["title"].as_str(), Some("Phone"));
        assert_eq!(fields["level"].as_i64(), Some(3));
        assert_eq!(fields["location"].as_geohash().unwrap().as_str(), "wyd0p");
        assert_eq!(
            fields["registered"].as_timestamp(),
            Some(Utc.with_ymd_and_hms(2020, 8, 1, 12, 30, 0).unwrap())
        );
        assert!(fields["title"].as_timestamp().is_none());
    }

    #[test]
    fn test_fields_from_json_keeps_scalars_only() {
        let Value::Object(map) = json!({
            "title": "Phone",
            "price": null,
            "tags": ["used", "boxed"],
            "seller": { "name": "kim" }
        }) else {
            panic!("expected object");
        };

        let decoded = fields_from_json(map);
        assert_eq!(decoded.fields.len(), 1);
        assert_eq!(decoded.fields["title"].as_str(), Some("Phone"));
        assert!(!decoded.fields.contains_key("price"));
        assert_eq!(
            decoded.skipped,
            vec![
                FieldValueError::UnsupportedField {
                    field: "seller".to_string(),
                    kind: "object"
                },
                FieldValueError::UnsupportedField {
                    field: "tags".to_string(),
                    kind: "array"
                },
            ]
        );
    }

    #[test]
    fn test_written_values_stay_strict() {
        assert_eq!(
            FieldValue::try_from(Value::Null),
            Err(FieldValueError::Unsupported("null"))
        );
        assert_eq!(
            FieldValue::try_from(json!(["a"])),
            Err(FieldValueError::Unsupported("array"))
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let fields: Fields = [
            ("title".to_string(), FieldValue::from("Phone")),
            ("level".to_string(), FieldValue::from(3)),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"level":3,"title":"Phone"}"#);

        let decoded: Fields = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, fields);
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::from("Phone").to_string(), "Phone");
        assert_eq!(FieldValue::from(3).to_string(), "3");
        assert_eq!(FieldValue::from(false).to_string(), "false");
    }
}
