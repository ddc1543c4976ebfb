//! Raw record model as persisted by the record store
//!
//! A stored footprint document has a handful of fields the dashboard
//! understands and an open-ended tail of anything else the producer chose to
//! attach. The known subset is typed; the tail lives in an ordered side map so
//! the detail view can surface it in the document's own key order.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier of a stored record, unique within one owner's collection
///
/// Producers have written ids as strings and as numbers; both read as text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Wrap an identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the producer supplied no identifier
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read an id from a JSON value; strings and numbers only
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self(text.clone())),
            Value::Number(number) => Some(Self(number.to_string())),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).ok_or_else(|| {
            D::Error::custom(format!("expected a string or number record id, found {value}"))
        })
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Structured time value: whole seconds since the epoch plus nanoseconds
///
/// Accepts both the plain (`seconds`) and the underscored (`_seconds`) field
/// spellings that document stores emit when serializing their timestamp type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredTime {
    /// Seconds since 1970-01-01T00:00:00Z
    #[serde(alias = "_seconds")]
    pub seconds: i64,
    /// Sub-second part
    #[serde(default, alias = "_nanoseconds")]
    pub nanoseconds: u32,
}

/// Every shape a stored `date_added` value has been seen in
///
/// Deserialization never fails: anything unrecognized lands in
/// [`RawTimestamp::Other`] and normalizes to epoch-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// `{ "seconds": .., "nanoseconds": .. }`
    Structured(StructuredTime),
    /// ISO-like date or date-time string
    Text(String),
    /// Milliseconds since the epoch
    Millis(f64),
    /// Any other JSON value
    Other(Value),
}

/// A footprint document exactly as the store returns it
///
/// Reading a document never fails on field contents. Mistyped known fields
/// are dropped or read as text, and `date_added` wins over the legacy
/// `date_dadded` spelling when a document carries both.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RawRecord {
    /// Store-assigned identifier
    pub id: RecordId,

    /// Human-readable product name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    /// Category label used for grouping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functionality: Option<String>,

    /// Footprint text such as `"150 kg CO2e"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footprint: Option<String>,

    /// When the record was added; older documents spell it `date_dadded`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_added: Option<RawTimestamp>,

    /// All remaining fields, in document order
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

const DATE_KEY: &str = "date_added";
const LEGACY_DATE_KEY: &str = "date_dadded";

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        IndexMap::<String, Value>::deserialize(deserializer).map(Self::from_fields)
    }
}

impl RawRecord {
    /// Read a stored document; `None` when it is not a JSON object
    #[must_use]
    pub fn from_document(document: Value) -> Option<Self> {
        match document {
            Value::Object(fields) => Some(Self::from_fields(fields.into_iter().collect())),
            _ => None,
        }
    }

    /// Split a document's fields into the known subset and the ordered tail
    #[must_use]
    pub fn from_fields(mut fields: IndexMap<String, Value>) -> Self {
        let id = fields
            .shift_remove("id")
            .and_then(|value| RecordId::from_json(&value))
            .unwrap_or_default();
        let product_name = fields.shift_remove("product_name").and_then(lenient_string);
        let functionality = fields.shift_remove("functionality").and_then(lenient_string);
        let footprint = fields.shift_remove("footprint").and_then(lenient_string);
        let current = fields.shift_remove(DATE_KEY).filter(|value| !value.is_null());
        let legacy = fields.shift_remove(LEGACY_DATE_KEY).filter(|value| !value.is_null());
        let date_added = current.or(legacy).map(RawTimestamp::from_value);

        Self {
            id,
            product_name,
            functionality,
            footprint,
            date_added,
            extra: fields,
        }
    }

    /// Create an empty record with the given id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// With product name
    #[inline]
    #[must_use]
    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    /// With functionality (category)
    #[inline]
    #[must_use]
    pub fn with_functionality(mut self, functionality: impl Into<String>) -> Self {
        self.functionality = Some(functionality.into());
        self
    }

    /// With footprint text
    #[inline]
    #[must_use]
    pub fn with_footprint(mut self, footprint: impl Into<String>) -> Self {
        self.footprint = Some(footprint.into());
        self
    }

    /// With date value
    #[inline]
    #[must_use]
    pub fn with_date(mut self, date: RawTimestamp) -> Self {
        self.date_added = Some(date);
        self
    }

    /// Append an extra field, keeping insertion order
    #[inline]
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl RawTimestamp {
    /// Classify a stored date value; unknown shapes become [`RawTimestamp::Other`]
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let parsed = Self::deserialize(&value);
        parsed.unwrap_or(Self::Other(value))
    }
}

/// Accept strings, numbers and booleans as text; everything else is absent
fn lenient_string(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_known_fields_and_keeps_extras_in_order() {
        let raw: RawRecord = serde_json::from_value(json!({
            "id": "r1",
            "product_name": "Bike",
            "functionality": "Transport",
            "zeta": 1,
            "footprint": "50 kg CO2e",
            "alpha": "two",
            "date_added": { "seconds": 100, "nanoseconds": 0 }
        }))
        .unwrap();

        assert_eq!(raw.id, RecordId::new("r1"));
        assert_eq!(raw.footprint.as_deref(), Some("50 kg CO2e"));
        assert_eq!(
            raw.date_added,
            Some(RawTimestamp::Structured(StructuredTime {
                seconds: 100,
                nanoseconds: 0
            }))
        );
        let keys: Vec<_> = raw.extra.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta".to_string(), "alpha".to_string()]);
    }

    #[test]
    fn legacy_date_key_is_accepted() {
        let raw: RawRecord = serde_json::from_value(json!({
            "id": "r2",
            "date_dadded": "2024-01-02"
        }))
        .unwrap();
        assert_eq!(raw.date_added, Some(RawTimestamp::Text("2024-01-02".into())));
        assert!(raw.extra.is_empty());
    }

    #[test]
    fn odd_date_shapes_never_fail_deserialization() {
        let raw: RawRecord = serde_json::from_value(json!({
            "id": "r3",
            "date_added": { "when": "later" }
        }))
        .unwrap();
        assert!(matches!(raw.date_added, Some(RawTimestamp::Other(_))));

        let raw: RawRecord = serde_json::from_value(json!({
            "id": "r4",
            "date_added": 1_700_000_000_000_u64
        }))
        .unwrap();
        assert!(matches!(raw.date_added, Some(RawTimestamp::Millis(_))));
    }

    #[test]
    fn numeric_footprint_is_read_as_text() {
        let raw: RawRecord = serde_json::from_value(json!({
            "id": "r5",
            "footprint": 42.5,
            "functionality": null
        }))
        .unwrap();
        assert_eq!(raw.footprint.as_deref(), Some("42.5"));
        assert_eq!(raw.functionality, None);
    }

    #[test]
    fn both_date_spellings_prefer_current_key() {
        let raw: RawRecord = serde_json::from_value(json!({
            "id": "r6",
            "date_dadded": "2023-05-05",
            "date_added": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(raw.date_added, Some(RawTimestamp::Text("2024-01-01".into())));
        assert!(raw.extra.is_empty());

        let raw: RawRecord = serde_json::from_value(json!({
            "date_added": null,
            "date_dadded": "2023-05-05"
        }))
        .unwrap();
        assert_eq!(raw.date_added, Some(RawTimestamp::Text("2023-05-05".into())));
    }

    #[test]
    fn numeric_id_reads_as_text() {
        let raw: RawRecord = serde_json::from_value(json!({ "id": 7 })).unwrap();
        assert_eq!(raw.id.as_str(), "7");

        let raw: RawRecord = serde_json::from_value(json!({ "id": ["x"], "note": "kept" })).unwrap();
        assert!(raw.id.is_empty());
        assert_eq!(raw.extra["note"], "kept");

        assert!(serde_json::from_value::<RecordId>(json!(true)).is_err());
    }

    #[test]
    fn non_object_document_is_rejected() {
        assert!(RawRecord::from_document(json!("just text")).is_none());
        assert!(RawRecord::from_document(json!({ "id": "r7" })).is_some());
    }
}
