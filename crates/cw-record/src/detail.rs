//! Detail view of a single record
//!
//! Known fields get fixed slots; every other stored field is passed through
//! as `key: value` text in document order.

use crate::record::Record;
use crate::raw::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields rendered in fixed slots or derived, never passed through
pub const RECOGNIZED_FIELDS: &[&str] = &[
    "id",
    "product_name",
    "functionality",
    "footprint",
    "footprintValue",
    "date_added",
    "date_added_js",
    "date_dadded",
    "date_dadded_js",
];

/// Placeholder for a missing footprint
pub const MISSING_FOOTPRINT: &str = "N/A";

/// One passthrough line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailField {
    /// Stored field name
    pub key: String,
    /// Stringified value
    pub value: String,
}

/// Everything the detail panel shows for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDetail {
    /// Record being shown
    pub record_id: RecordId,
    /// Product name or placeholder
    pub title: String,
    /// Category label
    pub functionality: String,
    /// Footprint text or placeholder
    pub footprint: String,
    /// Extra fields in document order
    pub fields: Vec<DetailField>,
}

impl RecordDetail {
    /// Build the detail view for `record`
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        let fields = record
            .extra
            .iter()
            .filter(|(key, _)| !RECOGNIZED_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| DetailField {
                key: key.clone(),
                value: stringify_value(value),
            })
            .collect();

        Self {
            record_id: record.id.clone(),
            title: record.display_name().to_string(),
            functionality: record.category.clone(),
            footprint: record
                .footprint
                .as_deref()
                .filter(|text| !text.trim().is_empty())
                .unwrap_or(MISSING_FOOTPRINT)
                .to_string(),
            fields,
        }
    }

    /// Text lines in display order
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.fields.len() + 3);
        lines.push(self.title.clone());
        lines.push(format!("Functionality: {}", self.functionality));
        lines.push(format!("Footprint: {}", self.footprint));
        lines.extend(
            self.fields
                .iter()
                .map(|field| format!("{}: {}", field.key, field.value)),
        );
        lines
    }
}

/// Render a stored value as text: strings verbatim, everything else as compact JSON
#[must_use]
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
