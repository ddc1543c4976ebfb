//! Normalized footprint records

use crate::magnitude::parse_magnitude;
use crate::raw::{RawRecord, RecordId};
use crate::timestamp::parse_timestamp;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category for records whose functionality is absent or blank
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Display name for records without a product name
pub const UNNAMED_PRODUCT: &str = "Unnamed Product";

/// A typed, defensively-defaulted footprint record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store identifier
    pub id: RecordId,
    /// Product name as stored
    pub name: Option<String>,
    /// Grouping key, never blank
    pub category: String,
    /// Unit-stripped footprint quantity, finite and non-negative
    pub magnitude: f64,
    /// When the record was added; epoch-zero when unknown
    pub timestamp: DateTime<Utc>,
    /// Original footprint text
    pub footprint: Option<String>,
    /// Unrecognized fields, in document order
    pub extra: IndexMap<String, Value>,
}

impl Record {
    /// Name shown in lists and the detail header
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNNAMED_PRODUCT)
    }
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        normalize(raw)
    }
}

/// Derive the grouping key from a raw functionality value
#[inline]
#[must_use]
pub fn category_of(functionality: Option<&str>) -> String {
    functionality
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .unwrap_or(UNKNOWN_CATEGORY)
        .to_string()
}

/// Normalize one raw record
///
/// Pure and total: every raw record yields a record.
#[must_use]
pub fn normalize(raw: RawRecord) -> Record {
    let magnitude = parse_magnitude(raw.footprint.as_deref());
    let timestamp = parse_timestamp(raw.date_added.as_ref());
    let category = category_of(raw.functionality.as_deref());

    Record {
        id: raw.id,
        name: raw.product_name,
        category,
        magnitude,
        timestamp,
        footprint: raw.footprint,
        extra: raw.extra,
    }
}

/// Normalize a batch of raw records, preserving store order
#[must_use]
pub fn normalize_all(raw: impl IntoIterator<Item = RawRecord>) -> Vec<Record> {
    raw.into_iter().map(normalize).collect()
}
