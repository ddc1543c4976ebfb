//! Pure recompute pipeline: records → groups → segments

use crate::grouping::{group_records, CategoryGroup};
use crate::palette::Palette;
use crate::segments::{generate_segments, Segment};
use cw_record::{normalize_all, RawRecord, Record, RecordId};
use serde::{Deserialize, Serialize};

/// Everything derived from one record set
///
/// Immutable and rebuilt wholesale on every recompute.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSnapshot {
    /// Ordered category groups
    pub groups: Vec<CategoryGroup>,
    /// Segments, index-aligned with `groups` (empty when `total == 0`)
    pub segments: Vec<Segment>,
    /// Sum of all record magnitudes
    pub total: f64,
}

impl ChartSnapshot {
    /// Snapshot with no data
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the chart has nothing to draw
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of records across all groups
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(CategoryGroup::len).sum()
    }

    /// Iterate records in display order (group order, then newest first)
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.groups.iter().flat_map(|g| g.records.iter())
    }

    /// Find a record by id
    #[must_use]
    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.records().find(|r| &r.id == id)
    }

    /// Segment and group position of a category
    #[must_use]
    pub fn position_of(&self, category_key: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.key == category_key)
    }

    /// Category key of the segment at `index`
    #[must_use]
    pub fn segment_key(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(|s| s.category_key.as_str())
    }

    /// Share of the total for the segment at `index`, as a percentage
    #[must_use]
    pub fn percent(&self, index: usize) -> Option<f64> {
        if self.total <= 0.0 {
            return None;
        }
        self.segments
            .get(index)
            .map(|s| s.proportion * 100.0)
    }
}

/// Recompute groups and segments from normalized records
#[must_use]
pub fn recompute(records: Vec<Record>, palette: &Palette) -> ChartSnapshot {
    let total: f64 = records.iter().map(|r| r.magnitude).sum();
    let record_count = records.len();
    let groups = group_records(records);
    let segments = generate_segments(&groups, palette);

    tracing::debug!(
        records = record_count,
        groups = groups.len(),
        segments = segments.len(),
        total,
        "chart recomputed"
    );

    ChartSnapshot {
        groups,
        segments,
        total,
    }
}

/// Normalize raw store records and recompute
#[must_use]
pub fn recompute_raw(raw: impl IntoIterator<Item = RawRecord>, palette: &Palette) -> ChartSnapshot {
    recompute(normalize_all(raw), palette)
}
