//! Category grouping
//!
//! Records are sorted newest-first, partitioned by category in that order, and
//! the resulting groups are ordered by `(newest desc, key asc)`. Nothing here
//! depends on the order the store returned the records in, except for the
//! relative order of records that share a timestamp.

use chrono::{DateTime, Utc};
use cw_record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// All records of one category plus their aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    /// Category key
    pub key: String,
    /// Members, newest first
    pub records: Vec<Record>,
    /// Sum of member magnitudes
    pub aggregate_magnitude: f64,
    /// Timestamp of the first (newest) member
    pub newest_timestamp: DateTime<Utc>,
}

impl CategoryGroup {
    fn from_members(key: String, records: Vec<Record>) -> Option<Self> {
        let newest_timestamp = records.first()?.timestamp;
        let aggregate_magnitude = records.iter().map(|r| r.magnitude).sum();
        Some(Self {
            key,
            records,
            aggregate_magnitude,
            newest_timestamp,
        })
    }

    /// Number of member records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the group has no members; never the case for built groups
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Display order for groups: newest activity first, key as tiebreaker
#[must_use]
pub fn group_order(a: &CategoryGroup, b: &CategoryGroup) -> Ordering {
    b.newest_timestamp
        .cmp(&a.newest_timestamp)
        .then_with(|| a.key.cmp(&b.key))
}

/// Sort records newest-first; ties keep their relative input order
pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Partition records into ordered category groups
///
/// Groups are rebuilt from scratch on each call. Empty input yields no groups.
#[must_use]
pub fn group_records(mut records: Vec<Record>) -> Vec<CategoryGroup> {
    sort_newest_first(&mut records);

    // insertion order here is first-seen-newest; the final sort makes it explicit
    let mut partitions: IndexMap<String, Vec<Record>> = IndexMap::new();
    for record in records {
        partitions
            .entry(record.category.clone())
            .or_default()
            .push(record);
    }

    let mut groups: Vec<CategoryGroup> = partitions
        .into_iter()
        .filter_map(|(key, members)| CategoryGroup::from_members(key, members))
        .collect();
    groups.sort_by(group_order);

    tracing::trace!(groups = groups.len(), "records grouped");
    groups
}
