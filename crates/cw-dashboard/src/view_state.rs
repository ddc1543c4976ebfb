//! Immutable interaction state
//!
//! Every transition consumes the state and returns the next one. Nothing here
//! talks to the store; [`crate::Dashboard`] sequences fetches and deletes and
//! applies these transitions in between.

use crate::state_machine::{next_state, CategoryEvent, CategoryState};
use cw_chart::ChartSnapshot;
use cw_record::{Record, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Selection, expansion and reveal progress for one screen session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewState {
    expanded: BTreeSet<String>,
    selected_segment: Option<usize>,
    selected_record: Option<Record>,
    progress: f64,
}

impl ViewState {
    /// Fresh state: everything collapsed, nothing selected, progress `0`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expansion state of a category
    #[must_use]
    pub fn category_state(&self, key: &str) -> CategoryState {
        if self.expanded.contains(key) {
            CategoryState::Expanded
        } else {
            CategoryState::Collapsed
        }
    }

    /// Whether a category lists its records
    #[inline]
    #[must_use]
    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    /// Expanded category keys
    #[must_use]
    pub fn expanded_categories(&self) -> &BTreeSet<String> {
        &self.expanded
    }

    /// Selected segment, always a valid index into the current snapshot
    #[inline]
    #[must_use]
    pub fn selected_segment(&self) -> Option<usize> {
        self.selected_segment
    }

    /// Record open in the detail view
    #[inline]
    #[must_use]
    pub fn selected_record(&self) -> Option<&Record> {
        self.selected_record.as_ref()
    }

    /// Reveal progress in `[0, 1]`
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    fn apply(mut self, key: &str, event: CategoryEvent) -> Self {
        let next = next_state(self.category_state(key), event);
        debug!(category = key, ?event, state = ?next, "category transition");
        if next.is_expanded() {
            self.expanded.insert(key.to_string());
        } else {
            self.expanded.remove(key);
        }
        self
    }

    /// Flip a category between collapsed and expanded
    #[must_use]
    pub fn toggle_category(self, key: &str) -> Self {
        self.apply(key, CategoryEvent::HeaderToggled)
    }

    /// Select segment `index` and force its category open
    ///
    /// An index outside the snapshot (including any index on an empty chart)
    /// clears the selection instead.
    #[must_use]
    pub fn select_segment(mut self, index: usize, snapshot: &ChartSnapshot) -> Self {
        match snapshot.segment_key(index) {
            Some(key) if snapshot.total > 0.0 => {
                self.selected_segment = Some(index);
                self.apply(key, CategoryEvent::SegmentSelected)
            }
            _ => {
                debug!(index, segments = snapshot.segments.len(), "segment selection cleared");
                self.selected_segment = None;
                self
            }
        }
    }

    /// Clear the segment selection
    #[must_use]
    pub fn clear_segment(mut self) -> Self {
        self.selected_segment = None;
        self
    }

    /// Open a record in the detail view
    #[must_use]
    pub fn select_record(mut self, record: Record) -> Self {
        self.selected_record = Some(record);
        self
    }

    /// Close the detail view
    #[must_use]
    pub fn close_detail(mut self) -> Self {
        self.selected_record = None;
        self
    }

    /// Close the detail view if it shows the deleted record
    #[must_use]
    pub fn forget_record(mut self, id: &RecordId) -> Self {
        if self.selected_record.as_ref().is_some_and(|r| &r.id == id) {
            self.selected_record = None;
        }
        self
    }

    /// Set reveal progress, clamped to `[0, 1]`
    #[must_use]
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        self
    }

    /// Carry the state from `previous` over to a freshly recomputed `next`
    ///
    /// - The selected segment follows its category to its new position and is
    ///   cleared when the category is gone or the chart is empty.
    /// - The detail view closes when its record is no longer present and
    ///   otherwise shows the record's current values.
    /// - Expanded categories are kept.
    /// - Progress restarts at `0`.
    #[must_use]
    pub fn reconcile(mut self, previous: &ChartSnapshot, next: &ChartSnapshot) -> Self {
        self.selected_segment = self
            .selected_segment
            .and_then(|index| previous.segment_key(index))
            .and_then(|key| next.position_of(key))
            .filter(|&position| position < next.segments.len());

        self.selected_record = self
            .selected_record
            .take()
            .and_then(|record| next.record(&record.id).cloned());

        self.progress = 0.0;
        self
    }
}
