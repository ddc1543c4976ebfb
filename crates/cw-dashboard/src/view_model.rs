//! Render-ready projection of the dashboard
//!
//! Everything a renderer needs to draw one frame: arcs at the current reveal
//! progress, legend, center label, category sections and the open detail view.

use crate::config::DashboardConfig;
use crate::dashboard::LoadState;
use crate::view_state::ViewState;
use cw_chart::{center_label, legend, ChartSnapshot, LegendEntry, EMPTY_CHART_MESSAGE};
use cw_record::{RecordDetail, RecordId};
use serde::{Deserialize, Serialize};

/// One donut slice at the current progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcView {
    /// Category drawn by this slice
    pub category_key: String,
    /// Fill color
    pub color: String,
    /// Radians, clockwise from the top
    pub start_angle: f64,
    /// Animated end angle
    pub end_angle: f64,
    /// Hole radius
    pub inner_radius: f64,
    /// Slice radius; larger when selected
    pub outer_radius: f64,
    /// Whether this slice is selected
    pub selected: bool,
}

/// One row under an expanded category header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow {
    /// Record to open on press
    pub id: RecordId,
    /// Product name or placeholder
    pub name: String,
}

/// A collapsible category section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionView {
    /// Category key
    pub key: String,
    /// `"<key> (<count>)"`
    pub header: String,
    /// `+` collapsed, `-` expanded
    pub indicator: char,
    /// Whether rows are shown
    pub expanded: bool,
    /// Records newest first; empty while collapsed
    pub rows: Vec<RecordRow>,
}

/// Full dashboard frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    /// Fetch status
    pub load_state: LoadState,
    /// Sum of all magnitudes
    pub total: f64,
    /// Total and unit; absent for an empty chart
    pub center_label: Option<String>,
    /// Shown instead of the chart when there is nothing to draw
    pub empty_message: Option<String>,
    /// Slices in group order
    pub arcs: Vec<ArcView>,
    /// Legend entries in group order
    pub legend: Vec<LegendEntry>,
    /// Category sections in group order
    pub sections: Vec<SectionView>,
    /// Open record, if any
    pub detail: Option<RecordDetail>,
    /// Reveal progress in `[0, 1]`
    pub progress: f64,
}

impl DashboardView {
    /// Project the current snapshot and interaction state
    #[must_use]
    pub fn build(
        snapshot: &ChartSnapshot,
        state: &ViewState,
        config: &DashboardConfig,
        load_state: &LoadState,
    ) -> Self {
        let chart = &config.chart;
        let selected = state.selected_segment();
        let progress = state.progress();

        let arcs = snapshot
            .segments
            .iter()
            .enumerate()
            .map(|(index, segment)| {
                let is_selected = selected == Some(index);
                ArcView {
                    category_key: segment.category_key.clone(),
                    color: chart.palette.color(segment.color_index).to_string(),
                    start_angle: segment.start_angle,
                    end_angle: segment.partial_end_angle(progress),
                    inner_radius: chart.inner_radius,
                    outer_radius: if is_selected {
                        chart.selected_outer_radius
                    } else {
                        chart.outer_radius
                    },
                    selected: is_selected,
                }
            })
            .collect();

        let sections = snapshot
            .groups
            .iter()
            .map(|group| {
                let category = state.category_state(&group.key);
                let rows = if category.is_expanded() {
                    group
                        .records
                        .iter()
                        .map(|record| RecordRow {
                            id: record.id.clone(),
                            name: record.display_name().to_string(),
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                SectionView {
                    key: group.key.clone(),
                    header: format!("{} ({})", group.key, group.len()),
                    indicator: category.indicator(),
                    expanded: category.is_expanded(),
                    rows,
                }
            })
            .collect();

        let empty = snapshot.is_empty();
        Self {
            load_state: load_state.clone(),
            total: snapshot.total,
            center_label: (!empty).then(|| center_label(snapshot.total, &config.unit_label)),
            empty_message: empty.then(|| EMPTY_CHART_MESSAGE.to_string()),
            arcs,
            legend: legend(snapshot, &chart.palette, selected),
            sections,
            detail: state.selected_record().map(RecordDetail::from_record),
            progress,
        }
    }

    /// Plain-text rendering for terminals
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        if let LoadState::Failed(message) = &self.load_state {
            lines.push(format!("error: {message}"));
        }
        match (&self.center_label, &self.empty_message) {
            (Some(label), _) => lines.extend(label.lines().map(str::to_string)),
            (None, Some(message)) => lines.push(message.clone()),
            (None, None) => {}
        }
        if !self.legend.is_empty() {
            lines.push(String::new());
            lines.extend(
                self.legend
                    .iter()
                    .map(|entry| format!("  {} {}", entry.color, entry.label())),
            );
        }
        for section in &self.sections {
            lines.push(String::new());
            lines.push(format!("{} {}", section.indicator, section.header));
            lines.extend(
                section
                    .rows
                    .iter()
                    .map(|row| format!("    {} [{}]", row.name, row.id)),
            );
        }
        lines.join("\n")
    }
}
