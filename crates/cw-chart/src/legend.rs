//! Legend and center-label text

use crate::palette::Palette;
use crate::snapshot::ChartSnapshot;
use serde::{Deserialize, Serialize};

/// Unit shown under the total
pub const DEFAULT_UNIT_LABEL: &str = "kg CO2e";

/// Message shown instead of the chart when there is nothing to draw
pub const EMPTY_CHART_MESSAGE: &str = "No footprint data yet.";

/// One legend row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Category key
    pub name: String,
    /// Slice color
    pub color: String,
    /// Share of the total, in percent
    pub percent: f64,
    /// Whether this slice is the selected one
    pub selected: bool,
}

impl LegendEntry {
    /// `"<name> - <percent>%"` with one decimal
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {:.1}%", self.name, self.percent)
    }
}

/// Build the legend for a snapshot
#[must_use]
pub fn legend(snapshot: &ChartSnapshot, palette: &Palette, selected: Option<usize>) -> Vec<LegendEntry> {
    snapshot
        .segments
        .iter()
        .enumerate()
        .map(|(index, segment)| LegendEntry {
            name: segment.category_key.clone(),
            color: palette.color(segment.color_index).to_string(),
            percent: snapshot.percent(index).unwrap_or(0.0),
            selected: selected == Some(index),
        })
        .collect()
}

/// Total rendered for the middle of the donut
#[must_use]
pub fn center_label(total: f64, unit_label: &str) -> String {
    format!("{total:.1}\n{unit_label}")
}
