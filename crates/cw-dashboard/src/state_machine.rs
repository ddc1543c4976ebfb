//! Per-category expansion state machine
//!
//! ```text
//!             HeaderToggled
//!  Collapsed ───────────────▶ Expanded
//!      ▲  │                    │  ▲
//!      │  └─ SegmentSelected ──┘  │ SegmentSelected
//!      └───── HeaderToggled ──────┘
//! ```
//!
//! Every category starts collapsed. Selecting its segment forces it open.

use serde::{Deserialize, Serialize};

/// Expansion state of one category section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CategoryState {
    /// Only the header is visible
    #[default]
    Collapsed,
    /// Header and records are visible
    Expanded,
}

impl CategoryState {
    /// Whether records are listed
    #[inline]
    #[must_use]
    pub fn is_expanded(self) -> bool {
        matches!(self, Self::Expanded)
    }

    /// Header indicator: `-` when expanded, `+` when collapsed
    #[inline]
    #[must_use]
    pub fn indicator(self) -> char {
        match self {
            Self::Expanded => '-',
            Self::Collapsed => '+',
        }
    }
}

/// Inputs that change a category's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryEvent {
    /// The section header was pressed
    HeaderToggled,
    /// The category's chart segment was selected
    SegmentSelected,
}

/// Apply `event` to `from`
///
/// Total: every state accepts every event.
#[must_use]
pub fn next_state(from: CategoryState, event: CategoryEvent) -> CategoryState {
    use CategoryEvent::{HeaderToggled, SegmentSelected};
    use CategoryState::{Collapsed, Expanded};
    match (from, event) {
        (Collapsed, HeaderToggled) | (_, SegmentSelected) => Expanded,
        (Expanded, HeaderToggled) => Collapsed,
    }
}

/// States reachable from `from` in one event
#[must_use]
pub fn allowed_transitions(from: CategoryState) -> Vec<CategoryState> {
    use CategoryState::{Collapsed, Expanded};
    match from {
        Collapsed => vec![Expanded],
        Expanded => vec![Collapsed, Expanded],
    }
}
