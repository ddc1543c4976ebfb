//! CarbonWise Chart
//!
//! Turns normalized footprint records into a proportional donut chart:
//!
//! ```text
//! Vec<Record> → group_records → Vec<CategoryGroup> → generate_segments → Vec<Segment>
//!                                        ↓
//!                                  ChartSnapshot (+ legend, center label)
//! ```
//!
//! Every stage is a pure function. Output order is fully determined by
//! `(newest timestamp desc, key asc)` for groups and `timestamp desc` for the
//! records inside a group.
//!
//! # Example
//!
//! ```rust,ignore
//! use cw_chart::{recompute_raw, Palette};
//!
//! let snapshot = recompute_raw(store_records, &Palette::default());
//! for segment in &snapshot.segments {
//!     println!("{} {:.3}..{:.3}", segment.category_key, segment.start_angle, segment.end_angle);
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod grouping;
pub mod legend;
pub mod palette;
pub mod segments;
pub mod snapshot;

pub use error::ChartError;
pub use grouping::{group_order, group_records, sort_newest_first, CategoryGroup};
pub use legend::{center_label, legend, LegendEntry, DEFAULT_UNIT_LABEL, EMPTY_CHART_MESSAGE};
pub use palette::{Palette, DEFAULT_COLORS};
pub use segments::{generate_segments, segment_at_angle, Segment, ANGLE_EPSILON, FULL_TURN};
pub use snapshot::{recompute, recompute_raw, ChartSnapshot};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
