//! CarbonWise Records
//!
//! Raw footprint documents as the store returns them, and the normalizer that
//! turns them into typed records:
//! - Magnitude from free-text footprints (`"150 kg CO2e"` → `150.0`)
//! - Instants from structured, textual or numeric dates
//! - Category from functionality, defaulting to `"Unknown"`
//! - Passthrough of unrecognized fields for the detail view
//!
//! Parsing never fails. Malformed values recover to `0` and epoch-zero.
//!
//! # Example
//!
//! ```rust,ignore
//! use cw_record::{normalize, RawRecord};
//!
//! let raw = RawRecord::new("r1")
//!     .with_functionality("Transport")
//!     .with_footprint("50 kg CO2e");
//! let record = normalize(raw);
//! assert_eq!(record.magnitude, 50.0);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod detail;
pub mod error;
pub mod magnitude;
pub mod raw;
pub mod record;
pub mod timestamp;

pub use detail::{stringify_value, DetailField, RecordDetail, RECOGNIZED_FIELDS};
pub use error::{MagnitudeParseError, TimestampParseError};
pub use magnitude::{parse_magnitude, parse_magnitude_strict};
pub use raw::{RawRecord, RawTimestamp, RecordId, StructuredTime};
pub use record::{category_of, normalize, normalize_all, Record, UNKNOWN_CATEGORY, UNNAMED_PRODUCT};
pub use timestamp::{parse_timestamp, parse_timestamp_strict, EPOCH};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
