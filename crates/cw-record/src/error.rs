//! Error types for record normalization
//!
//! Both errors are recoverable by construction: the lenient parsers in
//! [`crate::magnitude`] and [`crate::timestamp`] map them to a safe default.
//! The strict variants expose them for diagnostics and tests.

/// Footprint string could not be turned into a magnitude
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MagnitudeParseError {
    /// Record carries no footprint at all
    #[error("footprint is missing")]
    Missing,

    /// Footprint contains only whitespace
    #[error("footprint is empty")]
    Empty,

    /// Leading token does not start with a number
    #[error("footprint token '{0}' has no leading number")]
    NotNumeric(String),

    /// Leading number overflowed to infinity
    #[error("footprint value '{0}' is not finite")]
    NonFinite(String),

    /// Leading number is negative
    #[error("footprint value {0} is negative")]
    Negative(f64),
}

/// Date field could not be turned into an instant
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimestampParseError {
    /// Record carries no date
    #[error("date is missing")]
    Missing,

    /// Date string contains only whitespace
    #[error("date string is empty")]
    Empty,

    /// Date string matches none of the accepted formats
    #[error("unrecognized date string: '{0}'")]
    Unrecognized(String),

    /// Value parsed but lies outside the representable range
    #[error("date out of range: {0}")]
    OutOfRange(String),

    /// Value has a JSON shape that cannot carry a date
    #[error("unsupported date value: {0}")]
    UnsupportedShape(String),
}
