//! Date parsing for `date_added`
//!
//! Unparsable or missing dates normalize to the Unix epoch so such records
//! sort after every dated record, deterministically.

use crate::error::TimestampParseError;
use crate::raw::{RawTimestamp, StructuredTime};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Instant used for records without a usable date
pub const EPOCH: DateTime<Utc> = DateTime::UNIX_EPOCH;

/// Naive date-time layouts accepted after RFC 3339; interpreted as UTC
const NAIVE_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Date-only layout; midnight UTC
const NAIVE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored date, recovering failures to [`EPOCH`]
#[must_use]
pub fn parse_timestamp(raw: Option<&RawTimestamp>) -> DateTime<Utc> {
    match parse_timestamp_strict(raw) {
        Ok(instant) => instant,
        Err(err) => {
            tracing::trace!(error = %err, "date recovered to epoch");
            EPOCH
        }
    }
}

/// Parse a stored date, reporting why it failed
///
/// # Errors
/// Returns [`TimestampParseError`] for missing values, unrecognized strings,
/// out-of-range numbers and JSON shapes that cannot carry a date.
pub fn parse_timestamp_strict(
    raw: Option<&RawTimestamp>,
) -> Result<DateTime<Utc>, TimestampParseError> {
    match raw {
        None => Err(TimestampParseError::Missing),
        Some(RawTimestamp::Structured(time)) => from_structured(*time),
        Some(RawTimestamp::Text(text)) => parse_text(text),
        Some(RawTimestamp::Millis(millis)) => from_millis(*millis),
        Some(RawTimestamp::Other(value)) => {
            Err(TimestampParseError::UnsupportedShape(value.to_string()))
        }
    }
}

fn from_structured(time: StructuredTime) -> Result<DateTime<Utc>, TimestampParseError> {
    DateTime::from_timestamp(time.seconds, time.nanoseconds).ok_or_else(|| {
        TimestampParseError::OutOfRange(format!("{}s {}ns", time.seconds, time.nanoseconds))
    })
}

#[allow(clippy::cast_possible_truncation)]
fn from_millis(millis: f64) -> Result<DateTime<Utc>, TimestampParseError> {
    if !millis.is_finite() {
        return Err(TimestampParseError::OutOfRange(millis.to_string()));
    }
    // `as` saturates; anything that large is rejected by chrono below
    DateTime::from_timestamp_millis(millis.trunc() as i64)
        .ok_or_else(|| TimestampParseError::OutOfRange(millis.to_string()))
}

fn parse_text(text: &str) -> Result<DateTime<Utc>, TimestampParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TimestampParseError::Empty);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, NAIVE_DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimestampParseError::Unrecognized(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(value: &str) -> RawTimestamp {
        RawTimestamp::Text(value.to_string())
    }

    #[test]
    fn structured_seconds() {
        let raw = RawTimestamp::Structured(StructuredTime {
            seconds: 200,
            nanoseconds: 500,
        });
        let parsed = parse_timestamp(Some(&raw));
        assert_eq!(parsed.timestamp(), 200);
        assert_eq!(parsed.timestamp_subsec_nanos(), 500);
    }

    #[test]
    fn iso_like_strings() {
        let expected = DateTime::parse_from_rfc3339("2024-03-01T10:20:30Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(parse_timestamp(Some(&text("2024-03-01T10:20:30Z"))), expected);
        assert_eq!(parse_timestamp(Some(&text("2024-03-01T12:20:30+02:00"))), expected);
        assert_eq!(parse_timestamp(Some(&text("2024-03-01T10:20:30"))), expected);
        assert_eq!(parse_timestamp(Some(&text("2024-03-01 10:20:30"))), expected);
        assert_eq!(
            parse_timestamp(Some(&text("2024-03-01"))),
            DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc)
        );
    }

    #[test]
    fn millis_number() {
        let parsed = parse_timestamp(Some(&RawTimestamp::Millis(1_500.0)));
        assert_eq!(parsed.timestamp_millis(), 1_500);
    }

    #[test]
    fn failures_fall_back_to_epoch() {
        assert_eq!(parse_timestamp(None), EPOCH);
        assert_eq!(parse_timestamp(Some(&text("yesterday"))), EPOCH);
        assert_eq!(parse_timestamp(Some(&text("  "))), EPOCH);
        assert_eq!(parse_timestamp(Some(&RawTimestamp::Millis(f64::NAN))), EPOCH);
        assert_eq!(parse_timestamp(Some(&RawTimestamp::Other(json!(true)))), EPOCH);
    }

    #[test]
    fn strict_reports_reason() {
        assert_eq!(parse_timestamp_strict(None), Err(TimestampParseError::Missing));
        assert_eq!(
            parse_timestamp_strict(Some(&text("soon"))),
            Err(TimestampParseError::Unrecognized("soon".into()))
        );
        assert!(matches!(
            parse_timestamp_strict(Some(&RawTimestamp::Structured(StructuredTime {
                seconds: i64::MAX,
                nanoseconds: 0,
            }))),
            Err(TimestampParseError::OutOfRange(_))
        ));
    }
}
