//! Footprint magnitude parsing
//!
//! Footprints arrive as free text produced upstream (`"150 kg CO2e"`,
//! `"12.5kg"`, `"n/a"`). The magnitude is the leading number of the first
//! whitespace-delimited token. Anything else is recovered to `0`.

use crate::error::MagnitudeParseError;

/// Parse the magnitude of a footprint string, recovering failures to `0`
///
/// Never panics and never returns a negative or non-finite value.
#[must_use]
pub fn parse_magnitude(raw: Option<&str>) -> f64 {
    match parse_magnitude_strict(raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::trace!(footprint = ?raw, error = %err, "footprint recovered to 0");
            0.0
        }
    }
}

/// Parse the magnitude of a footprint string, reporting why it failed
///
/// # Errors
/// Returns [`MagnitudeParseError`] when the footprint is absent, blank, has no
/// leading number, or the number is negative or not finite.
pub fn parse_magnitude_strict(raw: Option<&str>) -> Result<f64, MagnitudeParseError> {
    let raw = raw.ok_or(MagnitudeParseError::Missing)?;
    let token = raw
        .split_whitespace()
        .next()
        .ok_or(MagnitudeParseError::Empty)?;

    let prefix = &token[..numeric_prefix_len(token)];
    if prefix.is_empty() {
        return Err(MagnitudeParseError::NotNumeric(token.to_string()));
    }

    let value: f64 = prefix
        .parse()
        .map_err(|_| MagnitudeParseError::NotNumeric(token.to_string()))?;

    if !value.is_finite() {
        return Err(MagnitudeParseError::NonFinite(prefix.to_string()));
    }
    if value < 0.0 {
        return Err(MagnitudeParseError::Negative(value));
    }

    // -0.0 folds to 0.0
    Ok(value + 0.0)
}

/// Length in bytes of the longest leading decimal literal in `token`
///
/// Grammar: `[+-]? digits? ('.' digits?)? ([eE] [+-]? digits)?` with at least
/// one mantissa digit. An exponent marker not followed by digits is left out.
fn numeric_prefix_len(token: &str) -> usize {
    let bytes = token.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_start = pos;
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    let mut mantissa_digits = pos - int_start;

    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            pos = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp_pos = pos + 1;
        if matches!(bytes.get(exp_pos), Some(b'+' | b'-')) {
            exp_pos += 1;
        }
        let exp_digits_start = exp_pos;
        while bytes.get(exp_pos).is_some_and(u8::is_ascii_digit) {
            exp_pos += 1;
        }
        if exp_pos > exp_digits_start {
            pos = exp_pos;
        }
    }

    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn leading_number_with_unit() {
        assert_eq!(parse_magnitude(Some("150 kg CO2e")), 150.0);
        assert_eq!(parse_magnitude(Some("  12.5 kg")), 12.5);
        assert_eq!(parse_magnitude(Some("12.5kg")), 12.5);
        assert_eq!(parse_magnitude(Some(".5 t")), 0.5);
        assert_eq!(parse_magnitude(Some("3e2 g")), 300.0);
        assert_eq!(parse_magnitude(Some("7e kg")), 7.0);
    }

    #[test]
    fn garbage_recovers_to_zero() {
        assert_eq!(parse_magnitude(Some("abc kg")), 0.0);
        assert_eq!(parse_magnitude(Some("")), 0.0);
        assert_eq!(parse_magnitude(Some("   ")), 0.0);
        assert_eq!(parse_magnitude(None), 0.0);
        assert_eq!(parse_magnitude(Some(". kg")), 0.0);
    }

    #[test]
    fn strict_reports_reason() {
        assert_eq!(parse_magnitude_strict(None), Err(MagnitudeParseError::Missing));
        assert_eq!(parse_magnitude_strict(Some(" ")), Err(MagnitudeParseError::Empty));
        assert_eq!(
            parse_magnitude_strict(Some("abc kg")),
            Err(MagnitudeParseError::NotNumeric("abc".into()))
        );
        assert_eq!(
            parse_magnitude_strict(Some("-4 kg")),
            Err(MagnitudeParseError::Negative(-4.0))
        );
        assert!(matches!(
            parse_magnitude_strict(Some("1e999 kg")),
            Err(MagnitudeParseError::NonFinite(_))
        ));
    }

    #[test]
    fn negative_zero_folds() {
        let value = parse_magnitude(Some("-0 kg"));
        assert_eq!(value, 0.0);
        assert!(value.is_sign_positive());
    }

    proptest! {
        #[test]
        fn never_negative_or_non_finite(text in ".*") {
            let value = parse_magnitude(Some(&text));
            prop_assert!(value.is_finite());
            prop_assert!(value >= 0.0);
        }

        #[test]
        fn formatted_values_round_trip(value in 0.0f64..1.0e9, unit in "[a-zA-Z ]{0,12}") {
            let text = format!("{value} {unit}");
            prop_assert_eq!(parse_magnitude(Some(&text)), value);
        }
    }
}
