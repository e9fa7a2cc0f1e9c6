//! Scalar values extracted from state records for comparison

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A comparable value pulled out of a state record
///
/// Text borrows from the record wherever possible; only case folding and
/// stringification of structured attributes allocate.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    /// Absent value (unresolved record, missing attribute, JSON null)
    Missing,
    Number(f64),
    Text(Cow<'a, str>),
    Instant(DateTime<Utc>),
}

impl<'a> SortValue<'a> {
    /// Borrowed text value
    pub fn text(s: &'a str) -> Self {
        SortValue::Text(Cow::Borrowed(s))
    }

    /// Missing when `None`, text otherwise
    pub fn from_opt_str(s: Option<&'a str>) -> Self {
        s.map_or(SortValue::Missing, SortValue::text)
    }

    /// Lower-case text values; other variants pass through unchanged
    pub(crate) fn fold_case(self) -> Self {
        match self {
            SortValue::Text(s) => SortValue::Text(Cow::Owned(s.to_lowercase())),
            other => other,
        }
    }

    /// Numeric reading of the value, `None` when it has none
    ///
    /// Text is read the way a leading-prefix float parser reads it, so
    /// `"23.5 °C"` is 23.5. Instants read as epoch milliseconds.
    pub(crate) fn to_number(&self) -> Option<f64> {
        match self {
            SortValue::Missing => None,
            SortValue::Number(n) if n.is_nan() => None,
            SortValue::Number(n) => Some(*n),
            SortValue::Text(s) => parse_float_prefix(s),
            SortValue::Instant(t) => Some(t.timestamp_millis() as f64),
        }
    }
}

impl fmt::Display for SortValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortValue::Missing => f.write_str("undefined"),
            SortValue::Number(n) => write!(f, "{n}"),
            SortValue::Text(s) => f.write_str(s),
            SortValue::Instant(t) => f.write_str(&t.to_rfc3339()),
        }
    }
}

impl<'a> From<&'a Value> for SortValue<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => SortValue::Missing,
            Value::Bool(b) => SortValue::text(if *b { "true" } else { "false" }),
            Value::Number(n) => n.as_f64().map_or(SortValue::Missing, SortValue::Number),
            Value::String(s) => SortValue::text(s),
            Value::Array(_) | Value::Object(_) => SortValue::Text(Cow::Owned(value.to_string())),
        }
    }
}

/// JavaScript-style truthiness of a JSON value
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse the longest leading float literal of `s`
///
/// Leading whitespace is skipped, an optional sign, digits with an optional
/// fraction and exponent are accepted, and `Infinity` is recognised. Anything
/// after the literal is ignored. Returns `None` when no digits lead the text.
pub(crate) fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("42"), Some(42.0));
        assert_eq!(parse_float_prefix("  -3.5"), Some(-3.5));
        assert_eq!(parse_float_prefix("23.5 °C"), Some(23.5));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("1e3x"), Some(1000.0));
        assert_eq!(parse_float_prefix("2e"), Some(2.0));
        assert_eq!(parse_float_prefix("10.0.0.2"), Some(10.0));
        assert_eq!(parse_float_prefix("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_parse_float_prefix_rejects() {
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("unavailable"), None);
    }

    #[test]
    fn test_from_json() {
        assert_eq!(SortValue::from(&json!(null)), SortValue::Missing);
        assert_eq!(SortValue::from(&json!(3)), SortValue::Number(3.0));
        assert_eq!(SortValue::from(&json!("on")), SortValue::text("on"));
        assert_eq!(SortValue::from(&json!(true)), SortValue::text("true"));
        assert_eq!(
            SortValue::from(&json!([1, 2])),
            SortValue::Text(Cow::Owned("[1,2]".to_string()))
        );
    }

    #[test]
    fn test_to_number() {
        let instant = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(
            SortValue::Instant(instant).to_number(),
            Some(1_700_000_000_123.0)
        );
        assert_eq!(SortValue::text("12abc").to_number(), Some(12.0));
        assert_eq!(SortValue::Missing.to_number(), None);
        assert_eq!(SortValue::Number(f64::NAN).to_number(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("Kitchen")));
        assert!(is_truthy(&json!(7)));
        assert!(is_truthy(&json!({})));
    }
}
