//! Request field coercion
//!
//! Employee forms are loose about types: salaries arrive as numbers or
//! strings, and cleared fields arrive as `null`, `""`, `0` or `false`.
//! These helpers normalize that into typed values before validation.

use chrono::{DateTime, NaiveDate};
use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a text field, mapping blank-ish JSON values to `None`
///
/// `null`, `false` and `0` become `None`. Strings are kept as-is (including
/// `""`, which callers treat as empty). Other numbers and `true` are
/// rendered as text. Arrays and objects are rejected.
pub fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(true)) => Ok(Some("true".to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string, found {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns the trimmed text, or `None` if it is absent or blank
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Coerces a salary value to an integer
///
/// Returns `None` when the value counts as not supplied (`null`, `false`,
/// `0`, `""`). Numbers are truncated toward zero; strings are read up to
/// the first non-digit, and a string with no leading digits yields 0.
pub fn coerce_salary(value: &Value) -> Option<i64> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some(0),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                (i != 0).then_some(i)
            } else if n.is_u64() {
                Some(i64::MAX)
            } else {
                let f = n.as_f64().unwrap_or(0.0);
                // `as` saturates on out-of-range floats
                (f != 0.0).then_some(f.trunc() as i64)
            }
        }
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(leading_integer(s)),
        Value::Array(_) | Value::Object(_) => Some(0),
    }
}

/// Parses an optional sign and digits at the start of `s`, ignoring the rest
///
/// ```
/// use staffdesk_shared::service::input::leading_integer;
///
/// assert_eq!(leading_integer("5000.7"), 5000);
/// assert_eq!(leading_integer("12abc"), 12);
/// assert_eq!(leading_integer("abc"), 0);
/// ```
pub fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Parses a joining date given as `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
