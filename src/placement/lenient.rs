//! Lenient numeric coercion for form input and stored JSON.
//!
//! Form fields hold free text, and stored configuration may have been written
//! by older tools, so integers are read the way a browser `parseInt` reads
//! them instead of being rejected. Stored values are only interpreted here;
//! the raw JSON is never rewritten.

use serde_json::Value;

/// Parse the leading integer of `s`.
///
/// Leading whitespace and one sign are allowed, then at least one ASCII digit.
/// Anything after the digits is ignored: `"12px"` is 12, `"3.9"` is 3.
/// Returns `None` when there is no leading integer or it overflows.
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Interpret a JSON value as an integer.
///
/// Floats truncate toward zero, strings go through [`parse_int`], everything
/// else is `None`.
pub fn int_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int(s),
        _ => None,
    }
}

/// Interpret a JSON value as text. `null` is `None`, scalars are stringified.
pub fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_int_plain() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("  -7"), Some(-7));
        assert_eq!(parse_int("+15"), Some(15));
    }

    #[test]
    fn test_parse_int_trailing_garbage() {
        assert_eq!(parse_int("12px"), Some(12));
        assert_eq!(parse_int("3.9"), Some(3));
    }

    #[test]
    fn test_parse_int_non_numeric() {
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int(".5"), None);
    }

    #[test]
    fn test_parse_int_overflow() {
        assert_eq!(parse_int("99999999999999999999999"), None);
    }

    #[test]
    fn test_int_from_value() {
        assert_eq!(int_from_value(&json!(10)), Some(10));
        assert_eq!(int_from_value(&json!(10.8)), Some(10));
        assert_eq!(int_from_value(&json!(-2.5)), Some(-2));
        assert_eq!(int_from_value(&json!("33")), Some(33));
        assert_eq!(int_from_value(&json!(null)), None);
        assert_eq!(int_from_value(&json!(true)), None);
    }

    #[test]
    fn test_text_from_value() {
        assert_eq!(text_from_value(&json!("Georgia")), Some("Georgia".to_string()));
        assert_eq!(text_from_value(&json!(12)), Some("12".to_string()));
        assert_eq!(text_from_value(&json!(null)), None);
        assert_eq!(text_from_value(&json!([1])), None);
    }
}
