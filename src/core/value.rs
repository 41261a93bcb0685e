//! Integer coercion for primitive record values.
//!
//! Settings and state arrive from persisted JSON or from request payloads,
//! so a field may hold `12`, `12.0`, `"12"` or `" 12 "`. Everything that
//! reads as a whole number is accepted; anything else yields `None`.

use serde_json::Value;

/// Coerce a primitive value to an integer.
///
/// ```
/// use life_arena::core::value::coerce_int;
/// use serde_json::json;
///
/// assert_eq!(coerce_int(&json!(7)), Some(7));
/// assert_eq!(coerce_int(&json!(" -3 ")), Some(-3));
/// assert_eq!(coerce_int(&json!(4.9)), Some(4));
/// assert_eq!(coerce_int(&json!("4.9")), None);
/// assert_eq!(coerce_int(&json!([1])), None);
/// ```
#[must_use]
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else if n.is_u64() {
                None
            } else {
                n.as_f64().and_then(truncate_float)
            }
        }
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => parse_int_str(s),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Coerce every element of an array; `None` if the value is not an array
/// or any element fails.
#[must_use]
pub fn coerce_int_list(value: &Value) -> Option<Vec<i64>> {
    value.as_array()?.iter().map(coerce_int).collect()
}

fn truncate_float(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let t = f.trunc();
    if t < i64::MIN as f64 || t >= i64::MAX as f64 {
        return None;
    }
    Some(t as i64)
}

fn parse_int_str(s: &str) -> Option<i64> {
    let s = s.trim();
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
