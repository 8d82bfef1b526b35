//! Numeric coercion for heterogeneous input fields.
//!
//! Raw records arrive as JSON with no type discipline: a brightness may be
//! `200`, `200.7`, or `"200"`. Integer-typed attributes truncate fractional
//! input toward zero; float attributes must be finite.

use serde_json::Value;

/// Coerce a JSON value to an integer, truncating fractional input toward
/// zero. Accepts numbers and numeric strings; rejects non-finite values.
pub(crate) fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

/// Coerce a JSON value to a finite float. Accepts numbers and numeric
/// strings.
pub(crate) fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
