//! Numeric coercion and money rounding.
//!
//! Amounts are typed in while the user is still editing, and imported files
//! are merged without schema checks. Every numeric input therefore goes
//! through the parse-with-default-zero rules here: anything that is not a
//! finite number becomes `0.0`, and nothing in this module can fail.

use serde_json::Value;

/// Parse free-form text as a number, falling back to `0.0`.
///
/// Surrounding whitespace is ignored. Empty input, unparsable text and
/// non-finite results (`inf`, `NaN`) all yield zero.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Coerce an arbitrary JSON value to a number, falling back to `0.0`.
///
/// Numbers pass through, strings are parsed with [`coerce_number`], booleans
/// map to `1.0`/`0.0`; everything else (null, arrays, objects) is zero.
pub fn coerce_json(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => coerce_number(s),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

/// Round to two decimal places, half away from zero.
///
/// Non-finite input rounds to zero, and negative zero is normalised to
/// positive zero so it never renders as `-0.00`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Format an amount with exactly two decimals (no currency).
pub fn money(value: f64) -> String {
    format!("{:.2}", round2(value))
}
