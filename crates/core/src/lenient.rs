//! Serde adapters for fields that must never fail to deserialize.
//!
//! Imported invoice files are merged as-is, so a record with a string where a
//! number belongs (or a missing field) still has to load. Use these with
//! `#[serde(default, deserialize_with = "...")]`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::numeric::coerce_json;

/// Any JSON value as `f64`, via [`coerce_json`].
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_json(&value))
}

/// Any JSON value as a non-negative integer width (fraction truncated).
pub fn width<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let n = coerce_json(&value);
    Ok(if n <= 0.0 { 0 } else { n.trunc() as usize })
}

/// Any JSON value as text: strings pass through, numbers and booleans use
/// their JSON form, everything else is empty.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// A JSON array of `T`; a non-array is empty and unreadable elements fall
/// back to `T::default()`.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, serde::Deserialize)]
    struct Inner {
        #[serde(default)]
        n: u32,
    }

    #[derive(Debug, serde::Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "number")]
        amount: f64,
        #[serde(default, deserialize_with = "width")]
        width: usize,
        #[serde(default, deserialize_with = "text")]
        label: String,
        #[serde(default, deserialize_with = "list")]
        inner: Vec<Inner>,
    }

    #[test]
    fn garbage_values_fall_back() {
        let p: Sample = serde_json::from_value(json!({
            "amount": "x",
            "width": -3,
            "label": null,
            "inner": "nope",
        }))
        .unwrap();
        assert_eq!(p.amount, 0.0);
        assert_eq!(p.width, 0);
        assert_eq!(p.label, "");
        assert!(p.inner.is_empty());
    }

    #[test]
    fn convertible_values_are_kept() {
        let p: Sample = serde_json::from_value(json!({
            "amount": "9",
            "width": "5.9",
            "label": 42,
            "inner": [{"n": 3}, 7],
        }))
        .unwrap();
        assert_eq!(p.amount, 9.0);
        assert_eq!(p.width, 5);
        assert_eq!(p.label, "42");
        assert_eq!(p.inner, vec![Inner { n: 3 }, Inner::default()]);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let p: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.amount, 0.0);
        assert_eq!(p.width, 0);
        assert!(p.label.is_empty());
        assert!(p.inner.is_empty());
    }
}
