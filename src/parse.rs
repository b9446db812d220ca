//! Lenient number parsing for values users type into free-text fields.
//!
//! Nothing here fails: malformed input becomes zero.

use serde::{Deserialize, Deserializer};

pub fn int_or_zero(raw: &str) -> i32 {
    raw.trim().parse::<i32>().unwrap_or(0)
}

pub fn number_or_zero(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Accepts a JSON integer, a numeric string or null; anything else is 0.
pub fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(0),
        Some(serde_json::Value::String(s)) => int_or_zero(&s),
        _ => 0,
    })
}
