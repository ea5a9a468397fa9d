use serde_json::Value;

/// Coerce a loosely typed provider value into an integer.
///
/// Accepts integers, finite floats (truncated toward zero), booleans and
/// strings holding an integer literal (surrounding whitespace allowed).
/// Everything else yields `None`.
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else if let Some(u) = n.as_u64() {
                i64::try_from(u).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f.trunc() as i64)
            }
        }
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Coerce a provider value into display text.
///
/// Non-empty strings pass through and numbers are rendered; empty strings,
/// null, booleans and containers count as absent.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
