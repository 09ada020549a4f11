//! Extraction of user-facing messages from FastAPI-style error bodies.
//!
//! The server reports failures as `{"detail": ...}` where `detail` is a
//! string, a list of validation entries with `msg`, or an object.

use serde_json::Value;

/// Returns the message to show for an error body, if one can be found.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail")?;
    from_value(detail)
}

fn from_value(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(entries) => {
            let messages: Vec<String> = entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(obj) => obj
                        .get("msg")
                        .or_else(|| obj.get("message"))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                })
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        Value::Object(obj) => obj
            .get("message")
            .or_else(|| obj.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some(detail.to_string())),
        _ => None,
    }
}
