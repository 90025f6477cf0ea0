use serde_json::Value;

use crate::ApiFamily;

/// Extract the continuation link from a list response, if any.
pub(crate) fn next_link(json: &Value, family: ApiFamily) -> Option<String> {
    json.get(family.next_link_field())
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

/// Extract the `value` array from a list response.
///
/// Returns `None` when the body is a single resource document rather than a
/// list payload.
pub(crate) fn value_items(json: &Value) -> Option<Vec<Value>> {
    json.get("value")?.as_array().cloned()
}

/// Extract the `error` object some ARM and Graph bodies carry on failure.
pub(crate) fn error_details(json: &Value) -> Option<(String, String)> {
    let error = json.get("error")?;
    if !error.is_object() {
        return None;
    }

    let code = error
        .get("code")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some((code, message))
}
