use axum::http::Method;
use serde_json::Value;

use crate::api::Payload;
use crate::error::ApiError;

/// A string field that is present and non-empty
pub fn required_text(payload: &Payload, key: &str) -> Option<String> {
    payload
        .text(key)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// An id inside a request body: a JSON integer or a string of digits
pub fn value_as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn require_post(method: &Method) -> Result<(), ApiError> {
    if method == Method::POST {
        Ok(())
    } else {
        Err(ApiError::bad_request("Invalid request method"))
    }
}
