//! Base64-wrapped JSON bodies as carried on the queue.

use crate::bridge::{domain::value_type_name, error::DecodeError};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Map, Value};

/// Decodes a queue body into a JSON mapping.
///
/// Surrounding ASCII whitespace is ignored.
///
/// # Errors
///
/// Returns [`DecodeError`] if the body is empty, not base64, not UTF-8,
/// not JSON, or not a JSON mapping.
///
/// # Examples
///
/// ```
/// use mq_bus_bridge::bridge::adapters::codec::{decode_payload, encode_payload};
/// use serde_json::json;
///
/// let body = encode_payload(&json!({"msg_type": "ping"}));
/// let decoded = decode_payload(&body).expect("round trip");
/// assert_eq!(decoded.get("msg_type"), Some(&json!("ping")));
/// ```
pub fn decode_payload(body: &[u8]) -> Result<Map<String, Value>, DecodeError> {
    let trimmed = body.trim_ascii();
    if trimmed.is_empty() {
        return Err(DecodeError::EmptyBody);
    }
    let bytes = STANDARD.decode(trimmed)?;
    let text = String::from_utf8(bytes)?;
    match serde_json::from_str::<Value>(&text)? {
        Value::Object(map) => Ok(map),
        other => Err(DecodeError::NotAMapping {
            actual: value_type_name(&other),
        }),
    }
}

/// Encodes a JSON value as a queue body.
#[must_use]
pub fn encode_payload(payload: &Value) -> Vec<u8> {
    STANDARD.encode(payload.to_string()).into_bytes()
}
