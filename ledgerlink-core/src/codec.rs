//! Codec for wire frame serialization and deserialization
//!
//! Encoding is plain serde. Decoding is deliberately stricter than an
//! untagged deserialize: inbound text is classified by field presence into
//! exactly one of the three frame shapes, and anything else - arrays, bare
//! values, objects missing both `id` and `method`, responses carrying both
//! `result` and `error` or neither - is rejected as [`Error::Protocol`].
//!
//! Servers may be stale or buggy; the contract here is that a bad frame
//! produces one logged protocol error at the routing layer and never a
//! panic or a misrouted response.
//!
//! # Examples
//!
//! ```rust
//! use ledgerlink_core::{codec, Frame, Id, RpcRequest};
//!
//! let request = RpcRequest::new("ping", None, Id::Number(1));
//! let text = codec::encode(&request).unwrap();
//!
//! let frame = codec::decode_frame(&text).unwrap();
//! assert!(frame.is_request());
//! ```

use crate::error::{Error, Result};
use crate::types::{Frame, RpcNotification, RpcRequest, RpcResponse};
use serde::Serialize;

/// Encode any serializable frame to its wire text.
pub fn encode<T: Serialize>(msg: &T) -> Result<String> {
    serde_json::to_string(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode wire text into a [`Frame`], classifying strictly by shape.
///
/// Classification rules, applied to a JSON object:
/// - has `id` and (`result` or `error`) → [`Frame::Response`]
/// - has `id` and `method` → [`Frame::Request`]
/// - has `method` and no `id` → [`Frame::Notification`]
///
/// Everything else fails with [`Error::Protocol`], including non-object
/// payloads and responses that carry both `result` and `error` or neither.
pub fn decode_frame(data: &str) -> Result<Frame> {
    let value: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| Error::Protocol(format!("invalid JSON: {}", e)))?;

    let obj = value
        .as_object()
        .ok_or_else(|| Error::Protocol("frame is not a JSON object".to_string()))?;

    let has_id = obj.contains_key("id");
    let has_method = obj.contains_key("method");
    let has_result = obj.contains_key("result");
    let has_error = obj.contains_key("error");

    if has_id && (has_result || has_error) {
        if has_result && has_error {
            return Err(Error::Protocol(
                "response carries both result and error".to_string(),
            ));
        }
        let response: RpcResponse = serde_json::from_value(value)
            .map_err(|e| Error::Protocol(format!("malformed response: {}", e)))?;
        return Ok(Frame::Response(response));
    }

    if has_method {
        if has_id {
            let request: RpcRequest = serde_json::from_value(value)
                .map_err(|e| Error::Protocol(format!("malformed request: {}", e)))?;
            return Ok(Frame::Request(request));
        }
        let notification: RpcNotification = serde_json::from_value(value)
            .map_err(|e| Error::Protocol(format!("malformed notification: {}", e)))?;
        return Ok(Frame::Notification(notification));
    }

    Err(Error::Protocol(
        "frame matches no known shape (request, notification, response)".to_string(),
    ))
}
