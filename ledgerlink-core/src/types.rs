//! Wire frame types for the node RPC protocol
//!
//! The node speaks a JSON-shaped wire protocol with exactly three frame
//! shapes:
//!
//! 1. **Request**: a method call carrying an `id`, answered by a response
//! 2. **Notification**: a method call with no `id`; no response ever arrives
//! 3. **Response**: the answer to a request, correlated by `id`, carrying
//!    exactly one of `result` or `error`
//!
//! Anything received that does not match one of these shapes is a protocol
//! error and is rejected at the decoding boundary rather than leaking a
//! half-parsed value into the correlation layer.
//!
//! # Request IDs
//!
//! The id correlates a request with its response. The wire allows numbers
//! or strings; the client allocates numeric ids from a counter that is
//! never reset for the life of the client, so a reconnected socket can
//! never resurrect or collide with a stale id.

use crate::error::RpcErrorData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request identifier: a number or a string.
///
/// Serialized untagged so it appears on the wire as the bare value.
/// Implements `Hash`/`Eq` so it can key the pending-request map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// Numeric identifier, allocated from the client's monotonic counter
    Number(u64),
    /// String identifier, accepted for interoperability with servers that
    /// hand out string ids
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Id::Number(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Text(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::Text(s)
    }
}

/// Outbound request frame: `{"method": ..., "params": ..., "id": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Name of the remote method to invoke
    pub method: String,
    /// Parameters passed to the method; omitted from the wire when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    /// Correlation id echoed back by the server's response
    pub id: Id,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>, id: Id) -> Self {
        Self {
            method: method.into(),
            params,
            id,
        }
    }
}

/// Notification frame: `{"method": ..., "params": ...}` with no `id`.
///
/// Used in both directions: clients send fire-and-forget calls, servers
/// push subscription updates. The absence of an `id` is what distinguishes
/// a notification from a request on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcNotification {
    /// Method name or event kind
    pub method: String,
    /// Event payload; omitted from the wire when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl RpcNotification {
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// Response frame: `{"id": ..., "result": ...}` or `{"id": ..., "error": ...}`.
///
/// Exactly one of `result`/`error` is present; the codec enforces this when
/// decoding, so downstream code never sees a response carrying both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Correlation id from the originating request
    pub id: Id,
    /// Successful result, mutually exclusive with `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Application error reported by the server, mutually exclusive with
    /// `result`; propagated verbatim to the caller that issued the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorData>,
}

impl RpcResponse {
    /// Create a successful response.
    pub fn success(result: serde_json::Value, id: Id) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(error: RpcErrorData, id: Id) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// One complete wire frame: the closed union of the three message shapes.
///
/// Decoding classifies strictly by field presence (see
/// [`decode_frame`](crate::codec::decode_frame)); there is no catch-all
/// variant, so a frame that fits none of the shapes never reaches the
/// correlation layer.
#[derive(Debug, Clone)]
pub enum Frame {
    /// A call expecting a response (carries an id)
    Request(RpcRequest),
    /// A fire-and-forget call or server push (no id)
    Notification(RpcNotification),
    /// The answer to a previously issued request
    Response(RpcResponse),
}

impl Frame {
    pub fn is_request(&self) -> bool {
        matches!(self, Frame::Request(_))
    }

    pub fn is_notification(&self) -> bool {
        matches!(self, Frame::Notification(_))
    }

    pub fn is_response(&self) -> bool {
        matches!(self, Frame::Response(_))
    }
}
