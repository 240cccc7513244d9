//! Error types for ledgerlink
//!
//! Two layers of errors live here:
//!
//! - **Error**: the client-facing taxonomy (uses thiserror). Transport
//!   instability is absorbed by the reconnect loop and only surfaces when a
//!   state boundary is crossed: a specific call fails, or the connection
//!   aborts terminally.
//! - **RpcErrorData**: the wire-format error object carried in a response's
//!   `error` field, propagated verbatim to the caller that issued the
//!   matching request.
//!
//! # Propagation policy
//!
//! Transport-level errors during a connect attempt are swallowed into the
//! backoff retry loop and never surfaced individually. A malformed inbound
//! frame or an unmatched response id is logged and discarded
//! ([`Error::Protocol`]), never fatal to the connection. Only two things
//! reach callers: the resolution of their own call, and the terminal
//! [`Error::ConnectionAborted`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used throughout the ledgerlink crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Client-facing error taxonomy.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Server-reported application error, propagated as-is to the caller
    /// that issued the matching request. Never retried by the client.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcErrorData),

    /// Low-level WebSocket or I/O failure. Recovered internally via
    /// backoff; callers only ever observe it through a failed send.
    #[error("transport error: {0}")]
    Transport(String),

    /// The socket dropped while this call was outstanding. The call is not
    /// retried transparently; retry, if desired, is the caller's decision.
    #[error("connection lost with request outstanding")]
    ConnectionLost,

    /// Terminal: the caller closed the connection or the reconnect budget
    /// was exhausted. Surfaced to every pending call exactly once.
    #[error("connection aborted")]
    ConnectionAborted,

    /// `call`/`notify` issued while the connection is not open. Nothing is
    /// queued silently; the operation fails at the send boundary.
    #[error("not connected")]
    NotConnected,

    /// Malformed inbound frame, or a response shape the wire protocol does
    /// not define. Logged and discarded at the routing layer.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Params/result (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Unexpected internal condition (e.g. a completion channel dropped).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Wire-format error object as carried in a response frame:
/// `{"code": int, "message": string, "data"?: any}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorData {
    /// Numeric error code chosen by the server
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// Optional structured context attached by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcErrorData {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(code: i32, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl std::fmt::Display for RpcErrorData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for RpcErrorData {}
