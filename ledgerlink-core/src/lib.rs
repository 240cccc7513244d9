//! Core types shared by the ledgerlink crates
//!
//! Defines the wire frame types for the node's JSON-RPC protocol, the strict
//! codec that classifies inbound frames, the client-facing error taxonomy,
//! and the OpenTelemetry observability setup.
//!
//! # Wire format
//!
//! Frames are JSON objects in one of three shapes:
//!
//! ```json
//! {"method": "Network.getSelf", "params": null, "id": 1}
//! {"method": "Atoms.subscribeUpdate", "params": {...}}
//! {"id": 1, "result": {...}}
//! ```
//!
//! A frame with an `id` and a `method` is a request; with a `method` and no
//! `id`, a notification; with an `id` and exactly one of `result`/`error`, a
//! response. Anything else is a protocol error.

pub mod codec;
mod error;
mod observability;
mod types;

pub use error::{Error, Result, RpcErrorData};
pub use observability::{
    init_observability, shutdown_observability, ObservabilityConfig,
};
pub use types::{Frame, Id, RpcNotification, RpcRequest, RpcResponse};
