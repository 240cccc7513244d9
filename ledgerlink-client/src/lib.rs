//! Resilient node RPC client over a reconnecting WebSocket
//!
//! This crate provides a JSON-RPC client tailored to long-lived ledger node
//! connections: many concurrent calls multiplexed over one socket, automatic
//! reconnection with configurable backoff, method-keyed notification
//! dispatch, and OpenTelemetry observability.
//!
//! # Core Features
//!
//! - **Request-Response**: typed calls correlated by monotonic ids
//! - **Notifications**: fire-and-forget sends and server-push handlers
//! - **Auto-Reconnection**: Fibonacci backoff with jitter, or custom
//!   strategies
//! - **Lifecycle events**: `Open`/`Closed` broadcast to observers, `Closed`
//!   exactly once
//! - **Observability**: OpenTelemetry traces and metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ledgerlink_client::{ClientBuilder, FibonacciBackoff};
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> ledgerlink_core::Result<()> {
//!     let client = ClientBuilder::new("ws://localhost:8080/rpc")
//!         .with_reconnect(Box::new(FibonacciBackoff::default()))
//!         .connect()
//!         .await?;
//!
//!     // Typed call
//!     let info: Value = client.call("Network.getSelf", Value::Null).await?;
//!     println!("node: {}", info);
//!
//!     // Server-push handler
//!     client
//!         .on_notification("Atoms.subscribeUpdate", |notif| async move {
//!             println!("update: {:?}", notif.params);
//!         })
//!         .await;
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```

mod backoff;
mod client;
mod client_builder;
mod connection;
mod metrics;
mod notification;
mod request;

pub use backoff::{FibonacciBackoff, FixedDelay, NoReconnect, ReconnectStrategy};
pub use client::NodeClient;
pub use client_builder::ClientBuilder;
pub use connection::{ConnectionManager, ConnectionState, LifecycleEvent};
pub use metrics::ClientMetrics;
pub use notification::NotificationHandler;
pub use request::RequestTracker;
