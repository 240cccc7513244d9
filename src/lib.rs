//! ledgerlink - resilient ledger node RPC client and address codec
//!
//! This is the convenience crate that re-exports all ledgerlink sub-crates.
//! Use it if you want a single dependency covering the client, the wire
//! types, and the address codec.
//!
//! # Architecture
//!
//! ledgerlink is organized into modular crates:
//!
//! - **ledgerlink-core**: wire frame types, codec, error taxonomy,
//!   observability
//! - **ledgerlink-client**: reconnecting WebSocket JSON-RPC client
//! - **ledgerlink-address**: checksummed base58 addresses and EUIDs
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ledgerlink::{AddressCodec, ClientBuilder, FibonacciBackoff};
//! use serde_json::{json, Value};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClientBuilder::new("ws://localhost:8080/rpc")
//!         .with_reconnect(Box::new(FibonacciBackoff::default()))
//!         .connect()
//!         .await?;
//!
//!     // Derive the address for a key and subscribe to its ledger updates
//!     let codec = AddressCodec::new(0x02);
//!     let address = codec.derive(&[0x02; 33])?;
//!
//!     let _ack: Value = client
//!         .call("Atoms.subscribe", json!({ "address": address.to_base58() }))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

// Re-export all public APIs from sub-crates so users can access everything
// through the `ledgerlink::` prefix
pub use ledgerlink_address as address;
pub use ledgerlink_client as client;
pub use ledgerlink_core as core;

// Convenience re-exports of the most commonly used types
pub use ledgerlink_address::{Address, AddressCodec, Euid};
pub use ledgerlink_client::{ClientBuilder, FibonacciBackoff, NodeClient};
