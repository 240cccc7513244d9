//! Deterministic address and identity codec
//!
//! Pure functions from public keys to ledger identifiers; no I/O, no global
//! state. Two derivations are provided:
//!
//! - **Address**: `base58(magic ‖ public_key ‖ checksum)` where the checksum
//!   is the first 4 bytes of a double SHA-256, derived through an explicit
//!   per-network [`AddressCodec`]
//! - **EUID**: the first 12 bytes of a double SHA-256 of the key, read as a
//!   signed big-endian integer
//!
//! # Examples
//!
//! ```rust
//! use ledgerlink_address::{AddressCodec, Euid};
//!
//! let key = [0x03u8; 33];
//! let codec = AddressCodec::new(0x02);
//!
//! let address = codec.derive(&key).unwrap();
//! let euid = Euid::from_public_key(&key);
//!
//! println!("{} / {}", address, euid);
//! ```

mod address;
mod error;
mod euid;

pub use address::{Address, AddressCodec, CHECKSUM_LENGTH, PUBLIC_KEY_LENGTH};
pub use error::AddressError;
pub use euid::{Euid, EUID_LENGTH};
