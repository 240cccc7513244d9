//! Checksummed base58 addresses
//!
//! An address is the base58 rendering of `magic ‖ public_key ‖ checksum`:
//! one network magic byte, the 33-byte compressed public key, and the first
//! 4 bytes of a double SHA-256 over the preceding 34 bytes. The checksum
//! makes any single-character transcription error detectable, and the magic
//! byte makes an address from one network invalid on another.
//!
//! Derivation always goes through an explicitly constructed
//! [`AddressCodec`], which carries the network magic. There is no ambient
//! network context; two codecs with different magics produce disjoint
//! address sets from the same key.
//!
//! # Examples
//!
//! ```rust
//! use ledgerlink_address::AddressCodec;
//!
//! let codec = AddressCodec::new(0x02);
//! let address = codec.derive(&[0x02; 33]).unwrap();
//!
//! let text = address.to_base58();
//! let parsed = text.parse::<ledgerlink_address::Address>().unwrap();
//! assert_eq!(parsed, address);
//! ```

use crate::error::AddressError;
use base58::{FromBase58, ToBase58};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length of a compressed public key in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 33;
/// Length of the embedded checksum in bytes.
pub const CHECKSUM_LENGTH: usize = 4;

/// First 4 bytes of `sha256(sha256(payload))`.
pub(crate) fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let first = Sha256::digest(payload);
    let second = Sha256::digest(first);
    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&second[..CHECKSUM_LENGTH]);
    out
}

/// Derives addresses for one network.
///
/// Immutable after construction; the magic byte identifies the network and
/// is embedded in every derived address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressCodec {
    magic: u8,
}

impl AddressCodec {
    /// Create a codec for the network identified by `magic`.
    pub fn new(magic: u8) -> Self {
        Self { magic }
    }

    /// The network magic byte.
    pub fn magic(&self) -> u8 {
        self.magic
    }

    /// Derive the address for a 33-byte compressed public key.
    pub fn derive(&self, public_key: &[u8]) -> Result<Address, AddressError> {
        if public_key.len() != PUBLIC_KEY_LENGTH {
            return Err(AddressError::InvalidKeyLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: public_key.len(),
            });
        }
        let mut key = [0u8; PUBLIC_KEY_LENGTH];
        key.copy_from_slice(public_key);
        Ok(Address {
            magic: self.magic,
            public_key: key,
        })
    }
}

/// A checksummed network address: magic byte plus compressed public key.
///
/// Immutable value type. The checksum is not stored; it is recomputed on
/// encode and verified on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    magic: u8,
    public_key: [u8; PUBLIC_KEY_LENGTH],
}

impl Address {
    /// The network magic byte embedded in this address.
    pub fn magic(&self) -> u8 {
        self.magic
    }

    /// The compressed public key.
    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.public_key
    }

    /// Encode as base58 text with the trailing checksum.
    pub fn to_base58(&self) -> String {
        let mut bytes = Vec::with_capacity(1 + PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH);
        bytes.push(self.magic);
        bytes.extend_from_slice(&self.public_key);
        let check = checksum(&bytes);
        bytes.extend_from_slice(&check);
        bytes.to_base58()
    }

    /// Decode and verify a base58 address.
    ///
    /// The trailing 4 bytes are split off and compared against a fresh
    /// double SHA-256 of the payload; any difference, including a corrupted
    /// magic byte, is a [`AddressError::ChecksumMismatch`].
    pub fn from_base58(text: &str) -> Result<Self, AddressError> {
        let bytes = text
            .from_base58()
            .map_err(|e| AddressError::InvalidEncoding(format!("{:?}", e)))?;

        if bytes.len() < 1 + CHECKSUM_LENGTH + 1 {
            return Err(AddressError::InvalidEncoding(
                "too short to hold magic, key, and checksum".to_string(),
            ));
        }

        let (payload, check) = bytes.split_at(bytes.len() - CHECKSUM_LENGTH);
        if checksum(payload) != check {
            return Err(AddressError::ChecksumMismatch);
        }

        let key_bytes = &payload[1..];
        if key_bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(AddressError::InvalidKeyLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: key_bytes.len(),
            });
        }

        let mut key = [0u8; PUBLIC_KEY_LENGTH];
        key.copy_from_slice(key_bytes);
        Ok(Self {
            magic: payload[0],
            public_key: key,
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}
