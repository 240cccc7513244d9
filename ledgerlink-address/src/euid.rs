//! EUID derivation
//!
//! An EUID is the compact ledger identity of a public key: the first 12
//! bytes of a double SHA-256 over the key, read as a big-endian
//! two's-complement signed integer. Roughly half of all keys therefore hash
//! to a negative EUID; the sign is part of the identity and is preserved,
//! not normalized away. Display is the canonical decimal form, so two
//! parties comparing EUID strings agree on the sign.

use crate::address::PUBLIC_KEY_LENGTH;
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of hash bytes an EUID is built from.
pub const EUID_LENGTH: usize = 12;

/// Signed 96-bit ledger identity derived from a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Euid(i128);

impl Euid {
    /// Derive the EUID for a compressed public key.
    pub fn from_public_key(public_key: &[u8; PUBLIC_KEY_LENGTH]) -> Self {
        let first = Sha256::digest(public_key);
        let second = Sha256::digest(first);
        let mut bytes = [0u8; EUID_LENGTH];
        bytes.copy_from_slice(&second[..EUID_LENGTH]);
        Self::from_bytes(bytes)
    }

    /// Build an EUID from its raw 12 big-endian two's-complement bytes.
    pub fn from_bytes(bytes: [u8; EUID_LENGTH]) -> Self {
        // Sign-extend the 96-bit value into an i128
        let fill = if bytes[0] & 0x80 != 0 { 0xff } else { 0x00 };
        let mut wide = [fill; 16];
        wide[16 - EUID_LENGTH..].copy_from_slice(&bytes);
        Self(i128::from_be_bytes(wide))
    }

    /// The signed integer value.
    pub fn value(&self) -> i128 {
        self.0
    }

    /// The raw 12 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; EUID_LENGTH] {
        let wide = self.0.to_be_bytes();
        let mut out = [0u8; EUID_LENGTH];
        out.copy_from_slice(&wide[16 - EUID_LENGTH..]);
        out
    }
}

impl fmt::Display for Euid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
