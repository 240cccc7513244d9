//! Address codec errors

use thiserror::Error;

/// Errors from address derivation and parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The public key is not the required compressed-point length.
    #[error("invalid public key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// The embedded checksum does not match the payload.
    #[error("address checksum mismatch")]
    ChecksumMismatch,

    /// The text is not valid base58, or decodes to too few bytes to hold a
    /// magic byte, a key, and a checksum.
    #[error("invalid address encoding: {0}")]
    InvalidEncoding(String),
}
