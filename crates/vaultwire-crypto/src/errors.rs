//! Error types for key wrapping, chunk decryption, and checksums.

use thiserror::Error;

/// Failures that can occur in the cryptographic layer.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The DER bytes submitted by a client did not parse as an RSA public key.
    #[error("invalid RSA public key: {0}")]
    InvalidPublicKey(String),

    /// RSA-OAEP encryption of the session key failed.
    #[error("failed to wrap session key: {0}")]
    WrapFailed(String),

    /// RSA-OAEP decryption of a wrapped session key failed (test/client use only).
    #[error("failed to unwrap session key: {0}")]
    UnwrapFailed(String),

    /// A ciphertext chunk was not a multiple of the AES block size.
    #[error("ciphertext chunk length {len} is not a multiple of the AES block size (16)")]
    NotBlockAligned {
        /// Offending chunk length, in bytes.
        len: usize,
    },

    /// PKCS#7 padding on the final chunk was malformed.
    #[error("invalid PKCS#7 padding")]
    InvalidPadding,
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, CryptoError>;
