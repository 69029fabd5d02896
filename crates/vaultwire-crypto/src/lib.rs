//! Cryptographic primitives for the vaultwire protocol.
//!
//! Three independent pieces: RSA-OAEP session-key wrapping, per-packet
//! AES-128-CBC chunk decryption, and a Unix-`cksum`-compatible checksum used
//! to confirm uploads. None of these types know about the wire format or
//! storage layer — they operate purely on bytes.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod aes;
pub mod cksum;
pub mod errors;
pub mod rsa;

pub use errors::{CryptoError, Result};
