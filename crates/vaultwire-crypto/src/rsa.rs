//! RSA-OAEP wrapping of AES-128 session keys (`§4.5` steps for 1101/1102).

use rand::rngs::OsRng;
use rsa::{pkcs1::DecodeRsaPublicKey, Oaep, RsaPublicKey};
use sha2::Sha256;

use crate::errors::{CryptoError, Result};

/// Parse a PKCS#1-DER-encoded RSA public key as submitted by a client.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidPublicKey`] if `der` is not a valid PKCS#1
/// RSA public key.
pub fn parse_public_key(der: &[u8]) -> Result<RsaPublicKey> {
    RsaPublicKey::from_pkcs1_der(der).map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
}

/// Parse a PKCS#1-DER-encoded RSA public key out of a fixed-width,
/// zero-padded wire field (`§4.1`'s 160-byte `pubkey` slot).
///
/// The DER encoding's own outer `SEQUENCE` length is trusted to find the end
/// of the real key material; trailing zero padding beyond that point is
/// ignored rather than fed to the DER parser, which would otherwise reject it
/// as trailing garbage.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidPublicKey`] if `field` does not begin with a
/// well-formed DER `SEQUENCE` header, or if the trimmed bytes do not parse as
/// a PKCS#1 RSA public key.
pub fn parse_public_key_padded(field: &[u8]) -> Result<RsaPublicKey> {
    let len = der_sequence_len(field)
        .ok_or_else(|| CryptoError::InvalidPublicKey("not a DER SEQUENCE".to_owned()))?;
    let encoded = field
        .get(..len)
        .ok_or_else(|| CryptoError::InvalidPublicKey("DER length exceeds field".to_owned()))?;
    parse_public_key(encoded)
}

/// Length in bytes of the DER `SEQUENCE` (tag + length octets + content)
/// starting at the front of `bytes`, without validating its contents.
fn der_sequence_len(bytes: &[u8]) -> Option<usize> {
    const SEQUENCE_TAG: u8 = 0x30;
    if bytes.first()? != &SEQUENCE_TAG {
        return None;
    }
    let first_len_byte = *bytes.get(1)?;
    if first_len_byte & 0x80 == 0 {
        return Some(2 + usize::from(first_len_byte));
    }
    let octet_count = usize::from(first_len_byte & 0x7F);
    if octet_count == 0 || octet_count > std::mem::size_of::<usize>() {
        return None;
    }
    let mut content_len = 0usize;
    for offset in 0..octet_count {
        content_len = (content_len << 8) | usize::from(*bytes.get(2 + offset)?);
    }
    Some(2 + octet_count + content_len)
}

/// Wrap a 16-byte AES session key under a client's RSA public key using
/// OAEP/SHA-256.
///
/// # Errors
///
/// Returns [`CryptoError::WrapFailed`] if the underlying RSA encryption
/// operation fails.
pub fn wrap_session_key(public_key: &RsaPublicKey, session_key: &[u8; 16]) -> Result<Vec<u8>> {
    let mut rng = OsRng;
    public_key
        .encrypt(&mut rng, Oaep::new::<Sha256>(), session_key.as_slice())
        .map_err(|e| CryptoError::WrapFailed(e.to_string()))
}
