//! Fixed-width field sizes and the NUL-padded name encoding (`§4.1`).

use crate::errors::{ProtocolError, Result};

/// Width in bytes of a `name`/`file_name` field on the wire.
pub const NAME_SIZE: usize = 255;

/// Width in bytes of a DER-encoded RSA public key field.
pub const PUBLIC_KEY_SIZE: usize = 160;

/// Width in bytes of a wire-level AES-128 session key (unwrapped).
pub const SYMMETRIC_KEY_SIZE: usize = 16;

/// Width in bytes of the `content_size` field.
pub const CONTENT_SIZE_SIZE: usize = 4;

/// Width in bytes of the `cksum` field.
pub const CHECKSUM_SIZE: usize = 4;

/// Fixed network packet size used both for reads and for zero-padded writes.
pub const PACKET_SIZE: usize = 1024;

/// Encode `name` into a fixed [`NAME_SIZE`]-byte, zero-padded, NUL-terminated
/// field.
///
/// # Errors
///
/// Returns [`ProtocolError::NameTooLong`] if `name`'s UTF-8 encoding is 255
/// bytes or longer (there would be no room left for the terminating NUL).
pub fn encode_name(name: &str) -> Result<[u8; NAME_SIZE]> {
    let bytes = name.as_bytes();
    if bytes.len() >= NAME_SIZE {
        return Err(ProtocolError::NameTooLong { len: bytes.len() });
    }
    let mut field = [0u8; NAME_SIZE];
    field[..bytes.len()].copy_from_slice(bytes);
    Ok(field)
}

/// Decode a fixed [`NAME_SIZE`]-byte name field, truncating at the first NUL.
///
/// # Errors
///
/// Returns [`ProtocolError::MissingNameTerminator`] if the field contains no
/// NUL byte at all, or [`ProtocolError::NameNotUtf8`] if the bytes before the
/// first NUL are not valid UTF-8.
pub fn decode_name(field: &[u8; NAME_SIZE]) -> Result<String> {
    let terminator =
        field.iter().position(|&b| b == 0).ok_or(ProtocolError::MissingNameTerminator)?;
    std::str::from_utf8(&field[..terminator])
        .map(str::to_owned)
        .map_err(|_| ProtocolError::NameNotUtf8)
}
