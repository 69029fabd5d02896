//! Fixed request and response headers, little-endian on the wire.
//!
//! The wire is asymmetric: a request header carries the client id inline
//! (23 bytes total), but a response header does not (7 bytes) — responses
//! that need to echo the client id back carry it as the first field of
//! their payload instead (`§4.1`). Neither header carries a magic number,
//! and the server accepts any version byte from a client (`§6.1`: "Requests
//! are accepted for any version byte"), only ever writing its own fixed
//! version byte (3) into responses.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::errors::{ProtocolError, Result};

/// Number of bytes in a client identifier.
pub const CLIENT_ID_SIZE: usize = 16;

/// Server version byte written into every response header.
pub const SERVER_VERSION: u8 = 3;

/// Raw 23-byte header: `client_id[16] || version:u8 || code:u16 LE || payload_size:u32 LE`.
///
/// All multi-byte integers are little-endian, matching the wire protocol in
/// full (`§3`, `§6.1`). Fields are stored as raw byte arrays rather than
/// native integers so the struct can be cast directly to and from network
/// bytes without alignment concerns.
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct Header {
    client_id: [u8; CLIENT_ID_SIZE],
    version: u8,
    code: [u8; 2],
    payload_size: [u8; 4],
}

impl Header {
    /// Size of the serialized header in bytes.
    pub const SIZE: usize = CLIENT_ID_SIZE + 1 + 2 + 4;

    /// Build a header from its logical fields.
    #[must_use]
    pub fn new(client_id: [u8; CLIENT_ID_SIZE], version: u8, code: u16, payload_size: u32) -> Self {
        Self {
            client_id,
            version,
            code: code.to_le_bytes(),
            payload_size: payload_size.to_le_bytes(),
        }
    }

    /// Parse a header from the first [`Header::SIZE`] bytes of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::FrameTooShort`] if fewer than [`Header::SIZE`]
    /// bytes are available.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (header, _rest) = Self::ref_from_prefix(bytes).map_err(|_| {
            ProtocolError::FrameTooShort { expected: Self::SIZE, actual: bytes.len() }
        })?;
        Ok(*header)
    }

    /// Serialize the header to its wire representation.
    #[must_use]
    pub fn to_bytes(self) -> [u8; Self::SIZE] {
        let bytes = IntoBytes::as_bytes(&self);
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(bytes);
        arr
    }

    /// 16-byte client identifier.
    #[must_use]
    pub fn client_id(&self) -> [u8; CLIENT_ID_SIZE] {
        self.client_id
    }

    /// Protocol version byte as sent on the wire.
    #[must_use]
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Request or response opcode.
    #[must_use]
    pub fn code(&self) -> u16 {
        u16::from_le_bytes(self.code)
    }

    /// Declared length, in bytes, of the payload following this header.
    #[must_use]
    pub fn payload_size(&self) -> u32 {
        u32::from_le_bytes(self.payload_size)
    }
}

/// Raw 7-byte response header: `version:u8 || code:u16 LE || payload_size:u32 LE`.
///
/// The client id is not part of this header; responses that must echo it
/// back carry it as the leading 16 bytes of their payload instead.
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Debug, PartialEq, Eq)]
pub struct ResponseHeader {
    version: u8,
    code: [u8; 2],
    payload_size: [u8; 4],
}

impl ResponseHeader {
    /// Size of the serialized response header in bytes.
    pub const SIZE: usize = 1 + 2 + 4;

    /// Build a response header, always stamping [`SERVER_VERSION`].
    #[must_use]
    pub fn new(code: u16, payload_size: u32) -> Self {
        Self {
            version: SERVER_VERSION,
            code: code.to_le_bytes(),
            payload_size: payload_size.to_le_bytes(),
        }
    }

    /// Parse a response header from the first [`ResponseHeader::SIZE`] bytes
    /// of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::FrameTooShort`] if fewer than
    /// [`ResponseHeader::SIZE`] bytes are available.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (header, _rest) = Self::ref_from_prefix(bytes).map_err(|_| {
            ProtocolError::FrameTooShort { expected: Self::SIZE, actual: bytes.len() }
        })?;
        Ok(*header)
    }

    /// Serialize the response header to its wire representation.
    #[must_use]
    pub fn to_bytes(self) -> [u8; Self::SIZE] {
        let bytes = IntoBytes::as_bytes(&self);
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(bytes);
        arr
    }

    /// Protocol version byte, always [`SERVER_VERSION`] for server-written
    /// responses.
    #[must_use]
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Response opcode.
    #[must_use]
    pub fn code(&self) -> u16 {
        u16::from_le_bytes(self.code)
    }

    /// Declared length, in bytes, of the payload following this header.
    #[must_use]
    pub fn payload_size(&self) -> u32 {
        u32::from_le_bytes(self.payload_size)
    }
}

impl std::fmt::Debug for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Header")
            .field("client_id", &hex::encode(self.client_id()))
            .field("version", &self.version())
            .field("code", &self.code())
            .field("payload_size", &self.payload_size())
            .finish()
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Header {}

/// Minimal hex encoding, avoiding a dependency purely for `Debug` output.
mod hex {
    pub fn encode(bytes: [u8; super::CLIENT_ID_SIZE]) -> String {
        let mut s = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            s.push_str(&format!("{b:02x}"));
        }
        s
    }
}
