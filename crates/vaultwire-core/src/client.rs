//! The client record (`§3`).

use serde::{Deserialize, Serialize};

/// Number of bytes in a DER-encoded RSA public key on the wire.
pub const PUBLIC_KEY_LEN: usize = 160;

/// Number of bytes in an AES-128 session key.
pub const SESSION_KEY_LEN: usize = 16;

/// A registered client.
///
/// Invariant (I2): `public_key` is `Some` iff `aes_key` is `Some` — a client
/// either has completed a key exchange or has not, never half of one. This
/// is upheld by construction: [`ClientRecord::new`] leaves both `None`, and
/// the only way to set either is [`ClientRecord::with_keys`], which sets
/// both at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// 16-byte v4 UUID, stable for the lifetime of the registration (I3).
    pub id: [u8; 16],
    /// Unique display name (I1), at most 254 UTF-8 bytes.
    pub name: String,
    /// DER-encoded RSA public key, present once a key exchange has occurred.
    pub public_key: Option<[u8; PUBLIC_KEY_LEN]>,
    /// AES-128 session key, present once a key exchange has occurred.
    pub aes_key: Option<[u8; SESSION_KEY_LEN]>,
    /// Seconds since the Unix epoch of the last successful request.
    pub last_seen: u64,
}

impl ClientRecord {
    /// Build a freshly registered client with no key material yet.
    #[must_use]
    pub fn new(id: [u8; 16], name: String, last_seen: u64) -> Self {
        Self { id, name, public_key: None, aes_key: None, last_seen }
    }

    /// Return a copy of this record with both key fields replaced together,
    /// upholding (I2) by construction.
    #[must_use]
    pub fn with_keys(
        &self,
        public_key: [u8; PUBLIC_KEY_LEN],
        aes_key: [u8; SESSION_KEY_LEN],
        last_seen: u64,
    ) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            public_key: Some(public_key),
            aes_key: Some(aes_key),
            last_seen,
        }
    }

    /// Lowercase 32-character hex rendering of [`ClientRecord::id`], used
    /// for the per-client upload directory name (`§6.3`).
    #[must_use]
    pub fn id_hex(&self) -> String {
        id_hex(&self.id)
    }
}

/// Lowercase 32-character hex rendering of a 16-byte client id.
#[must_use]
pub fn id_hex(id: &[u8; 16]) -> String {
    let mut s = String::with_capacity(32);
    for b in id {
        s.push_str(&format!("{b:02x}"));
    }
    s
}
