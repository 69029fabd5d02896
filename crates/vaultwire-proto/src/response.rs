//! Response payloads, one variant per opcode (`§4.1`).
//!
//! Responses use the 7-byte [`ResponseHeader`], not the 23-byte request
//! [`Header`] — the client id is not part of the header on this side of the
//! wire. Responses that must echo the id back carry it as the leading 16
//! bytes of their payload instead; only `RegistrationFail` and `ServerError`
//! have no payload at all.

use crate::{
    errors::Result,
    fields::{self, CHECKSUM_SIZE, NAME_SIZE, PUBLIC_KEY_SIZE, SYMMETRIC_KEY_SIZE},
    header::{ResponseHeader, CLIENT_ID_SIZE},
    opcode::ResponseCode,
};

/// Opcode-specific response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// 2100 — `client_id[16]`.
    RegistrationOk {
        /// Newly assigned client identifier.
        client_id: [u8; CLIENT_ID_SIZE],
    },
    /// 2101 — empty payload.
    RegistrationFail,
    /// 2102 — `client_id[16], encrypted_key[...]`.
    PublicKeyAck {
        /// Client id the session key was issued to.
        client_id: [u8; CLIENT_ID_SIZE],
        /// RSA-OAEP wrapped AES-128 session key.
        encrypted_key: Vec<u8>,
    },
    /// 2103 — `client_id[16], content_size:u32, file_name[255], cksum:u32`.
    FileAck {
        /// Client id the upload belongs to.
        client_id: [u8; CLIENT_ID_SIZE],
        /// Size, in bytes, of the stored plaintext.
        content_size: u32,
        /// Name of the file the checksum applies to.
        file_name: String,
        /// Unix-`cksum`-compatible checksum of the stored plaintext.
        cksum: u32,
    },
    /// 2104 — `client_id[16]`.
    Received {
        /// Client id the acknowledgement is for.
        client_id: [u8; CLIENT_ID_SIZE],
    },
    /// 2105 — `client_id[16], encrypted_key[...]`.
    LoginOk {
        /// Client id that logged in.
        client_id: [u8; CLIENT_ID_SIZE],
        /// RSA-OAEP wrapped AES-128 session key, re-issued on login.
        encrypted_key: Vec<u8>,
    },
    /// 2106 — `client_id[16]`.
    LoginFail {
        /// Client id that failed to log in.
        client_id: [u8; CLIENT_ID_SIZE],
    },
    /// 2107 — empty payload.
    ServerError,
}

impl Response {
    /// The opcode this payload corresponds to.
    #[must_use]
    pub const fn code(&self) -> ResponseCode {
        match self {
            Self::RegistrationOk { .. } => ResponseCode::RegistrationOk,
            Self::RegistrationFail => ResponseCode::RegistrationFail,
            Self::PublicKeyAck { .. } => ResponseCode::PublicKeyAck,
            Self::FileAck { .. } => ResponseCode::FileAck,
            Self::Received { .. } => ResponseCode::Received,
            Self::LoginOk { .. } => ResponseCode::LoginOk,
            Self::LoginFail { .. } => ResponseCode::LoginFail,
            Self::ServerError => ResponseCode::ServerError,
        }
    }

    /// Serialize this response into `header_bytes || payload_bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::ProtocolError::NameTooLong`] if a name field
    /// does not fit in its fixed-width slot.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        match self {
            Self::RegistrationFail | Self::ServerError => {},
            Self::RegistrationOk { client_id }
            | Self::Received { client_id }
            | Self::LoginFail { client_id } => {
                payload.extend_from_slice(client_id);
            },
            Self::PublicKeyAck { client_id, encrypted_key }
            | Self::LoginOk { client_id, encrypted_key } => {
                payload.extend_from_slice(client_id);
                payload.extend_from_slice(encrypted_key);
            },
            Self::FileAck { client_id, content_size, file_name, cksum } => {
                payload.extend_from_slice(client_id);
                payload.extend_from_slice(&content_size.to_le_bytes());
                payload.extend_from_slice(&fields::encode_name(file_name)?);
                payload.extend_from_slice(&cksum.to_le_bytes());
            },
        }
        let header = ResponseHeader::new(
            self.code().to_u16(),
            u32::try_from(payload.len()).unwrap_or(u32::MAX),
        );
        let mut out = header.to_bytes().to_vec();
        out.extend_from_slice(&payload);
        Ok(out)
    }
}

const _: () = {
    assert!(NAME_SIZE == 255);
    assert!(PUBLIC_KEY_SIZE == 160);
    assert!(SYMMETRIC_KEY_SIZE == 16);
    assert!(CHECKSUM_SIZE == 4);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_ok_round_trips_header() {
        let resp = Response::RegistrationOk { client_id: [9; 16] };
        let wire = resp.encode().expect("encodes");
        let header = ResponseHeader::from_bytes(&wire[..ResponseHeader::SIZE]).expect("parses");
        assert_eq!(header.code(), ResponseCode::RegistrationOk.to_u16());
        assert_eq!(header.version(), crate::header::SERVER_VERSION);
        assert_eq!(&wire[ResponseHeader::SIZE..], &[9u8; 16]);
    }

    #[test]
    fn empty_payload_variants_have_zero_payload_size() {
        for resp in [Response::RegistrationFail, Response::ServerError] {
            let wire = resp.encode().expect("encodes");
            let header = ResponseHeader::from_bytes(&wire[..ResponseHeader::SIZE]).expect("parses");
            assert_eq!(header.payload_size(), 0);
            assert_eq!(wire.len(), ResponseHeader::SIZE);
        }
    }

    #[test]
    fn file_ack_encodes_client_id_then_fixed_prefix_then_cksum() {
        let resp = Response::FileAck {
            client_id: [1; 16],
            content_size: 42,
            file_name: "report.csv".to_owned(),
            cksum: 0xDEAD_BEEF,
        };
        let wire = resp.encode().expect("encodes");
        let payload = &wire[ResponseHeader::SIZE..];
        assert_eq!(&payload[..16], &[1u8; 16]);
        assert_eq!(&payload[16..20], &42u32.to_le_bytes());
        let name_field: [u8; NAME_SIZE] =
            payload[20..20 + NAME_SIZE].try_into().expect("sized");
        assert_eq!(fields::decode_name(&name_field).expect("valid"), "report.csv");
        let cksum_bytes = &payload[20 + NAME_SIZE..20 + NAME_SIZE + 4];
        assert_eq!(u32::from_le_bytes(cksum_bytes.try_into().expect("sized")), 0xDEAD_BEEF);
    }

    #[test]
    fn login_fail_echoes_client_id() {
        let resp = Response::LoginFail { client_id: [0xAB; 16] };
        let wire = resp.encode().expect("encodes");
        assert_eq!(&wire[ResponseHeader::SIZE..], &[0xABu8; 16]);
    }
}
