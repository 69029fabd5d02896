//! Request payloads, one variant per opcode (`§4.1`).

use bytes::Bytes;

use crate::{
    errors::{ProtocolError, Result},
    fields::{self, CONTENT_SIZE_SIZE, NAME_SIZE},
    header::Header,
    opcode::RequestCode,
};

/// A fully parsed request frame: header plus opcode-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The 23-byte header this request arrived with.
    pub header: Header,
    /// The decoded, opcode-specific body.
    pub body: RequestBody,
}

/// Opcode-specific request payload.
///
/// `SendFile`'s `initial_chunk` holds whatever ciphertext bytes accompanied
/// the fixed portion of the payload in the very first packet; a streaming
/// upload may require the dispatcher to read further raw (headerless) chunks
/// beyond what this type captures (`§4.4`, `§4.5` step 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// 1100 — `name[255]`.
    Registration {
        /// Requested client name.
        name: String,
    },
    /// 1101 — `name[255], pubkey[160]`.
    PublicKey {
        /// Client name the key belongs to.
        name: String,
        /// DER-encoded RSA public key, exactly 160 bytes.
        public_key: [u8; fields::PUBLIC_KEY_SIZE],
    },
    /// 1102 — `name[255]`.
    Login {
        /// Client name to log in as.
        name: String,
    },
    /// 1103 — `content_size:u32, file_name[255], ciphertext[...]`.
    SendFile {
        /// Total plaintext-ciphertext byte count the client will send.
        content_size: u32,
        /// Destination file name (verbatim, not yet path-validated).
        file_name: String,
        /// Ciphertext bytes that arrived bundled with this same packet.
        initial_chunk: Bytes,
    },
    /// 1104 — `file_name[255]`.
    CrcOk {
        /// Name of the file whose checksum the client confirmed.
        file_name: String,
    },
    /// 1105 — `file_name[255]`.
    CrcRetry {
        /// Name of the file the client wants to re-upload.
        file_name: String,
    },
    /// 1106 — `file_name[255]`.
    CrcAbort {
        /// Name of the file the client is abandoning.
        file_name: String,
    },
}

impl RequestBody {
    /// The opcode this payload corresponds to.
    #[must_use]
    pub const fn code(&self) -> RequestCode {
        match self {
            Self::Registration { .. } => RequestCode::Registration,
            Self::PublicKey { .. } => RequestCode::PublicKey,
            Self::Login { .. } => RequestCode::Login,
            Self::SendFile { .. } => RequestCode::SendFile,
            Self::CrcOk { .. } => RequestCode::CrcOk,
            Self::CrcRetry { .. } => RequestCode::CrcRetry,
            Self::CrcAbort { .. } => RequestCode::CrcAbort,
        }
    }
}

impl Request {
    /// Parse header and payload together.
    ///
    /// `payload` is whatever followed the header in the packet that was
    /// physically read; for `SendFile` this may be a strict prefix of the
    /// full upload (`§4.1`, `§4.4`).
    ///
    /// # Errors
    ///
    /// See [`ProtocolError`] variants; in particular this fails if `payload`
    /// is shorter than the opcode's fixed-width prefix, or if a name field
    /// lacks a NUL terminator or valid UTF-8 content.
    pub fn decode(header_bytes: &[u8], payload: &[u8]) -> Result<Self> {
        let header = Header::from_bytes(header_bytes)?;
        let code = RequestCode::from_u16(header.code())?;
        let body = match code {
            RequestCode::Registration => {
                RequestBody::Registration { name: decode_name_at(payload, 0)? }
            },
            RequestCode::PublicKey => {
                let name = decode_name_at(payload, 0)?;
                let public_key = decode_fixed::<{ fields::PUBLIC_KEY_SIZE }>(payload, NAME_SIZE)?;
                RequestBody::PublicKey { name, public_key }
            },
            RequestCode::Login => RequestBody::Login { name: decode_name_at(payload, 0)? },
            RequestCode::SendFile => {
                let content_size_bytes = decode_fixed::<CONTENT_SIZE_SIZE>(payload, 0)?;
                let content_size = u32::from_le_bytes(content_size_bytes);
                let file_name = decode_name_at(payload, CONTENT_SIZE_SIZE)?;
                let prefix = CONTENT_SIZE_SIZE + NAME_SIZE;
                let initial_chunk = Bytes::copy_from_slice(payload.get(prefix..).unwrap_or(&[]));
                RequestBody::SendFile { content_size, file_name, initial_chunk }
            },
            RequestCode::CrcOk => RequestBody::CrcOk { file_name: decode_name_at(payload, 0)? },
            RequestCode::CrcRetry => {
                RequestBody::CrcRetry { file_name: decode_name_at(payload, 0)? }
            },
            RequestCode::CrcAbort => {
                RequestBody::CrcAbort { file_name: decode_name_at(payload, 0)? }
            },
        };
        Ok(Self { header, body })
    }

    /// Serialize this request back into `header_bytes || payload_bytes`.
    ///
    /// Exposed primarily for tests that need to simulate a client; the
    /// server itself never encodes requests.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::NameTooLong`] if any name field is too long
    /// to fit in its fixed-width slot.
    pub fn encode(&self, client_id: [u8; 16], version: u8) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        match &self.body {
            RequestBody::Registration { name } | RequestBody::Login { name } => {
                payload.extend_from_slice(&fields::encode_name(name)?);
            },
            RequestBody::PublicKey { name, public_key } => {
                payload.extend_from_slice(&fields::encode_name(name)?);
                payload.extend_from_slice(public_key);
            },
            RequestBody::SendFile { content_size, file_name, initial_chunk } => {
                payload.extend_from_slice(&content_size.to_le_bytes());
                payload.extend_from_slice(&fields::encode_name(file_name)?);
                payload.extend_from_slice(initial_chunk);
            },
            RequestBody::CrcOk { file_name }
            | RequestBody::CrcRetry { file_name }
            | RequestBody::CrcAbort { file_name } => {
                payload.extend_from_slice(&fields::encode_name(file_name)?);
            },
        }
        let header = Header::new(
            client_id,
            version,
            self.body.code().to_u16(),
            u32::try_from(payload.len()).unwrap_or(u32::MAX),
        );
        let mut out = header.to_bytes().to_vec();
        out.extend_from_slice(&payload);
        Ok(out)
    }
}

fn decode_name_at(payload: &[u8], offset: usize) -> Result<String> {
    let field = decode_fixed::<NAME_SIZE>(payload, offset)?;
    fields::decode_name(&field)
}

fn decode_fixed<const N: usize>(payload: &[u8], offset: usize) -> Result<[u8; N]> {
    let end = offset.checked_add(N).ok_or(ProtocolError::PayloadTruncated {
        expected: offset.saturating_add(N),
        actual: payload.len(),
    })?;
    let slice = payload.get(offset..end).ok_or(ProtocolError::PayloadTruncated {
        expected: end,
        actual: payload.len(),
    })?;
    let mut arr = [0u8; N];
    arr.copy_from_slice(slice);
    Ok(arr)
}
