//! Request and response opcodes (`§4.1`).

use crate::errors::ProtocolError;

/// One of the seven request opcodes a client may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestCode {
    /// 1100 — register a new client name.
    Registration,
    /// 1101 — submit (or replace) an RSA public key and receive a session key.
    PublicKey,
    /// 1102 — re-authenticate a known client and receive a fresh session key.
    Login,
    /// 1103 — upload an encrypted file.
    SendFile,
    /// 1104 — confirm the CRC the server returned for an upload.
    CrcOk,
    /// 1105 — report a CRC mismatch and request re-upload.
    CrcRetry,
    /// 1106 — abandon an upload after repeated CRC mismatches.
    CrcAbort,
}

impl RequestCode {
    /// Numeric value of this opcode on the wire.
    #[must_use]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Registration => 1100,
            Self::PublicKey => 1101,
            Self::Login => 1102,
            Self::SendFile => 1103,
            Self::CrcOk => 1104,
            Self::CrcRetry => 1105,
            Self::CrcAbort => 1106,
        }
    }

    /// Resolve a numeric opcode into a [`RequestCode`].
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownRequestCode`] if `code` matches none of
    /// the seven request opcodes.
    pub const fn from_u16(code: u16) -> Result<Self, ProtocolError> {
        match code {
            1100 => Ok(Self::Registration),
            1101 => Ok(Self::PublicKey),
            1102 => Ok(Self::Login),
            1103 => Ok(Self::SendFile),
            1104 => Ok(Self::CrcOk),
            1105 => Ok(Self::CrcRetry),
            1106 => Ok(Self::CrcAbort),
            other => Err(ProtocolError::UnknownRequestCode(other)),
        }
    }
}

/// One of the eight response opcodes the server may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// 2100 — registration accepted.
    RegistrationOk,
    /// 2101 — registration rejected (name collision).
    RegistrationFail,
    /// 2102 — session key wrapped under a submitted public key.
    PublicKeyAck,
    /// 2103 — upload accepted, checksum returned.
    FileAck,
    /// 2104 — generic acknowledgement (CRC confirmed or aborted).
    Received,
    /// 2105 — login accepted, fresh session key returned.
    LoginOk,
    /// 2106 — login rejected (client unknown or has no public key yet).
    LoginFail,
    /// 2107 — generic handler failure.
    ServerError,
}

impl ResponseCode {
    /// Numeric value of this opcode on the wire.
    #[must_use]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::RegistrationOk => 2100,
            Self::RegistrationFail => 2101,
            Self::PublicKeyAck => 2102,
            Self::FileAck => 2103,
            Self::Received => 2104,
            Self::LoginOk => 2105,
            Self::LoginFail => 2106,
            Self::ServerError => 2107,
        }
    }

    /// Resolve a numeric opcode into a [`ResponseCode`].
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownResponseCode`] if `code` matches none
    /// of the eight response opcodes.
    pub const fn from_u16(code: u16) -> Result<Self, ProtocolError> {
        match code {
            2100 => Ok(Self::RegistrationOk),
            2101 => Ok(Self::RegistrationFail),
            2102 => Ok(Self::PublicKeyAck),
            2103 => Ok(Self::FileAck),
            2104 => Ok(Self::Received),
            2105 => Ok(Self::LoginOk),
            2106 => Ok(Self::LoginFail),
            2107 => Ok(Self::ServerError),
            other => Err(ProtocolError::UnknownResponseCode(other)),
        }
    }
}
