//! Error types for header and payload parsing.

use thiserror::Error;

/// Failures that can occur while parsing or serializing a wire frame.
///
/// Every variant here corresponds to a "malformed frame" condition per the
/// protocol's error taxonomy; the dispatcher maps all of them to a best-effort
/// `ServerError` response and closes the connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Buffer was shorter than the fixed 23-byte header.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes actually available.
        actual: usize,
    },

    /// The header declared a payload larger than what followed it.
    #[error("payload truncated: header claims {expected} bytes, buffer had {actual}")]
    PayloadTruncated {
        /// Bytes claimed by the header's `payload_size` field.
        expected: usize,
        /// Bytes actually available after the header.
        actual: usize,
    },

    /// The header's `code` field did not match any known request opcode.
    #[error("unknown request code: {0}")]
    UnknownRequestCode(u16),

    /// The header's `code` field did not match any known response opcode.
    #[error("unknown response code: {0}")]
    UnknownResponseCode(u16),

    /// A `name`/`file_name` field's non-padding prefix exceeded 254 bytes.
    #[error("name exceeds 254 bytes: {len}")]
    NameTooLong {
        /// Length of the oversized name, in bytes.
        len: usize,
    },

    /// A `name`/`file_name` field contained no NUL terminator at all.
    #[error("name field has no NUL terminator")]
    MissingNameTerminator,

    /// A `name`/`file_name` field's non-padding prefix was not valid UTF-8.
    #[error("name field is not valid UTF-8")]
    NameNotUtf8,

    /// A `file_name` could escape its per-client upload directory (`§12`: a
    /// deliberate deviation from the original, which has no such check).
    #[error("file name is unsafe: {file_name:?}")]
    UnsafeFileName {
        /// The rejected name, as given by the client.
        file_name: String,
    },
}

/// Convenience alias for results returned by the codec.
pub type Result<T> = std::result::Result<T, ProtocolError>;
