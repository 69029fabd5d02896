//! Error taxonomy for repositories and request handlers (`§7`).
//!
//! We keep storage failures (`RepositoryError`) distinct from handler
//! failures (`HandlerError`) so a `Repository` implementation never has to
//! know about wire codecs or crypto, while handlers can compose failures from
//! every layer beneath them into one type to match against when deciding
//! which response, if any, to send.

use thiserror::Error;

/// Failures a [`crate::repository::Repository`] implementation can report.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The backing store could not complete the operation.
    #[error("repository I/O failure: {0}")]
    Io(String),

    /// A stored record could not be decoded back into its domain type.
    #[error("repository record corrupt: {0}")]
    Corrupt(String),
}

/// Failures a request handler can produce while processing one frame.
///
/// This is the single error type handlers return; the dispatcher maps it to
/// a response opcode (or a silent connection close) per `§7`'s table rather
/// than this type knowing about responses itself.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The frame could not be parsed.
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] vaultwire_proto::ProtocolError),

    /// A cryptographic operation failed.
    #[error("cryptographic failure: {0}")]
    Crypto(#[from] vaultwire_crypto::CryptoError),

    /// The repository could not complete the operation.
    #[error("storage failure: {0}")]
    Storage(#[from] RepositoryError),

    /// A filesystem operation failed.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The client sent a request out of sequence for the current session
    /// state (e.g. `SendFile` before a key was ever issued).
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// Registration was attempted for a name already on file.
    #[error("name already registered")]
    NameCollision,

    /// A request named a `(client_id, name)` pair not on file.
    #[error("unknown client")]
    UnknownClient,

    /// An upload named a file already present and verified for this client.
    #[error("file already exists")]
    DuplicateFile,
}

// `NameCollision` and `UnknownClient` are caught by `handlers::registration`
// and `handlers::login` respectively and turned into `RegistrationFail`
// (2101) and `LoginFail` (2106) responses before they ever reach the
// dispatcher — those are ordinary protocol outcomes, not failures. Every
// other `Err` that does escape a handler is uniform: the dispatcher attempts
// one `ServerError` (2107) response, then closes the connection (`§7`).
