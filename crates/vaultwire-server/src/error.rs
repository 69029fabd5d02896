//! Binary-level error type (`§10.2`).

use std::fmt;

/// Errors that can prevent the server from starting or keep running.
#[derive(Debug)]
pub enum ServerError {
    /// Invalid configuration (bad `--root`, unreadable port file, etc.).
    ///
    /// Fatal. Fix configuration and restart.
    Config(String),

    /// The listening socket could not be bound or polled.
    ///
    /// Fatal for the whole process — without a listener there is nothing
    /// left to serve.
    Transport(String),

    /// The repository could not be opened.
    ///
    /// Fatal at startup; a running server that loses its repository mid-flight
    /// instead surfaces the failure per-connection (`§7`) without crashing.
    Storage(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Storage(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<vaultwire_core::RepositoryError> for ServerError {
    fn from(err: vaultwire_core::RepositoryError) -> Self {
        Self::Storage(err.to_string())
    }
}
