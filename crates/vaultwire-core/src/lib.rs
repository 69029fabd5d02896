//! Domain types, repository trait, and handshake handlers for the vaultwire
//! protocol (C2 + C5, `§3`–`§4.2`, `§4.5`).
//!
//! This crate owns everything the dispatcher (`vaultwire-server`) hands off
//! to once a frame has been parsed: the client and file records, the
//! `Repository` capability bag, the in-memory pending-CRC set, and the seven
//! request handlers that implement the handshake state machine. It has no
//! opinion about sockets — that's C4's job.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod client;
pub mod env;
pub mod error;
pub mod file;
pub mod handlers;
pub mod pending;
pub mod repository;
pub mod state;

pub use client::ClientRecord;
pub use env::Environment;
pub use error::{HandlerError, RepositoryError};
pub use file::FileRecord;
pub use handlers::Outcome;
pub use pending::PendingCrcSet;
pub use repository::Repository;
pub use state::ServerState;
