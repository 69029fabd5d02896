//! Wire codec for the vaultwire file-transfer protocol.
//!
//! This crate owns the on-the-wire byte layout only: the fixed 23-byte
//! header, the seven request and eight response opcodes, and the fixed-width
//! field encodings they share. It has no opinion about sockets, storage, or
//! cryptography — those live in `vaultwire-crypto` and `vaultwire-core`.

pub mod errors;
pub mod fields;
pub mod header;
pub mod opcode;
pub mod request;
pub mod response;

pub use errors::{ProtocolError, Result};
pub use fields::PACKET_SIZE;
pub use header::{Header, ResponseHeader};
pub use opcode::{RequestCode, ResponseCode};
pub use request::{Request, RequestBody};
pub use response::Response;
