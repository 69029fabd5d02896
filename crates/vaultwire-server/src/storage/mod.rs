//! [`vaultwire_core::Repository`] implementations (C2, `§6.4`).
//!
//! [`MemoryRepository`] backs tests and the in-process integration suite;
//! [`RedbRepository`] is the durable backend a running server uses.

mod memory;
mod redb;

pub use memory::MemoryRepository;
pub use redb::RedbRepository;
