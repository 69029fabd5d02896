//! Durable storage of clients and files (C2, `§4.2`, `§6.4`).
//!
//! This trait is synchronous — the dispatcher is a single-threaded reactor,
//! so there is never a concurrent caller to hide latency from. Name
//! uniqueness (I1) is enforced by callers against the in-memory client list
//! (`§4.2`: "not by a database constraint"), not by this trait.

use crate::{client::ClientRecord, error::RepositoryError, file::FileRecord};

/// Capability bag for client and file persistence.
///
/// Implementations typically share state via an inner `Arc`, so cloning a
/// `Repository` handle is cheap and every clone observes the same store.
pub trait Repository: Clone + Send + Sync + 'static {
    /// Insert a freshly registered client with no key material yet.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backing store cannot be written.
    fn insert_client(&self, client: &ClientRecord) -> Result<(), RepositoryError>;

    /// Atomically replace a client's `public_key` and `aes_key` (`§12`: this
    /// is the sole rekey operation — there is deliberately no separate
    /// delete, so the original's delete-then-insert race is unrepresentable
    /// here).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backing store cannot be written,
    /// or if `id` names no existing client.
    fn set_keys(
        &self,
        id: &[u8; 16],
        public_key: [u8; crate::client::PUBLIC_KEY_LEN],
        aes_key: [u8; crate::client::SESSION_KEY_LEN],
        timestamp: u64,
    ) -> Result<(), RepositoryError>;

    /// Update a client's `last_seen` timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backing store cannot be written,
    /// or if `id` names no existing client.
    fn touch(&self, id: &[u8; 16], timestamp: u64) -> Result<(), RepositoryError>;

    /// Look up a client by id, regardless of name.
    ///
    /// Used by the 1103 handler, which only has a `client_id` to work with
    /// (`§4.5` step 3).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backing store cannot be read.
    fn find_by_id(&self, id: &[u8; 16]) -> Result<Option<ClientRecord>, RepositoryError>;

    /// Look up a client by `(id, name)`, used where a handler must confirm
    /// the caller-supplied name still matches the record (`§4.5` steps for
    /// 1101/1102).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backing store cannot be read.
    fn find_by_name_id(
        &self,
        id: &[u8; 16],
        name: &str,
    ) -> Result<Option<ClientRecord>, RepositoryError>;

    /// All registered `(id, name)` pairs, used to seed the in-memory client
    /// list on startup and to check name uniqueness on registration.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backing store cannot be read.
    fn all_client_ids_names(&self) -> Result<Vec<([u8; 16], String)>, RepositoryError>;

    /// Insert a new, unverified file record.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backing store cannot be written.
    fn insert_file(&self, file: &FileRecord) -> Result<(), RepositoryError>;

    /// Mark `(client_id, file_name)` as verified (1104).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backing store cannot be written.
    fn mark_file_verified(&self, client_id: &[u8; 16], file_name: &str)
    -> Result<(), RepositoryError>;

    /// Delete the file record for `(client_id, file_name)`, returning its
    /// path if one existed (1106).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backing store cannot be written.
    fn delete_file(
        &self,
        client_id: &[u8; 16],
        file_name: &str,
    ) -> Result<Option<std::path::PathBuf>, RepositoryError>;
}
