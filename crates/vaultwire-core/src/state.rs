//! Process-wide state shared by every handler invocation (`§9`: "express
//! them as fields on a single owning value passed by exclusive borrow").

use std::path::PathBuf;

use crate::{env::Environment, pending::PendingCrcSet, repository::Repository};

/// Everything a handler needs besides the request it is handling.
///
/// Owned by the dispatcher and threaded into each handler call by exclusive
/// borrow; the single-threaded reactor means no locking is required around
/// any of these fields (`§5`).
pub struct ServerState<R, E> {
    repository: R,
    env: E,
    /// In-memory mirror of every registered `(id, name)` pair, seeded from
    /// the repository at startup and appended to on every successful 1100
    /// (`§4.2`). Name uniqueness (I1) is checked against this list, not the
    /// repository, to avoid a second round trip on the hot path.
    clients: Vec<([u8; 16], String)>,
    /// Paths currently uploaded but not yet CRC-confirmed.
    pub pending: PendingCrcSet,
    /// Directory under which `<client_id_hex>/` upload directories and the
    /// default port file live (`--root`, `§6.3`).
    pub root: PathBuf,
}

impl<R: Repository, E: Environment> ServerState<R, E> {
    /// Build state for a freshly started server, seeding the in-memory
    /// client list from whatever the repository already has on disk.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError`] if the repository cannot be
    /// read.
    pub fn new(
        repository: R,
        env: E,
        root: PathBuf,
    ) -> Result<Self, crate::error::RepositoryError> {
        let clients = repository.all_client_ids_names()?;
        Ok(Self { repository, env, clients, pending: PendingCrcSet::new(), root })
    }

    /// The repository handle.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// The environment handle (time, randomness).
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Whether `name` is already registered to some client (I1).
    #[must_use]
    pub fn name_exists(&self, name: &str) -> bool {
        self.clients.iter().any(|(_, n)| n == name)
    }

    /// Record a freshly registered client in the in-memory list.
    pub fn remember_client(&mut self, id: [u8; 16], name: String) {
        self.clients.push((id, name));
    }

    /// Whether `(id, name)` is present in the in-memory list (`§4.5`: 1101
    /// and 1102 both require this before touching the repository).
    #[must_use]
    pub fn is_known(&self, id: &[u8; 16], name: &str) -> bool {
        self.clients.iter().any(|(i, n)| i == id && n == name)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        client::ClientRecord,
        env::Environment,
        file::FileRecord,
        repository::Repository,
        state::ServerState,
    };

    #[derive(Clone, Default)]
    struct FakeEnv;

    impl Environment for FakeEnv {
        type Instant = std::time::Instant;

        fn now(&self) -> Self::Instant {
            std::time::Instant::now()
        }

        fn unix_timestamp(&self) -> u64 {
            0
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            buffer.fill(0);
        }
    }

    #[derive(Clone, Default)]
    struct FakeRepository {
        seeded: std::sync::Arc<Vec<([u8; 16], String)>>,
    }

    impl Repository for FakeRepository {
        fn insert_client(&self, _client: &ClientRecord) -> Result<(), crate::error::RepositoryError> {
            Ok(())
        }

        fn set_keys(
            &self,
            _id: &[u8; 16],
            _public_key: [u8; crate::client::PUBLIC_KEY_LEN],
            _aes_key: [u8; crate::client::SESSION_KEY_LEN],
            _timestamp: u64,
        ) -> Result<(), crate::error::RepositoryError> {
            Ok(())
        }

        fn touch(&self, _id: &[u8; 16], _timestamp: u64) -> Result<(), crate::error::RepositoryError> {
            Ok(())
        }

        fn find_by_id(
            &self,
            _id: &[u8; 16],
        ) -> Result<Option<ClientRecord>, crate::error::RepositoryError> {
            Ok(None)
        }

        fn find_by_name_id(
            &self,
            _id: &[u8; 16],
            _name: &str,
        ) -> Result<Option<ClientRecord>, crate::error::RepositoryError> {
            Ok(None)
        }

        fn all_client_ids_names(
            &self,
        ) -> Result<Vec<([u8; 16], String)>, crate::error::RepositoryError> {
            Ok((*self.seeded).clone())
        }

        fn insert_file(&self, _file: &FileRecord) -> Result<(), crate::error::RepositoryError> {
            Ok(())
        }

        fn mark_file_verified(
            &self,
            _client_id: &[u8; 16],
            _file_name: &str,
        ) -> Result<(), crate::error::RepositoryError> {
            Ok(())
        }

        fn delete_file(
            &self,
            _client_id: &[u8; 16],
            _file_name: &str,
        ) -> Result<Option<std::path::PathBuf>, crate::error::RepositoryError> {
            Ok(None)
        }
    }

    #[test]
    fn seeds_in_memory_list_from_repository() {
        let repo = FakeRepository {
            seeded: std::sync::Arc::new(vec![([1; 16], "alice".to_owned())]),
        };
        let state = ServerState::new(repo, FakeEnv, std::path::PathBuf::from("/tmp")).expect("ok");
        assert!(state.name_exists("alice"));
        assert!(state.is_known(&[1; 16], "alice"));
        assert!(!state.is_known(&[2; 16], "alice"));
    }

    #[test]
    fn remember_client_updates_name_exists() {
        let repo = FakeRepository::default();
        let mut state =
            ServerState::new(repo, FakeEnv, std::path::PathBuf::from("/tmp")).expect("ok");
        assert!(!state.name_exists("bob"));
        state.remember_client([9; 16], "bob".to_owned());
        assert!(state.name_exists("bob"));
    }
}
