#![allow(clippy::disallowed_types, reason = "synchronous in-memory operations only")]

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use vaultwire_core::{
    client::{PUBLIC_KEY_LEN, SESSION_KEY_LEN},
    ClientRecord, FileRecord, Repository, RepositoryError,
};

/// In-memory [`Repository`], used by unit and integration tests in place of
/// [`super::RedbRepository`]. All state lives behind an `Arc<Mutex<_>>`, so
/// clones share one store and the single-threaded dispatcher never
/// contends on it.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    clients: HashMap<[u8; 16], ClientRecord>,
    files: HashMap<([u8; 16], String), FileRecord>,
}

impl MemoryRepository {
    /// An empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for MemoryRepository {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned (a prior operation panicked
    /// while holding the lock).
    #[allow(clippy::expect_used)]
    fn insert_client(&self, client: &ClientRecord) -> Result<(), RepositoryError> {
        self.inner.lock().expect("mutex poisoned").clients.insert(client.id, client.clone());
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn set_keys(
        &self,
        id: &[u8; 16],
        public_key: [u8; PUBLIC_KEY_LEN],
        aes_key: [u8; SESSION_KEY_LEN],
        timestamp: u64,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        let existing = inner
            .clients
            .get(id)
            .ok_or_else(|| RepositoryError::Corrupt(format!("unknown client {id:02x?}")))?;
        let updated = existing.with_keys(public_key, aes_key, timestamp);
        inner.clients.insert(*id, updated);
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn touch(&self, id: &[u8; 16], timestamp: u64) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        let client = inner
            .clients
            .get_mut(id)
            .ok_or_else(|| RepositoryError::Corrupt(format!("unknown client {id:02x?}")))?;
        client.last_seen = timestamp;
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn find_by_id(&self, id: &[u8; 16]) -> Result<Option<ClientRecord>, RepositoryError> {
        Ok(self.inner.lock().expect("mutex poisoned").clients.get(id).cloned())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn find_by_name_id(
        &self,
        id: &[u8; 16],
        name: &str,
    ) -> Result<Option<ClientRecord>, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .expect("mutex poisoned")
            .clients
            .get(id)
            .filter(|c| c.name == name)
            .cloned())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn all_client_ids_names(&self) -> Result<Vec<([u8; 16], String)>, RepositoryError> {
        Ok(self
            .inner
            .lock()
            .expect("mutex poisoned")
            .clients
            .values()
            .map(|c| (c.id, c.name.clone()))
            .collect())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn insert_file(&self, file: &FileRecord) -> Result<(), RepositoryError> {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .files
            .insert((file.client_id, file.file_name.clone()), file.clone());
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn mark_file_verified(
        &self,
        client_id: &[u8; 16],
        file_name: &str,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        let key = (*client_id, file_name.to_owned());
        let file = inner
            .files
            .get_mut(&key)
            .ok_or_else(|| RepositoryError::Corrupt(format!("unknown file {file_name}")))?;
        file.verified = true;
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    fn delete_file(
        &self,
        client_id: &[u8; 16],
        file_name: &str,
    ) -> Result<Option<PathBuf>, RepositoryError> {
        let key = (*client_id, file_name.to_owned());
        Ok(self.inner.lock().expect("mutex poisoned").files.remove(&key).map(|f| f.path))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn client(id: u8, name: &str) -> ClientRecord {
        ClientRecord::new([id; 16], name.to_owned(), 100)
    }

    #[test]
    fn insert_then_find_by_id() {
        let repo = MemoryRepository::new();
        repo.insert_client(&client(1, "alice")).expect("insert");
        let found = repo.find_by_id(&[1; 16]).expect("query").expect("present");
        assert_eq!(found.name, "alice");
    }

    #[test]
    fn set_keys_preserves_name_and_sets_both_fields() {
        let repo = MemoryRepository::new();
        repo.insert_client(&client(2, "bob")).expect("insert");
        repo.set_keys(&[2; 16], [7; PUBLIC_KEY_LEN], [9; SESSION_KEY_LEN], 200).expect("rekey");
        let found = repo.find_by_id(&[2; 16]).expect("query").expect("present");
        assert_eq!(found.name, "bob");
        assert_eq!(found.public_key, Some([7; PUBLIC_KEY_LEN]));
        assert_eq!(found.aes_key, Some([9; SESSION_KEY_LEN]));
        assert_eq!(found.last_seen, 200);
    }

    #[test]
    fn set_keys_for_unknown_client_fails() {
        let repo = MemoryRepository::new();
        let result = repo.set_keys(&[9; 16], [0; PUBLIC_KEY_LEN], [0; SESSION_KEY_LEN], 0);
        assert!(matches!(result, Err(RepositoryError::Corrupt(_))));
    }

    #[test]
    fn find_by_name_id_requires_matching_name() {
        let repo = MemoryRepository::new();
        repo.insert_client(&client(3, "carol")).expect("insert");
        assert!(repo.find_by_name_id(&[3; 16], "carol").expect("query").is_some());
        assert!(repo.find_by_name_id(&[3; 16], "mallory").expect("query").is_none());
    }

    #[test]
    fn all_client_ids_names_lists_every_client() {
        let repo = MemoryRepository::new();
        repo.insert_client(&client(1, "alice")).expect("insert");
        repo.insert_client(&client(2, "bob")).expect("insert");
        let mut names: Vec<String> =
            repo.all_client_ids_names().expect("query").into_iter().map(|(_, n)| n).collect();
        names.sort();
        assert_eq!(names, vec!["alice".to_owned(), "bob".to_owned()]);
    }

    #[test]
    fn file_lifecycle_insert_verify_delete() {
        let repo = MemoryRepository::new();
        let path = PathBuf::from("/srv/vaultwire/abc/report.csv");
        repo.insert_file(&FileRecord::new([1; 16], "report.csv".to_owned(), path.clone()))
            .expect("insert");
        repo.mark_file_verified(&[1; 16], "report.csv").expect("verify");
        let deleted = repo.delete_file(&[1; 16], "report.csv").expect("delete");
        assert_eq!(deleted, Some(path));
        assert_eq!(repo.delete_file(&[1; 16], "report.csv").expect("delete again"), None);
    }
}
