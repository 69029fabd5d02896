//! Redb-backed durable [`Repository`] (C2, `§6.4`).
//!
//! Uses Redb's ACID, copy-on-write transactions so client and file records
//! survive a restart. Domain records are CBOR-encoded, mirroring how this
//! store's MLS-state counterpart serializes values.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};
use vaultwire_core::{
    client::{PUBLIC_KEY_LEN, SESSION_KEY_LEN},
    ClientRecord, FileRecord, Repository, RepositoryError,
};

/// Table: clients
/// Key: 16-byte client id
/// Value: CBOR-encoded `ClientRecord`
const CLIENTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("clients");

/// Table: files
/// Key: `client_id[16] || file_name` bytes
/// Value: CBOR-encoded `FileRecord`
const FILES: TableDefinition<&[u8], &[u8]> = TableDefinition::new("files");

/// Durable storage backed by Redb.
///
/// Thread-safe through Redb's own locking; cheap to clone (an `Arc` of the
/// open database).
#[derive(Clone)]
pub struct RedbRepository {
    db: std::sync::Arc<Database>,
}

impl RedbRepository {
    /// Open or create a Redb database at `path`, creating the `clients` and
    /// `files` tables if they don't already exist.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Io`] if the database cannot be opened or
    /// created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let db = Database::create(path.as_ref()).map_err(|e| RepositoryError::Io(e.to_string()))?;
        let txn = db.begin_write().map_err(|e| RepositoryError::Io(e.to_string()))?;
        {
            let _ = txn.open_table(CLIENTS).map_err(|e| RepositoryError::Io(e.to_string()))?;
            let _ = txn.open_table(FILES).map_err(|e| RepositoryError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| RepositoryError::Io(e.to_string()))?;
        Ok(Self { db: std::sync::Arc::new(db) })
    }
}

fn file_key(client_id: &[u8; 16], file_name: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(16 + file_name.len());
    key.extend_from_slice(client_id);
    key.extend_from_slice(file_name.as_bytes());
    key
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, RepositoryError> {
    let mut bytes = Vec::new();
    ciborium::into_writer(value, &mut bytes).map_err(|e| RepositoryError::Corrupt(e.to_string()))?;
    Ok(bytes)
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, RepositoryError> {
    ciborium::from_reader(bytes).map_err(|e| RepositoryError::Corrupt(e.to_string()))
}

impl Repository for RedbRepository {
    fn insert_client(&self, client: &ClientRecord) -> Result<(), RepositoryError> {
        let txn = self.db.begin_write().map_err(|e| RepositoryError::Io(e.to_string()))?;
        {
            let mut table =
                txn.open_table(CLIENTS).map_err(|e| RepositoryError::Io(e.to_string()))?;
            let bytes = encode(client)?;
            table
                .insert(client.id.as_slice(), bytes.as_slice())
                .map_err(|e| RepositoryError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| RepositoryError::Io(e.to_string()))?;
        Ok(())
    }

    fn set_keys(
        &self,
        id: &[u8; 16],
        public_key: [u8; PUBLIC_KEY_LEN],
        aes_key: [u8; SESSION_KEY_LEN],
        timestamp: u64,
    ) -> Result<(), RepositoryError> {
        let txn = self.db.begin_write().map_err(|e| RepositoryError::Io(e.to_string()))?;
        {
            let mut table =
                txn.open_table(CLIENTS).map_err(|e| RepositoryError::Io(e.to_string()))?;
            let existing = table
                .get(id.as_slice())
                .map_err(|e| RepositoryError::Io(e.to_string()))?
                .ok_or_else(|| RepositoryError::Corrupt(format!("unknown client {id:02x?}")))?;
            let record: ClientRecord = decode(existing.value())?;
            drop(existing);
            let updated = record.with_keys(public_key, aes_key, timestamp);
            let bytes = encode(&updated)?;
            table
                .insert(id.as_slice(), bytes.as_slice())
                .map_err(|e| RepositoryError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| RepositoryError::Io(e.to_string()))?;
        Ok(())
    }

    fn touch(&self, id: &[u8; 16], timestamp: u64) -> Result<(), RepositoryError> {
        let txn = self.db.begin_write().map_err(|e| RepositoryError::Io(e.to_string()))?;
        {
            let mut table =
                txn.open_table(CLIENTS).map_err(|e| RepositoryError::Io(e.to_string()))?;
            let existing = table
                .get(id.as_slice())
                .map_err(|e| RepositoryError::Io(e.to_string()))?
                .ok_or_else(|| RepositoryError::Corrupt(format!("unknown client {id:02x?}")))?;
            let mut record: ClientRecord = decode(existing.value())?;
            drop(existing);
            record.last_seen = timestamp;
            let bytes = encode(&record)?;
            table
                .insert(id.as_slice(), bytes.as_slice())
                .map_err(|e| RepositoryError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| RepositoryError::Io(e.to_string()))?;
        Ok(())
    }

    fn find_by_id(&self, id: &[u8; 16]) -> Result<Option<ClientRecord>, RepositoryError> {
        let txn = self.db.begin_read().map_err(|e| RepositoryError::Io(e.to_string()))?;
        let table = txn.open_table(CLIENTS).map_err(|e| RepositoryError::Io(e.to_string()))?;
        match table.get(id.as_slice()).map_err(|e| RepositoryError::Io(e.to_string()))? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    fn find_by_name_id(
        &self,
        id: &[u8; 16],
        name: &str,
    ) -> Result<Option<ClientRecord>, RepositoryError> {
        Ok(self.find_by_id(id)?.filter(|record| record.name == name))
    }

    fn all_client_ids_names(&self) -> Result<Vec<([u8; 16], String)>, RepositoryError> {
        let txn = self.db.begin_read().map_err(|e| RepositoryError::Io(e.to_string()))?;
        let table = txn.open_table(CLIENTS).map_err(|e| RepositoryError::Io(e.to_string()))?;
        let mut out = Vec::new();
        for result in table.iter().map_err(|e| RepositoryError::Io(e.to_string()))? {
            let (_, value) = result.map_err(|e| RepositoryError::Io(e.to_string()))?;
            let record: ClientRecord = decode(value.value())?;
            out.push((record.id, record.name));
        }
        Ok(out)
    }

    fn insert_file(&self, file: &FileRecord) -> Result<(), RepositoryError> {
        let txn = self.db.begin_write().map_err(|e| RepositoryError::Io(e.to_string()))?;
        {
            let mut table =
                txn.open_table(FILES).map_err(|e| RepositoryError::Io(e.to_string()))?;
            let key = file_key(&file.client_id, &file.file_name);
            let bytes = encode(file)?;
            table
                .insert(key.as_slice(), bytes.as_slice())
                .map_err(|e| RepositoryError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| RepositoryError::Io(e.to_string()))?;
        Ok(())
    }

    fn mark_file_verified(
        &self,
        client_id: &[u8; 16],
        file_name: &str,
    ) -> Result<(), RepositoryError> {
        let txn = self.db.begin_write().map_err(|e| RepositoryError::Io(e.to_string()))?;
        {
            let mut table =
                txn.open_table(FILES).map_err(|e| RepositoryError::Io(e.to_string()))?;
            let key = file_key(client_id, file_name);
            let existing = table
                .get(key.as_slice())
                .map_err(|e| RepositoryError::Io(e.to_string()))?
                .ok_or_else(|| RepositoryError::Corrupt(format!("unknown file {file_name}")))?;
            let mut record: FileRecord = decode(existing.value())?;
            drop(existing);
            record.verified = true;
            let bytes = encode(&record)?;
            table
                .insert(key.as_slice(), bytes.as_slice())
                .map_err(|e| RepositoryError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| RepositoryError::Io(e.to_string()))?;
        Ok(())
    }

    fn delete_file(
        &self,
        client_id: &[u8; 16],
        file_name: &str,
    ) -> Result<Option<std::path::PathBuf>, RepositoryError> {
        let txn = self.db.begin_write().map_err(|e| RepositoryError::Io(e.to_string()))?;
        let removed = {
            let mut table =
                txn.open_table(FILES).map_err(|e| RepositoryError::Io(e.to_string()))?;
            let key = file_key(client_id, file_name);
            match table.remove(key.as_slice()).map_err(|e| RepositoryError::Io(e.to_string()))? {
                Some(value) => {
                    let record: FileRecord = decode(value.value())?;
                    Some(record.path)
                },
                None => None,
            }
        };
        txn.commit().map_err(|e| RepositoryError::Io(e.to_string()))?;
        Ok(removed)
    }
}
