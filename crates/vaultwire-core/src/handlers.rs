//! The seven request handlers and their cross-request invariants (C5, `§4.5`).
//!
//! Each handler borrows [`ServerState`] exclusively, which is sound because
//! the dispatcher is a single-threaded reactor (`§5`) — there is never a
//! second handler call in flight. Handlers never touch a socket; the
//! dispatcher reads whatever bytes a handler needs (in particular, the
//! streamed ciphertext for `SendFile`, `§4.4` step 2) before calling in here.

use std::io::Write as _;

use bytes::Bytes;
use vaultwire_crypto::{aes, cksum, rsa};
use vaultwire_proto::Response;
use zeroize::Zeroize;

use crate::{
    client::{id_hex, ClientRecord, PUBLIC_KEY_LEN, SESSION_KEY_LEN},
    env::Environment,
    error::HandlerError,
    file::{resolve_path, FileRecord},
    repository::Repository,
    state::ServerState,
};

/// What the dispatcher should do after a handler returns successfully.
///
/// `Silent` is the one legitimate no-response outcome in the whole protocol
/// (1105, `§4.5`: "Do NOT respond"); every other opcode always answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Send this frame back to the client, then close the connection (`§4.4`).
    Respond(Response),
    /// Send nothing and close the connection.
    Silent,
}

/// Dispatch a parsed request to its handler.
///
/// `upload_chunks` is only consulted for `SendFile`; it must be the ordered
/// sequence of independently-framed ciphertext chunks the dispatcher
/// accumulated for this upload, starting with whatever arrived bundled in
/// the first packet (`§4.1`, `§4.4` step 2).
///
/// # Errors
///
/// Returns [`HandlerError`] for any failure that is not itself a specified
/// protocol outcome (`§7`); the dispatcher turns those into a best-effort
/// `ServerError` (2107) response.
pub fn handle<R: Repository, E: Environment>(
    state: &mut ServerState<R, E>,
    client_id: [u8; 16],
    body: &vaultwire_proto::RequestBody,
    upload_chunks: &[Bytes],
) -> Result<Outcome, HandlerError> {
    use vaultwire_proto::RequestBody as Body;
    match body {
        Body::Registration { name } => handle_registration(state, name),
        Body::PublicKey { name, public_key } => {
            handle_public_key(state, client_id, name, *public_key)
        },
        Body::Login { name } => handle_login(state, client_id, name),
        Body::SendFile { file_name, .. } => {
            handle_send_file(state, client_id, file_name, upload_chunks)
        },
        Body::CrcOk { file_name } => handle_crc_ok(state, client_id, file_name),
        Body::CrcRetry { file_name } => handle_crc_retry(state, client_id, file_name),
        Body::CrcAbort { file_name } => handle_crc_abort(state, client_id, file_name),
    }
}

/// 1100 — mint a fresh client id for an unused `name`, or fail (`§4.5`).
pub fn handle_registration<R: Repository, E: Environment>(
    state: &mut ServerState<R, E>,
    name: &str,
) -> Result<Outcome, HandlerError> {
    if state.name_exists(name) {
        return Ok(Outcome::Respond(Response::RegistrationFail));
    }
    let id = state.env().random_client_id();
    let now = state.env().unix_timestamp();
    state.repository().insert_client(&ClientRecord::new(id, name.to_owned(), now))?;
    state.remember_client(id, name.to_owned());
    tracing::info!(client_id = %id_hex(&id), name, "registered new client");
    Ok(Outcome::Respond(Response::RegistrationOk { client_id: id }))
}

/// 1101 — wrap a fresh session key under a submitted public key, (re)keying
/// the client atomically (`§4.5`, `§12`: this also serves as a rekey).
pub fn handle_public_key<R: Repository, E: Environment>(
    state: &mut ServerState<R, E>,
    client_id: [u8; 16],
    name: &str,
    public_key: [u8; PUBLIC_KEY_LEN],
) -> Result<Outcome, HandlerError> {
    if !state.is_known(&client_id, name) {
        return Err(HandlerError::UnknownClient);
    }
    let parsed = rsa::parse_public_key_padded(&public_key)?;
    let mut session_key = [0u8; SESSION_KEY_LEN];
    state.env().random_bytes(&mut session_key);
    let encrypted_key = rsa::wrap_session_key(&parsed, &session_key)?;
    let now = state.env().unix_timestamp();
    let result = state.repository().set_keys(&client_id, public_key, session_key, now);
    session_key.zeroize();
    result?;
    tracing::debug!(client_id = %id_hex(&client_id), "issued session key for public key exchange");
    Ok(Outcome::Respond(Response::PublicKeyAck { client_id, encrypted_key }))
}

/// 1102 — re-issue a session key to a client that already has a public key
/// on file, or fail (`§4.5`).
pub fn handle_login<R: Repository, E: Environment>(
    state: &mut ServerState<R, E>,
    client_id: [u8; 16],
    name: &str,
) -> Result<Outcome, HandlerError> {
    let record = state.repository().find_by_name_id(&client_id, name)?;
    let Some(public_key) = record.and_then(|r| r.public_key) else {
        return Ok(Outcome::Respond(Response::LoginFail { client_id }));
    };
    let parsed = rsa::parse_public_key_padded(&public_key)?;
    let mut session_key = [0u8; SESSION_KEY_LEN];
    state.env().random_bytes(&mut session_key);
    let encrypted_key = rsa::wrap_session_key(&parsed, &session_key)?;
    let now = state.env().unix_timestamp();
    let result = state.repository().set_keys(&client_id, public_key, session_key, now);
    session_key.zeroize();
    result?;
    tracing::debug!(client_id = %id_hex(&client_id), "re-issued session key on login");
    Ok(Outcome::Respond(Response::LoginOk { client_id, encrypted_key }))
}

/// 1103 — decrypt and persist an upload, returning its checksum (`§4.5`
/// steps 3–9).
///
/// The ciphertext itself (`upload_chunks`) has already been fully
/// accumulated by the dispatcher by the time this runs; this handler owns
/// only the filesystem and repository side effects, never the socket.
pub fn handle_send_file<R: Repository, E: Environment>(
    state: &mut ServerState<R, E>,
    client_id: [u8; 16],
    file_name: &str,
    upload_chunks: &[Bytes],
) -> Result<Outcome, HandlerError> {
    let record = state.repository().find_by_id(&client_id)?.ok_or(HandlerError::UnknownClient)?;
    let Some(aes_key) = record.aes_key else {
        return Err(HandlerError::ProtocolViolation(
            "SendFile before a session key was ever issued".to_owned(),
        ));
    };

    let client_hex = id_hex(&client_id);
    let target_dir = state.root.join(&client_hex);
    std::fs::create_dir_all(&target_dir)?;
    let file_path =
        resolve_path(&state.root, &client_hex, file_name).map_err(HandlerError::MalformedFrame)?;

    let is_retry = state.pending.contains(&file_path);
    if is_retry {
        if file_path.exists() {
            std::fs::remove_file(&file_path)?;
        }
    } else if file_path.exists() {
        return Err(HandlerError::DuplicateFile);
    }
    state.pending.insert(file_path.clone());

    let chunk_refs: Vec<&[u8]> = upload_chunks.iter().map(Bytes::as_ref).collect();
    let plaintext = aes::decrypt_stream(&aes_key, &chunk_refs)?;

    let mut file = std::fs::File::create(&file_path)?;
    file.write_all(&plaintext)?;
    drop(file);

    state.repository().insert_file(&FileRecord::new(
        client_id,
        file_name.to_owned(),
        file_path.clone(),
    ))?;
    let now = state.env().unix_timestamp();
    state.repository().touch(&client_id, now)?;

    let cksum_value = cksum::cksum(&plaintext);
    tracing::info!(
        client_id = %client_hex,
        file_name,
        content_size = plaintext.len(),
        cksum = cksum_value,
        "upload written, awaiting CRC confirmation"
    );
    Ok(Outcome::Respond(Response::FileAck {
        client_id,
        content_size: u32::try_from(plaintext.len()).unwrap_or(u32::MAX),
        file_name: file_name.to_owned(),
        cksum: cksum_value,
    }))
}

/// 1104 — promote a pending upload to verified (`§4.5`).
pub fn handle_crc_ok<R: Repository, E: Environment>(
    state: &mut ServerState<R, E>,
    client_id: [u8; 16],
    file_name: &str,
) -> Result<Outcome, HandlerError> {
    state.repository().mark_file_verified(&client_id, file_name)?;
    let now = state.env().unix_timestamp();
    state.repository().touch(&client_id, now)?;
    let client_hex = id_hex(&client_id);
    let file_path =
        resolve_path(&state.root, &client_hex, file_name).map_err(HandlerError::MalformedFrame)?;
    state.pending.remove(&file_path);
    tracing::debug!(client_id = %client_hex, file_name, "CRC confirmed");
    Ok(Outcome::Respond(Response::Received { client_id }))
}

/// 1105 — leave the file and its pending-CRC membership untouched; the
/// client is expected to retry the upload (`§4.5`). Sends no response.
pub fn handle_crc_retry<R: Repository, E: Environment>(
    state: &mut ServerState<R, E>,
    client_id: [u8; 16],
    file_name: &str,
) -> Result<Outcome, HandlerError> {
    let now = state.env().unix_timestamp();
    state.repository().touch(&client_id, now)?;
    tracing::debug!(client_id = %id_hex(&client_id), file_name, "CRC retry requested");
    Ok(Outcome::Silent)
}

/// 1106 — drop a pending upload entirely (`§4.5`).
pub fn handle_crc_abort<R: Repository, E: Environment>(
    state: &mut ServerState<R, E>,
    client_id: [u8; 16],
    file_name: &str,
) -> Result<Outcome, HandlerError> {
    let path = state.repository().delete_file(&client_id, file_name)?;
    if let Some(path) = &path {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        state.pending.remove(path);
    }
    let now = state.env().unix_timestamp();
    state.repository().touch(&client_id, now)?;
    tracing::debug!(client_id = %id_hex(&client_id), file_name, "upload aborted");
    Ok(Outcome::Respond(Response::Received { client_id }))
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use rand::rngs::OsRng;
    use rsa::{pkcs1::EncodeRsaPublicKey, Oaep, RsaPrivateKey, RsaPublicKey};
    use sha2::Sha256;

    use super::*;
    use crate::error::RepositoryError;

    #[derive(Clone, Default)]
    struct FakeEnv {
        clock: Arc<Mutex<u64>>,
        next_id: Arc<Mutex<u8>>,
    }

    impl Environment for FakeEnv {
        type Instant = std::time::Instant;

        fn now(&self) -> Self::Instant {
            std::time::Instant::now()
        }

        fn unix_timestamp(&self) -> u64 {
            let mut clock = self.clock.lock().expect("not poisoned");
            *clock += 1;
            *clock
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            let mut counter = self.next_id.lock().expect("not poisoned");
            for byte in buffer.iter_mut() {
                *byte = *counter;
            }
            *counter = counter.wrapping_add(1);
        }
    }

    #[derive(Clone, Default)]
    struct FakeRepository {
        clients: Arc<Mutex<HashMap<[u8; 16], ClientRecord>>>,
        files: Arc<Mutex<HashMap<([u8; 16], String), FileRecord>>>,
    }

    impl Repository for FakeRepository {
        fn insert_client(&self, client: &ClientRecord) -> Result<(), RepositoryError> {
            self.clients.lock().expect("not poisoned").insert(client.id, client.clone());
            Ok(())
        }

        fn set_keys(
            &self,
            id: &[u8; 16],
            public_key: [u8; PUBLIC_KEY_LEN],
            aes_key: [u8; SESSION_KEY_LEN],
            timestamp: u64,
        ) -> Result<(), RepositoryError> {
            let mut clients = self.clients.lock().expect("not poisoned");
            let record = clients.get_mut(id).ok_or_else(|| RepositoryError::Io("no such client".into()))?;
            *record = record.with_keys(public_key, aes_key, timestamp);
            Ok(())
        }

        fn touch(&self, id: &[u8; 16], timestamp: u64) -> Result<(), RepositoryError> {
            if let Some(record) = self.clients.lock().expect("not poisoned").get_mut(id) {
                record.last_seen = timestamp;
            }
            Ok(())
        }

        fn find_by_id(&self, id: &[u8; 16]) -> Result<Option<ClientRecord>, RepositoryError> {
            Ok(self.clients.lock().expect("not poisoned").get(id).cloned())
        }

        fn find_by_name_id(
            &self,
            id: &[u8; 16],
            name: &str,
        ) -> Result<Option<ClientRecord>, RepositoryError> {
            Ok(self
                .clients
                .lock()
                .expect("not poisoned")
                .get(id)
                .filter(|c| c.name == name)
                .cloned())
        }

        fn all_client_ids_names(&self) -> Result<Vec<([u8; 16], String)>, RepositoryError> {
            Ok(self
                .clients
                .lock()
                .expect("not poisoned")
                .values()
                .map(|c| (c.id, c.name.clone()))
                .collect())
        }

        fn insert_file(&self, file: &FileRecord) -> Result<(), RepositoryError> {
            self.files
                .lock()
                .expect("not poisoned")
                .insert((file.client_id, file.file_name.clone()), file.clone());
            Ok(())
        }

        fn mark_file_verified(
            &self,
            client_id: &[u8; 16],
            file_name: &str,
        ) -> Result<(), RepositoryError> {
            if let Some(file) =
                self.files.lock().expect("not poisoned").get_mut(&(*client_id, file_name.to_owned()))
            {
                file.verified = true;
            }
            Ok(())
        }

        fn delete_file(
            &self,
            client_id: &[u8; 16],
            file_name: &str,
        ) -> Result<Option<std::path::PathBuf>, RepositoryError> {
            Ok(self
                .files
                .lock()
                .expect("not poisoned")
                .remove(&(*client_id, file_name.to_owned()))
                .map(|f| f.path))
        }
    }

    fn fresh_state(root: &std::path::Path) -> ServerState<FakeRepository, FakeEnv> {
        ServerState::new(FakeRepository::default(), FakeEnv::default(), root.to_path_buf())
            .expect("fresh state")
    }

    fn test_rsa_keypair() -> (RsaPrivateKey, [u8; PUBLIC_KEY_LEN]) {
        let sk = RsaPrivateKey::new(&mut OsRng, 1024).expect("keygen");
        let pk = RsaPublicKey::from(&sk);
        let der = pk.to_pkcs1_der().expect("encodes").as_bytes().to_vec();
        let mut field = [0u8; PUBLIC_KEY_LEN];
        field[..der.len()].copy_from_slice(&der);
        (sk, field)
    }

    #[test]
    fn registration_then_collision_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let first = handle_registration(&mut state, "alice").expect("registers");
        assert!(matches!(first, Outcome::Respond(Response::RegistrationOk { .. })));

        let second = handle_registration(&mut state, "alice").expect("handled");
        assert_eq!(second, Outcome::Respond(Response::RegistrationFail));
    }

    #[test]
    fn public_key_exchange_issues_a_wrapped_session_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let Outcome::Respond(Response::RegistrationOk { client_id }) =
            handle_registration(&mut state, "alice").expect("registers")
        else {
            panic!("expected RegistrationOk");
        };

        let (sk, field) = test_rsa_keypair();
        let outcome =
            handle_public_key(&mut state, client_id, "alice", field).expect("keys exchange");
        let Outcome::Respond(Response::PublicKeyAck { client_id: id, encrypted_key }) = outcome
        else {
            panic!("expected PublicKeyAck");
        };
        assert_eq!(id, client_id);

        let session_key = sk.decrypt(Oaep::new::<Sha256>(), &encrypted_key).expect("unwraps");
        assert_eq!(session_key.len(), SESSION_KEY_LEN);
    }

    #[test]
    fn public_key_for_unknown_client_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let (_, field) = test_rsa_keypair();
        let result = handle_public_key(&mut state, [9; 16], "ghost", field);
        assert!(matches!(result, Err(HandlerError::UnknownClient)));
    }

    #[test]
    fn login_without_prior_key_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let Outcome::Respond(Response::RegistrationOk { client_id }) =
            handle_registration(&mut state, "alice").expect("registers")
        else {
            panic!("expected RegistrationOk");
        };
        let outcome = handle_login(&mut state, client_id, "alice").expect("handled");
        assert_eq!(outcome, Outcome::Respond(Response::LoginFail { client_id }));
    }

    #[test]
    fn login_for_unregistered_name_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let outcome = handle_login(&mut state, [3; 16], "nobody").expect("handled");
        assert_eq!(outcome, Outcome::Respond(Response::LoginFail { client_id: [3; 16] }));
    }

    #[test]
    fn login_after_key_exchange_reissues_session_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let Outcome::Respond(Response::RegistrationOk { client_id }) =
            handle_registration(&mut state, "alice").expect("registers")
        else {
            panic!("expected RegistrationOk");
        };
        let (_, field) = test_rsa_keypair();
        handle_public_key(&mut state, client_id, "alice", field).expect("keys");

        let outcome = handle_login(&mut state, client_id, "alice").expect("handled");
        assert!(matches!(outcome, Outcome::Respond(Response::LoginOk { client_id: id, .. }) if id == client_id));
    }

    fn register_and_key(
        state: &mut ServerState<FakeRepository, FakeEnv>,
        name: &str,
    ) -> ([u8; 16], [u8; 16]) {
        let Outcome::Respond(Response::RegistrationOk { client_id }) =
            handle_registration(state, name).expect("registers")
        else {
            panic!("expected RegistrationOk");
        };
        let (_, field) = test_rsa_keypair();
        let Outcome::Respond(Response::PublicKeyAck { encrypted_key, .. }) =
            handle_public_key(state, client_id, name, field).expect("keys")
        else {
            panic!("expected PublicKeyAck");
        };
        // FakeEnv's random_bytes is a deterministic counter; recover the
        // session key the same way the handler derived it by asking the
        // repository directly instead of re-deriving from `encrypted_key`
        // (which only the client's private key could unwrap).
        let _ = encrypted_key;
        let aes_key = state
            .repository()
            .find_by_id(&client_id)
            .expect("read back")
            .and_then(|r| r.aes_key)
            .expect("keyed");
        (client_id, aes_key)
    }

    #[test]
    fn upload_writes_plaintext_and_returns_checksum() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let (client_id, aes_key) = register_and_key(&mut state, "alice");

        let chunk = aes::encrypt_chunk(&aes_key, b"hello world\n");
        let outcome =
            handle_send_file(&mut state, client_id, "hello.txt", &[Bytes::from(chunk)])
                .expect("uploads");
        let Outcome::Respond(Response::FileAck { content_size, file_name, cksum, .. }) = outcome
        else {
            panic!("expected FileAck");
        };
        assert_eq!(content_size, 12);
        assert_eq!(file_name, "hello.txt");
        assert_eq!(cksum, cksum::cksum(b"hello world\n"));

        let written =
            std::fs::read(dir.path().join(id_hex(&client_id)).join("hello.txt")).expect("read");
        assert_eq!(written, b"hello world\n");
    }

    #[test]
    fn upload_before_key_exchange_is_a_protocol_violation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let Outcome::Respond(Response::RegistrationOk { client_id }) =
            handle_registration(&mut state, "alice").expect("registers")
        else {
            panic!("expected RegistrationOk");
        };
        let result = handle_send_file(&mut state, client_id, "x.txt", &[]);
        assert!(matches!(result, Err(HandlerError::ProtocolViolation(_))));
    }

    #[test]
    fn duplicate_upload_without_pending_state_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let (client_id, aes_key) = register_and_key(&mut state, "alice");

        let chunk = aes::encrypt_chunk(&aes_key, b"first");
        handle_send_file(&mut state, client_id, "dup.txt", &[Bytes::from(chunk)])
            .expect("first upload");
        handle_crc_ok(&mut state, client_id, "dup.txt").expect("confirm");

        let chunk2 = aes::encrypt_chunk(&aes_key, b"second");
        let result = handle_send_file(&mut state, client_id, "dup.txt", &[Bytes::from(chunk2)]);
        assert!(matches!(result, Err(HandlerError::DuplicateFile)));
    }

    #[test]
    fn crc_ok_marks_verified_and_clears_pending() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let (client_id, aes_key) = register_and_key(&mut state, "alice");

        let chunk = aes::encrypt_chunk(&aes_key, b"data");
        handle_send_file(&mut state, client_id, "f.txt", &[Bytes::from(chunk)])
            .expect("uploads");
        let path = dir.path().join(id_hex(&client_id)).join("f.txt");
        assert!(state.pending.contains(&path));

        let outcome = handle_crc_ok(&mut state, client_id, "f.txt").expect("confirms");
        assert_eq!(outcome, Outcome::Respond(Response::Received { client_id }));
        assert!(!state.pending.contains(&path));
    }

    #[test]
    fn crc_retry_sends_nothing_and_keeps_file_pending() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let (client_id, aes_key) = register_and_key(&mut state, "alice");

        let chunk = aes::encrypt_chunk(&aes_key, b"data");
        handle_send_file(&mut state, client_id, "f.txt", &[Bytes::from(chunk)])
            .expect("uploads");
        let path = dir.path().join(id_hex(&client_id)).join("f.txt");

        let outcome = handle_crc_retry(&mut state, client_id, "f.txt").expect("retries");
        assert_eq!(outcome, Outcome::Silent);
        assert!(state.pending.contains(&path));
        assert!(path.exists());
    }

    #[test]
    fn retry_then_reupload_overwrites_file_in_place() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let (client_id, aes_key) = register_and_key(&mut state, "alice");

        let first_chunk = aes::encrypt_chunk(&aes_key, b"wrong bytes");
        handle_send_file(&mut state, client_id, "f.txt", &[Bytes::from(first_chunk)])
            .expect("first upload");
        handle_crc_retry(&mut state, client_id, "f.txt").expect("retry");

        let second_chunk = aes::encrypt_chunk(&aes_key, b"correct bytes");
        let outcome = handle_send_file(&mut state, client_id, "f.txt", &[Bytes::from(second_chunk)])
            .expect("second upload overwrites");
        let Outcome::Respond(Response::FileAck { cksum, .. }) = outcome else {
            panic!("expected FileAck");
        };
        assert_eq!(cksum, cksum::cksum(b"correct bytes"));

        let written =
            std::fs::read(dir.path().join(id_hex(&client_id)).join("f.txt")).expect("read");
        assert_eq!(written, b"correct bytes");
    }

    #[test]
    fn crc_abort_deletes_file_and_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let (client_id, aes_key) = register_and_key(&mut state, "alice");

        let chunk = aes::encrypt_chunk(&aes_key, b"data");
        handle_send_file(&mut state, client_id, "f.txt", &[Bytes::from(chunk)])
            .expect("uploads");
        let path = dir.path().join(id_hex(&client_id)).join("f.txt");
        assert!(path.exists());

        let outcome = handle_crc_abort(&mut state, client_id, "f.txt").expect("aborts");
        assert_eq!(outcome, Outcome::Respond(Response::Received { client_id }));
        assert!(!path.exists());
        assert!(!state.pending.contains(&path));
    }

    #[test]
    fn path_traversal_file_name_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state = fresh_state(dir.path());
        let (client_id, _aes_key) = register_and_key(&mut state, "alice");

        let result = handle_send_file(&mut state, client_id, "../escape.txt", &[]);
        assert!(matches!(result, Err(HandlerError::MalformedFrame(_))));
    }
}
