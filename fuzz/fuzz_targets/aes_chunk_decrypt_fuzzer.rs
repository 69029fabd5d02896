//! Fuzz target for `aes::decrypt_chunk`.
//!
//! An upload's ciphertext chunks come straight off the wire from whatever
//! the client sends; this checks that no chunk length or content, however
//! malformed, can panic the chunk-independent CBC decrypt path (`§4.3`).
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vaultwire_crypto::aes;

fuzz_target!(|data: &[u8]| {
    if data.len() < 16 {
        return;
    }
    let mut key = [0u8; 16];
    key.copy_from_slice(&data[..16]);
    let _ = aes::decrypt_chunk(&key, &data[16..]);
});
