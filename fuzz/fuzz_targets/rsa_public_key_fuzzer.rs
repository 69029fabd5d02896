//! Fuzz target for `rsa::parse_public_key_padded`.
//!
//! The 160-byte public-key field on the wire is attacker-controlled (it
//! arrives with the 1101 request before any key exchange has happened), so
//! the DER-sequence-length scan and PKCS#1 parse it feeds into must reject
//! garbage without panicking.
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vaultwire_crypto::rsa;

fuzz_target!(|data: &[u8]| {
    let mut field = [0u8; 160];
    let take = data.len().min(160);
    field[..take].copy_from_slice(&data[..take]);
    let _ = rsa::parse_public_key_padded(&field);
});
