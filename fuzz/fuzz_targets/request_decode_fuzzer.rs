//! Fuzz target for `Request::decode`.
//!
//! Feeds arbitrary bytes as a raw header + payload and checks that decoding
//! never panics, regardless of declared opcode, payload size, or name-field
//! content.
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vaultwire_proto::{Header, Request};

fuzz_target!(|data: &[u8]| {
    if data.len() < Header::SIZE {
        return;
    }
    let (header_bytes, payload) = data.split_at(Header::SIZE);
    let _ = Request::decode(header_bytes, payload);
});
