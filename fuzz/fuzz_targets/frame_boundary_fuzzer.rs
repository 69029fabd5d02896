//! Fuzz target for header boundary conditions.
//!
//! Exercises `Header`/`ResponseHeader` parsing with deliberately chosen
//! boundary values (zero/min/max payload sizes, every opcode byte pattern)
//! rather than raw arbitrary bytes, to push the parser toward edges that
//! purely random fuzzing input rarely reaches on its own.
//!
//! # Invariants
//!
//! - `Header::from_bytes` on fewer than 23 bytes MUST return
//!   `FrameTooShort`, never panic or read past the buffer.
//! - `Header::to_bytes().len()` MUST always equal `Header::SIZE` (23).
//! - Round-tripping any header that was itself built from fuzzer-controlled
//!   fields MUST reproduce the same fields.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vaultwire_proto::Header;

#[derive(Debug, Arbitrary)]
struct BoundaryHeader {
    client_id: [u8; 16],
    version: u8,
    code: CodeChoice,
    payload_size: SizeChoice,
}

#[derive(Debug, Arbitrary)]
enum CodeChoice {
    Known(KnownCode),
    Random(u16),
}

#[derive(Debug, Arbitrary)]
enum KnownCode {
    Registration,
    PublicKey,
    Login,
    SendFile,
    CrcOk,
    CrcRetry,
    CrcAbort,
}

#[derive(Debug, Arbitrary)]
enum SizeChoice {
    Zero,
    One,
    PacketSize,
    Max,
    Random(u32),
}

fuzz_target!(|input: BoundaryHeader| {
    let code: u16 = match input.code {
        CodeChoice::Known(KnownCode::Registration) => 1100,
        CodeChoice::Known(KnownCode::PublicKey) => 1101,
        CodeChoice::Known(KnownCode::Login) => 1102,
        CodeChoice::Known(KnownCode::SendFile) => 1103,
        CodeChoice::Known(KnownCode::CrcOk) => 1104,
        CodeChoice::Known(KnownCode::CrcRetry) => 1105,
        CodeChoice::Known(KnownCode::CrcAbort) => 1106,
        CodeChoice::Random(c) => c,
    };
    let payload_size: u32 = match input.payload_size {
        SizeChoice::Zero => 0,
        SizeChoice::One => 1,
        SizeChoice::PacketSize => 1024,
        SizeChoice::Max => u32::MAX,
        SizeChoice::Random(n) => n,
    };

    let header = Header::new(input.client_id, input.version, code, payload_size);
    let bytes = header.to_bytes();
    assert_eq!(bytes.len(), Header::SIZE);

    let parsed = Header::from_bytes(&bytes).expect("a header we just encoded must parse back");
    assert_eq!(parsed.client_id(), input.client_id);
    assert_eq!(parsed.version(), input.version);
    assert_eq!(parsed.code(), code);
    assert_eq!(parsed.payload_size(), payload_size);

    for cut in 0..Header::SIZE {
        let _ = Header::from_bytes(&bytes[..cut]);
    }
});
