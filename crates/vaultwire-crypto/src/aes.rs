//! AES-128-CBC chunk decryption, matching the wire's per-packet framing.
//!
//! Unlike a typical streaming cipher mode, each network packet's worth of
//! ciphertext is encrypted independently under a fresh, all-zero IV rather
//! than chained across the whole upload (`§4.3`, `§9`). Every chunk carries
//! its own PKCS#7 padding and must be unpadded on its own.

use aes::{
    cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit},
    Aes128,
};

use crate::errors::{CryptoError, Result};

const BLOCK_SIZE: usize = 16;
const ZERO_IV: [u8; BLOCK_SIZE] = [0u8; BLOCK_SIZE];

/// Decrypt one independently-framed AES-128-CBC chunk and strip its PKCS#7
/// padding.
///
/// # Errors
///
/// Returns [`CryptoError::NotBlockAligned`] if `ciphertext` is empty or not a
/// multiple of 16 bytes, or [`CryptoError::InvalidPadding`] if the trailing
/// PKCS#7 padding is malformed.
pub fn decrypt_chunk(key: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::NotBlockAligned { len: ciphertext.len() });
    }

    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut plaintext = Vec::with_capacity(ciphertext.len());
    let mut prev = ZERO_IV;

    for block in ciphertext.chunks_exact(BLOCK_SIZE) {
        let mut buf = *GenericArray::from_slice(block);
        cipher.decrypt_block(&mut buf);
        for i in 0..BLOCK_SIZE {
            plaintext.push(buf[i] ^ prev[i]);
        }
        prev.copy_from_slice(block);
    }

    unpad_pkcs7(plaintext)
}

/// Encrypt one chunk under AES-128-CBC with a fresh all-zero IV, PKCS#7
/// padding the plaintext to a block boundary first.
///
/// Exposed for tests that need to simulate a client.
#[must_use]
pub fn encrypt_chunk(key: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
    let padded = pad_pkcs7(plaintext);
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut ciphertext = Vec::with_capacity(padded.len());
    let mut prev = ZERO_IV;

    for block in padded.chunks_exact(BLOCK_SIZE) {
        let mut buf = [0u8; BLOCK_SIZE];
        for i in 0..BLOCK_SIZE {
            buf[i] = block[i] ^ prev[i];
        }
        let mut buf = GenericArray::from(buf);
        cipher.encrypt_block(&mut buf);
        prev.copy_from_slice(&buf);
        ciphertext.extend_from_slice(&buf);
    }

    ciphertext
}

/// Decrypt a whole upload's worth of independently-framed chunks and
/// concatenate their plaintexts in order (`§4.3` `DecryptStream`).
///
/// # Errors
///
/// Returns whatever [`decrypt_chunk`] returns for the first chunk that fails
/// to decrypt or unpad.
pub fn decrypt_stream(key: &[u8; 16], chunks: &[&[u8]]) -> Result<Vec<u8>> {
    let mut plaintext = Vec::new();
    for chunk in chunks {
        plaintext.extend(decrypt_chunk(key, chunk)?);
    }
    Ok(plaintext)
}

fn pad_pkcs7(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - (data.len() % BLOCK_SIZE);
    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    out.extend(std::iter::repeat(pad_len as u8).take(pad_len));
    out
}

fn unpad_pkcs7(mut data: Vec<u8>) -> Result<Vec<u8>> {
    let Some(&pad_len) = data.last() else {
        return Err(CryptoError::InvalidPadding);
    };
    let pad_len = pad_len as usize;
    if pad_len == 0 || pad_len > BLOCK_SIZE || pad_len > data.len() {
        return Err(CryptoError::InvalidPadding);
    }
    if !data[data.len() - pad_len..].iter().all(|&b| b as usize == pad_len) {
        return Err(CryptoError::InvalidPadding);
    }
    data.truncate(data.len() - pad_len);
    Ok(data)
}
