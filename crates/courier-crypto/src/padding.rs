//! ISO/IEC 7816-4 length padding.
//!
//! Plaintext chunks are padded to a multiple of the configured block size
//! before encryption so ciphertext lengths do not reveal exact plaintext
//! sizes. A single 0x80 marker byte is always appended (block-aligned input
//! grows by a whole block), followed by zero bytes up to the boundary, which
//! keeps unpadding unambiguous. No randomness, fully deterministic.

use crate::error::CryptoError;

/// Padding marker byte.
const MARKER: u8 = 0x80;

/// Pad `plaintext` to the next multiple of `block_size`.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidBlockSize`] if `block_size` is zero.
pub fn pad(plaintext: &[u8], block_size: usize) -> Result<Vec<u8>, CryptoError> {
    if block_size == 0 {
        return Err(CryptoError::InvalidBlockSize);
    }

    let padded_len = padded_len(plaintext.len(), block_size);
    let mut padded = Vec::with_capacity(padded_len);
    padded.extend_from_slice(plaintext);
    padded.push(MARKER);
    padded.resize(padded_len, 0);
    Ok(padded)
}

/// Strip padding, returning the plaintext slice.
///
/// Scans from the tail: trailing zeros are dropped, then the 0x80 marker.
///
/// # Errors
///
/// Returns [`CryptoError::Padding`] if no marker byte is found (corrupted
/// input). Unpadding runs on already-authenticated plaintext, so this
/// failing indicates a programming error; callers log and fail closed.
pub fn unpad(padded: &[u8]) -> Result<&[u8], CryptoError> {
    let mut end = padded.len();
    while end > 0 && padded[end - 1] == 0 {
        end -= 1;
    }
    if end == 0 || padded[end - 1] != MARKER {
        return Err(CryptoError::Padding);
    }
    Ok(&padded[..end - 1])
}

/// Length of `len` bytes of plaintext after padding: the next multiple of
/// `block_size` strictly greater than `len`.
#[must_use]
pub fn padded_len(len: usize, block_size: usize) -> usize {
    (len / block_size + 1) * block_size
}
