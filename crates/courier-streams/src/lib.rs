//! # Courier Streams
//!
//! Async adapters that present the chunked stream cipher as a readable byte
//! stream over arbitrarily large payloads in bounded memory.
//!
//! [`EncryptionStream`] wraps a plaintext source and yields
//! `header || encrypted chunks`; [`DecryptionStream`] wraps a ciphertext
//! source and yields plaintext, failing closed on tampering and truncation.
//! At most one chunk of plaintext and one of ciphertext is buffered at a
//! time regardless of payload size, so backpressure is bounded by the
//! configured chunk size.
//!
//! Each transfer owns its stream; no state is shared across transfers, and
//! dropping a stream mid-transfer simply abandons its key material.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod decrypt;
pub mod encrypt;
pub mod error;

pub use decrypt::DecryptionStream;
pub use encrypt::EncryptionStream;
pub use error::StreamError;

use courier_crypto::HEADER_SIZE;
use courier_crypto::secretstream::chunk_ciphertext_len;

/// Exact ciphertext size for a payload of `plaintext_len` bytes encrypted
/// with the given chunk and pad configuration: the stream header plus every
/// padded, tagged chunk. Deterministic, so callers can declare a
/// Content-Length without encrypting first.
#[must_use]
pub fn encrypted_len(plaintext_len: u64, max_read_size: usize, pad_size: usize) -> u64 {
    let full_chunk = chunk_ciphertext_len(max_read_size, pad_size) as u64;
    let full_chunks = plaintext_len / max_read_size as u64;
    let remainder = (plaintext_len % max_read_size as u64) as usize;

    let tail = if plaintext_len == 0 {
        // Empty payloads still carry one final chunk.
        chunk_ciphertext_len(0, pad_size) as u64
    } else if remainder == 0 {
        // Evenly divided: the last full chunk is the final one.
        0
    } else {
        chunk_ciphertext_len(remainder, pad_size) as u64
    };

    HEADER_SIZE as u64 + full_chunks * full_chunk + tail
}
