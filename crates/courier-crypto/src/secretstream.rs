//! Chunked `XChaCha20-Poly1305` streaming AEAD.
//!
//! Encrypted stream format:
//! ```text
//! [24-byte header][chunk][chunk]...[final chunk]
//! chunk = XChaCha20-Poly1305( flag byte || padded plaintext, aad = header )
//!       = flag+padded length bytes of ciphertext || 16-byte tag
//! chunk nonce = header[..16] || big-endian chunk counter
//! ```
//!
//! The random header is emitted once per session, seeds every chunk nonce,
//! and is authenticated as AAD of every chunk, so a header is never reused,
//! no header byte can be flipped in transit, and chunks cannot be reordered
//! or spliced across sessions. The flag byte (`Message` or `Final`) travels
//! encrypted ahead of the padded plaintext; the tag therefore binds
//! finality, and a stream cut short before a `Final` chunk is detectable.
//!
//! Chunks must be pushed and pulled strictly in the order produced; there
//! is no random access.

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, Payload},
};
use tracing::warn;

use crate::error::CryptoError;
use crate::exchange::TransmissionKey;
use crate::padding;
use crate::{HEADER_SIZE, TAG_SIZE, random};

/// Per-chunk ciphertext overhead: authentication tag plus the encrypted
/// flag byte.
pub const CHUNK_OVERHEAD: usize = TAG_SIZE + 1;

/// Stream header (24 bytes), transmitted ahead of the first chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header([u8; HEADER_SIZE]);

impl Header {
    /// Get header bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; HEADER_SIZE] {
        &self.0
    }

    /// Import header from bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; HEADER_SIZE]) -> Self {
        Self(bytes)
    }

    /// Import header from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidHeaderLength`] if the slice is not
    /// exactly 24 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; HEADER_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidHeaderLength {
                    expected: HEADER_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }
}

/// Chunk flag, encrypted into every chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkFlag {
    /// Intermediate chunk; more follow.
    Message,
    /// Last chunk of the stream.
    Final,
}

impl ChunkFlag {
    fn as_byte(self) -> u8 {
        match self {
            Self::Message => 0x00,
            Self::Final => 0x01,
        }
    }

    fn from_byte(byte: u8) -> Result<Self, CryptoError> {
        match byte {
            0x00 => Ok(Self::Message),
            0x01 => Ok(Self::Final),
            _ => Err(CryptoError::InvalidChunkFlag),
        }
    }
}

/// Exact ciphertext size of one chunk carrying `plaintext_len` bytes,
/// padded to `pad_size`.
#[must_use]
pub fn chunk_ciphertext_len(plaintext_len: usize, pad_size: usize) -> usize {
    padding::padded_len(plaintext_len, pad_size) + CHUNK_OVERHEAD
}

fn chunk_nonce(header: &[u8; HEADER_SIZE], counter: u64) -> [u8; 24] {
    let mut nonce = [0u8; 24];
    nonce[..16].copy_from_slice(&header[..16]);
    nonce[16..].copy_from_slice(&counter.to_be_bytes());
    nonce
}

/// Encrypting half of the chunked stream.
///
/// State machine: created with a fresh header, accepts `Message` chunks
/// until a `Final` chunk closes it.
pub struct PushStream {
    cipher: XChaCha20Poly1305,
    header: [u8; HEADER_SIZE],
    counter: u64,
    pad_size: usize,
    finalized: bool,
}

impl PushStream {
    /// Initialize an encryption session, generating a fresh random header.
    ///
    /// The header must reach the receiver before any chunk.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidBlockSize`] if `pad_size` is zero and
    /// [`CryptoError::RandomFailed`] if header generation fails.
    pub fn init(key: &TransmissionKey, pad_size: usize) -> Result<(Self, Header), CryptoError> {
        if pad_size == 0 {
            return Err(CryptoError::InvalidBlockSize);
        }

        let header = Header(random::random_24()?);
        let stream = Self {
            cipher: XChaCha20Poly1305::new(key.as_bytes().into()),
            header: header.0,
            counter: 0,
            pad_size,
            finalized: false,
        };
        Ok((stream, header))
    }

    /// Pad and encrypt one plaintext chunk.
    ///
    /// Returns `padded length + CHUNK_OVERHEAD` bytes of ciphertext. A
    /// [`ChunkFlag::Final`] chunk closes the stream.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidState`] when pushing after the final
    /// chunk, [`CryptoError::NonceOverflow`] if the chunk counter is
    /// exhausted, and [`CryptoError::EncryptionFailed`] on AEAD failure.
    pub fn push(&mut self, plaintext: &[u8], flag: ChunkFlag) -> Result<Vec<u8>, CryptoError> {
        if self.finalized {
            return Err(CryptoError::InvalidState);
        }
        if self.counter == u64::MAX {
            return Err(CryptoError::NonceOverflow);
        }

        let padded = padding::pad(plaintext, self.pad_size)?;
        let mut message = Vec::with_capacity(1 + padded.len());
        message.push(flag.as_byte());
        message.extend_from_slice(&padded);

        let nonce = chunk_nonce(&self.header, self.counter);
        let ciphertext = self
            .cipher
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: &message,
                    aad: &self.header,
                },
            )
            .map_err(|_| CryptoError::EncryptionFailed)?;

        self.counter += 1;
        if flag == ChunkFlag::Final {
            self.finalized = true;
        }
        Ok(ciphertext)
    }

    /// Whether the final chunk has been pushed.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

/// Decrypting half of the chunked stream.
pub struct PullStream {
    cipher: XChaCha20Poly1305,
    header: [u8; HEADER_SIZE],
    counter: u64,
    finalized: bool,
}

impl PullStream {
    /// Initialize a decryption session from a received header.
    #[must_use]
    pub fn init(header: &Header, key: &TransmissionKey) -> Self {
        Self {
            cipher: XChaCha20Poly1305::new(key.as_bytes().into()),
            header: header.0,
            counter: 0,
            finalized: false,
        }
    }

    /// Decrypt and unpad one ciphertext chunk, returning the plaintext and
    /// its flag. No plaintext is returned on any failure.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidState`] when pulling after the final
    /// chunk, [`CryptoError::CiphertextTooShort`] on an undersized chunk,
    /// [`CryptoError::AuthenticationFailed`] on tag mismatch (tampering,
    /// reordering, wrong key), and [`CryptoError::Padding`] on malformed
    /// padding inside an authenticated chunk.
    pub fn pull(&mut self, ciphertext: &[u8]) -> Result<(Vec<u8>, ChunkFlag), CryptoError> {
        if self.finalized {
            return Err(CryptoError::InvalidState);
        }
        if self.counter == u64::MAX {
            return Err(CryptoError::NonceOverflow);
        }
        if ciphertext.len() < CHUNK_OVERHEAD {
            return Err(CryptoError::CiphertextTooShort {
                actual: ciphertext.len(),
                minimum: CHUNK_OVERHEAD,
            });
        }

        let nonce = chunk_nonce(&self.header, self.counter);
        let message = self
            .cipher
            .decrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: ciphertext,
                    aad: &self.header,
                },
            )
            .map_err(|_| {
                warn!(chunk = self.counter, "chunk authentication failed");
                CryptoError::AuthenticationFailed
            })?;

        let flag = ChunkFlag::from_byte(message[0])?;
        let plaintext = padding::unpad(&message[1..]).map_err(|e| {
            warn!(chunk = self.counter, "malformed padding in authenticated chunk");
            e
        })?;

        self.counter += 1;
        if flag == ChunkFlag::Final {
            self.finalized = true;
        }
        Ok((plaintext.to_vec(), flag))
    }

    /// Whether the final chunk has been pulled.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}
