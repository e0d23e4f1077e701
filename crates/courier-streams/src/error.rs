//! Stream adapter error types.

use courier_crypto::CryptoError;
use thiserror::Error;

/// Streaming encryption/decryption errors
#[derive(Debug, Error)]
pub enum StreamError {
    /// Underlying cryptographic failure
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// I/O failure on the underlying source
    #[error("source i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Ciphertext ended before a final chunk was seen, or the consumed
    /// total differs from the declared size. Retryable by re-fetching.
    #[error("incomplete ciphertext stream")]
    Truncated,

    /// Plaintext source ended before the declared total size (caller bug,
    /// not a transport failure)
    #[error("plaintext source ended early: declared {declared} bytes, read {actual}")]
    SourceSizeMismatch {
        /// Declared plaintext size
        declared: u64,
        /// Bytes actually available
        actual: u64,
    },

    /// Chunk read size of zero
    #[error("max read size must be non-zero")]
    InvalidReadSize,
}

impl StreamError {
    /// Whether re-fetching the ciphertext may resolve the failure.
    ///
    /// Authentication and padding failures are never retried; a truncated
    /// download is.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Truncated | Self::Io(_))
    }
}
