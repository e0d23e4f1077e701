//! Cryptographic error types.

use thiserror::Error;

/// Cryptographic errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// AEAD encryption failed
    #[error("encryption failed")]
    EncryptionFailed,

    /// AEAD decryption failed (authentication failure)
    #[error("decryption failed: authentication failure")]
    AuthenticationFailed,

    /// Invalid seed length
    #[error("invalid seed length: expected {expected}, got {actual}")]
    InvalidSeedLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Invalid key length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Invalid nonce length
    #[error("invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Invalid stream header length
    #[error("invalid header length: expected {expected}, got {actual}")]
    InvalidHeaderLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Pad block size of zero
    #[error("pad block size must be non-zero")]
    InvalidBlockSize,

    /// Malformed padding on otherwise-authenticated plaintext
    #[error("malformed padding")]
    Padding,

    /// Ciphertext chunk shorter than the per-chunk overhead
    #[error("ciphertext chunk too short: {actual} bytes (minimum {minimum})")]
    CiphertextTooShort {
        /// Actual length
        actual: usize,
        /// Minimum length
        minimum: usize,
    },

    /// Decrypted chunk flag byte is not a known value
    #[error("invalid chunk flag")]
    InvalidChunkFlag,

    /// Invalid state for operation (e.g. pushing after the final chunk)
    #[error("invalid state for operation")]
    InvalidState,

    /// Chunk counter exhausted
    #[error("chunk counter exhausted")]
    NonceOverflow,

    /// Random number generation failed
    #[error("random number generation failed")]
    RandomFailed,
}
