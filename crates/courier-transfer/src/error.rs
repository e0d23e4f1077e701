//! Transfer handshake error types.

use courier_crypto::CryptoError;
use thiserror::Error;

/// Handshake orchestration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    /// Underlying cryptographic failure
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Presented proof does not match the stored proof; the download is
    /// not authorized. Not retried with the same credentials.
    #[error("download not authorized: proof mismatch")]
    ProofMismatch,
}
