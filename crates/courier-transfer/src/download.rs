//! Download-side handshake.

use courier_crypto::constant_time;
use courier_crypto::exchange::{PrivateKey, Proof, PublicKey, Seed, derive_decryption_key};
use courier_crypto::{Nonce, TransmissionKey};
use tracing::debug;

use crate::error::TransferError;

/// Transfer preview data needed to derive the download material: the
/// sender's public key and the per-transfer nonce.
pub struct DownloadHandshake {
    sender_public: PublicKey,
    nonce: Nonce,
}

/// Everything the recipient needs to authorize and decrypt one transfer.
pub struct DownloadMaterial {
    /// Proof presented to the server to authorize the ciphertext fetch.
    pub proof: Proof,
    /// Symmetric key feeding the decryption stream.
    pub key: TransmissionKey,
}

impl DownloadHandshake {
    /// Start a handshake from the transfer preview.
    #[must_use]
    pub fn new(sender_public: PublicKey, nonce: Nonce) -> Self {
        Self {
            sender_public,
            nonce,
        }
    }

    /// Derive the decryption key and proof with the recipient's persistent
    /// private key.
    #[must_use]
    pub fn derive(&self, recipient_private: &PrivateKey) -> DownloadMaterial {
        let (key, proof) =
            derive_decryption_key(recipient_private, &self.sender_public, &self.nonce);
        debug!("download handshake derived");
        DownloadMaterial { proof, key }
    }

    /// Derive the decryption key and proof from a share-link seed
    /// (anonymous recipient).
    #[must_use]
    pub fn derive_from_seed(&self, seed: &Seed) -> DownloadMaterial {
        let pair = courier_crypto::KeyPair::from_seed(seed);
        self.derive(pair.private())
    }
}

/// Compare a stored proof against a presented one in constant time.
///
/// This is the gate the ciphertext store applies before releasing data;
/// timing reveals nothing about where a mismatch occurred.
///
/// # Errors
///
/// Returns [`TransferError::ProofMismatch`] when the proofs disagree.
pub fn verify_proof(stored: &Proof, presented: &Proof) -> Result<(), TransferError> {
    if constant_time::verify_32(stored.as_bytes(), presented.as_bytes()) {
        Ok(())
    } else {
        Err(TransferError::ProofMismatch)
    }
}
