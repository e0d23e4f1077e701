//! Upload-side handshake.

use courier_crypto::exchange::{KeyPair, Nonce, Proof, PublicKey, Seed, derive_encryption_key};
use courier_crypto::TransmissionKey;
use tracing::debug;

use crate::error::TransferError;

/// Staged identity material for one upload.
///
/// Setters cover the two persistent-identity cases; whatever is left unset
/// is generated ephemerally when the handshake is sealed.
#[derive(Default)]
pub struct UploadHandshake {
    recipient_public: Option<PublicKey>,
    sender: Option<KeyPair>,
}

/// Everything the sender needs to encrypt and upload one transfer.
pub struct UploadMaterial {
    /// Sender's public key for the transfer payload; `None` when the
    /// sender's persistent identity makes it implicit server-side.
    pub sender_public: Option<PublicKey>,
    /// Seed of the ephemeral recipient keypair, retained so it can be
    /// embedded in a shareable link; `None` for a known recipient.
    pub recipient_seed: Option<Seed>,
    /// Fresh per-transfer nonce, transmitted with the ciphertext metadata.
    pub nonce: Nonce,
    /// Key-agreement proof, stored server-side to gate downloads.
    pub proof: Proof,
    /// Symmetric key feeding the encryption stream.
    pub key: TransmissionKey,
}

impl UploadHandshake {
    /// Start a handshake with no identity material staged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the recipient's persistent public key (logged-in recipient).
    #[must_use]
    pub fn with_recipient(mut self, public: PublicKey) -> Self {
        self.recipient_public = Some(public);
        self
    }

    /// Stage the sender's persistent keypair (logged-in sender).
    #[must_use]
    pub fn with_sender(mut self, keys: KeyPair) -> Self {
        self.sender = Some(keys);
        self
    }

    /// Fill in missing identities, generate the per-transfer nonce, and
    /// derive the encryption key and proof.
    ///
    /// # Errors
    ///
    /// Propagates CSPRNG failures from ephemeral key and nonce generation.
    pub fn seal(self) -> Result<UploadMaterial, TransferError> {
        // Anonymous recipient: derive the keypair from a fresh seed and keep
        // the seed for the share link.
        let (recipient_public, recipient_seed) = match self.recipient_public {
            Some(public) => (public, None),
            None => {
                let seed = Seed::generate()?;
                let pair = KeyPair::from_seed(&seed);
                (pair.public(), Some(seed))
            }
        };

        let sender_is_persistent = self.sender.is_some();
        let sender = match self.sender {
            Some(keys) => keys,
            None => KeyPair::generate(),
        };

        let nonce = Nonce::generate()?;
        let (key, proof) = derive_encryption_key(sender.private(), &recipient_public, &nonce);

        debug!(
            ephemeral_recipient = recipient_seed.is_some(),
            ephemeral_sender = !sender_is_persistent,
            "upload handshake sealed"
        );

        Ok(UploadMaterial {
            sender_public: if sender_is_persistent {
                None
            } else {
                Some(sender.public())
            },
            recipient_seed,
            nonce,
            proof,
            key,
        })
    }
}
