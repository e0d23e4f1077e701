//! X25519 key exchange and transmission-key derivation.
//!
//! Two parties each derive a complementary pair of directional transmission
//! keys from their own private key, the peer's public key, and a fresh
//! 32-byte per-transfer nonce. The KDF is keyed BLAKE2b-256 with the nonce
//! as key material; the two public keys are hashed in opposite orders for
//! the encryption and decryption keys, so the sender's encryption key equals
//! the recipient's decryption key and vice versa without a symmetric key
//! ever crossing the wire.
//!
//! Alongside the keys, both parties derive an identical 32-byte *proof* from
//! the derived key pair sorted into canonical byte order. The server stores
//! the sender's proof and compares it against the one a downloader presents,
//! gating ciphertext release without learning either key.

use blake2::{Blake2bMac, digest::Mac, digest::consts::U32};
use rand_core::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::{KEY_SIZE, NONCE_SIZE, PROOF_SIZE, SEED_SIZE, random};

/// KDF domain-separation context for transmission keys.
const KDF_CONTEXT: &[u8] = b"crypter";

/// Keyed BLAKE2b with a 32-byte digest.
type TransmissionKdf = Blake2bMac<U32>;

/// X25519 private key (32 bytes).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(x25519_dalek::StaticSecret);

/// X25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey(x25519_dalek::PublicKey);

/// X25519 shared secret (32 bytes). Raw Diffie-Hellman output; only ever
/// fed into the transmission KDF, never used directly as a cipher key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret(x25519_dalek::SharedSecret);

impl PrivateKey {
    /// Generate a new random private key from the OS CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        Self(x25519_dalek::StaticSecret::random_from_rng(OsRng))
    }

    /// Derive the public key via scalar multiplication against the base point.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey(x25519_dalek::PublicKey::from(&self.0))
    }

    /// Perform Diffie-Hellman key exchange with a peer's public key.
    #[must_use]
    pub fn shared_secret(&self, peer_public: &PublicKey) -> SharedSecret {
        SharedSecret(self.0.diffie_hellman(&peer_public.0))
    }

    /// Export as bytes. The returned bytes are the raw private key;
    /// handle with care.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Import from bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(x25519_dalek::StaticSecret::from(bytes))
    }

    /// Import from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if the slice is not exactly
    /// 32 bytes. Key material is never truncated or padded.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self::from_bytes(arr))
    }
}

impl PublicKey {
    /// Export public key as bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        *self.0.as_bytes()
    }

    /// Get bytes as a reference.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    /// Import public key from bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(x25519_dalek::PublicKey::from(bytes))
    }

    /// Import public key from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if the slice is not exactly
    /// 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self::from_bytes(arr))
    }
}

impl SharedSecret {
    /// Get shared secret as bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

/// Seed for deterministic keypair generation (32 bytes).
///
/// An ephemeral recipient's seed is retained by the upload handshake so it
/// can be embedded in a shareable link; treat it as private key material.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_SIZE]);

impl Seed {
    /// Generate a fresh random seed.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomFailed`] if the OS CSPRNG fails.
    pub fn generate() -> Result<Self, CryptoError> {
        Ok(Self(random::random_32()?))
    }

    /// Import from bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; SEED_SIZE]) -> Self {
        Self(bytes)
    }

    /// Import from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSeedLength`] if the slice is not exactly
    /// 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; SEED_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidSeedLength {
                    expected: SEED_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    /// Get seed bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; SEED_SIZE] {
        &self.0
    }
}

/// X25519 keypair.
#[derive(Clone)]
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a random keypair from the OS CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let private = PrivateKey::generate();
        let public = private.public_key();
        Self { private, public }
    }

    /// Derive a keypair deterministically from a seed. Same seed, same pair.
    #[must_use]
    pub fn from_seed(seed: &Seed) -> Self {
        let private = PrivateKey::from_bytes(*seed.as_bytes());
        let public = private.public_key();
        Self { private, public }
    }

    /// Derive a keypair from a seed byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSeedLength`] if the slice is not exactly
    /// 32 bytes.
    pub fn from_seed_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self::from_seed(&Seed::from_slice(bytes)?))
    }

    /// The private half.
    #[must_use]
    pub fn private(&self) -> &PrivateKey {
        &self.private
    }

    /// The public half.
    #[must_use]
    pub fn public(&self) -> PublicKey {
        self.public
    }
}

/// Per-transfer nonce (32 bytes).
///
/// Generated once by the sender and transmitted alongside the ciphertext
/// metadata; it keys every KDF invocation for the transfer. This is not a
/// cipher nonce.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    /// Generate a fresh random nonce.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomFailed`] if the OS CSPRNG fails.
    pub fn generate() -> Result<Self, CryptoError> {
        Ok(Self(random::random_32()?))
    }

    /// Import from bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Import from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidNonceLength`] if the slice is not
    /// exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; NONCE_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidNonceLength {
                    expected: NONCE_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    /// Get nonce bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Nonce({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// Derived symmetric transmission key (32 bytes).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct TransmissionKey([u8; KEY_SIZE]);

impl TransmissionKey {
    /// Get key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for TransmissionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TransmissionKey(..)")
    }
}

/// Key-agreement proof (32 bytes).
///
/// Identical regardless of which party computes it; safe to hand to the
/// server. Equality is constant-time.
#[derive(Clone, Copy, Eq)]
pub struct Proof([u8; PROOF_SIZE]);

impl Proof {
    /// Export proof bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PROOF_SIZE] {
        self.0
    }

    /// Get proof bytes as a reference.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; PROOF_SIZE] {
        &self.0
    }

    /// Import proof from bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; PROOF_SIZE]) -> Self {
        Self(bytes)
    }
}

impl PartialEq for Proof {
    fn eq(&self, other: &Self) -> bool {
        crate::constant_time::verify_32(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Proof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Proof({})", hex_prefix(&self.0))
    }
}

fn hex_prefix(bytes: &[u8]) -> String {
    bytes[..4].iter().map(|b| format!("{b:02x}")).collect()
}

/// Keyed BLAKE2b-256 over the concatenated parts, keyed by the nonce.
fn kdf(nonce: &Nonce, parts: &[&[u8]]) -> [u8; 32] {
    let mut mac = TransmissionKdf::new_from_slice(nonce.as_bytes())
        .expect("32-byte nonce is a valid BLAKE2b key");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

/// Both directional keys plus the shared proof.
struct TransmissionKeys {
    encryption: [u8; KEY_SIZE],
    decryption: [u8; KEY_SIZE],
    proof: Proof,
}

impl Zeroize for TransmissionKeys {
    fn zeroize(&mut self) {
        self.encryption.zeroize();
        self.decryption.zeroize();
    }
}

fn derive_transmission_keys(
    private: &PrivateKey,
    peer_public: &PublicKey,
    nonce: &Nonce,
) -> TransmissionKeys {
    let shared = private.shared_secret(peer_public);
    let own_public = private.public_key();

    let encryption = kdf(
        nonce,
        &[
            KDF_CONTEXT,
            shared.as_bytes(),
            peer_public.as_bytes(),
            own_public.as_bytes(),
        ],
    );
    let decryption = kdf(
        nonce,
        &[
            KDF_CONTEXT,
            shared.as_bytes(),
            own_public.as_bytes(),
            peer_public.as_bytes(),
        ],
    );

    // Canonical order: the lexicographically smaller key is hashed first, so
    // both parties produce the same proof despite swapped roles. Interop
    // depends on this exact convention.
    let (first, second) = if encryption <= decryption {
        (&encryption, &decryption)
    } else {
        (&decryption, &encryption)
    };
    let proof = Proof(kdf(nonce, &[first, second]));

    TransmissionKeys {
        encryption,
        decryption,
        proof,
    }
}

/// Derive the sender-side encryption key and the key-agreement proof.
#[must_use]
pub fn derive_encryption_key(
    private: &PrivateKey,
    peer_public: &PublicKey,
    nonce: &Nonce,
) -> (TransmissionKey, Proof) {
    let mut keys = derive_transmission_keys(private, peer_public, nonce);
    let out = (TransmissionKey(keys.encryption), keys.proof);
    keys.zeroize();
    out
}

/// Derive the recipient-side decryption key and the key-agreement proof.
#[must_use]
pub fn derive_decryption_key(
    private: &PrivateKey,
    peer_public: &PublicKey,
    nonce: &Nonce,
) -> (TransmissionKey, Proof) {
    let mut keys = derive_transmission_keys(private, peer_public, nonce);
    let out = (TransmissionKey(keys.decryption), keys.proof);
    keys.zeroize();
    out
}
