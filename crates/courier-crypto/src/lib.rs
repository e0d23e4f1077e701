//! # Courier Crypto
//!
//! Cryptographic core for the Courier transfer pipeline.
//!
//! This crate provides:
//! - X25519 key exchange with random and seed-deterministic keypairs
//! - Directional transmission-key derivation (keyed BLAKE2b) plus a
//!   server-verifiable proof of key agreement
//! - ISO/IEC 7816-4 length padding
//! - Chunked `XChaCha20-Poly1305` streaming AEAD with truncation detection
//! - Constant-time comparisons and OS-CSPRNG helpers
//!
//! ## Cryptographic Suite
//!
//! | Function | Algorithm | Notes |
//! |----------|-----------|-------|
//! | Key Exchange | X25519 | 32-byte keys |
//! | KDF | keyed BLAKE2b-256 | key = per-transfer nonce |
//! | AEAD | `XChaCha20-Poly1305` | 16-byte tags, per-chunk |
//! | Padding | ISO/IEC 7816-4 | 0x80 marker + zeros |
//!
//! One fixed protocol, no algorithm agility.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod constant_time;
pub mod error;
pub mod exchange;
pub mod padding;
pub mod random;
pub mod secretstream;

pub use error::CryptoError;
pub use exchange::{KeyPair, Nonce, PrivateKey, Proof, PublicKey, Seed, TransmissionKey};

/// X25519 public/private key size
pub const X25519_KEY_SIZE: usize = 32;

/// Symmetric transmission key size (`XChaCha20-Poly1305` key)
pub const KEY_SIZE: usize = 32;

/// Keypair seed size
pub const SEED_SIZE: usize = 32;

/// Per-transfer nonce size (KDF key material, not a cipher nonce)
pub const NONCE_SIZE: usize = 32;

/// Key-agreement proof size
pub const PROOF_SIZE: usize = 32;

/// Poly1305 authentication tag size
pub const TAG_SIZE: usize = 16;

/// Stream header size emitted once per encryption session
pub const HEADER_SIZE: usize = 24;
