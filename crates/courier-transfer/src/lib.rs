//! # Courier Transfer
//!
//! Upload/download handshake orchestration: combines the key exchange with
//! the stream cipher to set up one transfer.
//!
//! The upload side fills in whatever identity material is missing -
//! generating an ephemeral recipient keypair from a retained seed for
//! anonymous share links, and an ephemeral sender keypair for anonymous
//! senders - then derives the encryption key and the key-agreement proof
//! under a fresh per-transfer nonce. The download side mirrors the
//! derivation from the transfer preview and presents its proof to the
//! server, which releases ciphertext only when the stored and presented
//! proofs agree.
//!
//! Each handshake owns its key material for the duration of one upload or
//! download; nothing is persisted here, and a cancelled transfer is retried
//! with a fresh handshake (never reusing a nonce or stream header).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod download;
pub mod error;
pub mod upload;

pub use download::{DownloadHandshake, DownloadMaterial, verify_proof};
pub use error::TransferError;
pub use upload::{UploadHandshake, UploadMaterial};
