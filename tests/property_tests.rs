//! Property-based tests for the Courier pipeline.
//!
//! Uses proptest to verify invariants across large input spaces.

use proptest::prelude::*;

// ============================================================================
// Padding Properties
// ============================================================================

mod padding_properties {
    use super::*;
    use courier_crypto::padding::{pad, padded_len, unpad};

    proptest! {
        /// Unpad inverts pad for every plaintext and block size.
        #[test]
        fn padding_roundtrip(
            plaintext in proptest::collection::vec(any::<u8>(), 0..2048),
            block_size in 1usize..512,
        ) {
            let padded = pad(&plaintext, block_size).unwrap();
            prop_assert_eq!(padded.len() % block_size, 0);
            prop_assert_eq!(padded.len(), padded_len(plaintext.len(), block_size));
            prop_assert!(padded.len() > plaintext.len());
            prop_assert_eq!(unpad(&padded).unwrap(), &plaintext[..]);
        }

        /// Padding never maps two different plaintexts to the same output.
        #[test]
        fn padding_injective(
            a in proptest::collection::vec(any::<u8>(), 0..256),
            b in proptest::collection::vec(any::<u8>(), 0..256),
            block_size in 1usize..64,
        ) {
            let pa = pad(&a, block_size).unwrap();
            let pb = pad(&b, block_size).unwrap();
            if a != b {
                prop_assert_ne!(pa, pb);
            }
        }
    }
}

// ============================================================================
// Key Exchange Properties
// ============================================================================

mod exchange_properties {
    use super::*;
    use courier_crypto::exchange::{
        KeyPair, Nonce, Seed, derive_decryption_key, derive_encryption_key,
    };

    proptest! {
        /// Same seed, same keypair; different seeds, different keypairs.
        #[test]
        fn deterministic_keypairs(
            seed_a in any::<[u8; 32]>(),
            seed_b in any::<[u8; 32]>(),
        ) {
            let a1 = KeyPair::from_seed(&Seed::from_bytes(seed_a));
            let a2 = KeyPair::from_seed(&Seed::from_bytes(seed_a));
            prop_assert_eq!(a1.public(), a2.public());

            if seed_a != seed_b {
                let b = KeyPair::from_seed(&Seed::from_bytes(seed_b));
                prop_assert_ne!(a1.public(), b.public());
            }
        }

        /// Sender and recipient always derive complementary keys and an
        /// identical proof, for any seeds and nonce.
        #[test]
        fn transmission_keys_complementary(
            sender_seed in any::<[u8; 32]>(),
            recipient_seed in any::<[u8; 32]>(),
            nonce_bytes in any::<[u8; 32]>(),
        ) {
            let sender = KeyPair::from_seed(&Seed::from_bytes(sender_seed));
            let recipient = KeyPair::from_seed(&Seed::from_bytes(recipient_seed));
            let nonce = Nonce::from_bytes(nonce_bytes);

            let (s_enc, s_proof) =
                derive_encryption_key(sender.private(), &recipient.public(), &nonce);
            let (s_dec, _) =
                derive_decryption_key(sender.private(), &recipient.public(), &nonce);
            let (r_enc, _) =
                derive_encryption_key(recipient.private(), &sender.public(), &nonce);
            let (r_dec, r_proof) =
                derive_decryption_key(recipient.private(), &sender.public(), &nonce);

            prop_assert_eq!(s_enc.as_bytes(), r_dec.as_bytes());
            prop_assert_eq!(s_dec.as_bytes(), r_enc.as_bytes());
            prop_assert_eq!(s_proof, r_proof);
        }

        /// The nonce separates domains: a different nonce yields different
        /// keys and a different proof.
        #[test]
        fn nonce_separates_transfers(
            sender_seed in any::<[u8; 32]>(),
            recipient_seed in any::<[u8; 32]>(),
            nonce_a in any::<[u8; 32]>(),
            nonce_b in any::<[u8; 32]>(),
        ) {
            prop_assume!(nonce_a != nonce_b);
            let sender = KeyPair::from_seed(&Seed::from_bytes(sender_seed));
            let recipient = KeyPair::from_seed(&Seed::from_bytes(recipient_seed));

            let (key_a, proof_a) = derive_encryption_key(
                sender.private(), &recipient.public(), &Nonce::from_bytes(nonce_a));
            let (key_b, proof_b) = derive_encryption_key(
                sender.private(), &recipient.public(), &Nonce::from_bytes(nonce_b));

            prop_assert_ne!(key_a.as_bytes(), key_b.as_bytes());
            prop_assert_ne!(proof_a, proof_b);
        }
    }
}

// ============================================================================
// Stream Cipher Properties
// ============================================================================

mod secretstream_properties {
    use super::*;
    use courier_crypto::exchange::{KeyPair, Nonce, Seed, derive_encryption_key};
    use courier_crypto::secretstream::{
        ChunkFlag, PullStream, PushStream, chunk_ciphertext_len,
    };
    use courier_crypto::TransmissionKey;

    fn key_from(seed: [u8; 32]) -> TransmissionKey {
        let sender = KeyPair::from_seed(&Seed::from_bytes(seed));
        let recipient = KeyPair::from_seed(&Seed::from_bytes([0x77; 32]));
        derive_encryption_key(sender.private(), &recipient.public(), &Nonce::from_bytes(seed)).0
    }

    proptest! {
        /// Push then pull restores every chunk sequence exactly, with the
        /// spec'd ciphertext size per chunk.
        #[test]
        fn chunked_roundtrip(
            key_seed in any::<[u8; 32]>(),
            chunks in proptest::collection::vec(
                proptest::collection::vec(any::<u8>(), 0..300), 1..8),
            pad_size in 1usize..128,
        ) {
            let key = key_from(key_seed);
            let (mut push, header) = PushStream::init(&key, pad_size).unwrap();
            let last = chunks.len() - 1;

            let mut ciphertexts = Vec::new();
            for (i, chunk) in chunks.iter().enumerate() {
                let flag = if i == last { ChunkFlag::Final } else { ChunkFlag::Message };
                let ct = push.push(chunk, flag).unwrap();
                prop_assert_eq!(ct.len(), chunk_ciphertext_len(chunk.len(), pad_size));
                ciphertexts.push(ct);
            }

            let mut pull = PullStream::init(&header, &key);
            for (i, ct) in ciphertexts.iter().enumerate() {
                let (plaintext, flag) = pull.pull(ct).unwrap();
                prop_assert_eq!(&plaintext, &chunks[i]);
                prop_assert_eq!(flag == ChunkFlag::Final, i == last);
            }
            prop_assert!(pull.is_finalized());
        }

        /// Any single-bit flip anywhere in a chunk breaks authentication.
        #[test]
        fn tamper_always_detected(
            key_seed in any::<[u8; 32]>(),
            plaintext in proptest::collection::vec(any::<u8>(), 0..200),
            byte_index in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let key = key_from(key_seed);
            let (mut push, header) = PushStream::init(&key, 16).unwrap();
            let mut ct = push.push(&plaintext, ChunkFlag::Final).unwrap();

            let i = byte_index.index(ct.len());
            ct[i] ^= 1 << bit;

            let mut pull = PullStream::init(&header, &key);
            prop_assert!(pull.pull(&ct).is_err());
        }
    }
}

// ============================================================================
// Stream Adapter Properties
// ============================================================================

mod adapter_properties {
    use super::*;
    use std::io::Cursor;

    use courier_streams::{DecryptionStream, EncryptionStream, encrypted_len};
    use courier_transfer::{DownloadHandshake, UploadHandshake};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Full pipeline roundtrip for arbitrary payloads and chunk/pad
        /// configurations, with the declared size always exact.
        #[test]
        fn pipeline_roundtrip(
            payload in proptest::collection::vec(any::<u8>(), 0..4096),
            max_read_size in 1usize..512,
            pad_size in 1usize..256,
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            rt.block_on(async {
                let material = UploadHandshake::new().seal().unwrap();
                let mut enc = EncryptionStream::new(
                    Cursor::new(payload.clone()),
                    payload.len() as u64,
                    &material.key,
                    max_read_size,
                    pad_size,
                )
                .unwrap();
                let ciphertext = enc.read_to_end().await.unwrap();
                prop_assert_eq!(
                    ciphertext.len() as u64,
                    encrypted_len(payload.len() as u64, max_read_size, pad_size)
                );

                let download = DownloadHandshake::new(
                    material.sender_public.unwrap(),
                    material.nonce,
                )
                .derive_from_seed(material.recipient_seed.as_ref().unwrap());

                let total = ciphertext.len() as u64;
                let mut dec = DecryptionStream::open(
                    Cursor::new(ciphertext),
                    total,
                    &download.key,
                    max_read_size,
                    pad_size,
                )
                .await
                .unwrap();
                prop_assert_eq!(dec.read_to_end().await.unwrap(), payload);
                Ok(())
            })?;
        }
    }
}
