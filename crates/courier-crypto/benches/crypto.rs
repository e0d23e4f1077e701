//! Throughput benchmarks for the chunked stream cipher and key derivation.

use courier_crypto::exchange::{derive_encryption_key, KeyPair, Nonce, Seed};
use courier_crypto::secretstream::{ChunkFlag, PullStream, PushStream};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn bench_push_pull(c: &mut Criterion) {
    let sender = KeyPair::from_seed(&Seed::from_bytes([1u8; 32]));
    let recipient = KeyPair::from_seed(&Seed::from_bytes([2u8; 32]));
    let nonce = Nonce::from_bytes([3u8; 32]);
    let (key, _) = derive_encryption_key(sender.private(), &recipient.public(), &nonce);

    let chunk = vec![0xAAu8; 64 * 1024];

    let mut group = c.benchmark_group("secretstream");
    group.throughput(Throughput::Bytes(chunk.len() as u64));

    group.bench_function("push_64k", |b| {
        let (mut push, _) = PushStream::init(&key, 256).unwrap();
        b.iter(|| black_box(push.push(&chunk, ChunkFlag::Message).unwrap()));
    });

    group.bench_function("push_pull_64k", |b| {
        b.iter(|| {
            let (mut push, header) = PushStream::init(&key, 256).unwrap();
            let ct = push.push(&chunk, ChunkFlag::Final).unwrap();
            let mut pull = PullStream::init(&header, &key);
            black_box(pull.pull(&ct).unwrap())
        });
    });

    group.finish();
}

fn bench_key_derivation(c: &mut Criterion) {
    let sender = KeyPair::from_seed(&Seed::from_bytes([1u8; 32]));
    let recipient = KeyPair::from_seed(&Seed::from_bytes([2u8; 32]));
    let nonce = Nonce::from_bytes([3u8; 32]);

    c.bench_function("derive_encryption_key", |b| {
        b.iter(|| black_box(derive_encryption_key(sender.private(), &recipient.public(), &nonce)))
    });
}

criterion_group!(benches, bench_push_pull, bench_key_derivation);
criterion_main!(benches);
