//! Benchmarks for the canonical signing pipeline and wallet derivation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use ixo_client::config::DID_PREFIX;
use ixo_client::signing::{canonicalize, verify_envelope};
use ixo_client::wallet::{SignerRole, Wallet};

const FIXTURE: &str = "sun current mango evolve elite evolve slow inch used shoot dog soldier";

fn bench_wallet_derivation(c: &mut Criterion) {
    c.bench_function("wallet_from_mnemonic", |b| {
        b.iter(|| Wallet::from_mnemonic(black_box(FIXTURE), DID_PREFIX).unwrap())
    });
}

fn bench_canonicalization(c: &mut Criterion) {
    let payload = json!({
        "projectDid": "did:ixo:project1",
        "items": (0..32).map(|i| json!({ "id": i, "value": "x" })).collect::<Vec<_>>(),
        "meta": { "z": 1, "a": 2, "m": [1, 2, 3] },
    });
    c.bench_function("canonicalize_payload", |b| {
        b.iter(|| canonicalize(black_box(&payload)).unwrap())
    });
}

fn bench_agent_signing(c: &mut Criterion) {
    let wallet = Wallet::from_mnemonic(FIXTURE, DID_PREFIX).unwrap();
    let payload = json!({ "projectDid": "did:ixo:project1", "status": "STARTED" });

    c.bench_function("sign_agent_payload", |b| {
        b.iter(|| wallet.sign(SignerRole::Agent, black_box(&payload)).unwrap())
    });

    let envelope = wallet.sign(SignerRole::Agent, &payload).unwrap();
    c.bench_function("verify_agent_envelope", |b| {
        b.iter(|| verify_envelope(black_box(&envelope)).unwrap())
    });
}

fn bench_secp_signing(c: &mut Criterion) {
    let wallet = Wallet::from_mnemonic(FIXTURE, DID_PREFIX).unwrap();
    let payload = json!({ "msgs": [], "memo": "", "sequence": "7" });

    c.bench_function("sign_secp_payload", |b| {
        b.iter(|| wallet.sign(SignerRole::Secp, black_box(&payload)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_wallet_derivation,
    bench_canonicalization,
    bench_agent_signing,
    bench_secp_signing
);
criterion_main!(benches);
