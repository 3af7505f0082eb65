use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polytrade_api::middleware::auth::{create_jwt, verify_jwt};
use polytrade_api::services::{hash_password, verify_password};

fn benchmark_session_tokens(c: &mut Criterion) {
    let key = b"bench_signing_key_32_bytes_long!!";
    let token = create_jwt(42, "trader@example.com", key).expect("Failed to create JWT");

    let mut group = c.benchmark_group("session_tokens");

    group.bench_function("create_jwt", |b| {
        b.iter(|| create_jwt(black_box(42), black_box("trader@example.com"), key))
    });

    group.bench_function("verify_jwt", |b| {
        b.iter(|| verify_jwt(black_box(&token), key))
    });

    group.finish();
}

fn benchmark_password_verify(c: &mut Criterion) {
    let hash = hash_password("correct horse battery staple").expect("Failed to hash");

    let mut group = c.benchmark_group("password");
    group.sample_size(10);

    group.bench_function("verify_password", |b| {
        b.iter(|| verify_password(black_box("correct horse battery staple"), &hash))
    });

    group.finish();
}

criterion_group!(benches, benchmark_session_tokens, benchmark_password_verify);
criterion_main!(benches);
