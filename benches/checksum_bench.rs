// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reqwest::header::HeaderMap;
use secure_requests::certificate::{parse_checksum, sha256_hex};
use secure_requests::http::default_headers;
use secure_requests::status::StatusError;

fn digest_benchmark(c: &mut Criterion) {
    // roughly the size of the curl.se bundle
    let bundle = vec![b'A'; 220 * 1024];

    c.bench_function("sha256_bundle", |b| {
        b.iter(|| black_box(sha256_hex(black_box(&bundle))))
    });

    let listing = format!("{}  cacert.pem\n", sha256_hex(&bundle));
    c.bench_function("parse_checksum", |b| {
        b.iter(|| black_box(parse_checksum(black_box(&listing))))
    });
}

fn header_benchmark(c: &mut Criterion) {
    let custom = HeaderMap::new();

    c.bench_function("default_headers", |b| {
        b.iter(|| black_box(default_headers(black_box(&custom))))
    });
}

fn status_benchmark(c: &mut Criterion) {
    let codes = [200u16, 404, 418, 429, 503, 599];

    c.bench_function("status_check", |b| {
        b.iter(|| {
            for code in codes {
                black_box(StatusError::check(code, "https://example.com", ""));
            }
        })
    });
}

criterion_group!(benches, digest_benchmark, header_benchmark, status_benchmark);
criterion_main!(benches);
