//! Benchmarks for bcr-server components.

use std::hint::black_box;
use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue};
use bcr_server::{RateLimiter, client_id};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn bench_rate_limiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("rate_limiter");

    // A full window means every call prunes and scans the client's history.
    for limit in [100u32, 1000, 10000] {
        let limiter = RateLimiter::new(limit, Duration::from_secs(60));
        for _ in 0..limit {
            limiter.allow("203.0.113.1");
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(limit),
            &limiter,
            |b, limiter| b.iter(|| black_box(limiter.allow(black_box("203.0.113.1")))),
        );
    }

    group.finish();
}

fn bench_rate_limiter_many_clients(c: &mut Criterion) {
    let limiter = RateLimiter::new(10000, Duration::from_secs(60));
    let clients: Vec<String> = (0..=255u8).map(|i| format!("10.0.0.{i}")).collect();

    c.bench_function("rate_limiter_many_clients", |b| {
        let mut counter = 0usize;
        b.iter(|| {
            counter = counter.wrapping_add(1);
            let client = &clients[counter % clients.len()];
            black_box(limiter.allow(black_box(client)))
        })
    });
}

fn bench_client_id(c: &mut Criterion) {
    let peer: SocketAddr = "192.0.2.7:51000".parse().unwrap();
    let mut forwarded = HeaderMap::new();
    forwarded.insert(
        "x-forwarded-for",
        HeaderValue::from_static("203.0.113.50, 70.41.3.18, 150.172.238.178"),
    );
    let empty = HeaderMap::new();

    c.bench_function("client_id_forwarded", |b| {
        b.iter(|| black_box(client_id(black_box(&forwarded), Some(peer), true)))
    });
    c.bench_function("client_id_peer", |b| {
        b.iter(|| black_box(client_id(black_box(&empty), Some(peer), true)))
    });
}

criterion_group!(
    benches,
    bench_rate_limiter,
    bench_rate_limiter_many_clients,
    bench_client_id,
);

criterion_main!(benches);
