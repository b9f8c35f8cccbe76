//! Micro benchmarks for the initializer completion path
//!
//! Every connect resolves immediately with an error, so these measure the
//! fan-out, aggregation, and completion overhead without socket I/O.
//!
//! Run with: cargo bench --bench initializer_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use wirepool::{
    Address, Connect, Connection, Error, Metrics, PoolManagerInitializer, PoolManagerSettings,
    Result,
};

struct Unreachable;

impl Connect for Unreachable {
    fn connect(
        &self,
        address: &Address,
        _protocol_version: u8,
        _settings: &PoolManagerSettings,
    ) -> BoxFuture<'static, Result<Connection>> {
        let reason = format!("{} unreachable", address);
        async move { Err(Error::Connection(reason)) }.boxed()
    }
}

struct NoMetrics;

impl Metrics for NoMetrics {}

fn initialize_benchmarks(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .expect("runtime");

    let mut group = c.benchmark_group("initialize");

    for hosts in [1usize, 16, 128] {
        let addresses: Vec<Address> = (0..hosts)
            .map(|i| Address::new(format!("10.0.{}.{}", i / 256, i % 256), 9042))
            .collect();

        group.throughput(Throughput::Elements(hosts as u64));
        group.bench_with_input(BenchmarkId::new("all_failed", hosts), &addresses, |b, addrs| {
            b.to_async(&runtime).iter(|| async {
                let init = PoolManagerInitializer::new(
                    tokio::runtime::Handle::current(),
                    4,
                    |init| {
                        black_box(init.failures().len());
                    },
                )
                .with_connector(Arc::new(Unreachable))
                .with_metrics(Arc::new(NoMetrics))
                .initialize(addrs.clone());
                init.completed().await;
            });
        });
    }

    group.finish();
}

fn address_parse_benchmarks(c: &mut Criterion) {
    let list = (1..=64)
        .map(|i| format!("10.0.0.{}:9042", i))
        .collect::<Vec<_>>()
        .join(",");

    c.bench_function("address_parse_list_64", |b| {
        b.iter(|| Address::parse_list(black_box(&list), 9042))
    });
}

criterion_group!(benches, initialize_benchmarks, address_parse_benchmarks);
criterion_main!(benches);
