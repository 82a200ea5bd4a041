//! Ingest throughput, sequential vs parallel.
//!
//! Run with: cargo bench --bench ingest

use clickstream::testing::{fixture_bytes, well_formed_lines};
use clickstream::{summarize, ExecMode, IngestConfig, ParseSession};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const LINES: usize = 200_000;

fn bench_ingest(c: &mut Criterion) {
    let data = fixture_bytes(&well_formed_lines(LINES));
    let mut group = c.benchmark_group("ingest");
    group.throughput(Throughput::Bytes(data.len() as u64));

    let modes = [
        ("sequential", ExecMode::Sequential),
        ("parallel", ExecMode::Parallel { threads: None, chunks: None }),
    ];
    for (name, mode) in modes {
        let config = IngestConfig::default()
            .with_capacity_hint(LINES)
            .with_exec_mode(mode);
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut session = ParseSession::new(config.clone()).expect("reserve");
                let stats = session.ingest_bytes(black_box(&data));
                black_box(stats.accepted)
            })
        });
    }
    group.finish();
}

fn bench_summarize(c: &mut Criterion) {
    let data = fixture_bytes(&well_formed_lines(LINES));
    let mut session = ParseSession::new(IngestConfig::default().with_capacity_hint(LINES)).expect("reserve");
    session.ingest_bytes(&data);

    c.bench_function("summarize", |b| b.iter(|| summarize(black_box(session.events()))));
}

criterion_group!(benches, bench_ingest, bench_summarize);
criterion_main!(benches);
