//! Throughput Benchmark for metaflags
//!
//! This benchmark measures flag string building and response flag decoding.

use bytes::BytesMut;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use metaflags::protocol::{build_meta_flags, parse_meta_flags, FlagDirective, MetaFlags, Mode};

/// Benchmark flag string building
fn bench_build(c: &mut Criterion) {
    let get_flags = vec![
        FlagDirective::value(),
        FlagDirective::cas(),
        FlagDirective::client_flags(),
        FlagDirective::ttl(),
        FlagDirective::opaque("req-000001"),
    ];

    let set_flags: MetaFlags = vec![
        FlagDirective::set_flags(42),
        FlagDirective::set_ttl(3600),
        FlagDirective::compare_cas(1_234_567_890),
        FlagDirective::mode(Mode::Replace),
        FlagDirective::quiet(),
    ]
    .into_iter()
    .collect();

    let mut group = c.benchmark_group("build");
    group.throughput(Throughput::Elements(1));

    group.bench_function("build_get_flags", |b| {
        b.iter(|| black_box(build_meta_flags(black_box(&get_flags))));
    });

    group.bench_function("build_into_buffer", |b| {
        let mut buf = BytesMut::with_capacity(256);
        b.iter(|| {
            buf.clear();
            set_flags.build_into(&mut buf);
            black_box(buf.len());
        });
    });

    group.bench_function("construct_and_build", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let flags = MetaFlags::with_capacity(3)
                .with(FlagDirective::vivify(30))
                .with(FlagDirective::recache(i))
                .with(FlagDirective::opaque(format!("o{}", i)));
            black_box(flags.build());
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark response flag decoding
fn bench_parse(c: &mut Criterion) {
    let short = ["c4821", "t300"];
    let full = [
        "W", "X", "kuser:101", "Oreq-000001", "c9876543210", "f7", "h1", "l12", "s1024", "t3600",
    ];

    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Elements(1));

    group.bench_function("parse_short", |b| {
        b.iter(|| black_box(parse_meta_flags(black_box(&short))));
    });

    group.bench_function("parse_full", |b| {
        b.iter(|| black_box(parse_meta_flags(black_box(&full))));
    });

    group.bench_function("parse_unknown_flag", |b| {
        let tokens = ["c1", "t2", "Q"];
        b.iter(|| black_box(parse_meta_flags(black_box(&tokens))));
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_parse);
criterion_main!(benches);
