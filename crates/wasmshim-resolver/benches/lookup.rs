//! Lookup benchmarks for the shim resolver.
//!
//! Compares cold lookups, which scan and decompress the archive, against
//! cached lookups.
//!
//! Run with:
//! ```bash
//! cargo bench --bench lookup
//! ```

#![allow(clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use wasmshim_formats::{ArchiveBuilder, ArchiveReader};
use wasmshim_resolver::{LookupTable, VersionResolver};

/// Build an archive with `variants` distinct shims of roughly shim size.
fn build_fixture(variants: usize) -> (LookupTable, ArchiveReader) {
    let mut builder = ArchiveBuilder::new();
    let mut pairs = Vec::with_capacity(variants);
    for i in 0..variants {
        let mut shim = format!("// wasm_exec.js variant {i}\n").into_bytes();
        let body = b"globalThis.Go = class { run(instance) { this._inst = instance; } };\n";
        shim.extend(body.repeat(256));
        pairs.push((format!("go1.{i}.0"), builder.add(shim)));
    }
    let archive = builder.build().expect("Failed to build benchmark archive");
    (LookupTable::from_pairs(pairs), ArchiveReader::new(archive.data))
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for variants in [1usize, 8, 32] {
        let (table, archive) = build_fixture(variants);
        let last = format!("go1.{}.0", variants - 1);

        group.bench_with_input(BenchmarkId::new("uncached", variants), &last, |b, version| {
            b.iter(|| {
                let resolver =
                    VersionResolver::new(table.clone(), archive.clone(), version.clone());
                black_box(resolver.current().expect("Lookup failed"))
            });
        });

        let resolver = VersionResolver::new(table, archive, last.clone());
        resolver.current().expect("Warm-up lookup failed");
        group.bench_with_input(BenchmarkId::new("cached", variants), &last, |b, version| {
            b.iter(|| black_box(resolver.content(black_box(version)).expect("Lookup failed")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lookup);
criterion_main!(benches);
