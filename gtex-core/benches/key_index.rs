use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gtex_core::{KeyIndex, Strategy};
use std::hint::black_box;

fn sample_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("GTEX-{:05}-{:04}-SM-{:05}", i * 7 % 99991, i % 1000, i)).collect()
}

/// Header lookups for every sample, as done when resolving group members.
fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_index_lookup");

    for n in [100usize, 1_000, 10_000] {
        let ids = sample_ids(n);
        group.throughput(Throughput::Elements(n as u64));

        for strategy in Strategy::ALL {
            // The linear scan is quadratic over a full resolution pass.
            if strategy == Strategy::Linear && n > 1_000 {
                continue;
            }
            let mut index: Box<dyn KeyIndex<String, usize>> = strategy.build_index();
            index
                .extend(ids.iter().cloned().enumerate().map(|(i, id)| (id, i)).collect())
                .unwrap();

            group.bench_with_input(BenchmarkId::new(strategy.as_str(), n), &ids, |b, ids| {
                b.iter(|| {
                    let mut hits = 0usize;
                    for id in ids.iter().rev() {
                        if index.lookup(black_box(id)).unwrap().is_some() {
                            hits += 1;
                        }
                    }
                    black_box(hits)
                })
            });
        }
    }

    group.finish();
}

/// Building an index from a full matrix header.
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_index_build");
    let ids = sample_ids(17_382);

    for strategy in Strategy::ALL {
        group.bench_function(strategy.as_str(), |b| {
            b.iter(|| {
                let mut index: Box<dyn KeyIndex<String, usize>> = strategy.build_index();
                index
                    .extend(ids.iter().cloned().enumerate().map(|(i, id)| (id, i)).collect())
                    .unwrap();
                black_box(index.len())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lookup, bench_build);
criterion_main!(benches);
