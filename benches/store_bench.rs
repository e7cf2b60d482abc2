//! Benchmarks for flattree store operations

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use flattree::snapshot::{decode, encode};
use flattree::TreeStore;

/// A wide, two-level tree: `fanout` children under root, each with `fanout` leaves
fn build_store(fanout: u32) -> TreeStore {
    let mut store = TreeStore::new("root");
    for i in 0..fanout {
        let dir = store.add_dir(0, format!("d{}", i)).unwrap();
        for j in 0..fanout {
            let leaf = store.add_dir(dir, format!("l{}", j)).unwrap();
            store.add_file(leaf, "f", j).unwrap();
        }
    }
    store
}

fn store_benchmarks(c: &mut Criterion) {
    let store = build_store(32);
    let last = store.dir_entries().last().unwrap().id;

    c.bench_function("position_of", |b| {
        b.iter(|| store.position_of(black_box(last)).unwrap())
    });

    c.bench_function("parent_of", |b| {
        b.iter(|| store.parent_of(black_box(last)).unwrap())
    });

    c.bench_function("file_offset", |b| {
        b.iter(|| store.file_offset(black_box(last)).unwrap())
    });

    c.bench_function("add_dir_front_run", |b| {
        b.iter_batched(
            || store.clone(),
            |mut s| s.add_dir(0, "new").unwrap(),
            BatchSize::SmallInput,
        )
    });

    c.bench_function("rem_dir_subtree", |b| {
        let first_child = store.child_ids(0).unwrap()[0];
        b.iter_batched(
            || store.clone(),
            |mut s| s.rem_dir(first_child).unwrap(),
            BatchSize::SmallInput,
        )
    });

    let bytes = encode(&store);
    c.bench_function("snapshot_decode", |b| b.iter(|| decode(black_box(&bytes)).unwrap()));
}

criterion_group!(benches, store_benchmarks);
criterion_main!(benches);
