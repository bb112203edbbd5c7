//! Benchmarks for CIF parsing performance.

use cif_parser::File;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sample_loop(rows: usize) -> String {
    let mut out = String::from("data_bench\nloop_\n_atom_site.id\n_atom_site.label\n_atom_site.x\n_atom_site.y\n_atom_site.z\n");
    for i in 0..rows {
        out.push_str(&format!("{i} C{i} 1.234 2.345 3.456\n"));
    }
    out
}

fn bench_parse_loop(c: &mut Criterion) {
    let content = sample_loop(5_000);
    c.bench_function("parse_loop_5000_rows", |b| {
        b.iter(|| {
            let file = File::load(black_box(&content)).expect("failed to parse");
            black_box(file)
        })
    });
}

fn bench_parse_and_save(c: &mut Criterion) {
    let content = sample_loop(1_000);
    c.bench_function("parse_and_save_1000_rows", |b| {
        b.iter(|| {
            let file = File::load(black_box(&content)).expect("failed to parse");
            black_box(file.save())
        })
    });
}

fn bench_index_datablocks(c: &mut Criterion) {
    let content = sample_loop(2_000);
    c.bench_function("index_datablocks", |b| {
        b.iter(|| black_box(File::index_datablocks(black_box(&content)).expect("failed to index")))
    });
}

criterion_group!(benches, bench_parse_loop, bench_parse_and_save, bench_index_datablocks);
criterion_main!(benches);
