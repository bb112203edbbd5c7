//! Benchmarks for dictionary loading performance, against a synthetic,
//! generated DDL1/DDL2 dictionary (mirrors `cif-parser`'s own
//! `benches/parsing.rs`: a generated sample rather than an on-disk fixture).

use cif_validator::loader;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_dictionary(categories: usize, items_per_category: usize) -> String {
    let mut out = String::new();
    out.push_str("data_synthetic.dic\n_dictionary.title synthetic.dic\n_dictionary.version 1.0\n\n");
    out.push_str("loop_\n_item_type_list.code\n_item_type_list.primitive_code\n_item_type_list.construct\n");
    out.push_str("code char '[A-Za-z0-9_]*'\ntext char '.*'\nint  numb '[+-]?[0-9]+'\n\n");

    for c in 0..categories {
        let cat = format!("cat_{c}");
        out.push_str(&format!(
            "save_{cat}\n_category.id {cat}\n_category.mandatory_code no\n_category_key.name '_{cat}.id'\nsave_\n\n"
        ));
        out.push_str(&format!(
            "save__{cat}.id\n_item.name '_{cat}.id'\n_item.category_id {cat}\n_item.mandatory_code yes\n_item_type.code code\nsave_\n\n"
        ));
        for i in 0..items_per_category {
            out.push_str(&format!(
                "save__{cat}.field_{i}\n_item.name '_{cat}.field_{i}'\n_item.category_id {cat}\n_item.mandatory_code no\n_item_type.code text\nsave_\n\n"
            ));
        }
    }

    out
}

fn bench_load_small_dictionary(c: &mut Criterion) {
    let content = synthetic_dictionary(20, 10);
    c.bench_function("load_dictionary_20_categories", |b| {
        b.iter(|| {
            let dict = loader::load(black_box(&content)).expect("failed to load dictionary");
            black_box(dict)
        })
    });
}

fn bench_load_large_dictionary(c: &mut Criterion) {
    let content = synthetic_dictionary(200, 20);
    c.bench_function("load_dictionary_200_categories", |b| {
        b.iter(|| {
            let dict = loader::load(black_box(&content)).expect("failed to load dictionary");
            black_box(dict)
        })
    });
}

criterion_group!(benches, bench_load_small_dictionary, bench_load_large_dictionary);
criterion_main!(benches);
