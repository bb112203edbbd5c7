//! Performance sanity checks for dictionary loading against a synthetic,
//! generated DDL1/DDL2 dictionary (the workspace vendors no full core
//! dictionary, so size is scaled up from a small hand-written one instead
//! of loading a fixture off disk).
//!
//! These aren't tight bounds — just a trip wire against an accidental
//! quadratic blowup in the loader's save-frame scan.

use std::time::{Duration, Instant};

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

#[test]
fn loading_a_moderately_large_dictionary_stays_well_under_a_second() {
    let text = synthetic_dictionary(80, 20);

    let start = Instant::now();
    let dict = cif_validator::loader::load(&text).expect("failed to load synthetic dictionary");
    let elapsed = start.elapsed();

    assert_eq!(dict.categories.len(), 80);
    assert!(dict.categories.values().all(|c| c.items.len() == 21));

    assert!(elapsed < Duration::from_secs(1), "dictionary loading took too long: {elapsed:?}");
}

#[test]
fn registry_construct_is_idempotent_under_repeated_lookup() {
    let text = synthetic_dictionary(10, 5);

    let start = Instant::now();
    for _ in 0..50 {
        cif_validator::registry::construct("performance_test_dict", &text).unwrap();
    }
    let elapsed = start.elapsed();

    assert!(elapsed < Duration::from_secs(1), "repeated registry lookups took too long: {elapsed:?}");
}
