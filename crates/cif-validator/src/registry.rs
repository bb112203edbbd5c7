//! A process-wide, mutex-protected registry of loaded dictionaries, keyed
//! by name — the one piece of shared mutable state the concurrency model
//! allows (§5), grounded directly on `validator_factory` in
//! `original_source/include/cif++/validate.hpp`: a singleton holding a
//! mutex and a list of already-constructed validators, so that loading the
//! same dictionary twice from different call sites returns the same
//! immutable instance instead of re-parsing it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::error::Result;
use crate::types::Dictionary;

struct Registry {
    dictionaries: Mutex<HashMap<String, Arc<Dictionary>>>,
}

fn registry() -> &'static Registry {
    static INSTANCE: OnceLock<Registry> = OnceLock::new();
    INSTANCE.get_or_init(|| Registry {
        dictionaries: Mutex::new(HashMap::new()),
    })
}

/// Returns the dictionary registered under `name`, if any has been
/// [`register`]ed yet.
pub fn get(name: &str) -> Option<Arc<Dictionary>> {
    registry().dictionaries.lock().unwrap().get(&crate::norm(name)).cloned()
}

/// Parses `text` as a dictionary and registers it under `name`, returning
/// the already-registered instance instead of re-parsing if `name` is
/// already present — dictionaries are immutable once built, so the first
/// load wins.
pub fn construct(name: &str, text: &str) -> Result<Arc<Dictionary>> {
    let mut guard = registry().dictionaries.lock().unwrap();
    if let Some(existing) = guard.get(&crate::norm(name)) {
        return Ok(existing.clone());
    }
    let dict = Arc::new(crate::loader::load(text)?);
    guard.insert(crate::norm(name), dict.clone());
    Ok(dict)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICT: &str = r#"
data_test_dict.dic
loop_
_item_type_list.code
_item_type_list.primitive_code
_item_type_list.construct
code char '.*'

save_cat_1
_category.id cat_1
_category_key.name '_cat_1.id'
save_

save__cat_1.id
_item.name '_cat_1.id'
_item.category_id cat_1
_item.mandatory_code yes
_item_type.code code
save_
"#;

    #[test]
    fn construct_is_idempotent_by_name() {
        let a = construct("registry_test_dict", DICT).unwrap();
        let b = construct("registry_test_dict", "data_other\n").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(get("REGISTRY_TEST_DICT").is_some());
    }
}
