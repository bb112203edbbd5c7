//! In-memory relational table (§4.4.2-§4.4.4): a CIF category is an arena
//! of rows plus, when the category has key items, a red-black index for
//! uniqueness checking and ordered traversal.

use std::collections::HashMap;

use super::condition::{Condition, Context};
use super::index::RbIndex;
use super::row::{Field, RowId, Slot};
use crate::error::{CifError, Result};
use crate::text::PrimitiveType;

/// One CIF category (table): a loop or a single-row set of `_category.item`
/// tag/value pairs, modelled identically once parsed.
pub struct Category {
    name: String,
    item_names: Vec<String>,
    key_items: Vec<String>,
    /// Primitive type per item, populated from the attached dictionary's
    /// item validators (§4.5.1); items with no entry compare as `Char`.
    item_types: HashMap<String, PrimitiveType>,
    rows: Vec<Slot>,
    free: Vec<usize>,
    index: RbIndex<Vec<String>, usize>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Category {
            name: name.into(),
            item_names: Vec::new(),
            key_items: Vec::new(),
            item_types: HashMap::new(),
            rows: Vec::new(),
            free: Vec::new(),
            index: RbIndex::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn item_names(&self) -> &[String] {
        &self.item_names
    }

    pub fn key_items(&self) -> &[String] {
        &self.key_items
    }

    /// Sets the category's key items. Called once a dictionary attaches a
    /// schema (or explicitly by a caller building a document by hand); has
    /// no effect on rows already present beyond making subsequent
    /// `emplace`/`set_value` calls key-aware.
    pub fn set_key_items(&mut self, items: Vec<String>) {
        self.key_items = items;
    }

    /// Records `item`'s primitive type (§4.1), consulted by the index
    /// comparator and by the condition DSL's ordering comparisons. Called
    /// by [`super::datablock::Datablock::attach_schema`] when a dictionary
    /// is attached.
    pub fn set_item_type(&mut self, item: &str, ty: PrimitiveType) {
        self.item_types.insert(item.to_string(), ty);
    }

    pub fn item_type(&self, item: &str) -> PrimitiveType {
        self.item_types.get(item).copied().unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len() - self.free.len()
    }

    fn register_item(&mut self, name: &str) {
        if !self.item_names.iter().any(|n| n == name) {
            self.item_names.push(name.to_string());
        }
    }

    fn key_tuple(&self, values: &[(String, Field)]) -> Option<Vec<String>> {
        if self.key_items.is_empty() {
            return None;
        }
        Some(
            self.key_items
                .iter()
                .map(|k| {
                    values
                        .iter()
                        .find(|(n, _)| n == k)
                        .map(|(_, f)| f.as_text().to_string())
                        .unwrap_or_default()
                })
                .collect(),
        )
    }

    /// Inserts a new row. Returns a [`CifError::DuplicateKey`] if the
    /// category has key items and another row already has the same key
    /// tuple (§4.4.2 uniqueness invariant).
    pub fn emplace(&mut self, values: impl IntoIterator<Item = (String, Field)>) -> Result<RowId> {
        let values: Vec<(String, Field)> = values.into_iter().collect();
        for (name, _) in &values {
            self.register_item(name);
        }

        let key = self.key_tuple(&values);
        let cmp = key_tuple_cmp(&self.key_items, &self.item_types);
        if let Some(key) = &key {
            if self.index.contains_key(key, &cmp) {
                return Err(CifError::DuplicateKey {
                    category: self.name.clone(),
                    key: key.join(","),
                });
            }
        }

        let (slot_index, generation) = if let Some(free_index) = self.free.pop() {
            let slot = &mut self.rows[free_index];
            slot.generation += 1;
            slot.data = Some(values);
            (free_index, slot.generation)
        } else {
            self.rows.push(Slot {
                generation: 0,
                data: Some(values),
            });
            (self.rows.len() - 1, 0)
        };

        if let Some(key) = key {
            self.index.insert(key, slot_index, &cmp);
        }

        Ok(RowId {
            index: slot_index,
            generation,
        })
    }

    fn slot(&self, id: RowId) -> Option<&Vec<(String, Field)>> {
        self.rows
            .get(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.data.as_ref())
    }

    fn slot_mut(&mut self, id: RowId) -> Option<&mut Vec<(String, Field)>> {
        self.rows
            .get_mut(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.data.as_mut())
    }

    pub fn get_value(&self, id: RowId, item: &str) -> Option<&Field> {
        self.slot(id)?.iter().find(|(n, _)| n == item).map(|(_, f)| f)
    }

    /// Every item/value pair stored on a row, in the order they were first
    /// written — used by the serializer and by the cascade engine's
    /// deep-copy-on-split.
    pub fn row_items(&self, id: RowId) -> Option<&[(String, Field)]> {
        self.slot(id).map(|v| v.as_slice())
    }

    /// All currently-live row ids, in arena order (not key order).
    pub fn row_ids(&self) -> Vec<RowId> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, s)| s.data.is_some())
            .map(|(index, s)| RowId {
                index,
                generation: s.generation,
            })
            .collect()
    }

    /// Row ids in key order, via the red-black index. Falls back to arena
    /// order for a keyless category.
    pub fn row_ids_in_key_order(&self) -> Vec<RowId> {
        if self.key_items.is_empty() {
            return self.row_ids();
        }
        self.index
            .iter()
            .map(|(_, &slot_index)| RowId {
                index: slot_index,
                generation: self.rows[slot_index].generation,
            })
            .collect()
    }

    /// Finds every live row matching `condition`, in insertion order (§4.4.3
    /// — iteration order is insertion order, not index order).
    pub fn find(&self, condition: &Condition) -> Vec<RowId> {
        let primitive_type = |name: &str| self.item_type(name);
        self.row_ids()
            .into_iter()
            .filter(|&id| {
                let row = self.slot(id).expect("row_ids only returns live rows");
                let get = |name: &str| row.iter().find(|(n, _)| n == name).map(|(_, f)| f.clone());
                let all = || row.clone();
                condition.matches(&Context {
                    get: &get,
                    all: &all,
                    primitive_type: &primitive_type,
                })
            })
            .collect()
    }

    /// Like [`Category::find`], but requires exactly one hit (§4.4.3).
    pub fn find1(&self, condition: &Condition) -> Result<RowId> {
        let mut hits = self.find(condition);
        if hits.len() != 1 {
            return Err(CifError::NotExactlyOne {
                category: self.name.clone(),
                count: hits.len(),
            });
        }
        Ok(hits.pop().unwrap())
    }

    /// Sets `item`'s value on the single row matching `condition` (§6). A
    /// schema-unaware shorthand for `find1` + `set_value`; callers that need
    /// validation and cascade should go through
    /// [`super::datablock::Datablock::update_value`] instead.
    pub fn update_value(&mut self, condition: &Condition, item: &str, value: Field) -> Result<RowId> {
        let id = self.find1(condition)?;
        self.set_value(id, item, value)?;
        Ok(id)
    }

    /// A typed view over a fixed set of columns (§6's `rows<T...>`):
    /// `tags.len()` must match `T`'s arity. Missing/null/empty fields yield
    /// `None` for each `Option<U>` component.
    pub fn rows<T: RowTuple>(&self, tags: &[&str]) -> Vec<T> {
        self.row_ids_in_key_order()
            .into_iter()
            .map(|id| T::from_row(self, id, tags))
            .collect()
    }

    /// Sets `item`'s value on an existing row. Returns `true` if `item` is
    /// part of the category's key (the caller — typically
    /// [`super::datablock::Datablock::assign`] — must then re-check
    /// uniqueness and consider cascading the rename to child categories).
    pub fn set_value(&mut self, id: RowId, item: &str, value: Field) -> Result<bool> {
        let is_key = self.key_items.iter().any(|k| k == item);

        if is_key {
            let cmp = key_tuple_cmp(&self.key_items, &self.item_types);
            let old_key = self.slot(id).and_then(|row| self.key_tuple(row));
            let mut new_row = self.slot(id).cloned().ok_or(CifError::RowNotFound)?;
            if let Some((_, f)) = new_row.iter_mut().find(|(n, _)| n == item) {
                *f = value.clone();
            } else {
                new_row.push((item.to_string(), value.clone()));
            }
            let new_key = self.key_tuple(&new_row);

            let unchanged = matches!(
                (&new_key, &old_key),
                (Some(n), Some(o)) if cmp(n, o) == std::cmp::Ordering::Equal
            );
            if let Some(new_key) = &new_key {
                if !unchanged && self.index.contains_key(new_key, &cmp) {
                    return Err(CifError::DuplicateKey {
                        category: self.name.clone(),
                        key: new_key.join(","),
                    });
                }
            }

            if !unchanged {
                if let Some(old_key) = old_key {
                    self.index.remove(&old_key, &cmp);
                }
                if let Some(new_key) = new_key {
                    self.index.insert(new_key, id.index, &cmp);
                }
            }
        }

        self.register_item(item);
        let row = self.slot_mut(id).ok_or(CifError::RowNotFound)?;
        if let Some((_, f)) = row.iter_mut().find(|(n, _)| n == item) {
            *f = value;
        } else {
            row.push((item.to_string(), value));
        }
        Ok(is_key)
    }

    /// Removes every row matching `condition`, returning the erased row
    /// ids so a caller orchestrating a cascade (see
    /// [`super::datablock::Datablock::erase`]) can look up their former
    /// key values before the slots are gone.
    pub fn erase(&mut self, condition: &Condition) -> Vec<(RowId, Vec<(String, Field)>)> {
        let ids = self.find(condition);
        let cmp = key_tuple_cmp(&self.key_items, &self.item_types);
        let mut erased = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(key) = self.slot(id).and_then(|row| self.key_tuple(row)) {
                self.index.remove(&key, &cmp);
            }
            let slot = &mut self.rows[id.index];
            let data = slot.data.take().expect("find() only returns live rows");
            slot.generation += 1;
            self.free.push(id.index);
            erased.push((id, data));
        }
        erased
    }

    /// Removes exactly the given row ids (stale ids are silently ignored),
    /// returning their former key/value pairs — the explicit-id sibling of
    /// [`Category::erase`], used when the caller has already identified
    /// which rows to remove (e.g. [`super::datablock::Datablock::erase_orphans`]).
    pub fn erase_ids(&mut self, ids: &[RowId]) -> Vec<(RowId, Vec<(String, Field)>)> {
        let cmp = key_tuple_cmp(&self.key_items, &self.item_types);
        let mut erased = Vec::with_capacity(ids.len());
        for &id in ids {
            if self.slot(id).is_none() {
                continue;
            }
            if let Some(key) = self.slot(id).and_then(|row| self.key_tuple(row)) {
                self.index.remove(&key, &cmp);
            }
            let slot = &mut self.rows[id.index];
            let data = slot.data.take().expect("checked live above");
            slot.generation += 1;
            self.free.push(id.index);
            erased.push((id, data));
        }
        erased
    }

    pub fn clear(&mut self) -> usize {
        let count = self.row_count();
        self.erase(&Condition::All);
        count
    }

    /// Generates a short base-26 identifier (`A`, `B`, ..., `Z`, `AA`, ...)
    /// not already used as a value of `key_item` in this category, mirroring
    /// `category::get_unique_id` in `original_source/src/category.cpp`
    /// (used there to mint fresh `asym_id`/`entity_id` values).
    pub fn new_unique_id(&self, key_item: &str) -> String {
        let used: std::collections::HashSet<String> = self
            .row_ids()
            .into_iter()
            .filter_map(|id| self.get_value(id, key_item))
            .map(|f| f.as_text().to_string())
            .collect();

        let mut n: u64 = 0;
        loop {
            let candidate = base26(n);
            if !used.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// A fixed-arity tuple of per-column typed values, produced by
/// [`Category::rows`] from a row id and an ordered list of tags. Mirrors
/// `Category::rows<T...>` from §6: each component is independently parsed
/// via `FromStr`, yielding `None` for an absent, null, or empty field.
pub trait RowTuple: Sized {
    fn from_row(cat: &Category, id: RowId, tags: &[&str]) -> Self;
}

macro_rules! impl_row_tuple {
    ($($T:ident : $idx:expr),+ $(,)?) => {
        impl<$($T: std::str::FromStr),+> RowTuple for ($(Option<$T>,)+) {
            fn from_row(cat: &Category, id: RowId, tags: &[&str]) -> Self {
                (
                    $(
                        super::row::field_as_option::<$T>(cat.get_value(id, tags[$idx])).unwrap_or(None),
                    )+
                )
            }
        }
    };
}

impl_row_tuple!(A: 0);
impl_row_tuple!(A: 0, B: 1);
impl_row_tuple!(A: 0, B: 1, C: 2);
impl_row_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

/// Builds a key-tuple comparator from `key_items`/`item_types` without
/// borrowing the rest of `Category`, so it can be held alongside a mutable
/// borrow of `self.index` (disjoint field capture, per §4.4.4/§9).
fn key_tuple_cmp<'a>(
    key_items: &'a [String],
    item_types: &'a HashMap<String, PrimitiveType>,
) -> impl Fn(&Vec<String>, &Vec<String>) -> std::cmp::Ordering + 'a {
    move |a: &Vec<String>, b: &Vec<String>| {
        for (i, key_item) in key_items.iter().enumerate() {
            let ty = item_types.get(key_item).copied().unwrap_or_default();
            let ord = crate::text::compare_values(&a[i], &b[i], ty);
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    }
}

fn base26(mut n: u64) -> String {
    let mut digits = Vec::new();
    loop {
        digits.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    digits.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::condition::key;

    fn row(pairs: &[(&str, &str)]) -> Vec<(String, Field)> {
        pairs.iter().map(|(n, v)| (n.to_string(), Field::from(*v))).collect()
    }

    #[test]
    fn emplace_and_lookup() {
        let mut cat = Category::new("atom_site");
        cat.set_key_items(vec!["id".to_string()]);
        let id1 = cat.emplace(row(&[("id", "1"), ("label", "CA")])).unwrap();
        let id2 = cat.emplace(row(&[("id", "2"), ("label", "CB")])).unwrap();
        assert_ne!(id1, id2);
        assert_eq!(cat.get_value(id1, "label").unwrap().as_text(), "CA");
        assert_eq!(cat.row_count(), 2);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut cat = Category::new("atom_site");
        cat.set_key_items(vec!["id".to_string()]);
        cat.emplace(row(&[("id", "1")])).unwrap();
        let err = cat.emplace(row(&[("id", "1")])).unwrap_err();
        assert!(matches!(err, CifError::DuplicateKey { .. }));
    }

    #[test]
    fn erase_frees_slot_for_reuse() {
        let mut cat = Category::new("atom_site");
        cat.set_key_items(vec!["id".to_string()]);
        let id1 = cat.emplace(row(&[("id", "1")])).unwrap();
        cat.erase(&key("id").eq("1"));
        assert_eq!(cat.row_count(), 0);
        assert!(cat.get_value(id1, "id").is_none());

        let id2 = cat.emplace(row(&[("id", "2")])).unwrap();
        assert_eq!(id2.index, id1.index);
        assert_ne!(id2.generation, id1.generation);
    }

    #[test]
    fn rename_key_checks_uniqueness() {
        let mut cat = Category::new("atom_site");
        cat.set_key_items(vec!["id".to_string()]);
        let id1 = cat.emplace(row(&[("id", "1")])).unwrap();
        cat.emplace(row(&[("id", "2")])).unwrap();
        let err = cat.set_value(id1, "id", Field::from("2")).unwrap_err();
        assert!(matches!(err, CifError::DuplicateKey { .. }));
    }

    #[test]
    fn rename_key_updates_index() {
        let mut cat = Category::new("atom_site");
        cat.set_key_items(vec!["id".to_string()]);
        let id1 = cat.emplace(row(&[("id", "1")])).unwrap();
        cat.set_value(id1, "id", Field::from("9")).unwrap();
        assert_eq!(cat.get_value(id1, "id").unwrap().as_text(), "9");
        assert!(cat.find(&key("id").eq("1")).is_empty());
        assert_eq!(cat.find(&key("id").eq("9")).len(), 1);
    }

    #[test]
    fn update_value_finds_the_one_matching_row() {
        let mut cat = Category::new("atom_site");
        cat.set_key_items(vec!["id".to_string()]);
        let id = cat.emplace(row(&[("id", "1"), ("label", "CA")])).unwrap();
        cat.update_value(&key("id").eq("1"), "label", Field::from("CB")).unwrap();
        assert_eq!(cat.get_value(id, "label").unwrap().as_text(), "CB");
    }

    #[test]
    fn typed_rows_parse_columns_and_treat_nulls_as_none() {
        let mut cat = Category::new("atom_site");
        cat.emplace(row(&[("id", "1"), ("occupancy", "0.5")])).unwrap();
        cat.emplace(row(&[("id", "2"), ("occupancy", "?")])).unwrap();
        let rows: Vec<(Option<u32>, Option<f64>)> = cat.rows(&["id", "occupancy"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], (Some(1), Some(0.5)));
        assert_eq!(rows[1], (Some(2), None));
    }

    #[test]
    fn numeric_key_duplicate_detection_ignores_leading_zeros() {
        // §4.4.4/§9: the index compares keys with the dictionary's
        // primitive-type rule, not plain string equality, so "01" and "1"
        // must collide under a Numb-typed key.
        let mut cat = Category::new("cat_1");
        cat.set_key_items(vec!["id".to_string()]);
        cat.set_item_type("id", PrimitiveType::Numb);
        cat.emplace(row(&[("id", "1")])).unwrap();
        let err = cat.emplace(row(&[("id", "01")])).unwrap_err();
        assert!(matches!(err, CifError::DuplicateKey { .. }));
    }

    #[test]
    fn unique_id_generation_skips_used_letters() {
        let mut cat = Category::new("struct_asym");
        cat.set_key_items(vec!["id".to_string()]);
        cat.emplace(row(&[("id", "A")])).unwrap();
        cat.emplace(row(&[("id", "B")])).unwrap();
        assert_eq!(cat.new_unique_id("id"), "C");
    }
}
