//! Datablocks (§3) and the cascade engine (§4.4.6/§4.4.7): the mutation
//! entry points that consult an attached [`crate::schema::Schema`] to
//! validate a write and to propagate parent/child link changes.
//!
//! The cascade logic is modelled as a work queue of `(category, row)`
//! jobs with a visited set, per §9's "cascade engine as message passing"
//! design note — this keeps cyclic dictionaries (observed in real mmCIF
//! dictionaries) from recursing forever.

use std::collections::{HashSet, VecDeque};

use super::category::Category;
use super::condition::Condition;
use super::frame::SaveFrame;
use super::row::{Field, RowId};
use crate::diagnostics::trace;
use crate::error::{CifError, Result};
use crate::schema::Schema;
use crate::text::iequals;

/// An ordered, case-insensitive name -> [`Category`] map, shared by
/// [`Datablock`] and [`SaveFrame`] (§3: "Name is case-sensitive as
/// stored, compared case-insensitively on lookup").
#[derive(Default)]
pub struct CategorySet {
    categories: Vec<Category>,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| iequals(c.name(), name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| iequals(c.name(), name))
    }

    /// Returns the named category, creating an empty one on demand (§6:
    /// `Datablock[name] -> Category&` creates on demand for mutable access).
    pub fn get_or_create(&mut self, name: &str) -> &mut Category {
        if self.get(name).is_none() {
            self.categories.push(Category::new(name.to_string()));
        }
        self.get_mut(name).unwrap()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Category> {
        self.categories.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// A CIF datablock: `data_NAME` followed by categories and, in a
/// dictionary file, nested save-frames (§3).
pub struct Datablock {
    name: String,
    categories: CategorySet,
    save_frames: Vec<SaveFrame>,
}

impl Datablock {
    pub fn new(name: impl Into<String>) -> Self {
        Datablock {
            name: name.into(),
            categories: CategorySet::new(),
            save_frames: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn category_mut(&mut self, name: &str) -> &mut Category {
        self.categories.get_or_create(name)
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn save_frames(&self) -> &[SaveFrame] {
        &self.save_frames
    }

    pub fn save_frames_mut(&mut self) -> &mut Vec<SaveFrame> {
        &mut self.save_frames
    }

    pub fn save_frame(&self, name: &str) -> Option<&SaveFrame> {
        self.save_frames.iter().find(|f| iequals(f.name(), name))
    }

    /// Attaches a schema's declared key items and primitive types to every
    /// category already present (called once after `File::load_dictionary`
    /// and again whenever `category_mut` creates a brand-new category).
    pub fn attach_schema(&mut self, schema: &dyn Schema) {
        for cat in self.categories.iter_mut() {
            attach_category_schema(cat, schema);
        }
    }

    /// Validates `value` against `item`'s schema (if any) and writes it,
    /// cascading the change to child categories per §4.4.6 when `item` is
    /// a parent key in some link group.
    pub fn assign(
        &mut self,
        schema: &dyn Schema,
        category: &str,
        row: RowId,
        item: &str,
        value: Field,
        cascade: bool,
    ) -> Result<()> {
        validate_value(schema, category, item, &value)?;

        let old_value = self
            .categories
            .get(category)
            .and_then(|c| c.get_value(row, item))
            .cloned();

        let was_key = self
            .categories
            .get_mut(category)
            .ok_or_else(|| CifError::CategoryNotFound(category.to_string()))?
            .set_value(row, item, value.clone())?;
        let _ = was_key;

        if cascade {
            if let (Some(cat_schema), Some(old_value)) = (schema.category(category), old_value) {
                if cat_schema.key_items().iter().any(|k| iequals(k, item)) {
                    self.cascade_rename(schema, category, row, item, &old_value, &value);
                }
            }
        }

        Ok(())
    }

    /// Deletes every row matching `condition`, cascading to children of
    /// any link where `category` is the parent (§4.4.7), repeated to
    /// transitive closure.
    pub fn erase(&mut self, schema: &dyn Schema, category: &str, condition: &Condition) -> Result<()> {
        let cat = self
            .categories
            .get_mut(category)
            .ok_or_else(|| CifError::CategoryNotFound(category.to_string()))?;
        let erased = cat.erase(condition);

        let mut queue: VecDeque<(String, Vec<(String, Field)>)> = VecDeque::new();
        for (_, data) in erased {
            queue.push_back((category.to_string(), data));
        }
        self.drain_orphan_queue(schema, queue);

        Ok(())
    }

    /// The targeted orphan-deletion form (§4.4.7's `erase_orphans`): for
    /// each row of `category` matching `condition`, deletes it iff it has
    /// no surviving parent row in `parent_category` (via whichever link
    /// group connects the two), then cascades from there exactly like
    /// [`Datablock::erase`]. Returns the number of rows deleted directly
    /// from `category` (not counting further cascaded deletions).
    pub fn erase_orphans(
        &mut self,
        schema: &dyn Schema,
        category: &str,
        condition: &Condition,
        parent_category: &str,
    ) -> Result<usize> {
        let cat_schema = schema
            .category(category)
            .ok_or_else(|| CifError::CategoryNotFound(category.to_string()))?;
        let Some(link) = cat_schema.links_as_child().into_iter().find(|l| iequals(l.parent_category, parent_category)) else {
            return Ok(0);
        };

        let cat = self
            .categories
            .get(category)
            .ok_or_else(|| CifError::CategoryNotFound(category.to_string()))?;
        let candidates = cat.find(condition);

        let mut orphan_ids = Vec::new();
        for id in candidates {
            let values: Vec<Option<String>> = link
                .child_items
                .iter()
                .map(|k| cat.get_value(id, k).map(|f| f.as_text().to_string()))
                .collect();
            if values.iter().any(|v| v.is_none()) {
                continue;
            }
            let values: Vec<String> = values.into_iter().map(|v| v.unwrap()).collect();

            let mut parent_cond = Condition::All;
            let mut first = true;
            for (parent_key, value) in link.parent_items.iter().zip(values.iter()) {
                let c = super::condition::key(parent_key.clone()).eq(value.clone());
                parent_cond = if first { c } else { parent_cond & c };
                first = false;
            }
            let has_parent = self.categories.get(parent_category).map(|p| !p.find(&parent_cond).is_empty()).unwrap_or(false);
            if !has_parent {
                orphan_ids.push(id);
            }
        }

        if orphan_ids.is_empty() {
            return Ok(0);
        }
        let count = orphan_ids.len();

        let cat = self.categories.get_mut(category).unwrap();
        let erased = cat.erase_ids(&orphan_ids);
        trace!(1, "erase_orphans: {} rows removed from '{}' (orphaned by '{}')", count, category, parent_category);

        let mut queue: VecDeque<(String, Vec<(String, Field)>)> = VecDeque::new();
        for (_, data) in erased {
            queue.push_back((category.to_string(), data));
        }
        self.drain_orphan_queue(schema, queue);

        Ok(count)
    }

    /// Drains a work queue of `(category, erased_row)` jobs, cascading
    /// each erased row's own children per §4.4.7's orphan check, repeated
    /// to transitive closure. Shared by [`Datablock::erase`] and
    /// [`Datablock::erase_orphans`].
    fn drain_orphan_queue(&mut self, schema: &dyn Schema, mut queue: VecDeque<(String, Vec<(String, Field)>)>) {
        let mut visited: HashSet<(String, String)> = HashSet::new();

        while let Some((parent_cat, parent_row)) = queue.pop_front() {
            let Some(cat_schema) = schema.category(&parent_cat) else { continue };
            for link in cat_schema.links_as_parent() {
                let parent_values: Vec<Option<String>> = link
                    .parent_items
                    .iter()
                    .map(|k| {
                        parent_row
                            .iter()
                            .find(|(n, _)| iequals(n, k))
                            .map(|(_, f)| f.as_text().to_string())
                    })
                    .collect();
                if parent_values.iter().any(|v| v.is_none()) {
                    continue;
                }
                let parent_values: Vec<String> = parent_values.into_iter().map(|v| v.unwrap()).collect();

                let visit_key = (
                    link.child_category.to_string(),
                    parent_values.join("\u{1}"),
                );
                if !visited.insert(visit_key) {
                    continue;
                }

                let Some(child_cat) = self.categories.get_mut(link.child_category) else { continue };
                let mut cond = Condition::All;
                let mut first = true;
                for (child_key, parent_value) in link.child_items.iter().zip(parent_values.iter()) {
                    let c = super::condition::key(child_key.clone()).eq(parent_value.clone());
                    cond = if first { c } else { cond & c };
                    first = false;
                }
                let matches = child_cat.find(&cond);
                if matches.is_empty() {
                    continue;
                }

                // Orphan check: does another surviving parent row still
                // satisfy this child's key tuple?
                let still_has_parent = self
                    .categories
                    .get(&parent_cat)
                    .map(|parent| {
                        let mut parent_cond = Condition::All;
                        let mut first = true;
                        for (parent_key, parent_value) in link.parent_items.iter().zip(parent_values.iter()) {
                            let c = super::condition::key(parent_key.clone()).eq(parent_value.clone());
                            parent_cond = if first { c } else { parent_cond & c };
                            first = false;
                        }
                        !parent.find(&parent_cond).is_empty()
                    })
                    .unwrap_or(false);

                if still_has_parent {
                    continue;
                }

                let child_cat = self.categories.get_mut(link.child_category).unwrap();
                let removed = child_cat.erase(&cond);
                trace!(
                    1,
                    "cascade delete: {} rows removed from '{}' (orphaned by '{}')",
                    removed.len(),
                    link.child_category,
                    parent_cat
                );
                for (_, data) in removed {
                    queue.push_back((link.child_category.to_string(), data));
                }
            }
        }
    }

    /// Parent-rename cascade (§4.4.6), grounded on the per-row update loop
    /// in `original_source/src/category.cpp`'s `category::update_value`
    /// (the `for (auto parent : rows) ... for (auto &&[childCat, linked] :
    /// m_child_links)` block): for the specific renamed `row`, find the
    /// child rows that referenced it through `item` and either rename,
    /// split, or skip each one.
    ///
    /// Candidates are gathered by the *full* composite key tied to this
    /// one parent row (`old_value` at the renamed slot, the row's own
    /// current values for every other parent key column) — not just the
    /// single renamed column, which would also catch children of an
    /// unrelated parent row that happens to share that one value. A
    /// candidate is then only split (rather than renamed in place) if its
    /// old composite key is *still* satisfied by some other surviving
    /// parent row, and only when the child category's own key is a single
    /// column — matching the original's `m_cat_validator->m_keys.size()
    /// == 1` gate, since a composite-keyed child can't be safely
    /// duplicated under a freshly minted id.
    fn cascade_rename(&mut self, schema: &dyn Schema, category: &str, row: RowId, item: &str, old_value: &Field, new_value: &Field) {
        let Some(cat_schema) = schema.category(category) else { return };
        for link in cat_schema.links_as_parent() {
            let Some(slot) = link.parent_items.iter().position(|k| iequals(k, item)) else { continue };

            let sibling_values = {
                let Some(parent_cat) = self.categories.get(category) else { continue };
                let mut values = Vec::with_capacity(link.parent_items.len());
                let mut resolved = true;
                for (i, parent_key) in link.parent_items.iter().enumerate() {
                    if i == slot {
                        values.push(String::new());
                        continue;
                    }
                    match parent_cat.get_value(row, parent_key) {
                        Some(v) => values.push(v.as_text().to_string()),
                        None => {
                            resolved = false;
                            break;
                        }
                    }
                }
                if !resolved {
                    continue;
                }
                values
            };

            let Some(child_cat) = self.categories.get(link.child_category) else { continue };
            let mut cond = Condition::All;
            let mut first = true;
            for (i, child_key) in link.child_items.iter().enumerate() {
                let v = if i == slot { old_value.as_text().to_string() } else { sibling_values[i].clone() };
                let c = super::condition::key(child_key.clone()).eq(v);
                cond = if first { c } else { cond & c };
                first = false;
            }
            let candidates = child_cat.find(&cond);
            if candidates.is_empty() {
                continue;
            }
            let candidate_values: Vec<(RowId, Vec<String>)> = candidates
                .iter()
                .map(|&r| {
                    let values = link
                        .child_items
                        .iter()
                        .map(|k| child_cat.get_value(r, k).map(|f| f.as_text().to_string()).unwrap_or_default())
                        .collect();
                    (r, values)
                })
                .collect();

            let child_key_is_single = schema
                .category(link.child_category)
                .map(|s| s.key_items().len() == 1)
                .unwrap_or(false);

            enum Decision {
                Rename,
                Split,
                Skip,
            }

            let mut decisions = Vec::with_capacity(candidate_values.len());
            for (child_row, values) in &candidate_values {
                // Does some *other* surviving parent row still satisfy the
                // child's old (unrenamed) composite key?
                let mut cond_c = Condition::All;
                let mut first = true;
                for (i, parent_key) in link.parent_items.iter().enumerate() {
                    let c = super::condition::key(parent_key.clone()).eq(values[i].clone());
                    cond_c = if first { c } else { cond_c & c };
                    first = false;
                }
                let other_parent_exists = self.categories.get(category).map(|p| !p.find(&cond_c).is_empty()).unwrap_or(false);

                if !other_parent_exists {
                    decisions.push((*child_row, Decision::Rename));
                    continue;
                }

                let mut check = Condition::All;
                let mut first = true;
                for (i, child_key) in link.child_items.iter().enumerate() {
                    let v = if i == slot { new_value.as_text().to_string() } else { values[i].clone() };
                    let c = super::condition::key(child_key.clone()).eq(v);
                    check = if first { c } else { check & c };
                    first = false;
                }
                let would_duplicate = self.categories.get(link.child_category).map(|c| !c.find(&check).is_empty()).unwrap_or(false);
                if would_duplicate {
                    trace!(
                        1,
                        "cascade rename: skipping '{}' row (renaming '{}' would duplicate an existing child)",
                        link.child_category,
                        link.child_items[slot]
                    );
                    decisions.push((*child_row, Decision::Skip));
                    continue;
                }

                if child_key_is_single {
                    decisions.push((*child_row, Decision::Split));
                } else {
                    trace!(
                        1,
                        "cascade rename: cannot split '{}' row with a composite key while renaming '{}'; leaving it unchanged",
                        link.child_category,
                        link.child_items[slot]
                    );
                    decisions.push((*child_row, Decision::Skip));
                }
            }

            let mut to_rename = Vec::new();
            for (child_row, decision) in decisions {
                match decision {
                    Decision::Rename => to_rename.push(child_row),
                    Decision::Split => {
                        if let Some(child_cat) = self.categories.get_mut(link.child_category) {
                            if let Some(items) = child_cat.row_items(child_row).map(|s| s.to_vec()) {
                                if child_cat.emplace(items).is_ok() {
                                    trace!(
                                        1,
                                        "cascade rename: split '{}' row on '{}' ({} -> {})",
                                        link.child_category,
                                        link.child_items[slot],
                                        old_value.as_text(),
                                        new_value.as_text()
                                    );
                                }
                            }
                        }
                        to_rename.push(child_row);
                    }
                    Decision::Skip => {}
                }
            }

            for &child_row in &to_rename {
                if let Some(child_cat) = self.categories.get_mut(link.child_category) {
                    let _ = child_cat.set_value(child_row, &link.child_items[slot], new_value.clone());
                }
            }
            // Recurse: a renamed child row may itself be a parent of other rows.
            for &child_row in &to_rename {
                self.cascade_rename(schema, link.child_category, child_row, &link.child_items[slot], old_value, new_value);
            }
        }
    }

    /// Validates and writes `item` on the single row of `category` matching
    /// `condition`, cascading per [`Datablock::assign`] (§6's
    /// `update_value(condition, tag, value)`).
    pub fn update_value(
        &mut self,
        schema: &dyn Schema,
        category: &str,
        condition: &Condition,
        item: &str,
        value: Field,
        cascade: bool,
    ) -> Result<()> {
        let row = self
            .categories
            .get(category)
            .ok_or_else(|| CifError::CategoryNotFound(category.to_string()))?
            .find1(condition)?;
        self.assign(schema, category, row, item, value, cascade)
    }

    /// Every `(parent_category, condition)` pair identifying the parent
    /// row(s) `row` links to as a child, one per link group `category`
    /// participates in as child (§11, grounded on `category::get_parents`
    /// in `original_source/src/category.cpp`). A link whose key values are
    /// partly unset on `row` is skipped.
    pub fn get_parents_condition(&self, schema: &dyn Schema, category: &str, row: RowId) -> Vec<(String, Condition)> {
        let Some(cat) = self.categories.get(category) else { return Vec::new() };
        let Some(cat_schema) = schema.category(category) else { return Vec::new() };
        let mut out = Vec::new();
        for link in cat_schema.links_as_child() {
            if let Some(cond) = key_condition(cat, row, link.child_items, link.parent_items) {
                out.push((link.parent_category.to_string(), cond));
            }
        }
        out
    }

    /// Every `(child_category, condition)` pair identifying the child
    /// row(s) that link back to `row` (§11), one per link group `category`
    /// participates in as parent.
    pub fn get_children_condition(&self, schema: &dyn Schema, category: &str, row: RowId) -> Vec<(String, Condition)> {
        let Some(cat) = self.categories.get(category) else { return Vec::new() };
        let Some(cat_schema) = schema.category(category) else { return Vec::new() };
        let mut out = Vec::new();
        for link in cat_schema.links_as_parent() {
            if let Some(cond) = key_condition(cat, row, link.parent_items, link.child_items) {
                out.push((link.child_category.to_string(), cond));
            }
        }
        out
    }

    /// The actual parent rows `row` links to, across every link group.
    pub fn get_parents(&self, schema: &dyn Schema, category: &str, row: RowId) -> Vec<(String, RowId)> {
        self.get_parents_condition(schema, category, row)
            .into_iter()
            .flat_map(|(parent_cat, cond)| {
                let rows = self.categories.get(&parent_cat).map(|c| c.find(&cond)).unwrap_or_default();
                rows.into_iter().map(move |r| (parent_cat.clone(), r))
            })
            .collect()
    }

    /// The actual child rows that link back to `row`, across every link
    /// group.
    pub fn get_children(&self, schema: &dyn Schema, category: &str, row: RowId) -> Vec<(String, RowId)> {
        self.get_children_condition(schema, category, row)
            .into_iter()
            .flat_map(|(child_cat, cond)| {
                let rows = self.categories.get(&child_cat).map(|c| c.find(&cond)).unwrap_or_default();
                rows.into_iter().map(move |r| (child_cat.clone(), r))
            })
            .collect()
    }

    /// `true` if `row` has at least one resolvable parent row.
    pub fn has_parents(&self, schema: &dyn Schema, category: &str, row: RowId) -> bool {
        !self.get_parents(schema, category, row).is_empty()
    }

    /// `true` if `row` has at least one resolvable child row.
    pub fn has_children(&self, schema: &dyn Schema, category: &str, row: RowId) -> bool {
        !self.get_children(schema, category, row).is_empty()
    }

    /// The rows of `other_category` linked (as parent or child) to `row`.
    pub fn get_linked(&self, schema: &dyn Schema, category: &str, row: RowId, other_category: &str) -> Vec<RowId> {
        self.get_parents(schema, category, row)
            .into_iter()
            .chain(self.get_children(schema, category, row))
            .filter(|(cat, _)| iequals(cat, other_category))
            .map(|(_, r)| r)
            .collect()
    }

    /// Runs per-value content checks (§4.5.3's category-level `is_valid`):
    /// every stored value against the schema's mandatory/matcher/
    /// enumeration rules. Unlike [`Datablock::assign`], this also catches
    /// values that entered the model without going through the public
    /// write API, e.g. a plain `File::load` with no dictionary attached
    /// at parse time.
    pub fn validate_values(&self, schema: &dyn Schema) -> Vec<CifError> {
        let mut errors = Vec::new();
        for cat in self.categories.iter() {
            if schema.category(cat.name()).is_none() {
                continue;
            }
            for row in cat.row_ids() {
                let Some(items) = cat.row_items(row) else { continue };
                for (name, value) in items {
                    if let Err(e) = validate_value(schema, cat.name(), name, value) {
                        errors.push(e);
                    }
                }
            }
        }
        errors
    }

    /// Runs referential-integrity checking (§4.5.3): every child row's key
    /// tuple must be entirely empty or must match some parent row.
    pub fn is_valid(&self, schema: &dyn Schema) -> Vec<CifError> {
        let mut errors = Vec::new();
        for cat in self.categories.iter() {
            let Some(cat_schema) = schema.category(cat.name()) else { continue };
            for link in cat_schema.links_as_child() {
                let Some(parent_cat) = self.categories.get(link.parent_category) else { continue };
                let mut shown = 0;
                for row in cat.row_ids() {
                    let child_values: Vec<Field> = link
                        .child_items
                        .iter()
                        .map(|k| cat.get_value(row, k).cloned().unwrap_or(Field::unknown()))
                        .collect();
                    if child_values.iter().all(|f| f.empty()) {
                        continue;
                    }
                    let mut cond = Condition::All;
                    let mut first = true;
                    for (parent_key, value) in link.parent_items.iter().zip(child_values.iter()) {
                        let c = super::condition::key(parent_key.clone()).eq(value.as_text().to_string());
                        cond = if first { c } else { cond & c };
                        first = false;
                    }
                    if parent_cat.find(&cond).is_empty() {
                        if shown < 5 {
                            errors.push(CifError::ReferentialIntegrity {
                                child_category: cat.name().to_string(),
                                child_item: link.child_items.join(","),
                                parent_category: link.parent_category.to_string(),
                                parent_item: link.parent_items.join(","),
                                value: child_values.iter().map(|f| f.as_text().to_string()).collect::<Vec<_>>().join(","),
                            });
                        }
                        shown += 1;
                    }
                }
            }
        }
        errors
    }
}

/// Builds the condition selecting rows of the other side of a link whose
/// `target_items` equal `row`'s `source_items` values, positionally paired.
/// `None` if any of `row`'s `source_items` is unset.
fn key_condition(cat: &Category, row: RowId, source_items: &[String], target_items: &[String]) -> Option<Condition> {
    let values: Vec<Option<String>> = source_items
        .iter()
        .map(|k| cat.get_value(row, k).map(|f| f.as_text().to_string()))
        .collect();
    if values.iter().any(|v| v.is_none()) {
        return None;
    }
    let mut cond = Condition::All;
    let mut first = true;
    for (target_key, value) in target_items.iter().zip(values.into_iter()) {
        let c = super::condition::key(target_key.clone()).eq(value.unwrap());
        cond = if first { c } else { cond & c };
        first = false;
    }
    Some(cond)
}

fn attach_category_schema(cat: &mut Category, schema: &dyn Schema) {
    if let Some(cat_schema) = schema.category(cat.name()) {
        cat.set_key_items(cat_schema.key_items().to_vec());
        for item in cat.item_names().to_vec() {
            if let Some(item_schema) = cat_schema.item_schema(&item) {
                cat.set_item_type(&item, item_schema.primitive_type);
            }
        }
    }
}

fn validate_value(schema: &dyn Schema, category: &str, item: &str, value: &Field) -> Result<()> {
    let Some(cat_schema) = schema.category(category) else { return Ok(()) };
    let Some(item_schema) = cat_schema.item_schema(item) else { return Ok(()) };

    if value.empty() {
        if item_schema.mandatory {
            return Err(CifError::Validation {
                category: category.to_string(),
                item: item.to_string(),
                message: "mandatory item cannot be empty/unknown/inapplicable".to_string(),
            });
        }
        return Ok(());
    }

    if let Some(matcher) = item_schema.matcher {
        if !matcher.is_match(value.as_text()) {
            return Err(CifError::Validation {
                category: category.to_string(),
                item: item.to_string(),
                message: format!("value '{}' does not match the item's type constraint", value.as_text()),
            });
        }
    }

    if let Some(enumeration) = item_schema.enumeration {
        let ok = if item_schema.primitive_type == crate::text::PrimitiveType::UChar {
            enumeration.iter().any(|e| iequals(e, value.as_text()))
        } else {
            enumeration.iter().any(|e| e == value.as_text())
        };
        if !ok {
            return Err(CifError::Validation {
                category: category.to_string(),
                item: item.to_string(),
                message: format!("value '{}' is not one of the enumerated values", value.as_text()),
            });
        }
    }

    Ok(())
}
