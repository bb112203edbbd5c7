//! The dictionary entity model: type/item/category/link validators,
//! grounded directly on `original_source/include/cif++/validate.hpp`'s
//! `type_validator`/`item_validator`/`category_validator`/`link_validator`.
//!
//! Where the original stores a raw `const type_validator*` on each item and
//! a `category_validator*` back-pointer, these are flattened into owned
//! data at load time: [`ItemValidator`] copies its resolved primitive type
//! and compiled matcher directly, and [`CategoryValidator`] precomputes the
//! link descriptors it needs to hand out through
//! [`cif_parser::CategorySchema`] without borrowing from the rest of the
//! dictionary. This keeps the `Schema` trait object-safe across the crate
//! boundary (see `cif_parser::schema`) at the cost of a little duplication.

use std::collections::HashMap;

use cif_parser::schema::{CategorySchema, ItemSchema, LinkDescriptor, ValueMatcher};
use cif_parser::PrimitiveType;
use regex::Regex;

/// Wraps a compiled `Regex` so this crate can implement the foreign
/// `ValueMatcher` trait for it (a bare `regex::Regex` is a foreign type, so
/// `impl ValueMatcher for Regex` directly would violate the orphan rule).
#[derive(Debug, Clone)]
pub struct RegexMatcher(pub Regex);

impl ValueMatcher for RegexMatcher {
    fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }
}

/// One `_item_type_list` row: a named primitive type plus its construct
/// regex.
#[derive(Debug, Clone)]
pub struct TypeValidator {
    pub name: String,
    pub primitive_type: PrimitiveType,
    pub construct: Option<RegexMatcher>,
}

/// A resolved parent/child link, denormalized onto both the parent and
/// child `CategoryValidator` so each can answer
/// [`CategorySchema::links_as_parent`]/[`links_as_child`] without consulting
/// the rest of the dictionary.
#[derive(Debug, Clone)]
pub struct ResolvedLink {
    pub link_group_id: String,
    pub parent_category: String,
    pub parent_items: Vec<String>,
    pub child_category: String,
    pub child_items: Vec<String>,
    /// `_pdbx_item_linked_group.label`, e.g. `cat_2:cat_1:1`. Informational.
    pub label: Option<String>,
}

/// One item (tag) validator, keyed by its bare item name within a category
/// (e.g. `id` for `_cat_1.id`).
#[derive(Debug, Clone)]
pub struct ItemValidator {
    /// Full dotted tag, e.g. `_cat_1.id`, kept for diagnostics.
    pub tag: String,
    pub category_id: String,
    pub mandatory: bool,
    pub primitive_type: PrimitiveType,
    pub matcher: Option<RegexMatcher>,
    pub enums: Vec<String>,
    pub default: Option<String>,
    /// Set when this item had no `_item_type.code` of its own and inherited
    /// one from a parent via `_item_linked` (§4.5.1's non-key alias).
    pub inherits_type_from: Option<String>,
    /// The raw `_method.expression` dREL source attached to this item's
    /// save-frame, if any. Not evaluated — only parsed and reference-
    /// checked by [`crate::drel::validate_dictionary`] as an additive
    /// dictionary-consistency diagnostic.
    pub drel_method: Option<String>,
}

/// One `save_<category>` frame: a category's keys, mandatory flag and the
/// links it participates in as parent or child.
#[derive(Debug, Clone, Default)]
pub struct CategoryValidator {
    pub name: String,
    pub keys: Vec<String>,
    pub mandatory: bool,
    /// Item validators, keyed by bare item name (case folded at lookup
    /// time by [`crate::norm`], not at storage time).
    pub items: HashMap<String, ItemValidator>,
    pub links_as_parent: Vec<ResolvedLink>,
    pub links_as_child: Vec<ResolvedLink>,
}

impl CategorySchema for CategoryValidator {
    fn key_items(&self) -> &[String] {
        &self.keys
    }

    fn item_schema(&self, item: &str) -> Option<ItemSchema<'_>> {
        let iv = self.items.get(&crate::norm(item))?;
        Some(ItemSchema {
            primitive_type: iv.primitive_type,
            matcher: iv.matcher.as_ref().map(|m| m as &dyn ValueMatcher),
            enumeration: if iv.enums.is_empty() { None } else { Some(&iv.enums) },
            mandatory: iv.mandatory,
            default: iv.default.as_deref(),
        })
    }

    fn links_as_parent(&self) -> Vec<LinkDescriptor<'_>> {
        self.links_as_parent
            .iter()
            .map(|l| LinkDescriptor {
                parent_category: &l.parent_category,
                parent_items: &l.parent_items,
                child_category: &l.child_category,
                child_items: &l.child_items,
            })
            .collect()
    }

    fn links_as_child(&self) -> Vec<LinkDescriptor<'_>> {
        self.links_as_child
            .iter()
            .map(|l| LinkDescriptor {
                parent_category: &l.parent_category,
                parent_items: &l.parent_items,
                child_category: &l.child_category,
                child_items: &l.child_items,
            })
            .collect()
    }
}

/// A fully-loaded dictionary: every type, category and link validator it
/// declares, ready to be attached to a [`cif_parser::File`] as a
/// [`cif_parser::Schema`].
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    pub name: String,
    pub version: Option<String>,
    pub types: HashMap<String, TypeValidator>,
    pub categories: HashMap<String, CategoryValidator>,
    /// Every link declared by `_pdbx_item_linked_group_list`/
    /// `_pdbx_item_linked_group`, independent of the copies denormalized
    /// onto each [`CategoryValidator`] — kept for introspection, mirroring
    /// `validator::get_links_for_parent`/`get_links_for_child`.
    pub links: Vec<ResolvedLink>,
}

impl Dictionary {
    pub fn category(&self, name: &str) -> Option<&CategoryValidator> {
        self.categories.get(&crate::norm(name))
    }

    pub fn type_validator(&self, code: &str) -> Option<&TypeValidator> {
        self.types.get(&crate::norm(code))
    }

    pub fn links_for_parent(&self, category: &str) -> Vec<&ResolvedLink> {
        self.links.iter().filter(|l| cif_parser::text::iequals(&l.parent_category, category)).collect()
    }

    pub fn links_for_child(&self, category: &str) -> Vec<&ResolvedLink> {
        self.links.iter().filter(|l| cif_parser::text::iequals(&l.child_category, category)).collect()
    }

    /// `true` if `tag` (e.g. `_cat_1.id`) names an item this dictionary
    /// defines. Used by [`crate::drel::validate_dictionary`] to check
    /// dREL method references.
    pub fn has_item(&self, tag: &str) -> bool {
        let (category, item) = crate::loader::split_tag(tag);
        self.category(&category).map(|c| c.items.contains_key(&crate::norm(&item))).unwrap_or(false)
    }
}

impl cif_parser::Schema for Dictionary {
    fn category(&self, name: &str) -> Option<&dyn CategorySchema> {
        self.categories.get(&crate::norm(name)).map(|c| c as &dyn CategorySchema)
    }
}
