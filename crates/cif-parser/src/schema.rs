//! The seam between the data model (this crate) and the dictionary-driven
//! validator (`cif-validator`).
//!
//! In the original library, `Category` simply holds a forward-declared
//! `Validator*` in the same translation unit — there's no real crate
//! boundary to cross. Splitting this into two published crates means that
//! pointer can't exist as-is, so instead `cif-parser` defines the shape of
//! what a validator needs to offer (`Schema`), and `cif-validator` depends
//! on `cif-parser` and implements it against a loaded dictionary. This
//! keeps the dependency graph acyclic while letting `Category`/`Datablock`
//! stay validator-aware for type comparison, key lookup and cascades.

use crate::text::PrimitiveType;

/// Matches a field value against an item's permitted form (an
/// `_item_type.code` construct in DDL1/DDL2, typically backed by a regular
/// expression). Expressed as a trait rather than requiring `cif-parser`
/// itself to depend on `regex`.
pub trait ValueMatcher: Send + Sync {
    fn is_match(&self, value: &str) -> bool;
}

impl<F: Fn(&str) -> bool + Send + Sync> ValueMatcher for F {
    fn is_match(&self, value: &str) -> bool {
        self(value)
    }
}

/// One item's (tag's) schema: its primitive type and, if constrained, its
/// value matcher and/or enumeration.
pub struct ItemSchema<'a> {
    pub primitive_type: PrimitiveType,
    pub matcher: Option<&'a dyn ValueMatcher>,
    pub enumeration: Option<&'a [String]>,
    pub mandatory: bool,
    pub default: Option<&'a str>,
}

/// How a category's parent/child link is keyed: the item names on each
/// side, aligned positionally (`parent[i]` corresponds to `child[i]`).
pub struct LinkDescriptor<'a> {
    pub parent_category: &'a str,
    pub parent_items: &'a [String],
    pub child_category: &'a str,
    pub child_items: &'a [String],
}

/// A category's schema: its key items and the links that name it as parent
/// or child.
pub trait CategorySchema {
    fn key_items(&self) -> &[String];
    fn item_schema(&self, item: &str) -> Option<ItemSchema<'_>>;
    fn links_as_parent(&self) -> Vec<LinkDescriptor<'_>>;
    fn links_as_child(&self) -> Vec<LinkDescriptor<'_>>;
}

/// The full schema a [`crate::model::file::File`] can be attached to. Not
/// object-safe-by-value: callers hold it as `&dyn Schema` or behind an
/// `Rc`/`Arc`, same as the original's `Validator*`.
pub trait Schema {
    fn category(&self, name: &str) -> Option<&dyn CategorySchema>;
}

/// A no-op schema used when a [`crate::model::file::File`] has no attached
/// dictionary: every category is unconstrained and every value compares as
/// plain `Char` text.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSchema;

impl Schema for NoSchema {
    fn category(&self, _name: &str) -> Option<&dyn CategorySchema> {
        None
    }
}
