//! Error types for every layer of the crate: lexer, SAC parser, data model
//! and the `Schema`/validator seam.

use thiserror::Error;

/// Everything that can go wrong parsing, building or mutating a CIF document.
#[derive(Debug, Error)]
pub enum CifError {
    #[error("{line}: lexical error: {message}")]
    Lex { line: u32, message: String },

    #[error("{line}: parse error: {message}")]
    Parse { line: u32, message: String },

    #[error("category '{category}' has no item '{item}'")]
    UnknownItem { category: String, item: String },

    #[error("duplicate key in category '{category}': {key}")]
    DuplicateKey { category: String, key: String },

    #[error("referential integrity violation: {child_category}.{child_item} references missing {parent_category}.{parent_item} = '{value}'")]
    ReferentialIntegrity {
        child_category: String,
        child_item: String,
        parent_category: String,
        parent_item: String,
        value: String,
    },

    #[error("category '{0}' not found")]
    CategoryNotFound(String),

    #[error("datablock '{0}' not found")]
    DatablockNotFound(String),

    #[error("row not found (stale RowId or already erased)")]
    RowNotFound,

    #[error("validation failed for '{category}.{item}': {message}")]
    Validation {
        category: String,
        item: String,
        message: String,
    },

    #[error("find1 on '{category}' expected exactly one match, found {count}")]
    NotExactlyOne { category: String, count: usize },

    #[error("schema error: {0}")]
    Schema(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CifError>;
