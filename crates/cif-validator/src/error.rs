//! Error types for dictionary loading and validation, grounded on
//! `original_source/include/cif++/CifValidator.hpp`'s `ValidationError` and
//! the `SchemaError`/`ValidationError` kinds named in §7.

use thiserror::Error;

/// Everything that can go wrong loading a DDL1/DDL2 dictionary or validating
/// a value against one.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("dictionary save-frame '{frame}' is internally inconsistent: {message}")]
    Schema { frame: String, message: String },

    #[error("item type '{0}' referenced but not defined in _item_type_list")]
    UnknownType(String),

    #[error("link group '{group_id}' is missing keys for {side}")]
    MissingLinkKeys { group_id: String, side: String },

    #[error("invalid regular expression in type '{code}': {source}")]
    BadConstruct {
        code: String,
        #[source]
        source: regex::Error,
    },

    /// A `_method.expression` references an item or category the
    /// dictionary never defines (§0's dREL reference-checker diagnostic).
    #[error("dREL method on '{item}' references undefined {referenced}")]
    MissingDrelReference { item: String, referenced: String },

    /// A `_method.expression` does not parse as dREL.
    #[error("dREL method on '{item}' failed to parse: {message}")]
    InvalidDrel { item: String, message: String },

    #[error(transparent)]
    Cif(#[from] cif_parser::CifError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DictionaryError>;
