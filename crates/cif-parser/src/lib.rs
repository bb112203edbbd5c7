//! A library for reading, querying and writing CIF/STAR files: the format
//! used by crystallography and related sciences to exchange tagged,
//! dictionary-validated tabular data.
//!
//! The crate is organised in the layers the format itself separates:
//!
//! - [`token`]/[`lexer`]: the character-level tokenizer (§4.2).
//! - [`parser`]: the single-lookahead SAC (Simple API for CIF) parser
//!   driving structural callbacks (§4.3).
//! - [`model`]: the in-memory relational data model — datablocks,
//!   categories, rows, the key index and the condition DSL (§4.4).
//! - [`writer`]: serialization back to CIF text (§4.4.5).
//! - [`schema`]: the trait seam a dictionary-driven validator (such as
//!   `cif-validator`) implements to type and constrain a [`model::File`]'s
//!   contents, without this crate depending on the validator.
//! - [`text`]: ASCII case folding, character classification and the
//!   primitive-type-aware value comparator (§4.1) shared by the model and
//!   the writer.
//! - [`diagnostics`]: the global verbosity knob used for non-fatal
//!   reporting (§10.2).
//!
//! Grounded throughout on `original_source/include/cif++/` and
//! `original_source/src/` (`CifParser`, `Category`, `Datablock`, `text`).

pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod schema;
pub mod text;
pub mod token;
pub mod writer;

pub use error::{CifError, Result};
pub use model::{all, any, key, Category, CategorySet, Condition, Datablock, Field, File, RowId, SaveFrame};
pub use schema::{CategorySchema, ItemSchema, LinkDescriptor, NoSchema, Schema, ValueMatcher};
pub use text::PrimitiveType;

/// Knobs governing how a file is read (§10.4). Currently a single flag,
/// kept as a struct rather than a bare bool so new parse-time options
/// (e.g. a line-length cap) can land without breaking callers.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Reject a tag repeated within the same row — twice in one `loop_`
    /// header, or twice before the category changes in `_cat.tag value`
    /// form — instead of letting the later occurrence silently overwrite
    /// the earlier one. The SAC parser itself always stops at the first
    /// lexical or grammar error regardless of this setting; `strict` only
    /// adds this one extra structural check.
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { strict: true }
    }
}

/// Parses `input` into a fresh [`File`], tolerating a tag repeated within a
/// row rather than rejecting it (see [`parse_string_with_options`] for the
/// `strict` alternative).
pub fn parse_string(input: &str) -> Result<File> {
    File::load(input)
}

/// Parses `input` into a fresh [`File`], honouring `options.strict`.
pub fn parse_string_with_options(input: &str, options: ParseOptions) -> Result<File> {
    parser::parse_with_options(input, options.strict)
}

/// Reads `path` from disk and parses it into a fresh [`File`].
pub fn parse_file(path: impl AsRef<std::path::Path>) -> Result<File> {
    let text = std::fs::read_to_string(path)?;
    File::load(&text)
}
