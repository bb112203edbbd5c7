//! DDL1/DDL2 dictionary loading and CIF validation (§0, §4.5, §7).
//!
//! A [`Dictionary`] is loaded once from dictionary CIF text (or looked up
//! by name from the process-wide [`registry`]) and attached to a
//! [`cif_parser::File`] as a [`cif_parser::Schema`] (see
//! [`cif_parser::schema`] for the trait seam this crate implements against).
//! [`Validator`] is a thin convenience wrapper around that attach-then-check
//! flow for callers that don't want to touch the `cif-parser` data model
//! directly.
//!
//! ```rust,ignore
//! use cif_parser::File;
//! use cif_validator::{Validator, ValidationMode};
//!
//! let mut file = File::load(cif_text)?;
//! let validator = Validator::new()
//!     .with_dictionary_file("core_cif.dic")?
//!     .with_mode(ValidationMode::Strict);
//! let result = validator.validate(&mut file);
//! assert!(result.is_valid());
//! ```

pub mod drel;
pub mod error;
pub mod loader;
pub mod registry;
pub mod types;

pub use error::{DictionaryError, Result};
pub use types::{CategoryValidator, Dictionary, ItemValidator, ResolvedLink, TypeValidator};

use std::fs;
use std::path::Path;
use std::sync::Arc;

use cif_parser::{CifError, File};

/// Case-folds a tag, category or dictionary name for lookup. DDL1/DDL2 names
/// are ASCII, so this is a thin wrapper over [`cif_parser::text::to_lower`]
/// kept here so every lookup in this crate goes through one place.
pub(crate) fn norm(s: &str) -> String {
    cif_parser::text::to_lower(s)
}

/// How strictly [`Validator::validate`] treats problems found while checking
/// a file against a dictionary (§7). DDLm's `Pedantic` tier has no
/// counterpart in DDL1/DDL2 core validation and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Unknown items, missing mandatory items and referential-integrity
    /// violations are all reported as errors.
    #[default]
    Strict,
    /// Unknown items are downgraded to warnings; everything else is still
    /// an error.
    Lenient,
}

/// Coarse classification of a [`ValidationError`], derived from the
/// [`cif_parser::CifError`] variant it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UnknownItem,
    TypeError,
    EnumerationError,
    MissingMandatory,
    ReferentialIntegrity,
}

/// One validation finding.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: ErrorCategory,
    pub message: String,
}

/// A downgraded [`ValidationError`] (only reachable under
/// [`ValidationMode::Lenient`]).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub message: String,
}

/// The outcome of running a [`Validator`] over a [`cif_parser::File`].
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn classify(err: &CifError) -> ErrorCategory {
    match err {
        CifError::UnknownItem { .. } => ErrorCategory::UnknownItem,
        CifError::Validation { message, .. } if message.contains("enumerated") => ErrorCategory::EnumerationError,
        CifError::Validation { message, .. } if message.contains("mandatory") => ErrorCategory::MissingMandatory,
        CifError::Validation { .. } => ErrorCategory::TypeError,
        CifError::ReferentialIntegrity { .. } => ErrorCategory::ReferentialIntegrity,
        _ => ErrorCategory::TypeError,
    }
}

/// Loads a dictionary and checks CIF files against it (§7).
#[derive(Debug, Clone, Default)]
pub struct Validator {
    mode: ValidationMode,
    dictionary: Option<Arc<Dictionary>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Attaches an already-loaded dictionary.
    pub fn with_dictionary(mut self, dictionary: Arc<Dictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    /// Parses `text` as a dictionary and registers it under `name` (via
    /// [`registry::construct`]) before attaching it.
    pub fn with_dictionary_text(self, name: &str, text: &str) -> Result<Self> {
        let dict = registry::construct(name, text)?;
        Ok(self.with_dictionary(dict))
    }

    /// Reads `path` and loads it as a dictionary, registered under its file
    /// name.
    pub fn with_dictionary_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        self.with_dictionary_text(&name, &text)
    }

    pub fn dictionary(&self) -> Option<&Arc<Dictionary>> {
        self.dictionary.as_ref()
    }

    /// Attaches the held dictionary to `file` as its [`cif_parser::Schema`],
    /// then runs per-value content checks and referential-integrity checks
    /// across every datablock (§4.5.3). With no dictionary attached, only
    /// referential integrity against whatever schema `file` already carries
    /// (if any) is checked.
    pub fn validate(&self, file: &mut File) -> ValidationResult {
        if let Some(dict) = &self.dictionary {
            file.attach_schema(dict.clone());
        }

        let mut found: Vec<CifError> = file.validate_values();
        found.extend(file.is_valid());

        self.classify_all(found)
    }

    fn classify_all(&self, found: Vec<CifError>) -> ValidationResult {
        let mut result = ValidationResult::default();
        for err in found {
            let category = classify(&err);
            let message = err.to_string();
            if self.mode == ValidationMode::Lenient && category == ErrorCategory::UnknownItem {
                result.warnings.push(ValidationWarning { message });
            } else {
                result.errors.push(ValidationError { category, message });
            }
        }
        result
    }
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
code char '[A-Za-z0-9_]*'
text char '.*'

save_cat_1
_category.id cat_1
_category.mandatory_code no
_category_key.name '_cat_1.id'
save_

save__cat_1.id
_item.name '_cat_1.id'
_item.category_id cat_1
_item.mandatory_code yes
_item_type.code code
save_

save__cat_1.name
_item.name '_cat_1.name'
_item.category_id cat_1
_item.mandatory_code yes
_item_type.code text
_item_enumeration.value alpha
_item_enumeration.value beta
save_
"#;

    #[test]
    fn test_validator_creation() {
        let validator = Validator::new();
        assert_eq!(validator.mode, ValidationMode::Strict);
        assert!(validator.dictionary().is_none());
    }

    #[test]
    fn test_validation_modes() {
        let strict = Validator::new().with_mode(ValidationMode::Strict);
        let lenient = Validator::new().with_mode(ValidationMode::Lenient);

        assert_eq!(strict.mode, ValidationMode::Strict);
        assert_eq!(lenient.mode, ValidationMode::Lenient);
    }

    #[test]
    fn validates_known_values_as_clean() {
        let validator = Validator::new().with_dictionary_text("lib_test_dict_ok", DICT).unwrap();
        let mut file = File::load("data_block\n_cat_1.id foo\n_cat_1.name alpha\n").unwrap();
        let result = validator.validate(&mut file);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 0);
    }

    #[test]
    fn rejects_value_outside_enumeration() {
        let validator = Validator::new().with_dictionary_text("lib_test_dict_bad", DICT).unwrap();
        let mut file = File::load("data_block\n_cat_1.id foo\n_cat_1.name gamma\n").unwrap();
        let result = validator.validate(&mut file);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.category == ErrorCategory::EnumerationError));
    }
}
