//! Additive dictionary-consistency diagnostic: parses each category's
//! `_method.expression` (§0, §11) with `drel-parser` and checks that every
//! data name and category it references is actually defined somewhere in the
//! same dictionary. Never evaluates a method — only reference-checks it, so
//! a dictionary with no dREL at all yields an empty diagnostic list and a
//! dictionary with unparseable or dangling dREL does not fail loading, only
//! surfaces findings for the caller to act on.

use drel_parser::analysis::extract_references;
use drel_parser::ReferenceKind;

use crate::error::DictionaryError;
use crate::types::Dictionary;

/// Parses and reference-checks every `_method.expression` attached to an
/// item in `dict`. Returns one [`DictionaryError`] per item whose method
/// fails to parse or references something `dict` never defines.
pub fn validate_dictionary(dict: &Dictionary) -> Vec<DictionaryError> {
    let mut findings = Vec::new();

    for category in dict.categories.values() {
        for item in category.items.values() {
            let Some(source) = &item.drel_method else { continue };

            let stmts = match drel_parser::parse(source) {
                Ok(stmts) => stmts,
                Err(err) => {
                    findings.push(DictionaryError::InvalidDrel {
                        item: item.tag.clone(),
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            for reference in extract_references(&stmts) {
                match reference.kind {
                    ReferenceKind::DataName => {
                        let tag = reference.full_name();
                        if !dict.has_item(&tag) {
                            findings.push(DictionaryError::MissingDrelReference {
                                item: item.tag.clone(),
                                referenced: tag,
                            });
                        }
                    }
                    ReferenceKind::Category => {
                        if dict.category(&reference.category).is_none() {
                            findings.push(DictionaryError::MissingDrelReference {
                                item: item.tag.clone(),
                                referenced: reference.category.clone(),
                            });
                        }
                    }
                    // A bare identifier might be a local variable, a builtin
                    // function, or a category alias bound by `With`/`Loop` —
                    // none of those are checkable against the dictionary.
                    ReferenceKind::Identifier => {}
                }
            }
        }
    }

    findings
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
int  numb '[+-]?[0-9]+'

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

save__cat_1.total
_item.name '_cat_1.total'
_item.category_id cat_1
_item.mandatory_code no
_item_type.code int
_method.expression '_cat_1.total = _cat_1.missing_item'
save_
"#;

    #[test]
    fn flags_method_referencing_undefined_item() {
        let dict = crate::loader::load(DICT).unwrap();
        let findings = validate_dictionary(&dict);
        assert!(findings.iter().any(|f| matches!(f, DictionaryError::MissingDrelReference { referenced, .. } if referenced == "_cat_1.missing_item")));
    }

    #[test]
    fn dictionary_with_no_methods_has_no_findings() {
        let dict = crate::loader::load(
            r#"
data_plain.dic
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
"#,
        )
        .unwrap();
        assert!(validate_dictionary(&dict).is_empty());
    }
}
