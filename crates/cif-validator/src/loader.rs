//! Parses a DDL1/DDL2 dictionary CIF file into a [`Dictionary`], grounded on
//! `original_source/test/unit-test.cpp`'s literal dictionary fixtures and
//! the two-pass shape of the teacher's own `dictionary/loader.rs`
//! (collect type/category/item definitions, then a fix-up pass that
//! resolves cross-references) — adapted here to DDL1/DDL2's tag vocabulary
//! instead of the teacher's DDLm one (§4.5.1): `_item_type_list`,
//! `_category.id`/`_category_key.name`, `_item.name`/`_item.category_id`/
//! `_item.mandatory_code`, `_item_type.code`, `_item_enumeration.value`,
//! `_item_linked.(parent_name,child_name)`, `_pdbx_item_linked_group_list`,
//! `_pdbx_item_linked_group`.

use std::collections::HashMap;

use cif_parser::{Category, Datablock, File, PrimitiveType};

use crate::error::{DictionaryError, Result};
use crate::norm;
use crate::types::{CategoryValidator, Dictionary, ItemValidator, RegexMatcher, ResolvedLink, TypeValidator};

/// Splits a dotted tag (`_cat.item`, with or without the leading
/// underscore) into its bare category and item parts.
pub(crate) fn split_tag(tag: &str) -> (String, String) {
    let name = tag.strip_prefix('_').unwrap_or(tag);
    match name.split_once('.') {
        Some((category, item)) => (category.to_string(), item.to_string()),
        None => (String::new(), name.to_string()),
    }
}

fn is_yes(s: &str) -> bool {
    cif_parser::text::iequals(s, "yes")
}

fn values(cat: &Category, item: &str) -> Vec<String> {
    cat.row_ids()
        .into_iter()
        .filter_map(|id| cat.get_value(id, item))
        .map(|f| f.as_text().to_string())
        .collect()
}

fn single(cat: &Category, item: &str) -> Option<String> {
    let id = cat.row_ids().into_iter().next()?;
    cat.get_value(id, item).map(|f| f.as_text().to_string())
}

/// Loads a dictionary from `text` (a full CIF document containing the
/// `_item_type_list` loop and `save_`-frame category/item definitions).
pub fn load(text: &str) -> Result<Dictionary> {
    let file = File::load(text)?;
    let block = file
        .datablocks()
        .first()
        .ok_or_else(|| DictionaryError::Schema {
            frame: String::new(),
            message: "dictionary file contains no datablock".to_string(),
        })?;

    load_datablock(block)
}

fn load_datablock(block: &Datablock) -> Result<Dictionary> {
    let name = block
        .category("dictionary")
        .and_then(|c| single(c, "title"))
        .unwrap_or_else(|| block.name().to_string());
    let version = block.category("dictionary").and_then(|c| single(c, "version"));

    let types = load_types(block)?;

    let mut categories: HashMap<String, CategoryValidator> = HashMap::new();
    let mut item_linked_pairs: Vec<(String, String)> = Vec::new();
    let mut items_by_tag: HashMap<String, ItemValidator> = HashMap::new();

    for frame in block.save_frames() {
        let frame_categories: Vec<&Category> = frame.categories().collect();

        if let Some(cat_def) = frame_categories.iter().find(|c| cif_parser::text::iequals(c.name(), "category")) {
            let category_id = single(cat_def, "id").ok_or_else(|| DictionaryError::Schema {
                frame: frame.name().to_string(),
                message: "_category.id is missing".to_string(),
            })?;
            let mandatory = single(cat_def, "mandatory_code").map(|v| is_yes(&v)).unwrap_or(false);
            let keys = frame_categories
                .iter()
                .find(|c| cif_parser::text::iequals(c.name(), "category_key"))
                .map(|c| {
                    values(c, "name")
                        .into_iter()
                        .map(|tag| split_tag(&tag).1)
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();

            categories.entry(norm(&category_id)).or_insert_with(|| CategoryValidator {
                name: category_id.clone(),
                ..Default::default()
            });
            let cv = categories.get_mut(&norm(&category_id)).unwrap();
            cv.keys = keys;
            cv.mandatory = mandatory;
            continue;
        }

        if let Some(item_def) = frame_categories.iter().find(|c| cif_parser::text::iequals(c.name(), "item")) {
            let tag = single(item_def, "name").ok_or_else(|| DictionaryError::Schema {
                frame: frame.name().to_string(),
                message: "_item.name is missing".to_string(),
            })?;
            let (category_id, _bare) = split_tag(&tag);
            let mandatory = single(item_def, "mandatory_code").map(|v| is_yes(&v)).unwrap_or(false);

            let type_code = frame_categories
                .iter()
                .find(|c| cif_parser::text::iequals(c.name(), "item_type"))
                .and_then(|c| single(c, "code"));

            let enums = frame_categories
                .iter()
                .find(|c| cif_parser::text::iequals(c.name(), "item_enumeration"))
                .map(|c| values(c, "value"))
                .unwrap_or_default();

            let default = frame_categories
                .iter()
                .find(|c| cif_parser::text::iequals(c.name(), "item_default"))
                .and_then(|c| single(c, "value"));

            let drel_method = frame_categories
                .iter()
                .find(|c| cif_parser::text::iequals(c.name(), "method"))
                .and_then(|c| single(c, "expression"));

            let (primitive_type, matcher) = match &type_code {
                Some(code) => {
                    let tv = types.get(&norm(code)).ok_or_else(|| DictionaryError::UnknownType(code.clone()))?;
                    (tv.primitive_type, tv.matcher.clone())
                }
                None => (PrimitiveType::Char, None),
            };

            if let Some(linked) = frame_categories.iter().find(|c| cif_parser::text::iequals(c.name(), "item_linked")) {
                for id in linked.row_ids() {
                    let parent_name = linked.get_value(id, "parent_name").map(|f| f.as_text().to_string());
                    let child_name = linked.get_value(id, "child_name").map(|f| f.as_text().to_string());
                    if let (Some(parent), Some(child)) = (parent_name, child_name) {
                        item_linked_pairs.push((parent, child));
                    }
                }
            }

            items_by_tag.insert(
                tag.clone(),
                ItemValidator {
                    tag: tag.clone(),
                    category_id,
                    mandatory,
                    primitive_type,
                    matcher,
                    enums,
                    default,
                    inherits_type_from: None,
                    drel_method,
                },
            );
        }
    }

    // Fix-up pass: a child item with no type of its own inherits its
    // parent's, per `_item_linked.(parent_name,child_name)` (§4.5.1 / §11).
    for (parent_tag, child_tag) in &item_linked_pairs {
        let Some(parent) = items_by_tag.get(parent_tag).cloned() else { continue };
        if let Some(child) = items_by_tag.get_mut(child_tag) {
            if child.primitive_type == PrimitiveType::Char && child.matcher.is_none() {
                child.primitive_type = parent.primitive_type;
                child.matcher = parent.matcher.clone();
                child.inherits_type_from = Some(parent_tag.clone());
            }
        }
    }

    for item in items_by_tag.into_values() {
        let cv = categories.entry(norm(&item.category_id)).or_insert_with(|| CategoryValidator {
            name: item.category_id.clone(),
            ..Default::default()
        });
        let (_, bare) = split_tag(&item.tag);
        cv.items.insert(norm(&bare), item);
    }

    let links = load_links(block)?;
    for link in &links {
        if let Some(cv) = categories.get_mut(&norm(&link.parent_category)) {
            cv.links_as_parent.push(link.clone());
        }
        if let Some(cv) = categories.get_mut(&norm(&link.child_category)) {
            cv.links_as_child.push(link.clone());
        }
    }

    Ok(Dictionary {
        name,
        version,
        types,
        categories,
        links,
    })
}

fn load_types(block: &Datablock) -> Result<HashMap<String, TypeValidator>> {
    let mut types = HashMap::new();
    let Some(cat) = block.category("item_type_list") else {
        return Ok(types);
    };

    for id in cat.row_ids() {
        let code = cat.get_value(id, "code").map(|f| f.as_text().to_string()).ok_or_else(|| DictionaryError::Schema {
            frame: "item_type_list".to_string(),
            message: "a row is missing its code".to_string(),
        })?;
        let primitive_code = cat.get_value(id, "primitive_code").map(|f| f.as_text().to_string()).unwrap_or_default();
        let construct = cat.get_value(id, "construct").map(|f| f.as_text().to_string());

        let matcher = match construct {
            Some(pattern) if !pattern.is_empty() => {
                let re = regex::Regex::new(&pattern).map_err(|source| DictionaryError::BadConstruct {
                    code: code.clone(),
                    source,
                })?;
                Some(RegexMatcher(re))
            }
            _ => None,
        };

        types.insert(
            norm(&code),
            TypeValidator {
                name: code,
                primitive_type: PrimitiveType::parse(&primitive_code),
                construct: matcher,
            },
        );
    }

    Ok(types)
}

fn load_links(block: &Datablock) -> Result<Vec<ResolvedLink>> {
    let mut links = Vec::new();
    let Some(list) = block.category("pdbx_item_linked_group_list") else {
        return Ok(links);
    };

    let labels: HashMap<(String, String), String> = block
        .category("pdbx_item_linked_group")
        .map(|cat| {
            cat.row_ids()
                .into_iter()
                .filter_map(|id| {
                    let category_id = cat.get_value(id, "category_id")?.as_text().to_string();
                    let group_id = cat.get_value(id, "link_group_id")?.as_text().to_string();
                    let label = cat.get_value(id, "label")?.as_text().to_string();
                    Some(((norm(&category_id), group_id), label))
                })
                .collect()
        })
        .unwrap_or_default();

    // Preserve the loop's row order and group rows sharing the same
    // (child_category_id, link_group_id) pair into one link, same as the
    // original's `link_items` fix-up pass over `_pdbx_item_linked_group_list`.
    struct Row {
        child_category_id: String,
        link_group_id: String,
        child_name: String,
        parent_name: String,
        parent_category_id: String,
    }

    let mut rows = Vec::new();
    for id in list.row_ids_in_key_order() {
        let get = |item: &str| list.get_value(id, item).map(|f| f.as_text().to_string()).unwrap_or_default();
        rows.push(Row {
            child_category_id: get("child_category_id"),
            link_group_id: get("link_group_id"),
            child_name: get("child_name"),
            parent_name: get("parent_name"),
            parent_category_id: get("parent_category_id"),
        });
    }

    let mut order: Vec<(String, String)> = Vec::new();
    let mut grouped: HashMap<(String, String), ResolvedLink> = HashMap::new();

    for row in rows {
        let key = (norm(&row.child_category_id), row.link_group_id.clone());
        if !grouped.contains_key(&key) {
            order.push(key.clone());
            let label = labels.get(&key).cloned();
            grouped.insert(
                key.clone(),
                ResolvedLink {
                    link_group_id: row.link_group_id.clone(),
                    parent_category: row.parent_category_id.clone(),
                    parent_items: Vec::new(),
                    child_category: row.child_category_id.clone(),
                    child_items: Vec::new(),
                    label,
                },
            );
        }
        let link = grouped.get_mut(&key).unwrap();
        link.parent_items.push(split_tag(&row.parent_name).1);
        link.child_items.push(split_tag(&row.child_name).1);
    }

    for key in order {
        links.push(grouped.remove(&key).unwrap());
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICT: &str = r#"
data_test_dict.dic
_dictionary.title test_dict.dic
_dictionary.version 1.0

loop_
_item_type_list.code
_item_type_list.primitive_code
_item_type_list.construct
code      char  '[A-Za-z0-9_]*'
text      char  '.*'
int       numb  '[+-]?[0-9]+'

save_cat_1
_category.description     'A simple test category'
_category.id              cat_1
_category.mandatory_code  no
_category_key.name        '_cat_1.id'
save_

save__cat_1.id
_item.name                '_cat_1.id'
_item.category_id         cat_1
_item.mandatory_code      yes
_item_linked.child_name   '_cat_2.parent_id'
_item_linked.parent_name  '_cat_1.id'
_item_type.code           code
save_

save__cat_1.name
_item.name                '_cat_1.name'
_item.category_id         cat_1
_item.mandatory_code      yes
_item_type.code           text
save_

save_cat_2
_category.description     'A second simple test category'
_category.id              cat_2
_category.mandatory_code  no
_category_key.name        '_cat_2.id'
save_

save__cat_2.id
_item.name                '_cat_2.id'
_item.category_id         cat_2
_item.mandatory_code      yes
_item_type.code           int
save_

save__cat_2.parent_id
_item.name                '_cat_2.parent_id'
_item.category_id         cat_2
_item.mandatory_code      yes
save_

save__cat_2.desc
_item.name                '_cat_2.desc'
_item.category_id         cat_2
_item.mandatory_code      yes
_item_type.code           text
save_
"#;

    #[test]
    fn loads_categories_keys_and_types() {
        let dict = load(DICT).unwrap();
        let cat1 = dict.category("cat_1").unwrap();
        assert_eq!(cat1.keys, vec!["id".to_string()]);
        let id_item = cat1.items.get("id").unwrap();
        assert!(id_item.mandatory);
        assert_eq!(id_item.primitive_type, PrimitiveType::Char);
    }

    #[test]
    fn non_key_alias_inherits_parent_type() {
        let dict = load(DICT).unwrap();
        let cat2 = dict.category("cat_2").unwrap();
        let parent_id = cat2.items.get("parent_id").unwrap();
        assert_eq!(parent_id.inherits_type_from.as_deref(), Some("_cat_1.id"));
        assert!(parent_id.matcher.is_some());
    }

    #[test]
    fn unknown_type_code_is_an_error() {
        let bad = DICT.replace("_item_type.code           int", "_item_type.code           bogus");
        let err = load(&bad).unwrap_err();
        assert!(matches!(err, DictionaryError::UnknownType(_)));
    }
}
