//! Integration tests for dictionary-driven validation, running a small
//! synthetic DDL1/DDL2 dictionary (in place of a full core dictionary, which
//! the workspace does not vendor) through the cascade and validation engine.

use cif_parser::{key, File};
use cif_validator::{ErrorCategory, ValidationMode, Validator};

const DICT: &str = r#"
data_test_dict.dic
_dictionary.title test_dict.dic
_dictionary.version 1.0

loop_
_item_type_list.code
_item_type_list.primitive_code
_item_type_list.construct
code char '[A-Za-z0-9_]*'
text char '.*'
int  numb '[+-]?[0-9]+'

save_cell
_category.id cell
_category.mandatory_code yes
_category_key.name '_cell.id'
save_

save__cell.id
_item.name '_cell.id'
_item.category_id cell
_item.mandatory_code yes
_item_type.code code
save_

save__cell.length_a
_item.name '_cell.length_a'
_item.category_id cell
_item.mandatory_code yes
_item_type.code int
save_

save_atom_site
_category.id atom_site
_category.mandatory_code no
_category_key.name '_atom_site.label'
save_

save__atom_site.label
_item.name '_atom_site.label'
_item.category_id atom_site
_item.mandatory_code yes
_item_linked.child_name '_atom_site.cell_id'
_item_linked.parent_name '_cell.id'
_item_type.code code
save_

save__atom_site.cell_id
_item.name '_atom_site.cell_id'
_item.category_id atom_site
_item.mandatory_code yes
save_

save__atom_site.type_symbol
_item.name '_atom_site.type_symbol'
_item.category_id atom_site
_item.mandatory_code yes
_item_type.code text
_item_enumeration.value C
_item_enumeration.value N
_item_enumeration.value O
save_

loop_
_pdbx_item_linked_group_list.child_category_id
_pdbx_item_linked_group_list.link_group_id
_pdbx_item_linked_group_list.child_name
_pdbx_item_linked_group_list.parent_name
_pdbx_item_linked_group_list.parent_category_id
atom_site 1 '_atom_site.cell_id' '_cell.id' cell
"#;

fn validator() -> Validator {
    Validator::new().with_dictionary_text("cif_core_test_dict", DICT).unwrap()
}

#[test]
fn loads_dictionary_with_keys_and_links() {
    let v = validator();
    let dict = v.dictionary().unwrap();
    let cell = dict.category("cell").unwrap();
    assert_eq!(cell.keys, vec!["id".to_string()]);
    assert_eq!(dict.links_for_parent("cell").len(), 1);
}

#[test]
fn clean_file_validates_with_no_errors() {
    let text = "\
data_structure
_cell.id c1
_cell.length_a 10

loop_
_atom_site.label
_atom_site.cell_id
_atom_site.type_symbol
Si1 c1 C
O1  c1 O
";
    let mut file = File::load(text).unwrap();
    let result = validator().validate(&mut file);
    assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
}

#[test]
fn dangling_reference_is_flagged_in_strict_mode() {
    let text = "\
data_structure
_cell.id c1
_cell.length_a 10

loop_
_atom_site.label
_atom_site.cell_id
_atom_site.type_symbol
Si1 missing_cell C
";
    let mut file = File::load(text).unwrap();
    let result = validator().validate(&mut file);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.category == ErrorCategory::ReferentialIntegrity));
}

#[test]
fn value_outside_enumeration_is_a_type_level_error() {
    let text = "\
data_structure
_cell.id c1
_cell.length_a 10

loop_
_atom_site.label
_atom_site.cell_id
_atom_site.type_symbol
Si1 c1 Xx
";
    let mut file = File::load(text).unwrap();
    let result = validator().with_mode(ValidationMode::Strict).validate(&mut file);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.category == ErrorCategory::EnumerationError));
}

/// Renaming a `_cell.id` key cascades into every child `_atom_site.cell_id`
/// that references it (the non-split case, §8 S3).
#[test]
fn renaming_a_parent_key_cascades_to_children() {
    let dict = validator().dictionary().unwrap().clone();
    let mut file = File::load(
        "\
data_structure
_cell.id c1
_cell.length_a 10

loop_
_atom_site.label
_atom_site.cell_id
_atom_site.type_symbol
Si1 c1 C
O1  c1 O
",
    )
    .unwrap();
    file.attach_schema(dict.clone());

    let block = file.datablock_mut("structure");
    let row = block.category("cell").unwrap().row_ids()[0];
    block.assign(dict.as_ref(), "cell", row, "id", "c2".into(), true).unwrap();

    let atom_site = block.category("atom_site").unwrap();
    for id in atom_site.row_ids() {
        assert_eq!(atom_site.get_value(id, "cell_id").unwrap().as_text(), "c2");
    }
}

/// Deleting a parent row cascades into orphaned children (§8 S2).
#[test]
fn erasing_a_parent_row_removes_orphaned_children() {
    let dict = validator().dictionary().unwrap().clone();
    let mut file = File::load(
        "\
data_structure
_cell.id c1
_cell.length_a 10

loop_
_atom_site.label
_atom_site.cell_id
_atom_site.type_symbol
Si1 c1 C
O1  c1 O
",
    )
    .unwrap();
    file.attach_schema(dict.clone());

    let block = file.datablock_mut("structure");
    block.erase(dict.as_ref(), "cell", &key("id").eq("c1")).unwrap();

    assert_eq!(block.category("cell").unwrap().row_ids().len(), 0);
    assert_eq!(block.category("atom_site").unwrap().row_ids().len(), 0);
}
