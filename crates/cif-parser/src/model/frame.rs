//! Save frames (`save_NAME ... save_`, §3): a named, nested bag of
//! categories used by dictionary files to describe one category or item.
//! Structurally identical to a [`super::datablock::Datablock`] minus the
//! ability to nest further save frames (§4.3's grammar only allows one
//! level of `save_` nesting, inside a datablock).

use super::category::Category;
use super::datablock::CategorySet;

pub struct SaveFrame {
    name: String,
    categories: CategorySet,
}

impl SaveFrame {
    pub fn new(name: impl Into<String>) -> Self {
        SaveFrame {
            name: name.into(),
            categories: CategorySet::new(),
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::row::Field;

    #[test]
    fn save_frame_holds_categories_by_name() {
        let mut frame = SaveFrame::new("_atom_type");
        frame
            .category_mut("item_type")
            .emplace(vec![("code".into(), Field::from("numb"))])
            .unwrap();
        assert_eq!(frame.category("ITEM_TYPE").unwrap().row_count(), 1);
    }
}
