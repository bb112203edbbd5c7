//! The in-memory relational data model (component D, §4.4): datablocks,
//! categories, rows and items, the red-black key index, the condition
//! DSL, and cascade-capable mutation.

pub mod category;
pub mod condition;
pub mod datablock;
pub mod file;
pub mod frame;
pub mod index;
pub mod row;

pub use category::Category;
pub use condition::{all, any, key, Condition};
pub use datablock::{CategorySet, Datablock};
pub use file::File;
pub use frame::SaveFrame;
pub use row::{Field, RowId};
