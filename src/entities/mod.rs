//! sea-orm entities for every persisted table.

pub mod catalog;
pub mod commerce;
pub mod content_type;

pub use content_type::{Entity as ContentType, Model as ContentTypeModel};
