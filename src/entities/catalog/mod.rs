/// Catalog entities: categories and the concrete product tables.
pub mod category;
pub mod notebook;
pub mod smartphone;

pub use category::{Entity as Category, Model as CategoryModel};
pub use notebook::{Entity as Notebook, Model as NotebookModel};
pub use smartphone::{Entity as Smartphone, Model as SmartphoneModel};
