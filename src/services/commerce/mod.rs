/// Commerce services: categories, products, customers and carts
pub mod cart_service;
pub mod category_service;
pub mod customer_service;
pub mod product_service;

// Re-export services for convenience
pub use cart_service::{AddToCartInput, CartLine, CartService, CartWithProducts, MAX_QUANTITY};
pub use category_service::{CategoryInput, CategoryService};
pub use customer_service::{CustomerInput, CustomerService};
pub use product_service::{NotebookSpecs, ProductInput, ProductService, SmartphoneSpecs};
