/// Commerce entities: customers, carts and generic cart lines
pub mod cart;
pub mod cart_product;
pub mod cart_product_link;
pub mod customer;

// Re-export entities
pub use cart::{Entity as Cart, Model as CartModel};
pub use cart_product::{Entity as CartProduct, Model as CartProductModel};
pub use cart_product_link::{Entity as CartProductLink, Model as CartProductLinkModel};
pub use customer::{Entity as Customer, Model as CustomerModel};
