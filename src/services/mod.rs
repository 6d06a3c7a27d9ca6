pub mod commerce;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::media::{FileSystemStorage, ImageNormalizer, MediaStorage};
use commerce::{CartService, CategoryService, CustomerService, ProductService};
use std::sync::Arc;

/// Service container shared by every caller of the crate.
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub products: Arc<ProductService>,
    pub customers: Arc<CustomerService>,
    pub carts: Arc<CartService>,
}

impl AppServices {
    /// Builds the services over `db`, storing images under the configured media root.
    pub fn new(db: Arc<DbPool>, config: &AppConfig) -> Self {
        let storage: Arc<dyn MediaStorage> = Arc::new(FileSystemStorage::new(&config.media.root));
        Self::with_storage(db, storage, ImageNormalizer::from_config(&config.media.image))
    }

    pub fn with_storage(
        db: Arc<DbPool>,
        storage: Arc<dyn MediaStorage>,
        normalizer: ImageNormalizer,
    ) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(db.clone())),
            products: Arc::new(ProductService::new(db.clone(), storage, normalizer)),
            customers: Arc::new(CustomerService::new(db.clone())),
            carts: Arc::new(CartService::new(db)),
        }
    }
}
