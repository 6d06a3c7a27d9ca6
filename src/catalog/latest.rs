use sea_orm::{ConnectionTrait, DbErr};
use tracing::debug;

use super::{AnyProduct, ProductFields, ProductKind};
use crate::entities::ContentType;

/// Rows fetched per product type.
pub const LATEST_PER_TYPE: u64 = 5;

/// Newest products across several product types, as shown on the main page.
pub struct LatestProducts;

impl LatestProducts {
    /// Up to [`LATEST_PER_TYPE`] newest rows of each type named in `models`.
    ///
    /// Types are visited in request order, skipping repeats and tags that are
    /// not registered content types. When `with_respect_to` names a registered
    /// type that was also requested, that type's rows are moved to the front
    /// and the rest keep their relative order.
    pub async fn for_main_page<C>(
        db: &C,
        models: &[&str],
        with_respect_to: Option<&str>,
    ) -> Result<Vec<AnyProduct>, DbErr>
    where
        C: ConnectionTrait,
    {
        let registered: Vec<String> = ContentType::find_by_models(models.iter().copied())
            .all(db)
            .await?
            .into_iter()
            .map(|ct| ct.model)
            .collect();

        let kinds = requested_kinds(models, &registered);
        debug!(?kinds, "Collecting latest products");

        let mut products = Vec::new();
        for kind in &kinds {
            products.extend(kind.latest(db, LATEST_PER_TYPE).await?);
        }

        if let Some(priority) = with_respect_to.and_then(ProductKind::from_model) {
            if kinds.contains(&priority) {
                prioritize(&mut products, priority);
            }
        }

        Ok(products)
    }
}

/// Kinds named in `models` that are registered, deduplicated, in request order.
fn requested_kinds(models: &[&str], registered: &[String]) -> Vec<ProductKind> {
    let mut kinds = Vec::new();
    for model in models {
        if !registered.iter().any(|r| r == model) {
            continue;
        }
        if let Some(kind) = ProductKind::from_model(model) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
    }
    kinds
}

fn prioritize(products: &mut [AnyProduct], priority: ProductKind) {
    products.sort_by_key(|product| product.kind() != priority);
}
