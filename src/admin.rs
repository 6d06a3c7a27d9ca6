//! Choices offered by the admin forms.

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::catalog::ProductKind;
use crate::entities::catalog::{category, Category, CategoryModel};

/// The only category a notebook may be filed under from the admin.
pub const NOTEBOOK_CATEGORY_SLUG: &str = "notebooks";

/// Categories selectable for the category field of a `kind` record.
///
/// Notebooks are restricted to the category whose slug is
/// [`NOTEBOOK_CATEGORY_SLUG`]; every other kind may pick any category.
pub async fn category_choices<C>(db: &C, kind: ProductKind) -> Result<Vec<CategoryModel>, DbErr>
where
    C: ConnectionTrait,
{
    let query = Category::find().order_by_asc(category::Column::Id);
    match kind {
        ProductKind::Notebook => {
            query
                .filter(category::Column::Slug.eq(NOTEBOOK_CATEGORY_SLUG))
                .all(db)
                .await
        }
        ProductKind::Smartphone => query.all(db).await,
    }
}
