use crate::{
    catalog::validation::validate_slug,
    entities::catalog::{category, Category, CategoryModel},
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Category management. Deleting a category removes its products.
#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
}

impl CategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a category. A slug that is already taken yields `Conflict`.
    #[instrument(skip(self))]
    pub async fn create(&self, input: CategoryInput) -> Result<CategoryModel, ServiceError> {
        input.validate()?;

        let slug = input.slug.clone();
        let category = category::ActiveModel {
            name: Set(input.name),
            slug: Set(input.slug),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|e| ServiceError::from_write(e, format!("Category slug {:?}", slug)))?;

        info!(category_id = category.id, slug = %category.slug, "Created category");
        Ok(category)
    }

    pub async fn get(&self, id: i32) -> Result<CategoryModel, ServiceError> {
        Category::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryModel, ServiceError> {
        Category::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", slug))
    }

    /// All categories, ordered by name.
    pub async fn list(&self) -> Result<Vec<CategoryModel>, ServiceError> {
        Ok(Category::find()
            .order_by_asc(category::Column::Name)
            .order_by_asc(category::Column::Id)
            .all(&*self.db)
            .await?)
    }

    /// Deletes a category together with every product filed under it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = Category::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Category", id));
        }
        info!(category_id = id, "Deleted category");
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom = "validate_slug")]
    pub slug: String,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
        }
    }
}
