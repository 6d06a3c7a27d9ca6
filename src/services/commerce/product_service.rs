use crate::{
    catalog::{
        validation::{validate_price, validate_slug},
        AnyProduct, ProductFields, ProductKind, ProductRef,
    },
    entities::catalog::{notebook, smartphone, Category, Notebook, Smartphone},
    errors::ServiceError,
    media::{ImageNormalizer, ImageUpload, MediaStorage},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

/// Product service for notebooks and smartphones.
///
/// Every write that carries an image runs it through the [`ImageNormalizer`]
/// first. A source that cannot be decoded aborts the write before anything
/// reaches storage or the database.
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
    storage: Arc<dyn MediaStorage>,
    normalizer: ImageNormalizer,
}

impl ProductService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        storage: Arc<dyn MediaStorage>,
        normalizer: ImageNormalizer,
    ) -> Self {
        Self {
            db,
            storage,
            normalizer,
        }
    }

    /// Creates a notebook with a normalized copy of `upload` as its image.
    #[instrument(skip(self, upload), fields(image = %upload.file_name))]
    pub async fn create_notebook(
        &self,
        input: ProductInput,
        specs: NotebookSpecs,
        upload: ImageUpload,
    ) -> Result<AnyProduct, ServiceError> {
        input.validate()?;
        specs.validate()?;
        self.ensure_category(input.category_id).await?;

        let image = self.store_image(&upload).await?;
        let slug = input.slug.clone();
        let model = notebook::ActiveModel {
            category_id: Set(input.category_id),
            title: Set(input.title),
            slug: Set(input.slug),
            image: Set(image.clone()),
            description: Set(input.description),
            price: Set(input.price),
            diagonal: Set(specs.diagonal),
            display_type: Set(specs.display_type),
            processor_freq: Set(specs.processor_freq),
            ram: Set(specs.ram),
            video: Set(specs.video),
            time_without_charge: Set(specs.time_without_charge),
            ..Default::default()
        };

        let created = self
            .insert_or_discard(model.insert(&*self.db).await, &image, &slug)
            .await?;
        info!(product_id = created.id, slug = %created.slug, "Created notebook");
        Ok(AnyProduct::Notebook(created))
    }

    /// Creates a smartphone with a normalized copy of `upload` as its image.
    #[instrument(skip(self, upload), fields(image = %upload.file_name))]
    pub async fn create_smartphone(
        &self,
        input: ProductInput,
        specs: SmartphoneSpecs,
        upload: ImageUpload,
    ) -> Result<AnyProduct, ServiceError> {
        input.validate()?;
        specs.validate()?;
        self.ensure_category(input.category_id).await?;

        let image = self.store_image(&upload).await?;
        let slug = input.slug.clone();
        let model = smartphone::ActiveModel {
            category_id: Set(input.category_id),
            title: Set(input.title),
            slug: Set(input.slug),
            image: Set(image.clone()),
            description: Set(input.description),
            price: Set(input.price),
            diagonal: Set(specs.diagonal),
            display_type: Set(specs.display_type),
            resolution: Set(specs.resolution),
            accum_volume: Set(specs.accum_volume),
            ram: Set(specs.ram),
            sd: Set(specs.sd),
            sd_volume_max: Set(specs.sd_volume_max),
            main_cam_mp: Set(specs.main_cam_mp),
            frontal_cam_mp: Set(specs.frontal_cam_mp),
            ..Default::default()
        };

        let created = self
            .insert_or_discard(model.insert(&*self.db).await, &image, &slug)
            .await?;
        info!(product_id = created.id, slug = %created.slug, "Created smartphone");
        Ok(AnyProduct::Smartphone(created))
    }

    pub async fn get(&self, product: ProductRef) -> Result<AnyProduct, ServiceError> {
        product
            .kind
            .find(&*self.db, product.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", product))
    }

    /// Products of one kind filed under `category_id`, oldest first.
    pub async fn list_by_category(
        &self,
        kind: ProductKind,
        category_id: i32,
    ) -> Result<Vec<AnyProduct>, ServiceError> {
        let products = match kind {
            ProductKind::Notebook => Notebook::find()
                .filter(notebook::Column::CategoryId.eq(category_id))
                .order_by_asc(notebook::Column::Id)
                .all(&*self.db)
                .await?
                .into_iter()
                .map(AnyProduct::Notebook)
                .collect(),
            ProductKind::Smartphone => Smartphone::find()
                .filter(smartphone::Column::CategoryId.eq(category_id))
                .order_by_asc(smartphone::Column::Id)
                .all(&*self.db)
                .await?
                .into_iter()
                .map(AnyProduct::Smartphone)
                .collect(),
        };
        Ok(products)
    }

    /// Swaps the product image for a normalized copy of `upload` and removes
    /// the previous file.
    #[instrument(skip(self, upload), fields(image = %upload.file_name))]
    pub async fn replace_image(
        &self,
        product: ProductRef,
        upload: ImageUpload,
    ) -> Result<AnyProduct, ServiceError> {
        let current = self.get(product).await?;
        let image = self.store_image(&upload).await?;

        let result = match current.clone() {
            AnyProduct::Notebook(model) => {
                let mut active: notebook::ActiveModel = model.into();
                active.image = Set(image.clone());
                active.update(&*self.db).await.map(AnyProduct::Notebook)
            }
            AnyProduct::Smartphone(model) => {
                let mut active: smartphone::ActiveModel = model.into();
                active.image = Set(image.clone());
                active.update(&*self.db).await.map(AnyProduct::Smartphone)
            }
        };

        let updated = match result {
            Ok(updated) => updated,
            Err(err) => {
                self.discard_image(&image).await;
                return Err(err.into());
            }
        };

        if current.image() != image {
            self.discard_image(current.image()).await;
        }
        info!(%product, image = %image, "Replaced product image");
        Ok(updated)
    }

    /// Deletes the product row and its stored image.
    ///
    /// Cart lines that point at the product are left alone; resolving them
    /// afterwards yields no product.
    #[instrument(skip(self))]
    pub async fn delete(&self, product: ProductRef) -> Result<(), ServiceError> {
        let current = self.get(product).await?;
        match product.kind {
            ProductKind::Notebook => {
                Notebook::delete_by_id(product.id).exec(&*self.db).await?;
            }
            ProductKind::Smartphone => {
                Smartphone::delete_by_id(product.id).exec(&*self.db).await?;
            }
        }
        self.discard_image(current.image()).await;
        info!(%product, "Deleted product");
        Ok(())
    }

    /// Bytes of the stored, normalized image.
    pub async fn open_image(&self, product: ProductRef) -> Result<Vec<u8>, ServiceError> {
        let current = self.get(product).await?;
        Ok(self.storage.open(current.image()).await?)
    }

    async fn ensure_category(&self, category_id: i32) -> Result<(), ServiceError> {
        Category::find_by_id(category_id)
            .one(&*self.db)
            .await?
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found("Category", category_id))
    }

    async fn store_image(&self, upload: &ImageUpload) -> Result<String, ServiceError> {
        let normalized = self.normalizer.normalize(&upload.bytes)?;
        let name = self
            .storage
            .save(&upload.stored_name(), &normalized.bytes)
            .await?;
        Ok(name)
    }

    async fn insert_or_discard<M>(
        &self,
        inserted: Result<M, DbErr>,
        image: &str,
        slug: &str,
    ) -> Result<M, ServiceError> {
        match inserted {
            Ok(model) => Ok(model),
            Err(err) => {
                self.discard_image(image).await;
                Err(ServiceError::from_write(
                    err,
                    format!("Product slug {:?}", slug),
                ))
            }
        }
    }

    async fn discard_image(&self, name: &str) {
        match self.storage.delete(name).await {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(image = %name, error = %err, "Failed to remove stored image"),
        }
    }
}

/// Columns shared by every product kind.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductInput {
    pub category_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(custom = "validate_slug")]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(custom = "validate_price")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NotebookSpecs {
    #[validate(length(max = 255))]
    pub diagonal: String,
    #[validate(length(max = 255))]
    pub display_type: String,
    #[validate(length(max = 255))]
    pub processor_freq: String,
    #[validate(length(max = 255))]
    pub ram: String,
    #[validate(length(max = 255))]
    pub video: String,
    #[validate(length(max = 255))]
    pub time_without_charge: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SmartphoneSpecs {
    #[validate(length(max = 255))]
    pub diagonal: String,
    #[validate(length(max = 255))]
    pub display_type: String,
    #[validate(length(max = 255))]
    pub resolution: String,
    #[validate(length(max = 255))]
    pub accum_volume: String,
    #[validate(length(max = 255))]
    pub ram: String,
    /// Whether the phone takes a memory card.
    #[serde(default = "default_sd")]
    pub sd: bool,
    #[validate(length(max = 255))]
    pub sd_volume_max: String,
    #[validate(length(max = 255))]
    pub main_cam_mp: String,
    #[validate(length(max = 255))]
    pub frontal_cam_mp: String,
}

fn default_sd() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(slug: &str, price: Decimal) -> ProductInput {
        ProductInput {
            category_id: 1,
            title: "Dell XPS 13".into(),
            slug: slug.into(),
            description: None,
            price,
        }
    }

    #[test]
    fn product_input_checks_slug_and_price() {
        assert!(input("dell-xps-13", dec!(1299.99)).validate().is_ok());

        let errors = input("dell xps", dec!(1299.999)).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("slug"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn smartphone_specs_default_to_sd_support() {
        let specs: SmartphoneSpecs = serde_json::from_value(serde_json::json!({
            "diagonal": "6.1",
            "display_type": "OLED",
            "resolution": "2532x1170",
            "accum_volume": "3200 mAh",
            "ram": "6 GB",
            "sd_volume_max": "0",
            "main_cam_mp": "12",
            "frontal_cam_mp": "12"
        }))
        .unwrap();
        assert!(specs.sd);
    }
}
