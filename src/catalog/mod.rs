//! Product variants and the lookups that work across them.
//!
//! Notebooks and smartphones live in separate tables that repeat the same
//! product columns. [`ProductFields`] is the shared view over those columns,
//! [`AnyProduct`] holds a row of either table, and [`ProductKind`] is the type
//! tag stored in the content-type registry.

pub mod latest;
pub mod validation;

use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::catalog::{notebook, smartphone, CategoryModel, Notebook, NotebookModel, Smartphone, SmartphoneModel};
use crate::entities::{ContentType, ContentTypeModel};
use crate::errors::ServiceError;

pub use latest::{LatestProducts, LATEST_PER_TYPE};

/// Type tag of a concrete product table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Notebook,
    Smartphone,
}

impl ProductKind {
    pub const ALL: [ProductKind; 2] = [ProductKind::Notebook, ProductKind::Smartphone];

    /// Model name registered for this kind in the content-type table.
    pub fn model(self) -> &'static str {
        match self {
            ProductKind::Notebook => "notebook",
            ProductKind::Smartphone => "smartphone",
        }
    }

    pub fn from_model(model: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.model() == model)
    }

    /// Registry row for this kind.
    pub async fn content_type<C>(self, db: &C) -> Result<ContentTypeModel, ServiceError>
    where
        C: ConnectionTrait,
    {
        ContentType::find_by_model(self.model())
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Content type", self.model()))
    }

    /// Up to `limit` rows of this kind, highest id first.
    pub async fn latest<C>(self, db: &C, limit: u64) -> Result<Vec<AnyProduct>, DbErr>
    where
        C: ConnectionTrait,
    {
        let products = match self {
            ProductKind::Notebook => Notebook::find()
                .order_by_desc(notebook::Column::Id)
                .limit(limit)
                .all(db)
                .await?
                .into_iter()
                .map(AnyProduct::Notebook)
                .collect(),
            ProductKind::Smartphone => Smartphone::find()
                .order_by_desc(smartphone::Column::Id)
                .limit(limit)
                .all(db)
                .await?
                .into_iter()
                .map(AnyProduct::Smartphone)
                .collect(),
        };
        Ok(products)
    }

    pub async fn find<C>(self, db: &C, id: i32) -> Result<Option<AnyProduct>, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(match self {
            ProductKind::Notebook => Notebook::find_by_id(id).one(db).await?.map(AnyProduct::Notebook),
            ProductKind::Smartphone => Smartphone::find_by_id(id)
                .one(db)
                .await?
                .map(AnyProduct::Smartphone),
        })
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model())
    }
}

/// Columns every product table carries.
pub trait ProductFields {
    fn kind(&self) -> ProductKind;
    fn id(&self) -> i32;
    fn category_id(&self) -> i32;
    fn title(&self) -> &str;
    fn slug(&self) -> &str;
    /// Media storage name of the normalized image.
    fn image(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn price(&self) -> Decimal;

    /// `"<category name> <title>"`, the label used in listings.
    fn label(&self, category: &CategoryModel) -> String {
        format!("{} {}", category.name, self.title())
    }
}

macro_rules! impl_product_fields {
    ($model:ty, $kind:expr) => {
        impl ProductFields for $model {
            fn kind(&self) -> ProductKind {
                $kind
            }
            fn id(&self) -> i32 {
                self.id
            }
            fn category_id(&self) -> i32 {
                self.category_id
            }
            fn title(&self) -> &str {
                &self.title
            }
            fn slug(&self) -> &str {
                &self.slug
            }
            fn image(&self) -> &str {
                &self.image
            }
            fn description(&self) -> Option<&str> {
                self.description.as_deref()
            }
            fn price(&self) -> Decimal {
                self.price
            }
        }
    };
}

impl_product_fields!(NotebookModel, ProductKind::Notebook);
impl_product_fields!(SmartphoneModel, ProductKind::Smartphone);

/// A row from any product table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnyProduct {
    Notebook(NotebookModel),
    Smartphone(SmartphoneModel),
}

impl AnyProduct {
    fn fields(&self) -> &dyn ProductFields {
        match self {
            AnyProduct::Notebook(model) => model,
            AnyProduct::Smartphone(model) => model,
        }
    }

    pub fn product_ref(&self) -> ProductRef {
        ProductRef::new(self.kind(), self.id())
    }
}

impl ProductFields for AnyProduct {
    fn kind(&self) -> ProductKind {
        self.fields().kind()
    }
    fn id(&self) -> i32 {
        self.fields().id()
    }
    fn category_id(&self) -> i32 {
        self.fields().category_id()
    }
    fn title(&self) -> &str {
        self.fields().title()
    }
    fn slug(&self) -> &str {
        self.fields().slug()
    }
    fn image(&self) -> &str {
        self.fields().image()
    }
    fn description(&self) -> Option<&str> {
        self.fields().description()
    }
    fn price(&self) -> Decimal {
        self.fields().price()
    }
}

impl fmt::Display for AnyProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Kind plus row id: what a cart line stores, in typed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductRef {
    pub kind: ProductKind,
    pub id: i32,
}

impl ProductRef {
    pub fn new(kind: ProductKind, id: i32) -> Self {
        Self { kind, id }
    }

    pub fn notebook(id: i32) -> Self {
        Self::new(ProductKind::Notebook, id)
    }

    pub fn smartphone(id: i32) -> Self {
        Self::new(ProductKind::Smartphone, id)
    }
}

impl fmt::Display for ProductRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use rust_decimal_macros::dec;

    pub fn notebook(id: i32) -> AnyProduct {
        AnyProduct::Notebook(NotebookModel {
            id,
            category_id: 1,
            title: format!("Notebook {id}"),
            slug: format!("notebook-{id}"),
            image: format!("notebook-{id}.jpg"),
            description: None,
            price: dec!(999.00),
            diagonal: "14".into(),
            display_type: "IPS".into(),
            processor_freq: "3.2 GHz".into(),
            ram: "16 GB".into(),
            video: "integrated".into(),
            time_without_charge: "12 h".into(),
        })
    }

    pub fn smartphone(id: i32) -> AnyProduct {
        AnyProduct::Smartphone(SmartphoneModel {
            id,
            category_id: 2,
            title: format!("Smartphone {id}"),
            slug: format!("smartphone-{id}"),
            image: format!("smartphone-{id}.jpg"),
            description: Some("phone".into()),
            price: dec!(499.50),
            diagonal: "6.1".into(),
            display_type: "OLED".into(),
            resolution: "2532x1170".into(),
            accum_volume: "3200 mAh".into(),
            ram: "6 GB".into(),
            sd: false,
            sd_volume_max: "0".into(),
            main_cam_mp: "12".into(),
            frontal_cam_mp: "12".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_model_names() {
        for kind in ProductKind::ALL {
            assert_eq!(ProductKind::from_model(kind.model()), Some(kind));
        }
        assert_eq!(ProductKind::from_model("category"), None);
        assert_eq!(ProductKind::from_model("Notebook"), None);
    }

    #[test]
    fn any_product_exposes_shared_fields() {
        let phone = fixtures::smartphone(4);
        assert_eq!(phone.kind(), ProductKind::Smartphone);
        assert_eq!(phone.product_ref(), ProductRef::smartphone(4));
        assert_eq!(phone.description(), Some("phone"));
        assert_eq!(phone.to_string(), "Smartphone 4");
    }

    #[test]
    fn label_prefixes_the_category_name() {
        let category = CategoryModel {
            id: 1,
            name: "Notebooks".into(),
            slug: "notebooks".into(),
        };
        assert_eq!(fixtures::notebook(3).label(&category), "Notebooks Notebook 3");
    }

    #[test]
    fn any_product_serializes_with_a_kind_tag() {
        let value = serde_json::to_value(fixtures::notebook(1)).unwrap();
        assert_eq!(value["kind"], "notebook");
        assert_eq!(value["slug"], "notebook-1");
    }
}
