use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart line pointing at a product of any variant.
///
/// `(content_type_id, object_id)` is a generic reference: the content type
/// names the product table and `object_id` is a row id in it. The database
/// does not check that the row exists.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: i32,
    pub cart_id: i32,
    pub content_type_id: i32,
    pub object_id: i32,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((9, 2)))")]
    pub final_price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_delete = "Cascade"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::cart::Entity",
        from = "Column::CartId",
        to = "super::cart::Column::Id",
        on_delete = "Cascade"
    )]
    Cart,
    #[sea_orm(
        belongs_to = "crate::entities::content_type::Entity",
        from = "Column::ContentTypeId",
        to = "crate::entities::content_type::Column::Id",
        on_delete = "Cascade"
    )]
    ContentType,
    #[sea_orm(has_many = "super::cart_product_link::Entity")]
    Links,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cart.def()
    }
}

impl Related<crate::entities::content_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContentType.def()
    }
}

impl Related<super::cart_product_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Links.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
