use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shopping cart entity
///
/// `total_products` and `final_price` are stored values. Nothing recomputes
/// them when lines change; callers keep them current.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub total_products: i32,
    #[sea_orm(column_type = "Decimal(Some((9, 2)))")]
    pub final_price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::OwnerId",
        to = "super::customer::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Owner,
    /// Lines whose `cart_id` is this cart.
    #[sea_orm(has_many = "super::cart_product::Entity")]
    Lines,
    #[sea_orm(has_many = "super::cart_product_link::Entity")]
    Links,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::cart_product_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Links.def()
    }
}

// The cart's product collection goes through the link table.
impl Related<super::cart_product::Entity> for Entity {
    fn to() -> RelationDef {
        super::cart_product_link::Relation::CartProduct.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::cart_product_link::Relation::Cart.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
