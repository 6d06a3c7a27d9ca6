use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Membership row of a cart's unordered product collection.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_product_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub cart_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub cart_product_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cart::Entity",
        from = "Column::CartId",
        to = "super::cart::Column::Id",
        on_delete = "Cascade"
    )]
    Cart,
    #[sea_orm(
        belongs_to = "super::cart_product::Entity",
        from = "Column::CartProductId",
        to = "super::cart_product::Column::Id",
        on_delete = "Cascade"
    )]
    CartProduct,
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cart.def()
    }
}

impl Related<super::cart_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartProduct.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
