use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Registry row that gives a model type tag a numeric id.
///
/// Cart lines store `(content_type_id, object_id)` instead of a typed foreign
/// key, so the row named here decides which table `object_id` points into.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub app_label: String,
    pub model: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::commerce::cart_product::Entity")]
    CartProducts,
}

impl Related<super::commerce::cart_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartProducts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Content types whose tag is one of `models`.
    pub fn find_by_models<I, S>(models: I) -> Select<Entity>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::find().filter(Column::Model.is_in(models.into_iter().map(Into::into)))
    }

    pub fn find_by_model(model: &str) -> Select<Entity> {
        Self::find().filter(Column::Model.eq(model))
    }
}
