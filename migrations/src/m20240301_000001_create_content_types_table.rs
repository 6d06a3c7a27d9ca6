use sea_orm_migration::prelude::*;

pub struct Migration;

/// App label shared by every catalog variant registered below.
const CATALOG_APP_LABEL: &str = "catalog";

/// Type tags of the concrete product tables. Cart lines point at these rows.
const PRODUCT_MODELS: [&str; 2] = ["notebook", "smartphone"];

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000001_create_content_types_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContentTypes::AppLabel).string_len(100).not_null())
                    .col(ColumnDef::new(ContentTypes::Model).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_types_app_label_model")
                    .table(ContentTypes::Table)
                    .col(ContentTypes::AppLabel)
                    .col(ContentTypes::Model)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert();
        seed.into_table(ContentTypes::Table)
            .columns([ContentTypes::AppLabel, ContentTypes::Model]);
        for model in PRODUCT_MODELS {
            seed.values_panic([CATALOG_APP_LABEL.into(), model.into()]);
        }
        manager.exec_stmt(seed).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContentTypes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ContentTypes {
    Table,
    Id,
    AppLabel,
    Model,
}
