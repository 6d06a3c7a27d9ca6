use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000002_create_catalog_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Categories::Slug)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        let mut notebooks = product_table(Notebooks::Table, "fk_notebooks_category_id");
        notebooks
            .col(ColumnDef::new(Notebooks::Diagonal).string_len(255).not_null())
            .col(ColumnDef::new(Notebooks::DisplayType).string_len(255).not_null())
            .col(ColumnDef::new(Notebooks::ProcessorFreq).string_len(255).not_null())
            .col(ColumnDef::new(Notebooks::Ram).string_len(255).not_null())
            .col(ColumnDef::new(Notebooks::Video).string_len(255).not_null())
            .col(
                ColumnDef::new(Notebooks::TimeWithoutCharge)
                    .string_len(255)
                    .not_null(),
            );
        manager.create_table(notebooks).await?;

        let mut smartphones = product_table(Smartphones::Table, "fk_smartphones_category_id");
        smartphones
            .col(ColumnDef::new(Smartphones::Diagonal).string_len(255).not_null())
            .col(ColumnDef::new(Smartphones::DisplayType).string_len(255).not_null())
            .col(ColumnDef::new(Smartphones::Resolution).string_len(255).not_null())
            .col(ColumnDef::new(Smartphones::AccumVolume).string_len(255).not_null())
            .col(ColumnDef::new(Smartphones::Ram).string_len(255).not_null())
            .col(
                ColumnDef::new(Smartphones::Sd)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(ColumnDef::new(Smartphones::SdVolumeMax).string_len(255).not_null())
            .col(ColumnDef::new(Smartphones::MainCamMp).string_len(255).not_null())
            .col(ColumnDef::new(Smartphones::FrontalCamMp).string_len(255).not_null());
        manager.create_table(smartphones).await?;

        for (table, index) in [
            (Notebooks::Table.into_iden(), "idx_notebooks_category_id"),
            (Smartphones::Table.into_iden(), "idx_smartphones_category_id"),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(index)
                        .table(table)
                        .col(Product::CategoryId)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Smartphones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notebooks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

/// Columns shared by every concrete product table.
fn product_table<T>(table: T, fk_name: &str) -> TableCreateStatement
where
    T: IntoIden + Copy + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(Product::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Product::CategoryId).integer().not_null())
        .col(ColumnDef::new(Product::Title).string_len(255).not_null())
        .col(
            ColumnDef::new(Product::Slug)
                .string_len(50)
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(Product::Image).string_len(100).not_null())
        .col(ColumnDef::new(Product::Description).text().null())
        .col(ColumnDef::new(Product::Price).decimal_len(9, 2).not_null())
        .foreign_key(
            ForeignKey::create()
                .name(fk_name)
                .from(table, Product::CategoryId)
                .to(Categories::Table, Categories::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[derive(DeriveIden)]
pub enum Categories {
    Table,
    Id,
    Name,
    Slug,
}

#[derive(DeriveIden)]
enum Product {
    Id,
    CategoryId,
    Title,
    Slug,
    Image,
    Description,
    Price,
}

#[derive(DeriveIden, Clone, Copy)]
enum Notebooks {
    Table,
    Diagonal,
    DisplayType,
    ProcessorFreq,
    Ram,
    Video,
    TimeWithoutCharge,
}

#[derive(DeriveIden, Clone, Copy)]
enum Smartphones {
    Table,
    Diagonal,
    DisplayType,
    Resolution,
    AccumVolume,
    Ram,
    Sd,
    SdVolumeMax,
    MainCamMp,
    FrontalCamMp,
}
