use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000004_create_cart_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Carts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Carts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Carts::OwnerId).integer().not_null())
                    .col(
                        ColumnDef::new(Carts::TotalProducts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Carts::FinalPrice).decimal_len(9, 2).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_carts_owner_id")
                            .from(Carts::Table, Carts::OwnerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // object_id has no foreign key; content_type_id names the table it points into.
        manager
            .create_table(
                Table::create()
                    .table(CartProducts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CartProducts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CartProducts::CustomerId).integer().not_null())
                    .col(ColumnDef::new(CartProducts::CartId).integer().not_null())
                    .col(ColumnDef::new(CartProducts::ContentTypeId).integer().not_null())
                    .col(ColumnDef::new(CartProducts::ObjectId).integer().not_null())
                    .col(
                        ColumnDef::new(CartProducts::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(CartProducts::FinalPrice)
                            .decimal_len(9, 2)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_products_customer_id")
                            .from(CartProducts::Table, CartProducts::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_products_cart_id")
                            .from(CartProducts::Table, CartProducts::CartId)
                            .to(Carts::Table, Carts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_products_content_type_id")
                            .from(CartProducts::Table, CartProducts::ContentTypeId)
                            .to(ContentTypes::Table, ContentTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CartProductLinks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CartProductLinks::CartId).integer().not_null())
                    .col(
                        ColumnDef::new(CartProductLinks::CartProductId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CartProductLinks::CartId)
                            .col(CartProductLinks::CartProductId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_product_links_cart_id")
                            .from(CartProductLinks::Table, CartProductLinks::CartId)
                            .to(Carts::Table, Carts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_product_links_cart_product_id")
                            .from(CartProductLinks::Table, CartProductLinks::CartProductId)
                            .to(CartProducts::Table, CartProducts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cart_products_content_object")
                    .table(CartProducts::Table)
                    .col(CartProducts::ContentTypeId)
                    .col(CartProducts::ObjectId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CartProductLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CartProducts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Carts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Carts {
    Table,
    Id,
    OwnerId,
    TotalProducts,
    FinalPrice,
}

#[derive(DeriveIden)]
enum CartProducts {
    Table,
    Id,
    CustomerId,
    CartId,
    ContentTypeId,
    ObjectId,
    Quantity,
    FinalPrice,
}

#[derive(DeriveIden)]
enum CartProductLinks {
    Table,
    CartId,
    CartProductId,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ContentTypes {
    Table,
    Id,
}
