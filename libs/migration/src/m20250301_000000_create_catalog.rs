use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

const SIZES: [ProductSize; 6] = [
    ProductSize::Xs,
    ProductSize::S,
    ProductSize::M,
    ProductSize::L,
    ProductSize::Xl,
    ProductSize::Xxl,
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(ProductSize::Enum)
                    .values(SIZES)
                    .to_owned(),
            )
            .await?;

        // Category ids are UUID strings assigned by the application
        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(string_len(Category::Id, 36).primary_key())
                    .col(string_uniq(Category::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Brand::Table)
                    .if_not_exists()
                    .col(pk_auto(Brand::Id))
                    .col(string_uniq(Brand::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(pk_auto(Product::Id))
                    .col(string(Product::Name))
                    .col(text_null(Product::Description))
                    .col(double(Product::UnitPrice))
                    .col(integer(Product::QuantityInStock).default(0))
                    .col(string(Product::Color))
                    .col(string_len(Product::CategoryId, 36))
                    .col(integer(Product::BrandId))
                    .col(
                        ColumnDef::new(Product::Size)
                            .enumeration(ProductSize::Enum, SIZES)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_category_id")
                            .from(Product::Table, Product::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    // Renumbering brand ids rewrites product.brand_id through the cascade
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_brand_id")
                            .from(Product::Table, Product::BrandId)
                            .to(Brand::Table, Brand::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_category_id")
                    .table(Product::Table)
                    .col(Product::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_brand_id")
                    .table(Product::Table)
                    .col(Product::BrandId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_unit_price")
                    .table(Product::Table)
                    .col(Product::UnitPrice)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Product::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Brand::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Category::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_type(Type::drop().if_exists().name(ProductSize::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Category {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Brand {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    Name,
    Description,
    UnitPrice,
    QuantityInStock,
    Color,
    CategoryId,
    BrandId,
    Size,
}

#[derive(DeriveIden, Clone, Copy)]
enum ProductSize {
    #[sea_orm(iden = "product_size")]
    Enum,
    #[sea_orm(iden = "XS")]
    Xs,
    #[sea_orm(iden = "S")]
    S,
    #[sea_orm(iden = "M")]
    M,
    #[sea_orm(iden = "L")]
    L,
    #[sea_orm(iden = "XL")]
    Xl,
    #[sea_orm(iden = "XXL")]
    Xxl,
}
