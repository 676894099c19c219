use crate::models::{self, Size};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub unit_price: f64,
    pub quantity_in_stock: i32,
    pub color: String,
    pub category_id: String,
    pub brand_id: i32,
    pub size: Size,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::brand::Entity",
        from = "Column::BrandId",
        to = "super::brand::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Brand,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for models::Product {
    fn from(model: Model) -> Self {
        Self {
            image_path: models::image_path(model.id),
            id: model.id,
            name: model.name,
            description: model.description,
            unit_price: model.unit_price,
            quantity_in_stock: model.quantity_in_stock,
            color: model.color,
            category_id: model.category_id,
            brand_id: model.brand_id,
            size: model.size,
        }
    }
}

// The id comes from the identity column
impl From<models::CreateProduct> for ActiveModel {
    fn from(input: models::CreateProduct) -> Self {
        ActiveModel {
            id: NotSet,
            name: Set(input.name),
            description: Set(input.description),
            unit_price: Set(input.unit_price),
            quantity_in_stock: Set(input.quantity_in_stock),
            color: Set(input.color),
            category_id: Set(input.category_id),
            brand_id: Set(input.brand_id),
            size: Set(input.size),
        }
    }
}

impl From<models::Product> for ActiveModel {
    fn from(product: models::Product) -> Self {
        ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            description: Set(product.description),
            unit_price: Set(product.unit_price),
            quantity_in_stock: Set(product.quantity_in_stock),
            color: Set(product.color),
            category_id: Set(product.category_id),
            brand_id: Set(product.brand_id),
            size: Set(product.size),
        }
    }
}
