use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Product images live under this directory, relative to the assets root.
pub const IMAGE_DIR: &str = "images/tshirts";

/// Relative image path for a product id, e.g. `images/tshirts/3.jpg`.
pub fn image_path(id: i32) -> String {
    format!("{}/{}.jpg", IMAGE_DIR, id)
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// T-shirt size
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_size")]
pub enum Size {
    #[sea_orm(string_value = "XS")]
    #[serde(rename = "XS")]
    #[strum(serialize = "XS")]
    Xs,
    #[sea_orm(string_value = "S")]
    #[serde(rename = "S")]
    #[strum(serialize = "S")]
    S,
    #[sea_orm(string_value = "M")]
    #[serde(rename = "M")]
    #[strum(serialize = "M")]
    M,
    #[sea_orm(string_value = "L")]
    #[serde(rename = "L")]
    #[strum(serialize = "L")]
    L,
    #[sea_orm(string_value = "XL")]
    #[serde(rename = "XL")]
    #[strum(serialize = "XL")]
    Xl,
    #[sea_orm(string_value = "XXL")]
    #[serde(rename = "XXL")]
    #[strum(serialize = "XXL")]
    Xxl,
}

// ---------------------------------------------------------------------------
// Brand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Brand {
    /// Sequential id, renumbered to 1..N after every brand deletion
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBrand {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBrand {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub name: Option<String>,
}

impl Brand {
    pub fn apply_update(&mut self, update: UpdateBrand) {
        if let Some(name) = update.name {
            self.name = name;
        }
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Category without its products; also the shape of `GET /categories/dtos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    /// UUID assigned at creation
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryWithProducts {
    pub id: String,
    pub name: String,
    pub products: Vec<Product>,
}

impl CategoryWithProducts {
    pub fn new(category: Category, products: Vec<Product>) -> Self {
        Self {
            id: category.id,
            name: category.name,
            products,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryProductCount {
    pub name: String,
    pub product_count: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub name: Option<String>,
}

impl Category {
    pub fn new(input: CreateCategory) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name,
        }
    }

    pub fn apply_update(&mut self, update: UpdateCategory) {
        if let Some(name) = update.name {
            self.name = name;
        }
    }
}

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Sequential id, renumbered to 1..N after every product deletion
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: f64,
    pub quantity_in_stock: i32,
    pub color: String,
    pub category_id: String,
    pub brand_id: i32,
    pub size: Size,
    /// Derived from the id, never stored
    pub image_path: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub unit_price: f64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub quantity_in_stock: i32,
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub color: String,
    pub category_id: String,
    pub brand_id: i32,
    pub size: Size,
}

/// Only the fields present in the body overwrite the stored product.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub unit_price: Option<f64>,
    #[validate(range(min = 0))]
    pub quantity_in_stock: Option<i32>,
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub color: Option<String>,
    pub category_id: Option<String>,
    pub brand_id: Option<i32>,
    pub size: Option<Size>,
}

impl Product {
    /// Builds the stored form of `input` under `id`.
    pub fn new(id: i32, input: CreateProduct) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            unit_price: input.unit_price,
            quantity_in_stock: input.quantity_in_stock,
            color: input.color,
            category_id: input.category_id,
            brand_id: input.brand_id,
            size: input.size,
            image_path: image_path(id),
        }
    }

    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(unit_price) = update.unit_price {
            self.unit_price = unit_price;
        }
        if let Some(quantity_in_stock) = update.quantity_in_stock {
            self.quantity_in_stock = quantity_in_stock;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(brand_id) = update.brand_id {
            self.brand_id = brand_id;
        }
        if let Some(size) = update.size {
            self.size = size;
        }
    }

    /// Changes the id and keeps the derived image path in step.
    pub fn renumber(&mut self, id: i32) {
        self.id = id;
        self.image_path = image_path(id);
    }
}

/// `GET /products/{id}/details`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetails {
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub category: String,
    pub image_path: String,
}

/// One row of `GET /products/catagory/{category_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub img_path: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductSort {
    #[default]
    Id,
    /// Ascending unit price, ties by id
    Price,
}

/// Query filters for listing products
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Unit price greater than or equal to
    pub min_price: Option<f64>,
    /// Unit price less than or equal to
    pub max_price: Option<f64>,
    /// Category name
    pub category: Option<String>,
    /// Brand name
    pub brand: Option<String>,
    /// Case-insensitive substring of the product name
    pub name: Option<String>,
    /// Quantity in stock strictly greater than
    pub in_stock_above: Option<i32>,
    #[serde(default)]
    pub sort: ProductSort,
}

impl ProductFilter {
    /// Price, stock and name predicates; category and brand names are
    /// resolved by the repository.
    pub fn matches_fields(&self, product: &Product) -> bool {
        if self.min_price.is_some_and(|min| product.unit_price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.unit_price > max) {
            return false;
        }
        if self
            .in_stock_above
            .is_some_and(|floor| product.quantity_in_stock <= floor)
        {
            return false;
        }
        if let Some(ref needle) = self.name {
            if !product.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}
