//! Persistence seams for the catalog.
//!
//! Each trait has two implementations: [`InMemoryCatalog`] (development and
//! tests) and the SeaORM repositories in [`crate::postgres`].

mod memory;

pub use memory::InMemoryCatalog;

use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::models::{
    Brand, Category, CategoryProductCount, CategoryWithProducts, CreateBrand, CreateProduct,
    Product, ProductDetails, ProductFilter, ProductSummary,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrandRepository: Send + Sync {
    /// All brands ordered by id
    async fn find_all(&self) -> CatalogResult<Vec<Brand>>;

    async fn find_by_id(&self, id: i32) -> CatalogResult<Option<Brand>>;

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Brand>>;

    async fn insert(&self, input: CreateBrand) -> CatalogResult<Brand>;

    async fn update(&self, brand: Brand) -> CatalogResult<Brand>;

    /// `Ok(false)` when no brand has this id
    async fn delete(&self, id: i32) -> CatalogResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by name
    async fn find_all(&self) -> CatalogResult<Vec<Category>>;

    async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Category>>;

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Category>>;

    async fn insert(&self, category: Category) -> CatalogResult<Category>;

    async fn update(&self, category: Category) -> CatalogResult<Category>;

    /// Deletes the category and every product in it
    async fn delete(&self, id: &str) -> CatalogResult<bool>;

    async fn find_all_with_products(&self) -> CatalogResult<Vec<CategoryWithProducts>>;

    async fn find_with_products(&self, id: &str) -> CatalogResult<Option<CategoryWithProducts>>;

    /// Every category with its product count, empty categories included
    async fn names_with_counts(&self) -> CatalogResult<Vec<CategoryProductCount>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_all(&self, filter: &ProductFilter) -> CatalogResult<Vec<Product>>;

    async fn find_by_id(&self, id: i32) -> CatalogResult<Option<Product>>;

    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Product>>;

    /// Product joined with its brand and category names
    async fn find_details(&self, id: i32) -> CatalogResult<Option<ProductDetails>>;

    /// Product names ordered by id
    async fn find_names(&self) -> CatalogResult<Vec<String>>;

    async fn find_summaries_by_category(
        &self,
        category_id: &str,
    ) -> CatalogResult<Vec<ProductSummary>>;

    async fn insert(&self, input: CreateProduct) -> CatalogResult<Product>;

    async fn update(&self, product: Product) -> CatalogResult<Product>;

    async fn delete(&self, id: i32) -> CatalogResult<bool>;

    async fn category_exists(&self, id: &str) -> CatalogResult<bool>;

    async fn brand_exists(&self, id: i32) -> CatalogResult<bool>;
}
