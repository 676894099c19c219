//! Catalog Domain
//!
//! Brands, categories and T-shirt products of the shop, plus the id
//! renumbering that runs after product and brand deletions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /brands, /categories, /products
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐      ┌─────────────────┐
//! │  Services   │ ───► │ SequenceService │  ← renumber ids 1..N after delete
//! └──────┬──────┘      └────────┬────────┘
//!        │                      │
//! ┌──────▼──────────────────────▼┐
//! │ Repositories                  │  ← traits; InMemoryCatalog, Pg* (SeaORM)
//! └──────┬────────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← entities, DTOs, projections
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{BrandService, InMemoryCatalog, handlers};
//!
//! let catalog = InMemoryCatalog::new();
//! let service = BrandService::new(catalog.clone(), catalog);
//! let router = handlers::brands::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod seed;
pub mod sequence;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use models::{
    Brand, Category, CategoryProductCount, CategoryWithProducts, CreateBrand, CreateCategory,
    CreateProduct, Product, ProductDetails, ProductFilter, ProductSort, ProductSummary, Size,
    UpdateBrand, UpdateCategory, UpdateProduct,
};
pub use postgres::{PgBrandRepository, PgCategoryRepository, PgProductRepository, PgSequenceRepository};
pub use repository::{
    BrandRepository, CategoryRepository, InMemoryCatalog, ProductRepository,
};
pub use sequence::{SequenceRepository, SequenceService, SequencedEntity};
pub use service::{BrandService, CategoryService, ProductService};
