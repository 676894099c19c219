//! HTTP surface of the catalog, one router per resource.
//!
//! Each router is meant to be nested by the application, e.g. under
//! `/brands`, and carries its own OpenAPI document.

pub mod brands;
pub mod categories;
pub mod products;

pub const BRANDS_TAG: &str = "brands";
pub const CATEGORIES_TAG: &str = "categories";
pub const PRODUCTS_TAG: &str = "products";
