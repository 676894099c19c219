//! SeaORM entities for the `brand`, `category` and `product` tables.

pub mod brand;
pub mod category;
pub mod product;
