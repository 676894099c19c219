//! SeaORM repositories backed by Postgres.

mod brand;
mod category;
mod product;
mod sequence;

pub use brand::PgBrandRepository;
pub use category::PgCategoryRepository;
pub use product::PgProductRepository;
pub use sequence::PgSequenceRepository;

use sea_orm::{DbErr, SqlErr};

use crate::error::CatalogError;

pub(crate) fn db_error(e: DbErr) -> CatalogError {
    CatalogError::Database(e)
}

/// Unique-name races that slip past the service's pre-check.
pub(crate) fn unique_violation(e: DbErr, entity: &'static str, name: &str) -> CatalogError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => CatalogError::DuplicateName {
            entity,
            name: name.to_string(),
        },
        _ => db_error(e),
    }
}
