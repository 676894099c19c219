//! Shared test utilities for the shop crates
//!
//! `TestDatabase` (feature: "postgres") runs a PostgreSQL container with the
//! catalog schema migrated. Each test owns its container, so ids start at 1.
//!
//! ```rust,no_run
//! use test_utils::TestDatabase;
//!
//! #[tokio::test]
//! #[ignore] // needs Docker
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let repository = domain_catalog::PgBrandRepository::new(db.connection());
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;
