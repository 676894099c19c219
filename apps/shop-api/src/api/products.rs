use axum::Router;
use domain_catalog::{PgProductRepository, PgSequenceRepository, ProductService, handlers};

use crate::state::AppState;

/// Image downloads resolve against `ASSETS_DIR`.
pub fn service(state: &AppState) -> ProductService<PgProductRepository, PgSequenceRepository> {
    ProductService::new(
        PgProductRepository::new(state.db.clone()),
        PgSequenceRepository::new(state.db.clone()),
        state.config.assets_dir.clone(),
    )
}

pub fn router(state: &AppState) -> Router {
    handlers::products::router(service(state))
}
