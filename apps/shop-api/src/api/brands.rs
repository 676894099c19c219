use axum::Router;
use domain_catalog::{BrandService, PgBrandRepository, PgSequenceRepository, handlers};

use crate::state::AppState;

pub fn service(state: &AppState) -> BrandService<PgBrandRepository, PgSequenceRepository> {
    BrandService::new(
        PgBrandRepository::new(state.db.clone()),
        PgSequenceRepository::new(state.db.clone()),
    )
}

pub fn router(state: &AppState) -> Router {
    handlers::brands::router(service(state))
}
