use axum::Router;
use domain_catalog::{CategoryService, PgCategoryRepository, handlers};

use crate::state::AppState;

pub fn service(state: &AppState) -> CategoryService<PgCategoryRepository> {
    CategoryService::new(PgCategoryRepository::new(state.db.clone()))
}

pub fn router(state: &AppState) -> Router {
    handlers::categories::router(service(state))
}
