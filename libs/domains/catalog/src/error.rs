use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Brand not found: {0}")]
    BrandNotFound(i32),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(i32),

    #[error("No image for product {0}")]
    ImageNotFound(i32),

    #[error("{entity} with name '{name}' already exists")]
    DuplicateName { entity: &'static str, name: String },

    #[error("Brand {0} is still referenced by products")]
    BrandInUse(i32),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Tag passed to the sequence service is neither `product` nor `brand`.
    #[error("Unknown entity type: {0}")]
    UnknownEntity(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::BrandNotFound(id) => AppError::NotFound(format!("Brand {} not found", id)),
            CatalogError::CategoryNotFound(id) => {
                AppError::NotFound(format!("Category {} not found", id))
            }
            CatalogError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product {} not found", id))
            }
            CatalogError::ImageNotFound(id) => {
                AppError::NotFound(format!("Image for product {} not found", id))
            }
            err @ CatalogError::DuplicateName { .. } => AppError::Conflict(err.to_string()),
            err @ CatalogError::BrandInUse(_) => AppError::Conflict(err.to_string()),
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            // Programming error on the caller's side, surfaced as-is
            err @ CatalogError::UnknownEntity(_) => AppError::InternalServerError(err.to_string()),
            CatalogError::Database(e) => AppError::Database(e),
            CatalogError::Io(e) => AppError::Io(e),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
