//! Typed single path parameter.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::str::FromStr;

/// Parses the route's only path parameter into `T`.
///
/// Unlike `Path<T>`, a value that does not parse is answered with the JSON
/// error body instead of axum's plain-text rejection.
///
/// ```ignore
/// async fn get_brand(IdPath(id): IdPath<i32>) -> String {
///     format!("Brand {}", id)
/// }
///
/// let app = Router::new().route("/brands/{id}", get(get_brand));
/// ```
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: FromStr + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidPathParameter(e.body_text()))?;

        raw.parse::<T>()
            .map(IdPath)
            .map_err(|_| AppError::InvalidPathParameter(format!("Invalid id: {}", raw)))
    }
}
