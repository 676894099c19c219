//! OpenAPI documentation configuration

use domain_catalog::handlers::{BRANDS_TAG, CATEGORIES_TAG, PRODUCTS_TAG, brands, categories, products};
use utoipa::OpenApi;

/// Combined OpenAPI documentation for the shop API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        version = "0.1.0",
        description = "T-shirt shop catalog: brands, categories and products",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/brands", api = brands::ApiDoc),
        (path = "/api/categories", api = categories::ApiDoc),
        (path = "/api/products", api = products::ApiDoc)
    ),
    components(schemas(axum_helpers::ErrorResponse)),
    tags(
        (name = BRANDS_TAG, description = "Brand management, ids renumbered after deletes"),
        (name = CATEGORIES_TAG, description = "Product categories"),
        (name = PRODUCTS_TAG, description = "T-shirt catalog, filters and images")
    )
)]
pub struct ApiDoc;
