use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestPathResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    extract_ip_from_headers, extract_user_agent,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use super::PRODUCTS_TAG;
use crate::error::CatalogResult;
use crate::models::{
    CreateProduct, Product, ProductDetails, ProductFilter, ProductSort, ProductSummary, Size,
    UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::sequence::SequenceRepository;
use crate::service::ProductService;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        list_names,
        get_product,
        get_details,
        update_product,
        delete_product,
        get_image,
        list_by_category,
    ),
    components(
        schemas(
            Product,
            CreateProduct,
            UpdateProduct,
            ProductDetails,
            ProductSummary,
            ProductFilter,
            ProductSort,
            Size
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestPathResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = PRODUCTS_TAG, description = "T-shirt products"))
)]
pub struct ApiDoc;

type SharedService<P, S> = Arc<ProductService<P, S>>;

pub fn router<P, S>(service: ProductService<P, S>) -> Router
where
    P: ProductRepository + 'static,
    S: SequenceRepository + 'static,
{
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/names", get(list_names))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/details", get(get_details))
        .route("/image/{id}", get(get_image))
        // Path segment spelled as published
        .route("/catagory/{category_id}", get(list_by_category))
        .with_state(Arc::new(service))
}

/// List products, optionally filtered
#[utoipa::path(
    get,
    path = "",
    tag = PRODUCTS_TAG,
    params(ProductFilter),
    responses(
        (status = 200, description = "Matching products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<P: ProductRepository, S: SequenceRepository>(
    State(service): State<SharedService<P, S>>,
    Query(filter): Query<ProductFilter>,
) -> CatalogResult<Json<Vec<Product>>> {
    Ok(Json(service.list_products(filter).await?))
}

/// Create a product
#[utoipa::path(
    post,
    path = "",
    tag = PRODUCTS_TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<P: ProductRepository, S: SequenceRepository>(
    State(service): State<SharedService<P, S>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> CatalogResult<impl IntoResponse> {
    let product = service.create_product(input).await?;

    AuditEvent::new(
        "product.create",
        format!("product:{}", product.id),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({
        "name": product.name,
        "category_id": product.category_id,
        "brand_id": product.brand_id,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(product)))
}

/// Product names ordered by id
#[utoipa::path(
    get,
    path = "/names",
    tag = PRODUCTS_TAG,
    responses(
        (status = 200, description = "Product names", body = Vec<String>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_names<P: ProductRepository, S: SequenceRepository>(
    State(service): State<SharedService<P, S>>,
) -> CatalogResult<Json<Vec<String>>> {
    Ok(Json(service.list_names().await?))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = PRODUCTS_TAG,
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<P: ProductRepository, S: SequenceRepository>(
    State(service): State<SharedService<P, S>>,
    IdPath(id): IdPath<i32>,
) -> CatalogResult<Json<Product>> {
    Ok(Json(service.get_product(id).await?))
}

/// Product with its brand and category names
#[utoipa::path(
    get,
    path = "/{id}/details",
    tag = PRODUCTS_TAG,
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product details", body = ProductDetails),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_details<P: ProductRepository, S: SequenceRepository>(
    State(service): State<SharedService<P, S>>,
    IdPath(id): IdPath<i32>,
) -> CatalogResult<Json<ProductDetails>> {
    Ok(Json(service.get_details(id).await?))
}

/// Update the fields present in the body
#[utoipa::path(
    put,
    path = "/{id}",
    tag = PRODUCTS_TAG,
    params(("id" = i32, Path, description = "Product id")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<P: ProductRepository, S: SequenceRepository>(
    State(service): State<SharedService<P, S>>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> CatalogResult<Json<Product>> {
    Ok(Json(service.update_product(id, input).await?))
}

/// Delete a product and renumber the remaining products to 1..N
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = PRODUCTS_TAG,
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<P: ProductRepository, S: SequenceRepository>(
    State(service): State<SharedService<P, S>>,
    headers: HeaderMap,
    IdPath(id): IdPath<i32>,
) -> CatalogResult<impl IntoResponse> {
    service.delete_product(id).await?;

    AuditEvent::new(
        "product.delete",
        format!("product:{}", id),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    Ok(StatusCode::NO_CONTENT)
}

/// Download the product's JPEG image
#[utoipa::path(
    get,
    path = "/image/{id}",
    tag = PRODUCTS_TAG,
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Image file", content_type = "image/jpeg", body = Vec<u8>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_image<P: ProductRepository, S: SequenceRepository>(
    State(service): State<SharedService<P, S>>,
    IdPath(id): IdPath<i32>,
) -> CatalogResult<impl IntoResponse> {
    let bytes = service.load_image(id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.jpg\"", id),
            ),
        ],
        bytes,
    ))
}

/// Product summaries of one category
#[utoipa::path(
    get,
    path = "/catagory/{category_id}",
    tag = PRODUCTS_TAG,
    params(("category_id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Products of the category", body = Vec<ProductSummary>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_category<P: ProductRepository, S: SequenceRepository>(
    State(service): State<SharedService<P, S>>,
    IdPath(category_id): IdPath<String>,
) -> CatalogResult<Json<Vec<ProductSummary>>> {
    Ok(Json(service.list_by_category(&category_id).await?))
}
