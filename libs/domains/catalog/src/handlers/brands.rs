use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestPathResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
    extract_ip_from_headers, extract_user_agent,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use super::BRANDS_TAG;
use crate::error::CatalogResult;
use crate::models::{Brand, CreateBrand, UpdateBrand};
use crate::repository::BrandRepository;
use crate::sequence::SequenceRepository;
use crate::service::BrandService;

#[derive(OpenApi)]
#[openapi(
    paths(list_brands, create_brand, get_brand, update_brand, delete_brand),
    components(
        schemas(Brand, CreateBrand, UpdateBrand),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestPathResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = BRANDS_TAG, description = "Brand management"))
)]
pub struct ApiDoc;

type SharedService<B, S> = Arc<BrandService<B, S>>;

pub fn router<B, S>(service: BrandService<B, S>) -> Router
where
    B: BrandRepository + 'static,
    S: SequenceRepository + 'static,
{
    Router::new()
        .route("/", get(list_brands).post(create_brand))
        .route(
            "/{id}",
            get(get_brand).put(update_brand).delete(delete_brand),
        )
        .with_state(Arc::new(service))
}

/// List all brands ordered by id
#[utoipa::path(
    get,
    path = "",
    tag = BRANDS_TAG,
    responses(
        (status = 200, description = "All brands", body = Vec<Brand>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_brands<B: BrandRepository, S: SequenceRepository>(
    State(service): State<SharedService<B, S>>,
) -> CatalogResult<Json<Vec<Brand>>> {
    Ok(Json(service.list_brands().await?))
}

/// Create a brand
#[utoipa::path(
    post,
    path = "",
    tag = BRANDS_TAG,
    request_body = CreateBrand,
    responses(
        (status = 201, description = "Brand created", body = Brand),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_brand<B: BrandRepository, S: SequenceRepository>(
    State(service): State<SharedService<B, S>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateBrand>,
) -> CatalogResult<impl IntoResponse> {
    let brand = service.create_brand(input).await?;

    AuditEvent::new(
        "brand.create",
        format!("brand:{}", brand.id),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({ "name": brand.name }))
    .log();

    Ok((StatusCode::CREATED, Json(brand)))
}

/// Get a brand by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = BRANDS_TAG,
    params(("id" = i32, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand found", body = Brand),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_brand<B: BrandRepository, S: SequenceRepository>(
    State(service): State<SharedService<B, S>>,
    IdPath(id): IdPath<i32>,
) -> CatalogResult<Json<Brand>> {
    Ok(Json(service.get_brand(id).await?))
}

/// Rename a brand
#[utoipa::path(
    put,
    path = "/{id}",
    tag = BRANDS_TAG,
    params(("id" = i32, Path, description = "Brand id")),
    request_body = UpdateBrand,
    responses(
        (status = 200, description = "Brand updated", body = Brand),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_brand<B: BrandRepository, S: SequenceRepository>(
    State(service): State<SharedService<B, S>>,
    IdPath(id): IdPath<i32>,
    ValidatedJson(input): ValidatedJson<UpdateBrand>,
) -> CatalogResult<Json<Brand>> {
    Ok(Json(service.update_brand(id, input).await?))
}

/// Delete a brand and renumber the remaining brands to 1..N
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = BRANDS_TAG,
    params(("id" = i32, Path, description = "Brand id")),
    responses(
        (status = 204, description = "Brand deleted"),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_brand<B: BrandRepository, S: SequenceRepository>(
    State(service): State<SharedService<B, S>>,
    headers: HeaderMap,
    IdPath(id): IdPath<i32>,
) -> CatalogResult<impl IntoResponse> {
    service.delete_brand(id).await?;

    AuditEvent::new("brand.delete", format!("brand:{}", id), AuditOutcome::Success)
        .with_ip(extract_ip_from_headers(&headers))
        .with_user_agent(extract_user_agent(&headers))
        .log();

    Ok(StatusCode::NO_CONTENT)
}
