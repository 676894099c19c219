use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    extract_ip_from_headers, extract_user_agent,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use super::CATEGORIES_TAG;
use crate::error::CatalogResult;
use crate::models::{
    Category, CategoryProductCount, CategoryWithProducts, CreateCategory, UpdateCategory,
};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

pub const INIT_MESSAGE: &str = "Default categories initialized.";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        list_category_dtos,
        names_with_counts,
        init_categories,
        get_category,
        update_category,
        delete_category,
    ),
    components(
        schemas(
            Category,
            CategoryWithProducts,
            CategoryProductCount,
            CreateCategory,
            UpdateCategory
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = CATEGORIES_TAG, description = "Category management"))
)]
pub struct ApiDoc;

type SharedService<C> = Arc<CategoryService<C>>;

pub fn router<C: CategoryRepository + 'static>(service: CategoryService<C>) -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/dtos", get(list_category_dtos))
        .route("/names-with-counts", get(names_with_counts))
        .route("/init", post(init_categories))
        .route(
            "/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .with_state(Arc::new(service))
}

/// List categories with their products
#[utoipa::path(
    get,
    path = "",
    tag = CATEGORIES_TAG,
    responses(
        (status = 200, description = "All categories", body = Vec<CategoryWithProducts>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<C: CategoryRepository>(
    State(service): State<SharedService<C>>,
) -> CatalogResult<Json<Vec<CategoryWithProducts>>> {
    Ok(Json(service.list_categories().await?))
}

/// Create a category
#[utoipa::path(
    post,
    path = "",
    tag = CATEGORIES_TAG,
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<C: CategoryRepository>(
    State(service): State<SharedService<C>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<impl IntoResponse> {
    let category = service.create_category(input).await?;

    AuditEvent::new(
        "category.create",
        format!("category:{}", category.id),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({ "name": category.name }))
    .log();

    Ok((StatusCode::CREATED, Json(category)))
}

/// List categories as `{id, name}` only
#[utoipa::path(
    get,
    path = "/dtos",
    tag = CATEGORIES_TAG,
    responses(
        (status = 200, description = "Category ids and names", body = Vec<Category>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_category_dtos<C: CategoryRepository>(
    State(service): State<SharedService<C>>,
) -> CatalogResult<Json<Vec<Category>>> {
    Ok(Json(service.list_category_dtos().await?))
}

/// Product count per category, empty categories included
#[utoipa::path(
    get,
    path = "/names-with-counts",
    tag = CATEGORIES_TAG,
    responses(
        (status = 200, description = "Names with product counts", body = Vec<CategoryProductCount>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn names_with_counts<C: CategoryRepository>(
    State(service): State<SharedService<C>>,
) -> CatalogResult<Json<Vec<CategoryProductCount>>> {
    Ok(Json(service.names_with_counts().await?))
}

/// Ensure the default categories exist
#[utoipa::path(
    post,
    path = "/init",
    tag = CATEGORIES_TAG,
    responses(
        (status = 201, description = "Defaults present", body = String, content_type = "text/plain"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn init_categories<C: CategoryRepository>(
    State(service): State<SharedService<C>>,
) -> CatalogResult<impl IntoResponse> {
    service.init_default_categories().await?;
    Ok((StatusCode::CREATED, INIT_MESSAGE))
}

/// Get a category with its products
#[utoipa::path(
    get,
    path = "/{id}",
    tag = CATEGORIES_TAG,
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = CategoryWithProducts),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<C: CategoryRepository>(
    State(service): State<SharedService<C>>,
    IdPath(id): IdPath<String>,
) -> CatalogResult<Json<CategoryWithProducts>> {
    Ok(Json(service.get_category(&id).await?))
}

/// Rename a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = CATEGORIES_TAG,
    params(("id" = String, Path, description = "Category id")),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<C: CategoryRepository>(
    State(service): State<SharedService<C>>,
    IdPath(id): IdPath<String>,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CatalogResult<Json<Category>> {
    Ok(Json(service.update_category(&id, input).await?))
}

/// Delete a category and all of its products
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = CATEGORIES_TAG,
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<C: CategoryRepository>(
    State(service): State<SharedService<C>>,
    headers: HeaderMap,
    IdPath(id): IdPath<String>,
) -> CatalogResult<impl IntoResponse> {
    service.delete_category(&id).await?;

    AuditEvent::new(
        "category.delete",
        format!("category:{}", id),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    Ok(StatusCode::NO_CONTENT)
}
