//! Handler tests for the catalog domain
//!
//! The three resource routers are mounted the way the application mounts
//! them and backed by one `InMemoryCatalog`, so requests exercise the real
//! extractors, services, cascades and renumbering without a database.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use domain_catalog::handlers::{brands, categories, products};
use domain_catalog::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tower::ServiceExt; // For oneshot()

fn app_with_assets(assets_dir: impl Into<PathBuf>) -> Router {
    let catalog = InMemoryCatalog::new();

    Router::new()
        .nest(
            "/brands",
            brands::router(BrandService::new(catalog.clone(), catalog.clone())),
        )
        .nest(
            "/categories",
            categories::router(CategoryService::new(catalog.clone())),
        )
        .nest(
            "/products",
            products::router(ProductService::new(
                catalog.clone(),
                catalog,
                assets_dir,
            )),
        )
}

fn app() -> Router {
    app_with_assets("assets")
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> axum::response::Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    app.clone().oneshot(request).await.unwrap()
}

async fn create_brand(app: &Router, name: &str) -> Brand {
    let response = send(app, "POST", "/brands", Some(json!({ "name": name }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

async fn create_category(app: &Router, name: &str) -> Category {
    let response = send(app, "POST", "/categories", Some(json!({ "name": name }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

async fn create_product(app: &Router, name: &str, price: f64, category_id: &str, brand_id: i32) -> Product {
    let response = send(
        app,
        "POST",
        "/products",
        Some(json!({
            "name": name,
            "description": "Un simple demi manche",
            "unit_price": price,
            "quantity_in_stock": 10,
            "color": "Blanc",
            "category_id": category_id,
            "brand_id": brand_id,
            "size": "L"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

// ---------------------------------------------------------------------------
// Brands
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_brand_delete_renumbers_remaining_brands() {
    let app = app();

    assert_eq!(create_brand(&app, "Nike").await.id, 1);
    assert_eq!(create_brand(&app, "Adidas").await.id, 2);

    let response = send(&app, "DELETE", "/brands/1", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", "/brands", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!([{ "id": 1, "name": "Adidas" }]));
}

#[tokio::test]
async fn test_brand_not_found_and_bad_id() {
    let app = app();

    let response = send(&app, "GET", "/brands/42", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "NOT_FOUND");

    let response = send(&app, "DELETE", "/brands/42", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "GET", "/brands/abc", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_brand_duplicate_and_blank_names() {
    let app = app();
    create_brand(&app, "Nike").await;

    let response = send(&app, "POST", "/brands", Some(json!({ "name": "Nike" }))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, "POST", "/brands", Some(json!({ "name": "  " }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert!(body["details"]["name"].is_array());
}

#[tokio::test]
async fn test_brand_rename() {
    let app = app();
    let nike = create_brand(&app, "Nike").await;

    let response = send(
        &app,
        "PUT",
        &format!("/brands/{}", nike.id),
        Some(json!({ "name": "Nike Sportswear" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let brand: Brand = json_body(response.into_body()).await;
    assert_eq!(brand.name, "Nike Sportswear");

    let response = send(&app, "PUT", "/brands/9", Some(json!({ "name": "Puma" }))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_brand_with_products_is_conflict() {
    let app = app();
    let nike = create_brand(&app, "Nike").await;
    let men = create_category(&app, "Hommes").await;
    create_product(&app, "T-Shirt simple", 15.95, &men.id, nike.id).await;

    let response = send(&app, "DELETE", &format!("/brands/{}", nike.id), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, "GET", "/brands", None).await;
    let brands: Vec<Brand> = json_body(response.into_body()).await;
    assert_eq!(brands.len(), 1);
}

#[tokio::test]
async fn test_brand_renumbering_keeps_product_links() {
    let app = app();
    let nike = create_brand(&app, "Nike").await;
    let adidas = create_brand(&app, "Adidas").await;
    let men = create_category(&app, "Hommes").await;
    let shirt = create_product(&app, "T-Shirt simple", 15.95, &men.id, adidas.id).await;

    let response = send(&app, "DELETE", &format!("/brands/{}", nike.id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", &format!("/products/{}/details", shirt.id), None).await;
    let details: ProductDetails = json_body(response.into_body()).await;
    assert_eq!(details.brand, "Adidas");

    let response = send(&app, "GET", &format!("/products/{}", shirt.id), None).await;
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.brand_id, 1);
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_category_init_is_idempotent() {
    let app = app();

    for _ in 0..2 {
        let response = send(&app, "POST", "/categories/init", None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"Default categories initialized.");
    }

    let response = send(&app, "GET", "/categories/dtos", None).await;
    let categories: Vec<Category> = json_body(response.into_body()).await;
    let mut names: Vec<_> = categories.into_iter().map(|c| c.name).collect();
    names.sort();
    assert_eq!(
        names,
        vec!["Enfant Fille", "Enfant Garçon", "Femme", "Homme", "Mixte"]
    );
}

#[tokio::test]
async fn test_category_views_and_counts() {
    let app = app();
    let nike = create_brand(&app, "Nike").await;
    let men = create_category(&app, "Hommes").await;
    create_category(&app, "Enfants").await;
    create_product(&app, "T-Shirt simple", 15.95, &men.id, nike.id).await;
    create_product(&app, "T-Shirt V", 17.95, &men.id, nike.id).await;

    let response = send(&app, "GET", &format!("/categories/{}", men.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let category: CategoryWithProducts = json_body(response.into_body()).await;
    assert_eq!(category.products.len(), 2);

    let response = send(&app, "GET", "/categories", None).await;
    let all: Vec<CategoryWithProducts> = json_body(response.into_body()).await;
    assert_eq!(all.len(), 2);

    let response = send(&app, "GET", "/categories/names-with-counts", None).await;
    let counts: Value = json_body(response.into_body()).await;
    assert_eq!(
        counts,
        json!([
            { "name": "Enfants", "product_count": 0 },
            { "name": "Hommes", "product_count": 2 }
        ])
    );
}

#[tokio::test]
async fn test_category_delete_cascades_to_products() {
    let app = app();
    let nike = create_brand(&app, "Nike").await;
    let men = create_category(&app, "Hommes").await;
    let women = create_category(&app, "Femmes").await;
    create_product(&app, "T-Shirt simple", 15.95, &men.id, nike.id).await;
    create_product(&app, "T-Shirt Oversize", 19.95, &women.id, nike.id).await;

    let response = send(&app, "DELETE", &format!("/categories/{}", men.id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", "/products/names", None).await;
    let names: Vec<String> = json_body(response.into_body()).await;
    assert_eq!(names, vec!["T-Shirt Oversize"]);

    let response = send(&app, "GET", &format!("/categories/{}", men.id), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_missing_returns_404() {
    let app = app();

    let response = send(&app, "DELETE", "/categories/does-not-exist", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        "PUT",
        "/categories/does-not-exist",
        Some(json!({ "name": "Mixte" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_product_delete_renumbers_in_order() {
    let app = app();
    let nike = create_brand(&app, "Nike").await;
    let men = create_category(&app, "Hommes").await;
    for name in ["a", "b", "c", "d"] {
        create_product(&app, name, 10.0, &men.id, nike.id).await;
    }

    let response = send(&app, "DELETE", "/products/2", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", "/products", None).await;
    let products: Vec<Product> = json_body(response.into_body()).await;
    let pairs: Vec<_> = products.iter().map(|p| (p.id, p.name.as_str())).collect();
    assert_eq!(pairs, vec![(1, "a"), (2, "c"), (3, "d")]);
    assert_eq!(products[2].image_path, "images/tshirts/3.jpg");

    let response = send(&app, "DELETE", "/products/99", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_create_with_unknown_references() {
    let app = app();
    let nike = create_brand(&app, "Nike").await;
    let men = create_category(&app, "Hommes").await;

    let payload = |category_id: &str, brand_id: i32| {
        json!({
            "name": "T-Shirt",
            "unit_price": 10.0,
            "quantity_in_stock": 1,
            "color": "Noir",
            "category_id": category_id,
            "brand_id": brand_id,
            "size": "M"
        })
    };

    let response = send(&app, "POST", "/products", Some(payload("nope", nike.id))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "POST", "/products", Some(payload(&men.id, 77))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_create_validation() {
    let app = app();

    let response = send(
        &app,
        "POST",
        "/products",
        Some(json!({
            "name": "T-Shirt",
            "unit_price": 0.0,
            "quantity_in_stock": -3,
            "color": "",
            "category_id": "x",
            "brand_id": 1,
            "size": "M"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert!(body["details"]["unit_price"].is_array());
    assert!(body["details"]["quantity_in_stock"].is_array());
    assert!(body["details"]["color"].is_array());
}

#[tokio::test]
async fn test_product_update_preserves_absent_fields() {
    let app = app();
    let nike = create_brand(&app, "Nike").await;
    let adidas = create_brand(&app, "Adidas").await;
    let men = create_category(&app, "Hommes").await;
    let shirt = create_product(&app, "T-Shirt simple", 15.95, &men.id, nike.id).await;

    let response = send(
        &app,
        "PUT",
        &format!("/products/{}", shirt.id),
        Some(json!({ "unit_price": 12.5, "brand_id": adidas.id, "size": "XL" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.unit_price, 12.5);
    assert_eq!(updated.brand_id, adidas.id);
    assert_eq!(updated.size, Size::Xl);
    assert_eq!(updated.name, "T-Shirt simple");
    assert_eq!(updated.color, "Blanc");
    assert_eq!(updated.quantity_in_stock, 10);
    assert_eq!(updated.description.as_deref(), Some("Un simple demi manche"));

    let response = send(
        &app,
        "PUT",
        &format!("/products/{}", shirt.id),
        Some(json!({ "category_id": "missing" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "PUT", "/products/50", Some(json!({ "color": "Vert" }))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_read_projections() {
    let app = app();
    let nike = create_brand(&app, "Nike").await;
    let men = create_category(&app, "Hommes").await;
    let shirt = create_product(&app, "T-Shirt simple", 15.95, &men.id, nike.id).await;

    let response = send(&app, "GET", &format!("/products/{}/details", shirt.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let details: Value = json_body(response.into_body()).await;
    assert_eq!(
        details,
        json!({
            "name": "T-Shirt simple",
            "brand": "Nike",
            "price": 15.95,
            "category": "Hommes",
            "image_path": "images/tshirts/1.jpg"
        })
    );

    let response = send(&app, "GET", &format!("/products/catagory/{}", men.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let summaries: Value = json_body(response.into_body()).await;
    assert_eq!(
        summaries,
        json!([{
            "id": 1,
            "name": "T-Shirt simple",
            "price": 15.95,
            "category": "Hommes",
            "img_path": "images/tshirts/1.jpg"
        }])
    );

    let response = send(&app, "GET", "/products/catagory/unknown", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "GET", "/products/7/details", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_filters() {
    let app = app();
    let nike = create_brand(&app, "Nike").await;
    let jj = create_brand(&app, "Jack & Jones").await;
    let men = create_category(&app, "Hommes").await;
    let women = create_category(&app, "Femmes").await;
    create_product(&app, "T-Shirt V", 17.95, &men.id, nike.id).await;
    create_product(&app, "T-Shirt simple", 15.95, &men.id, nike.id).await;
    create_product(&app, "T-Shirt Oversize", 19.95, &women.id, jj.id).await;

    let names = |products: Vec<Product>| -> Vec<String> {
        products.into_iter().map(|p| p.name).collect()
    };

    let response = send(&app, "GET", "/products?min_price=16&max_price=20", None).await;
    let found: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(names(found), vec!["T-Shirt V", "T-Shirt Oversize"]);

    let response = send(&app, "GET", "/products?category=Hommes&sort=price", None).await;
    let found: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(names(found), vec!["T-Shirt simple", "T-Shirt V"]);

    let response = send(&app, "GET", "/products?brand=Jack%20%26%20Jones", None).await;
    let found: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(names(found), vec!["T-Shirt Oversize"]);

    let response = send(&app, "GET", "/products?name=oversize", None).await;
    let found: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(found.len(), 1);

    let response = send(&app, "GET", "/products?in_stock_above=10", None).await;
    let found: Vec<Product> = json_body(response.into_body()).await;
    assert!(found.is_empty());
}

fn temp_assets(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "catalog-assets-{}-{}",
        test_name,
        std::process::id()
    ));
    std::fs::create_dir_all(dir.join("images/tshirts")).unwrap();
    dir
}

fn write_image(assets: &Path, id: i32, bytes: &[u8]) {
    std::fs::write(assets.join(format!("images/tshirts/{}.jpg", id)), bytes).unwrap();
}

#[tokio::test]
async fn test_product_image_download() {
    let assets = temp_assets("download");
    let app = app_with_assets(&assets);
    let nike = create_brand(&app, "Nike").await;
    let men = create_category(&app, "Hommes").await;
    create_product(&app, "T-Shirt simple", 15.95, &men.id, nike.id).await;
    create_product(&app, "T-Shirt V", 17.95, &men.id, nike.id).await;
    write_image(&assets, 1, b"\xFF\xD8\xFFfake-jpeg");

    let response = send(&app, "GET", "/products/image/1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"1.jpg\""
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"\xFF\xD8\xFFfake-jpeg");

    // Product 2 exists but has no file
    let response = send(&app, "GET", "/products/image/2", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // File without a product
    write_image(&assets, 9, b"orphan");
    let response = send(&app, "GET", "/products/image/9", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    std::fs::remove_dir_all(&assets).ok();
}
