// src/handlers/products.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        pagination::Pagination,
        query::{BarcodeQuery, SearchQuery},
    },
    config::AppState,
    models::product::{ProductPayload, ProductResponse},
};

#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Location not found"),
        (status = 409, description = "SKU or barcode already exists")
    ),
    security(("bearer_token" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let product = app_state.product_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    params(Pagination),
    responses((status = 200, description = "Products by name", body = Vec<ProductResponse>)),
    security(("bearer_token" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    Ok(Json(app_state.product_service.list(page).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/search",
    tag = "Products",
    params(SearchQuery, Pagination),
    responses(
        (status = 200, description = "Matches on name, SKU, barcode or description", body = Vec<ProductResponse>),
        (status = 400, description = "Missing search term")
    ),
    security(("bearer_token" = []))
)]
pub async fn search_products(
    State(app_state): State<AppState>,
    Query(search): Query<SearchQuery>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let term = search.term()?;
    Ok(Json(app_state.product_service.search(term, page).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/low-stock",
    tag = "Products",
    params(Pagination),
    responses((status = 200, description = "Products at or below their minimum", body = Vec<ProductResponse>)),
    security(("bearer_token" = []))
)]
pub async fn low_stock_products(
    State(app_state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    Ok(Json(app_state.product_service.low_stock(page).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/scan",
    tag = "Products",
    params(BarcodeQuery),
    responses(
        (status = 200, description = "Product with this barcode", body = ProductResponse),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn scan_barcode(
    State(app_state): State<AppState>,
    Query(query): Query<BarcodeQuery>,
) -> Result<Json<ProductResponse>, AppError> {
    let barcode = query.barcode()?;
    Ok(Json(app_state.product_service.get_by_barcode(barcode).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/sku/{sku}",
    tag = "Products",
    params(("sku" = String, Path, description = "Stock keeping unit")),
    responses(
        (status = 200, description = "Product with this SKU", body = ProductResponse),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn get_product_by_sku(
    State(app_state): State<AppState>,
    Path(sku): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    Ok(Json(app_state.product_service.get_by_sku(&sku).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product with its location summary", body = ProductResponse),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    Ok(Json(app_state.product_service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product replaced", body = ProductResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Product or location not found"),
        (status = 409, description = "SKU or barcode already exists")
    ),
    security(("bearer_token" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<ProductResponse>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.product_service.update(id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product has inventory transactions")
    ),
    security(("bearer_token" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.product_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
