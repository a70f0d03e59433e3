// src/handlers/locations.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::Pagination, query::SearchQuery},
    config::AppState,
    models::{
        location::{CreateLocationPayload, LocationResponse, UpdateLocationPayload},
        product::ProductResponse,
    },
};

#[utoipa::path(
    post,
    path = "/api/v1/locations",
    tag = "Locations",
    request_body = CreateLocationPayload,
    responses(
        (status = 201, description = "Location created", body = LocationResponse),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Code already exists")
    ),
    security(("bearer_token" = []))
)]
pub async fn create_location(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateLocationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let location = app_state.location_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations",
    tag = "Locations",
    params(Pagination),
    responses((status = 200, description = "Locations by code", body = Vec<LocationResponse>)),
    security(("bearer_token" = []))
)]
pub async fn list_locations(
    State(app_state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<LocationResponse>>, AppError> {
    Ok(Json(app_state.location_service.list(page).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/search",
    tag = "Locations",
    params(SearchQuery, Pagination),
    responses(
        (status = 200, description = "Matches on name, code, building or description", body = Vec<LocationResponse>),
        (status = 400, description = "Missing search term")
    ),
    security(("bearer_token" = []))
)]
pub async fn search_locations(
    State(app_state): State<AppState>,
    Query(search): Query<SearchQuery>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<LocationResponse>>, AppError> {
    let term = search.term()?;
    Ok(Json(app_state.location_service.search(term, page).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/code/{code}",
    tag = "Locations",
    params(("code" = String, Path, description = "Location code")),
    responses(
        (status = 200, description = "Location with this code", body = LocationResponse),
        (status = 404, description = "Location not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn get_location_by_code(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LocationResponse>, AppError> {
    Ok(Json(app_state.location_service.get_by_code(&code).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/{id}",
    tag = "Locations",
    params(("id" = Uuid, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location", body = LocationResponse),
        (status = 404, description = "Location not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn get_location(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LocationResponse>, AppError> {
    Ok(Json(app_state.location_service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/locations/{id}",
    tag = "Locations",
    params(("id" = Uuid, Path, description = "Location id")),
    request_body = UpdateLocationPayload,
    responses(
        (status = 200, description = "Location replaced", body = LocationResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Location not found"),
        (status = 409, description = "Code already exists")
    ),
    security(("bearer_token" = []))
)]
pub async fn update_location(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationPayload>,
) -> Result<Json<LocationResponse>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.location_service.update(id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/locations/{id}",
    tag = "Locations",
    params(("id" = Uuid, Path, description = "Location id")),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 404, description = "Location not found"),
        (status = 409, description = "Location still referenced by products or transactions")
    ),
    security(("bearer_token" = []))
)]
pub async fn delete_location(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.location_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/{id}/products",
    tag = "Locations",
    params(("id" = Uuid, Path, description = "Location id"), Pagination),
    responses(
        (status = 200, description = "Products stored at the location", body = Vec<ProductResponse>),
        (status = 404, description = "Location not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn location_products(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    Ok(Json(app_state.product_service.by_location(id, page).await?))
}
