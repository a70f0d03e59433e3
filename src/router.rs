// src/router.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use utoipa::OpenApi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::{auth::auth_guard, cors::cors, logging::log_requests, recovery::catch_panic},
};

pub fn build_router(app_state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::get_me))
        // Only the two routes above sit behind the guard
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route("/search", get(handlers::products::search_products))
        .route("/low-stock", get(handlers::products::low_stock_products))
        .route("/scan", get(handlers::products::scan_barcode))
        .route("/sku/{sku}", get(handlers::products::get_product_by_sku))
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        );

    let location_routes = Router::new()
        .route(
            "/",
            post(handlers::locations::create_location).get(handlers::locations::list_locations),
        )
        .route("/search", get(handlers::locations::search_locations))
        .route("/code/{code}", get(handlers::locations::get_location_by_code))
        .route(
            "/{id}",
            get(handlers::locations::get_location)
                .put(handlers::locations::update_location)
                .delete(handlers::locations::delete_location),
        )
        .route("/{id}/products", get(handlers::locations::location_products));

    let inventory_routes = Router::new()
        .route("/receive", post(handlers::inventory::receive))
        .route("/issue", post(handlers::inventory::issue))
        .route("/adjust", post(handlers::inventory::adjust))
        .route("/transfer", post(handlers::inventory::transfer))
        .route("/transactions", get(handlers::inventory::list_transactions))
        .route("/transactions/{id}", get(handlers::inventory::get_transaction))
        .route(
            "/transactions/product/{product_id}",
            get(handlers::inventory::product_transactions),
        )
        .route("/transactions/user/{user_id}", get(handlers::inventory::user_transactions));

    let protected = Router::new()
        .nest("/products", product_routes)
        .nest("/locations", location_routes)
        .nest("/inventory", inventory_routes)
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let api = Router::new().nest("/auth", auth_routes).merge(protected);

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/v1", api)
        .layer(axum_middleware::from_fn(catch_panic))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), cors))
        .layer(axum_middleware::from_fn(log_requests))
        .with_state(app_state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
