// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,

        // --- Products ---
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::search_products,
        handlers::products::low_stock_products,
        handlers::products::scan_barcode,
        handlers::products::get_product_by_sku,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Locations ---
        handlers::locations::create_location,
        handlers::locations::list_locations,
        handlers::locations::search_locations,
        handlers::locations::get_location_by_code,
        handlers::locations::get_location,
        handlers::locations::update_location,
        handlers::locations::delete_location,
        handlers::locations::location_products,

        // --- Inventory ---
        handlers::inventory::receive,
        handlers::inventory::issue,
        handlers::inventory::adjust,
        handlers::inventory::transfer,
        handlers::inventory::list_transactions,
        handlers::inventory::get_transaction,
        handlers::inventory::product_transactions,
        handlers::inventory::user_transactions,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Catalog ---
            models::product::Product,
            models::product::ProductResponse,
            models::product::ProductPayload,
            models::location::Location,
            models::location::LocationResponse,
            models::location::LocationSummary,
            models::location::CreateLocationPayload,
            models::location::UpdateLocationPayload,

            // --- Inventory ---
            models::inventory::TransactionType,
            models::inventory::InventoryTransaction,
            models::inventory::MovementOutcome,
            handlers::inventory::ReceivePayload,
            handlers::inventory::IssuePayload,
            handlers::inventory::AdjustPayload,
            handlers::inventory::TransferPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and sessions"),
        (name = "Products", description = "Product catalog and stock levels"),
        (name = "Locations", description = "Storage locations"),
        (name = "Inventory", description = "Stock movements and the transaction log")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("bearer_token", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}
