// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::Pagination, query::DateRangeQuery},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::inventory::{
        AdjustStock, InventoryTransaction, IssueStock, Movement, MovementOutcome, ReceiveStock, TransferStock,
    },
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceivePayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    #[schema(example = 25)]
    pub quantity: i32,

    /// When given, the product is moved to this location.
    pub location_id: Option<Uuid>,

    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters."))]
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuePayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    #[schema(example = 4)]
    pub quantity: i32,

    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters."))]
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustPayload {
    pub product_id: Uuid,

    #[validate(range(min = 0, message = "New quantity cannot be negative."))]
    #[schema(example = 0)]
    pub new_quantity: i32,

    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters."))]
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferPayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    pub quantity: i32,

    pub from_location_id: Uuid,
    pub to_location_id: Uuid,

    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters."))]
    #[serde(default)]
    pub notes: String,
}

impl From<ReceivePayload> for Movement {
    fn from(p: ReceivePayload) -> Self {
        Movement::Receive(ReceiveStock {
            product_id: p.product_id,
            quantity: p.quantity,
            location_id: p.location_id,
            notes: p.notes,
        })
    }
}

impl From<IssuePayload> for Movement {
    fn from(p: IssuePayload) -> Self {
        Movement::Issue(IssueStock { product_id: p.product_id, quantity: p.quantity, notes: p.notes })
    }
}

impl From<AdjustPayload> for Movement {
    fn from(p: AdjustPayload) -> Self {
        Movement::Adjust(AdjustStock { product_id: p.product_id, new_quantity: p.new_quantity, notes: p.notes })
    }
}

impl From<TransferPayload> for Movement {
    fn from(p: TransferPayload) -> Self {
        Movement::Transfer(TransferStock {
            product_id: p.product_id,
            quantity: p.quantity,
            from_location_id: p.from_location_id,
            to_location_id: p.to_location_id,
            notes: p.notes,
        })
    }
}

// ---
// Movements
// ---

#[utoipa::path(
    post,
    path = "/api/v1/inventory/receive",
    tag = "Inventory",
    request_body = ReceivePayload,
    responses(
        (status = 200, description = "Stock received", body = MovementOutcome),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Product or location not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn receive(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ReceivePayload>,
) -> Result<Json<MovementOutcome>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.inventory_service.execute(payload.into(), user.id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/inventory/issue",
    tag = "Inventory",
    request_body = IssuePayload,
    responses(
        (status = 200, description = "Stock issued", body = MovementOutcome),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Insufficient stock")
    ),
    security(("bearer_token" = []))
)]
pub async fn issue(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<IssuePayload>,
) -> Result<Json<MovementOutcome>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.inventory_service.execute(payload.into(), user.id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/inventory/adjust",
    tag = "Inventory",
    request_body = AdjustPayload,
    responses(
        (status = 200, description = "Stock set to the counted quantity", body = MovementOutcome),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn adjust(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<AdjustPayload>,
) -> Result<Json<MovementOutcome>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.inventory_service.execute(payload.into(), user.id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/inventory/transfer",
    tag = "Inventory",
    request_body = TransferPayload,
    responses(
        (status = 200, description = "Product relocated", body = MovementOutcome),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Product or destination not found"),
        (status = 422, description = "Not at the source location, or insufficient stock")
    ),
    security(("bearer_token" = []))
)]
pub async fn transfer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<TransferPayload>,
) -> Result<Json<MovementOutcome>, AppError> {
    payload.validate()?;
    Ok(Json(app_state.inventory_service.execute(payload.into(), user.id).await?))
}

// ---
// Transaction log
// ---

#[utoipa::path(
    get,
    path = "/api/v1/inventory/transactions",
    tag = "Inventory",
    params(DateRangeQuery, Pagination),
    responses(
        (status = 200, description = "Newest first, optionally within [start, end]", body = Vec<InventoryTransaction>),
        (status = 400, description = "Incomplete or inverted range")
    ),
    security(("bearer_token" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<InventoryTransaction>>, AppError> {
    let service = &app_state.inventory_service;
    let transactions = match range.range()? {
        Some((start, end)) => service.transactions_between(start, end, page).await?,
        None => service.list_transactions(page).await?,
    };
    Ok(Json(transactions))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory/transactions/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Transaction record", body = InventoryTransaction),
        (status = 404, description = "Transaction not found")
    ),
    security(("bearer_token" = []))
)]
pub async fn get_transaction(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InventoryTransaction>, AppError> {
    Ok(Json(app_state.inventory_service.get_transaction(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory/transactions/product/{product_id}",
    tag = "Inventory",
    params(("product_id" = Uuid, Path, description = "Product id"), Pagination),
    responses((status = 200, description = "Product history, newest first", body = Vec<InventoryTransaction>)),
    security(("bearer_token" = []))
)]
pub async fn product_transactions(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<InventoryTransaction>>, AppError> {
    Ok(Json(app_state.inventory_service.product_transactions(product_id, page).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory/transactions/user/{user_id}",
    tag = "Inventory",
    params(("user_id" = Uuid, Path, description = "User id"), Pagination),
    responses((status = 200, description = "Movements recorded by the user, newest first", body = Vec<InventoryTransaction>)),
    security(("bearer_token" = []))
)]
pub async fn user_transactions(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<InventoryTransaction>>, AppError> {
    Ok(Json(app_state.inventory_service.user_transactions(user_id, page).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inventory::TransactionType;

    #[test]
    fn receive_payload_maps_to_movement() {
        let payload: ReceivePayload = serde_json::from_value(serde_json::json!({
            "productId": Uuid::nil(),
            "quantity": 5,
            "locationId": Uuid::nil()
        }))
        .unwrap();
        assert!(payload.validate().is_ok());

        let movement = Movement::from(payload);
        assert_eq!(movement.transaction_type(), TransactionType::In);
        assert_eq!(movement.destination(), Some(Uuid::nil()));
    }

    #[test]
    fn zero_quantity_fails_validation() {
        let payload: IssuePayload = serde_json::from_value(serde_json::json!({
            "productId": Uuid::nil(),
            "quantity": 0
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("quantity"));
    }

    #[test]
    fn adjust_to_zero_is_valid() {
        let payload: AdjustPayload = serde_json::from_value(serde_json::json!({
            "productId": Uuid::nil(),
            "newQuantity": 0,
            "notes": "cycle count"
        }))
        .unwrap();
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn transfer_requires_both_locations() {
        let result: Result<TransferPayload, _> = serde_json::from_value(serde_json::json!({
            "productId": Uuid::nil(),
            "quantity": 1,
            "fromLocationId": Uuid::nil()
        }));
        assert!(result.is_err());
    }
}
