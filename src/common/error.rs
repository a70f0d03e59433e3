// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Broad classes callers use to map an error to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    BusinessRule,
    NotFound,
    Unauthorized,
    Storage,
}

#[derive(Debug, Error)]
pub enum AppError {
    // --- Validation ---
    #[error("One or more fields are invalid")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Quantity must be positive")]
    NonPositiveQuantity,

    #[error("Quantity cannot be negative")]
    NegativeQuantity,

    #[error("Range start must not be after range end")]
    InvalidDateRange,

    #[error("Query parameter '{0}' is required")]
    MissingQuery(&'static str),

    // --- Business rules ---
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("Insufficient stock at source location: requested {requested}, available {available}")]
    InsufficientStockAtSource { requested: i32, available: i32 },

    #[error("Product is not at the source location")]
    NotAtSourceLocation,

    #[error("Receiving {requested} would exceed the maximum stock (currently {available})")]
    QuantityOverflow { requested: i32, available: i32 },

    #[error("A product with SKU '{0}' already exists")]
    SkuAlreadyExists(String),

    #[error("A product with barcode '{0}' already exists")]
    BarcodeAlreadyExists(String),

    #[error("A location with code '{0}' already exists")]
    LocationCodeAlreadyExists(String),

    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Product {0} is referenced by inventory transactions")]
    ProductInUse(Uuid),

    #[error("Location {0} is referenced by products or inventory transactions")]
    LocationInUse(Uuid),

    // --- Not found ---
    #[error("Product not found")]
    ProductNotFound,

    #[error("Location not found")]
    LocationNotFound,

    #[error("Inventory transaction not found")]
    TransactionNotFound,

    #[error("User not found")]
    UserNotFound,

    // --- Auth ---
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User account is disabled")]
    AccountDisabled,

    #[error("Invalid or missing authentication token")]
    InvalidToken,

    #[error("Session expired")]
    SessionExpired,

    // --- Storage / internal ---
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ValidationError(_)
            | AppError::NonPositiveQuantity
            | AppError::NegativeQuantity
            | AppError::InvalidDateRange
            | AppError::MissingQuery(_) => ErrorKind::Validation,

            AppError::InsufficientStock { .. }
            | AppError::InsufficientStockAtSource { .. }
            | AppError::NotAtSourceLocation
            | AppError::QuantityOverflow { .. }
            | AppError::SkuAlreadyExists(_)
            | AppError::BarcodeAlreadyExists(_)
            | AppError::LocationCodeAlreadyExists(_)
            | AppError::UsernameAlreadyExists
            | AppError::EmailAlreadyExists
            | AppError::ProductInUse(_)
            | AppError::LocationInUse(_) => ErrorKind::BusinessRule,

            AppError::ProductNotFound
            | AppError::LocationNotFound
            | AppError::TransactionNotFound
            | AppError::UserNotFound => ErrorKind::NotFound,

            AppError::InvalidCredentials
            | AppError::AccountDisabled
            | AppError::InvalidToken
            | AppError::SessionExpired => ErrorKind::Unauthorized,

            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_) => ErrorKind::Storage,
        }
    }

    /// Stable machine-readable code sent as `error` in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "invalid_request",
            AppError::NonPositiveQuantity => "non_positive_quantity",
            AppError::NegativeQuantity => "negative_quantity",
            AppError::InvalidDateRange => "invalid_date_range",
            AppError::MissingQuery(_) => "query_required",
            AppError::InsufficientStock { .. } => "insufficient_stock",
            AppError::InsufficientStockAtSource { .. } => "insufficient_stock_at_source",
            AppError::NotAtSourceLocation => "not_at_source_location",
            AppError::QuantityOverflow { .. } => "quantity_overflow",
            AppError::SkuAlreadyExists(_) => "sku_already_exists",
            AppError::BarcodeAlreadyExists(_) => "barcode_already_exists",
            AppError::LocationCodeAlreadyExists(_) => "location_code_already_exists",
            AppError::UsernameAlreadyExists => "username_already_exists",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::ProductInUse(_) => "product_in_use",
            AppError::LocationInUse(_) => "location_in_use",
            AppError::ProductNotFound => "product_not_found",
            AppError::LocationNotFound => "location_not_found",
            AppError::TransactionNotFound => "transaction_not_found",
            AppError::UserNotFound => "user_not_found",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::AccountDisabled => "account_disabled",
            AppError::InvalidToken => "invalid_token",
            AppError::SessionExpired => "session_expired",
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_) => "internal_server_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InsufficientStock { .. }
            | AppError::InsufficientStockAtSource { .. }
            | AppError::NotAtSourceLocation
            | AppError::QuantityOverflow { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::AccountDisabled => StatusCode::FORBIDDEN,
            other => match other.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::BusinessRule => StatusCode::CONFLICT,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            // Field-by-field validation details
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": self.code(),
                    "message": self.to_string(),
                    "details": details,
                })
            }
            // Storage details stay in the logs
            e if e.kind() == ErrorKind::Storage => {
                tracing::error!("Internal server error: {}", e);
                json!({
                    "error": e.code(),
                    "message": "An unexpected error occurred",
                })
            }
            e => json!({
                "error": e.code(),
                "message": e.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn stock_rules_map_to_unprocessable_entity() {
        let err = AppError::InsufficientStock { requested: 5, available: 2 };
        assert_eq!(err.kind(), ErrorKind::BusinessRule);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::NotAtSourceLocation.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let overflow = AppError::QuantityOverflow { requested: 10, available: i32::MAX - 1 };
        assert_eq!(overflow.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(overflow.code(), "quantity_overflow");
    }

    #[test]
    fn duplicates_and_references_map_to_conflict() {
        assert_eq!(AppError::SkuAlreadyExists("A-1".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::LocationInUse(Uuid::nil()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::UsernameAlreadyExists.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_is_distinct_from_business_rules() {
        assert_eq!(AppError::ProductNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(AppError::ProductNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_ne!(AppError::ProductNotFound.kind(), AppError::InsufficientStock { requested: 1, available: 0 }.kind());
    }

    #[test]
    fn auth_failures() {
        assert_eq!(AppError::SessionExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::AccountDisabled.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn validation_faults_are_bad_requests() {
        assert_eq!(AppError::NonPositiveQuantity.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NegativeQuantity.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::MissingQuery("q").status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn storage_errors_hide_details() {
        let err = AppError::DatabaseError(sqlx::Error::PoolTimedOut);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "internal_server_error");
        assert_eq!(body["message"], "An unexpected error occurred");
    }

    #[tokio::test]
    async fn business_errors_carry_their_message() {
        let response = AppError::NotAtSourceLocation.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "not_at_source_location");
        assert_eq!(body["message"], "Product is not at the source location");
    }
}
