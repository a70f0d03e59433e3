// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::location::{Location, LocationSummary};

// ---
// Product (catalog entry + current stock)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub barcode: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub min_quantity: i32,
    #[schema(value_type = f64, example = 12.5)]
    pub price: Decimal,
    pub location_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }

    /// Adds `delta` to the quantity, flooring at zero.
    pub fn apply_delta(&mut self, delta: i32) {
        self.quantity = self.quantity.saturating_add(delta).max(0);
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub is_low_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationSummary>,
}

impl ProductResponse {
    pub fn with_location(product: Product, location: Option<&Location>) -> Self {
        Self {
            is_low_stock: product.is_low_stock(),
            location: location.map(LocationSummary::from),
            product,
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self::with_location(product, None)
    }
}

// ---
// Payloads
// ---

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("Value cannot be negative.".into());
        return Err(err);
    }
    Ok(())
}

/// Create and update share the same shape: update is a full replace.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    #[schema(example = "Hex bolt M8")]
    pub name: String,

    #[validate(length(min = 1, max = 64, message = "SKU is required (max 64 characters)."))]
    #[schema(example = "BOLT-M8-40")]
    pub sku: String,

    #[schema(example = "4006381333931")]
    pub barcode: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 0, message = "Quantity cannot be negative."))]
    #[serde(default)]
    pub quantity: i32,

    #[validate(range(min = 0, message = "Minimum quantity cannot be negative."))]
    #[serde(default)]
    pub min_quantity: i32,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 0.35)]
    pub price: Decimal,

    pub location_id: Option<Uuid>,
}

impl ProductPayload {
    /// Blank barcodes are stored as NULL so they never collide.
    pub fn normalized_barcode(&self) -> Option<&str> {
        self.barcode
            .as_deref()
            .map(str::trim)
            .filter(|barcode| !barcode.is_empty())
    }
}

#[cfg(test)]
pub(crate) fn test_product(quantity: i32, location_id: Option<Uuid>) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        sku: "SKU-1".into(),
        barcode: None,
        name: "Widget".into(),
        description: None,
        quantity,
        min_quantity: 2,
        price: Decimal::new(1999, 2),
        location_id,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn low_stock_is_inclusive_of_threshold() {
        let mut product = test_product(2, None);
        assert!(product.is_low_stock());
        product.quantity = 3;
        assert!(!product.is_low_stock());
    }

    #[test]
    fn apply_delta_clamps_at_zero() {
        let mut product = test_product(3, None);
        product.apply_delta(-10);
        assert_eq!(product.quantity, 0);
        product.apply_delta(4);
        assert_eq!(product.quantity, 4);
    }

    #[test]
    fn apply_delta_saturates_instead_of_overflowing() {
        let mut product = test_product(i32::MAX - 1, None);
        product.apply_delta(10);
        assert_eq!(product.quantity, i32::MAX);
    }

    #[test]
    fn blank_barcode_is_treated_as_absent() {
        let payload: ProductPayload = serde_json::from_value(serde_json::json!({
            "name": "Widget", "sku": "W-1", "barcode": "   ", "price": 1.5
        }))
        .unwrap();
        assert_eq!(payload.normalized_barcode(), None);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        let payload: ProductPayload = serde_json::from_value(serde_json::json!({
            "name": "Widget", "sku": "W-1", "price": -1
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn response_includes_low_stock_flag() {
        let json = serde_json::to_value(ProductResponse::from(test_product(1, None))).unwrap();
        assert_eq!(json["isLowStock"], true);
        assert_eq!(json["minQuantity"], 2);
        assert!(json.get("location").is_none());
    }

    proptest! {
        /// Quantity never goes below zero whatever deltas are applied.
        #[test]
        fn quantity_never_negative(
            start in 0i32..10_000,
            deltas in proptest::collection::vec(-5_000i32..5_000, 0..50)
        ) {
            let mut product = test_product(start, None);
            for delta in deltas {
                product.apply_delta(delta);
                prop_assert!(product.quantity >= 0);
            }
        }
    }
}
