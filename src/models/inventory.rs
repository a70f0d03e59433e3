// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::product::ProductResponse;

// --- Transaction type ---
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "inventory_transaction_type", rename_all = "SCREAMING_SNAKE_CASE")] // database
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum TransactionType {
    In,
    Out,
    Adjust,
    Transfer,
}

// --- Inventory transaction (append-only audit record) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransaction {
    pub id: Uuid,
    pub product_id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Signed. IN/OUT/TRANSFER carry the moved magnitude, ADJUST the delta.
    pub quantity: i32,
    pub from_location_id: Option<Uuid>,
    pub to_location_id: Option<Uuid>,
    pub user_id: Uuid,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Row to insert; id and created_at come from the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInventoryTransaction {
    pub product_id: Uuid,
    pub transaction_type: TransactionType,
    pub quantity: i32,
    pub from_location_id: Option<Uuid>,
    pub to_location_id: Option<Uuid>,
    pub user_id: Uuid,
    pub notes: String,
}

// --- Movement commands ---

#[derive(Debug, Clone)]
pub struct ReceiveStock {
    pub product_id: Uuid,
    pub quantity: i32,
    pub location_id: Option<Uuid>,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct IssueStock {
    pub product_id: Uuid,
    pub quantity: i32,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct AdjustStock {
    pub product_id: Uuid,
    pub new_quantity: i32,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct TransferStock {
    pub product_id: Uuid,
    pub quantity: i32,
    pub from_location_id: Uuid,
    pub to_location_id: Uuid,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub enum Movement {
    Receive(ReceiveStock),
    Issue(IssueStock),
    Adjust(AdjustStock),
    Transfer(TransferStock),
}

impl Movement {
    pub fn product_id(&self) -> Uuid {
        match self {
            Movement::Receive(cmd) => cmd.product_id,
            Movement::Issue(cmd) => cmd.product_id,
            Movement::Adjust(cmd) => cmd.product_id,
            Movement::Transfer(cmd) => cmd.product_id,
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Movement::Receive(_) => TransactionType::In,
            Movement::Issue(_) => TransactionType::Out,
            Movement::Adjust(_) => TransactionType::Adjust,
            Movement::Transfer(_) => TransactionType::Transfer,
        }
    }

    /// Location the product is moved into, which must exist before the write.
    pub fn destination(&self) -> Option<Uuid> {
        match self {
            Movement::Receive(cmd) => cmd.location_id,
            Movement::Transfer(cmd) => Some(cmd.to_location_id),
            Movement::Issue(_) | Movement::Adjust(_) => None,
        }
    }
}

/// Result of a successful movement.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementOutcome {
    pub product: ProductResponse,
    pub transaction: InventoryTransaction,
}
