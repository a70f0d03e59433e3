// src/db/transaction_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{constraint_violation, Violation},
        error::AppError,
        pagination::Pagination,
    },
    models::inventory::{InventoryTransaction, NewInventoryTransaction},
};

/// Append-only log: exposes inserts and reads, nothing else.
#[derive(Clone, Default)]
pub struct TransactionRepository;

impl TransactionRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        entry: &NewInventoryTransaction,
    ) -> Result<InventoryTransaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, InventoryTransaction>(
            r#"
            INSERT INTO inventory_transactions
                (product_id, transaction_type, quantity, from_location_id, to_location_id, user_id, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(entry.product_id)
        .bind(entry.transaction_type)
        .bind(entry.quantity)
        .bind(entry.from_location_id)
        .bind(entry.to_location_id)
        .bind(entry.user_id)
        .bind(&entry.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| match constraint_violation(&e) {
            Some(Violation::ForeignKey(c)) if c.contains("location") => AppError::LocationNotFound,
            Some(Violation::ForeignKey(c)) if c.contains("product") => AppError::ProductNotFound,
            Some(Violation::ForeignKey(c)) if c.contains("user") => AppError::UserNotFound,
            _ => e.into(),
        })
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<InventoryTransaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction =
            sqlx::query_as::<_, InventoryTransaction>("SELECT * FROM inventory_transactions WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(transaction)
    }

    pub async fn list<'e, E>(&self, executor: E, page: Pagination) -> Result<Vec<InventoryTransaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transactions = sqlx::query_as::<_, InventoryTransaction>(
            r#"
            SELECT * FROM inventory_transactions
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        Ok(transactions)
    }

    pub async fn list_by_product<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<InventoryTransaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transactions = sqlx::query_as::<_, InventoryTransaction>(
            r#"
            SELECT * FROM inventory_transactions
            WHERE product_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(product_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        Ok(transactions)
    }

    pub async fn list_by_user<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<InventoryTransaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transactions = sqlx::query_as::<_, InventoryTransaction>(
            r#"
            SELECT * FROM inventory_transactions
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        Ok(transactions)
    }

    /// Records created within `[start, end]`, both ends inclusive.
    pub async fn list_by_date_range<'e, E>(
        &self,
        executor: E,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: Pagination,
    ) -> Result<Vec<InventoryTransaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transactions = sqlx::query_as::<_, InventoryTransaction>(
            r#"
            SELECT * FROM inventory_transactions
            WHERE created_at >= $1 AND created_at <= $2
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        Ok(transactions)
    }
}
