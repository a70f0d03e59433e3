// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{constraint_violation, like_pattern, Violation},
        error::AppError,
        pagination::Pagination,
    },
    models::product::Product,
};

/// Column values written on create and full replace.
#[derive(Debug, Clone)]
pub struct ProductRecord<'a> {
    pub sku: &'a str,
    pub barcode: Option<&'a str>,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub quantity: i32,
    pub min_quantity: i32,
    pub price: Decimal,
    pub location_id: Option<Uuid>,
}

impl<'a> From<&'a Product> for ProductRecord<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            sku: &product.sku,
            barcode: product.barcode.as_deref(),
            name: &product.name,
            description: product.description.as_deref(),
            quantity: product.quantity,
            min_quantity: product.min_quantity,
            price: product.price,
            location_id: product.location_id,
        }
    }
}

// Maps constraint names from the migrations to domain errors
fn map_write_error(e: sqlx::Error, record: &ProductRecord<'_>) -> AppError {
    match constraint_violation(&e) {
        Some(Violation::Unique(c)) if c == "products_sku_key" => {
            AppError::SkuAlreadyExists(record.sku.to_string())
        }
        Some(Violation::Unique(c)) if c == "products_barcode_key" => {
            AppError::BarcodeAlreadyExists(record.barcode.unwrap_or_default().to_string())
        }
        Some(Violation::ForeignKey(c)) if c == "products_location_id_fkey" => AppError::LocationNotFound,
        _ => e.into(),
    }
}

#[derive(Clone, Default)]
pub struct ProductRepository;

impl ProductRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(&self, executor: E, record: &ProductRecord<'_>) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (sku, barcode, name, description, quantity, min_quantity, price, location_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(record.sku)
        .bind(record.barcode)
        .bind(record.name)
        .bind(record.description)
        .bind(record.quantity)
        .bind(record.min_quantity)
        .bind(record.price)
        .bind(record.location_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_write_error(e, record))
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Same as `find_by_id` but locks the row until the surrounding transaction ends.
    pub async fn find_by_id_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn find_by_sku<'e, E>(&self, executor: E, sku: &str) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE sku = $1")
            .bind(sku)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn find_by_barcode<'e, E>(&self, executor: E, barcode: &str) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE barcode = $1")
            .bind(barcode)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Full replace. `None` when the row does not exist.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        record: &ProductRecord<'_>,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                sku = $2,
                barcode = $3,
                name = $4,
                description = $5,
                quantity = $6,
                min_quantity = $7,
                price = $8,
                location_id = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(record.sku)
        .bind(record.barcode)
        .bind(record.name)
        .bind(record.description)
        .bind(record.quantity)
        .bind(record.min_quantity)
        .bind(record.price)
        .bind(record.location_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_write_error(e, record))
    }

    /// Hard delete; refused by the database while transactions reference the product.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| match constraint_violation(&e) {
                Some(Violation::ForeignKey(_)) => AppError::ProductInUse(id),
                _ => e.into(),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }

    pub async fn list<'e, E>(&self, executor: E, page: Pagination) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products ORDER BY name ASC, id ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn search<'e, E>(&self, executor: E, query: &str, page: Pagination) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE name ILIKE $1
               OR sku ILIKE $1
               OR barcode ILIKE $1
               OR description ILIKE $1
            ORDER BY name ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(like_pattern(query))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn list_low_stock<'e, E>(&self, executor: E, page: Pagination) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE quantity <= min_quantity
            ORDER BY quantity ASC, name ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn list_by_location<'e, E>(
        &self,
        executor: E,
        location_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE location_id = $1
            ORDER BY name ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(location_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::test_product;

    #[test]
    fn record_mirrors_product_columns() {
        let mut product = test_product(7, Some(Uuid::new_v4()));
        product.barcode = Some("123".into());
        let record = ProductRecord::from(&product);
        assert_eq!(record.sku, product.sku);
        assert_eq!(record.barcode, Some("123"));
        assert_eq!(record.quantity, 7);
        assert_eq!(record.location_id, product.location_id);
    }

    #[test]
    fn non_constraint_errors_pass_through_as_storage_faults() {
        let product = test_product(1, None);
        let err = map_write_error(sqlx::Error::PoolTimedOut, &ProductRecord::from(&product));
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
