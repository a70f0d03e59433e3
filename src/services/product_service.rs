// src/services/product_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Pagination},
    db::{LocationRepository, ProductRecord, ProductRepository},
    models::product::{Product, ProductPayload, ProductResponse},
};

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    location_repo: LocationRepository,
    pool: PgPool,
}

impl ProductService {
    pub fn new(product_repo: ProductRepository, location_repo: LocationRepository, pool: PgPool) -> Self {
        Self { product_repo, location_repo, pool }
    }

    pub async fn create(&self, payload: &ProductPayload) -> Result<ProductResponse, AppError> {
        let product = self.product_repo.create(&self.pool, &record_from(payload)).await?;
        tracing::info!(product_id = %product.id, sku = %product.sku, "product created");
        Ok(ProductResponse::from(product))
    }

    /// Product detail, with a summary of the location it sits in.
    pub async fn get(&self, id: Uuid) -> Result<ProductResponse, AppError> {
        let product = self
            .product_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;
        self.with_location(product).await
    }

    pub async fn get_by_sku(&self, sku: &str) -> Result<ProductResponse, AppError> {
        let product = self
            .product_repo
            .find_by_sku(&self.pool, sku)
            .await?
            .ok_or(AppError::ProductNotFound)?;
        self.with_location(product).await
    }

    pub async fn get_by_barcode(&self, barcode: &str) -> Result<ProductResponse, AppError> {
        let product = self
            .product_repo
            .find_by_barcode(&self.pool, barcode.trim())
            .await?
            .ok_or(AppError::ProductNotFound)?;
        self.with_location(product).await
    }

    /// Full replace of every editable field.
    pub async fn update(&self, id: Uuid, payload: &ProductPayload) -> Result<ProductResponse, AppError> {
        let product = self
            .product_repo
            .update(&self.pool, id, &record_from(payload))
            .await?
            .ok_or(AppError::ProductNotFound)?;
        tracing::info!(product_id = %product.id, "product updated");
        Ok(ProductResponse::from(product))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.product_repo.delete(&self.pool, id).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<ProductResponse>, AppError> {
        let products = self.product_repo.list(&self.pool, page).await?;
        Ok(products.into_iter().map(ProductResponse::from).collect())
    }

    pub async fn search(&self, query: &str, page: Pagination) -> Result<Vec<ProductResponse>, AppError> {
        let products = self.product_repo.search(&self.pool, query, page).await?;
        Ok(products.into_iter().map(ProductResponse::from).collect())
    }

    pub async fn low_stock(&self, page: Pagination) -> Result<Vec<ProductResponse>, AppError> {
        let products = self.product_repo.list_low_stock(&self.pool, page).await?;
        Ok(products.into_iter().map(ProductResponse::from).collect())
    }

    /// Products currently stored at a location; 404 when the location is unknown.
    pub async fn by_location(&self, location_id: Uuid, page: Pagination) -> Result<Vec<ProductResponse>, AppError> {
        let location = self
            .location_repo
            .find_by_id(&self.pool, location_id)
            .await?
            .ok_or(AppError::LocationNotFound)?;
        let products = self.product_repo.list_by_location(&self.pool, location_id, page).await?;
        Ok(products
            .into_iter()
            .map(|product| ProductResponse::with_location(product, Some(&location)))
            .collect())
    }

    async fn with_location(&self, product: Product) -> Result<ProductResponse, AppError> {
        let location = match product.location_id {
            Some(location_id) => self.location_repo.find_by_id(&self.pool, location_id).await?,
            None => None,
        };
        Ok(ProductResponse::with_location(product, location.as_ref()))
    }
}

fn record_from(payload: &ProductPayload) -> ProductRecord<'_> {
    ProductRecord {
        sku: payload.sku.trim(),
        barcode: payload.normalized_barcode(),
        name: &payload.name,
        description: payload.description.as_deref(),
        quantity: payload.quantity,
        min_quantity: payload.min_quantity,
        price: payload.price,
        location_id: payload.location_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn record_normalizes_sku_and_barcode() {
        let payload: ProductPayload = serde_json::from_value(serde_json::json!({
            "name": "Widget",
            "sku": "  W-1 ",
            "barcode": "",
            "price": 2.5,
            "quantity": 3
        }))
        .unwrap();

        let record = record_from(&payload);

        assert_eq!(record.sku, "W-1");
        assert_eq!(record.barcode, None);
        assert_eq!(record.quantity, 3);
        assert_eq!(record.min_quantity, 0);
        assert_eq!(record.price, Decimal::new(25, 1));
    }
}
