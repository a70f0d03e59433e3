// src/services/location_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Pagination},
    db::LocationRepository,
    models::location::{CreateLocationPayload, LocationResponse, UpdateLocationPayload},
};

#[derive(Clone)]
pub struct LocationService {
    location_repo: LocationRepository,
    pool: PgPool,
}

impl LocationService {
    pub fn new(location_repo: LocationRepository, pool: PgPool) -> Self {
        Self { location_repo, pool }
    }

    pub async fn create(&self, payload: &CreateLocationPayload) -> Result<LocationResponse, AppError> {
        let location = self.location_repo.create(&self.pool, payload).await?;
        tracing::info!(location_id = %location.id, code = %location.code, "location created");
        Ok(LocationResponse::from(location))
    }

    pub async fn get(&self, id: Uuid) -> Result<LocationResponse, AppError> {
        self.location_repo
            .find_by_id(&self.pool, id)
            .await?
            .map(LocationResponse::from)
            .ok_or(AppError::LocationNotFound)
    }

    pub async fn get_by_code(&self, code: &str) -> Result<LocationResponse, AppError> {
        self.location_repo
            .find_by_code(&self.pool, code.trim())
            .await?
            .map(LocationResponse::from)
            .ok_or(AppError::LocationNotFound)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateLocationPayload) -> Result<LocationResponse, AppError> {
        let location = self
            .location_repo
            .update(&self.pool, id, payload)
            .await?
            .ok_or(AppError::LocationNotFound)?;
        tracing::info!(location_id = %location.id, "location updated");
        Ok(LocationResponse::from(location))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.location_repo.delete(&self.pool, id).await?;
        tracing::info!(location_id = %id, "location deleted");
        Ok(())
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<LocationResponse>, AppError> {
        let locations = self.location_repo.list(&self.pool, page).await?;
        Ok(locations.into_iter().map(LocationResponse::from).collect())
    }

    pub async fn search(&self, query: &str, page: Pagination) -> Result<Vec<LocationResponse>, AppError> {
        let locations = self.location_repo.search(&self.pool, query, page).await?;
        Ok(locations.into_iter().map(LocationResponse::from).collect())
    }
}
