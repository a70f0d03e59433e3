// src/db/location_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{constraint_violation, like_pattern, Violation},
        error::AppError,
        pagination::Pagination,
    },
    models::location::{CreateLocationPayload, Location, UpdateLocationPayload},
};

fn map_code_conflict(e: sqlx::Error, code: &str) -> AppError {
    match constraint_violation(&e) {
        Some(Violation::Unique(c)) if c == "locations_code_key" => {
            AppError::LocationCodeAlreadyExists(code.to_string())
        }
        _ => e.into(),
    }
}

#[derive(Clone, Default)]
pub struct LocationRepository;

impl LocationRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &CreateLocationPayload) -> Result<Location, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (code, name, description, building, floor, aisle, shelf)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(payload.normalized_code())
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.building)
        .bind(&payload.floor)
        .bind(&payload.aisle)
        .bind(&payload.shelf)
        .fetch_one(executor)
        .await
        .map_err(|e| map_code_conflict(e, payload.normalized_code()))
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Location>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let location = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(location)
    }

    pub async fn find_by_code<'e, E>(&self, executor: E, code: &str) -> Result<Option<Location>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let location = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE code = $1")
            .bind(code)
            .fetch_optional(executor)
            .await?;
        Ok(location)
    }

    /// Full replace. `None` when the row does not exist.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateLocationPayload,
    ) -> Result<Option<Location>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations SET
                code = $2,
                name = $3,
                description = $4,
                building = $5,
                floor = $6,
                aisle = $7,
                shelf = $8,
                is_active = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.normalized_code())
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.building)
        .bind(&payload.floor)
        .bind(&payload.aisle)
        .bind(&payload.shelf)
        .bind(payload.is_active)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_code_conflict(e, payload.normalized_code()))
    }

    /// Hard delete; refused while products or transactions point here.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| match constraint_violation(&e) {
                Some(Violation::ForeignKey(_)) => AppError::LocationInUse(id),
                _ => e.into(),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::LocationNotFound);
        }
        Ok(())
    }

    pub async fn list<'e, E>(&self, executor: E, page: Pagination) -> Result<Vec<Location>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let locations = sqlx::query_as::<_, Location>(
            "SELECT * FROM locations ORDER BY code ASC, id ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        Ok(locations)
    }

    pub async fn search<'e, E>(&self, executor: E, query: &str, page: Pagination) -> Result<Vec<Location>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let locations = sqlx::query_as::<_, Location>(
            r#"
            SELECT * FROM locations
            WHERE name ILIKE $1
               OR code ILIKE $1
               OR building ILIKE $1
               OR description ILIKE $1
            ORDER BY code ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(like_pattern(query))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
        Ok(locations)
    }
}
