// src/models/location.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ---
// Location (a physical storage place)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: String,
    pub building: String,
    pub floor: String,
    pub aisle: String,
    pub shelf: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Location {
    /// building/floor/aisle/shelf joined with "/", skipping empty segments.
    pub fn full_path(&self) -> String {
        [&self.building, &self.floor, &self.aisle, &self.shelf]
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    #[serde(flatten)]
    pub location: Location,
    #[schema(example = "A/2/5")]
    pub full_path: String,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        let full_path = location.full_path();
        Self { location, full_path }
    }
}

/// Short form embedded in product detail responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub full_path: String,
}

impl From<&Location> for LocationSummary {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id,
            code: location.code.clone(),
            name: location.name.clone(),
            full_path: location.full_path(),
        }
    }
}

// ---
// Payloads
// ---

fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Code cannot be blank.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    #[schema(example = "Main warehouse, aisle 3")]
    pub name: String,

    #[validate(
        length(min = 1, max = 64, message = "Code is required (max 64 characters)."),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "WH1-A3")]
    pub code: String,

    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub aisle: String,
    #[serde(default)]
    pub shelf: String,
}

/// Full replace of a location's editable fields.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,

    #[validate(
        length(min = 1, max = 64, message = "Code is required (max 64 characters)."),
        custom(function = "validate_not_blank")
    )]
    pub code: String,

    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub aisle: String,
    #[serde(default)]
    pub shelf: String,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CreateLocationPayload {
    /// Codes are stored without surrounding whitespace.
    pub fn normalized_code(&self) -> &str {
        self.code.trim()
    }
}

impl UpdateLocationPayload {
    pub fn normalized_code(&self) -> &str {
        self.code.trim()
    }
}

#[cfg(test)]
pub(crate) fn test_location(building: &str, floor: &str, aisle: &str, shelf: &str) -> Location {
    let now = Utc::now();
    Location {
        id: Uuid::new_v4(),
        code: "LOC-1".into(),
        name: "Test location".into(),
        description: String::new(),
        building: building.into(),
        floor: floor.into(),
        aisle: aisle.into(),
        shelf: shelf.into(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
