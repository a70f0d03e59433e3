// src/common/query.rs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::common::error::AppError;

/// `?q=` for the search endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring
    pub q: Option<String>,
}

impl SearchQuery {
    pub fn term(&self) -> Result<&str, AppError> {
        non_blank(self.q.as_deref()).ok_or(AppError::MissingQuery("q"))
    }
}

/// `?barcode=` for the scan endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BarcodeQuery {
    pub barcode: Option<String>,
}

impl BarcodeQuery {
    pub fn barcode(&self) -> Result<&str, AppError> {
        non_blank(self.barcode.as_deref()).ok_or(AppError::MissingQuery("barcode"))
    }
}

/// Optional `?start=&end=` (RFC 3339) over the transaction log.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRangeQuery {
    /// `None` when neither bound is given; a lone bound is rejected.
    pub fn range(&self) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>, AppError> {
        match (self.start, self.end) {
            (None, None) => Ok(None),
            (Some(start), Some(end)) => Ok(Some((start, end))),
            (None, Some(_)) => Err(AppError::MissingQuery("start")),
            (Some(_), None) => Err(AppError::MissingQuery("end")),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
