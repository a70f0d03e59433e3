// src/middleware/recovery.rs

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::common::error::AppError;

/// Turns a panicking handler into a 500 instead of a dropped connection.
pub async fn catch_panic(request: Request, next: Next) -> Response {
    match tokio::spawn(next.run(request)).await {
        Ok(response) => response,
        Err(e) if e.is_panic() => {
            let panic = e.into_panic();
            let message = panic
                .downcast_ref::<&'static str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            tracing::error!(panic = %message, "panic recovered");
            AppError::InternalServerError(anyhow::anyhow!("handler panicked: {message}")).into_response()
        }
        Err(e) => AppError::InternalServerError(anyhow::anyhow!("handler task failed: {e}")).into_response(),
    }
}
