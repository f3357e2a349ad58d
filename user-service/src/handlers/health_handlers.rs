use axum::{extract::State, Json};
use std::sync::Arc;
use userapi_shared::{error::ServiceError, models::HealthStatus, store::UserStore};

use crate::error::Result;
use crate::models::{ApiDescriptor, API_DESCRIPTOR};

// GET /
pub async fn root() -> Json<ApiDescriptor> {
    Json(API_DESCRIPTOR)
}

// GET /health
pub async fn health_check<S>(State(store): State<Arc<S>>) -> Result<Json<HealthStatus>>
where
    S: UserStore,
{
    store
        .ping()
        .await
        .map_err(|e| ServiceError::Internal(format!("Database error: {}", e.detail())))?;

    Ok(Json(HealthStatus::healthy()))
}
