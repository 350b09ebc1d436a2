use axum::{extract::State, Json};
use std::sync::Arc;

use crate::db::DashboardStats;
use crate::AppState;

use super::error::ApiError;

/// GET /admin/api/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(DashboardStats::collect(&state.db).await?))
}
