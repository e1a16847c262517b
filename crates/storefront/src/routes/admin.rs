//! Admin dashboard route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::stats::dashboard_stats;
use crate::error::Result;
use crate::models::DashboardStats;
use crate::state::AppState;

/// Aggregate numbers for the admin dashboard.
#[instrument(skip(state))]
pub async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>> {
    let stats = dashboard_stats(state.pool()).await?;
    Ok(Json(stats))
}
