//! `GET /api/dashboard`: stat cards, recent analyses, gauge, and trend.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::dashboard::DashboardSummary;

pub async fn summary(State(ctx): State<ApiContext>) -> Result<Json<DashboardSummary>, ApiError> {
    let snapshot = ctx.core.store().snapshot()?;
    Ok(Json(DashboardSummary::build(
        &snapshot.results,
        &snapshot.historical,
    )))
}
