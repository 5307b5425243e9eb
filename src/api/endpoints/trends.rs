//! Historical case data and the year-indexed trend series.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::HistoricalEntry;
use crate::trends::TrendSeries;

/// `GET /api/trends`
pub async fn series(State(ctx): State<ApiContext>) -> Result<Json<TrendSeries>, ApiError> {
    Ok(Json(ctx.core.store().trend()?))
}

/// `GET /api/historical`: raw entries in insertion order.
pub async fn historical(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<HistoricalEntry>>, ApiError> {
    Ok(Json(ctx.core.store().historical()?))
}
