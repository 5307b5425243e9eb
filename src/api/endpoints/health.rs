//! Health check and in-flight analysis listing.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::analysis_tracker::PendingAnalysis;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub insight_model: String,
    pub analyses_recorded: usize,
    pub pending_analyses: usize,
}

/// `GET /api/health`: liveness plus a few counters.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        insight_model: ctx.core.insight_model().to_string(),
        analyses_recorded: ctx.core.store().result_count()?,
        pending_analyses: ctx.core.tracker().pending_count(),
    }))
}

/// `GET /api/analyses/pending`: analyses still waiting on enrichment.
pub async fn pending(State(ctx): State<ApiContext>) -> Json<Vec<PendingAnalysis>> {
    Json(ctx.core.tracker().pending())
}
