//! `POST /api/analyze`: run the full pipeline for one location.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::AnalysisResult;
use crate::pipeline::analysis::AnalysisRequest;

/// Omitted `envData` falls back to the default readings. The response
/// carries the stored result, including its generated id.
pub async fn run(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AnalysisResult>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let result = ctx.core.analyze(&request.location, request.env_data).await?;

    Ok((StatusCode::CREATED, Json(result)))
}
