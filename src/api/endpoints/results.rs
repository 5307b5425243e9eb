//! Stored analysis results: listing, detail, and report download/export.

use std::path::PathBuf;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::AnalysisResult;
use crate::report;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub path: PathBuf,
    pub filename: String,
}

/// `GET /api/results`: newest first, optionally capped by `?limit=`.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AnalysisResult>>, ApiError> {
    let results = match query.limit {
        Some(limit) => ctx.core.store().recent(limit)?,
        None => ctx.core.store().results()?,
    };
    Ok(Json(results))
}

/// `GET /api/results/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResult>, ApiError> {
    find(&ctx, &id).map(Json)
}

/// `GET /api/results/:id/report`: plain-text report as an attachment.
pub async fn report(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let result = find(&ctx, &id)?;
    let disposition = format!("attachment; filename=\"{}\"", report::filename_for(&result));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report::render_report(&result),
    )
        .into_response())
}

/// `POST /api/results/:id/export`: write the report into the reports dir.
pub async fn export(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<ExportResponse>, ApiError> {
    let result = find(&ctx, &id)?;
    let dir = ctx.core.config().reports_dir.clone();

    let path = tokio::task::spawn_blocking(move || report::export_report(&dir, &result))
        .await
        .map_err(|e| ApiError::Internal(format!("Export task failed: {e}")))??;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Json(ExportResponse { path, filename }))
}

fn find(ctx: &ApiContext, id: &str) -> Result<AnalysisResult, ApiError> {
    ctx.core
        .store()
        .get(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Result {id} not found")))
}
