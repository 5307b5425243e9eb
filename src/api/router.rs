//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. CORS → 2. Access log

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router with all endpoints under `/api/`.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/analyses/pending", get(endpoints::health::pending))
        .route("/analyze", post(endpoints::analyze::run))
        .route("/results", get(endpoints::results::list))
        .route("/results/:id", get(endpoints::results::detail))
        .route("/results/:id/report", get(endpoints::results::report))
        .route("/results/:id/export", post(endpoints::results::export))
        .route("/trends", get(endpoints::trends::series))
        .route("/historical", get(endpoints::trends::historical))
        .route("/dashboard", get(endpoints::dashboard::summary))
        .route("/rules", get(endpoints::rules::list))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(CorsLayer::permissive());

    Router::new().nest("/api", routes)
}
