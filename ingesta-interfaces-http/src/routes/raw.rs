use axum::Router;

use ingesta_application::AppState;

use crate::handlers::{ingest_handlers, ops_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/ingesta_raw",
            axum::routing::post(ingest_handlers::ingest_raw),
        )
        .route(
            "/api/ingesta_raw",
            axum::routing::post(ingest_handlers::ingest_raw),
        )
        .route(
            "/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
