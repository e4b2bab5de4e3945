//! Liveness plus database check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    migrations: Option<MigrationHealth>,
}

#[derive(Debug, Serialize)]
pub struct MigrationHealth {
    applied: usize,
    known: usize,
}

/// Returns 200 when the database answers, 503 otherwise.
async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if !state.db.health_check().await {
        warn!("Health check failed: database unreachable");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                database: "error",
                migrations: None,
            }),
        );
    }

    let migrations = match state.db.migration_status().await {
        Ok((known, applied)) => Some(MigrationHealth { applied, known }),
        Err(e) => {
            warn!("Could not read migration status: {}", e);
            None
        }
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            database: "ok",
            migrations,
        }),
    )
}
