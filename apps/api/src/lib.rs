//! # matreg-api: HTTP JSON Gateway
//!
//! Thin translation layer between HTTP and the registries in `matreg-db`.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          matreg-api                                     │
//! │                                                                         │
//! │  client ──► CorsLayer ──► TraceLayer ──► Router                         │
//! │                                            │                            │
//! │              ┌─────────────────────────────┼──────────────────┐         │
//! │              ▼                             ▼                  ▼         │
//! │     routes::materials            routes::suppliers     routes::health   │
//! │              │                             │                  │         │
//! │              └──────────────┬──────────────┘                  │         │
//! │                             ▼                                 ▼         │
//! │              MaterialRegistry / SupplierRegistry ───────► SQLite        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every handler returns either an [`ApiResponse`] envelope or an
//! [`ApiError`]; no handler touches SQL.

pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
pub mod state;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorKind};
pub use response::ApiResponse;
pub use state::AppState;

/// Builds the full router with middleware attached.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .merge(routes::materials::routes())
        .merge(routes::suppliers::routes())
        .merge(routes::health::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
