//! # regtrace-api — HTTP Surface for regtrace
//!
//! Exposes the presentation-layer queries over the compliance store and
//! the two externally triggered writes: impact resolution and requirement
//! edits (including market verdicts).
//!
//! ## API Surface
//!
//! | Prefix                      | Module                      |
//! |-----------------------------|-----------------------------|
//! | `/v1/regulations/*`         | [`routes::regulations`]     |
//! | `/v1/requirements/*`        | [`routes::requirements`]    |
//! | `/v1/impact/*`              | [`routes::impact`]          |
//! | `/v1/compliance/*`          | [`routes::compliance`]      |
//! | `/v1/history`               | [`routes::history`]         |
//!
//! ## OpenAPI
//!
//! Generated via utoipa derive macros, served at `/openapi.json`.

pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::regulations::router())
        .merge(routes::requirements::router())
        .merge(routes::impact::router())
        .merge(routes::compliance::router())
        .merge(routes::history::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once the store is built.
async fn readiness() -> &'static str {
    "ready"
}
