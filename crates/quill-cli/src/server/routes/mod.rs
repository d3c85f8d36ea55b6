mod comments;
mod health;

use std::path::Path;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::server::{pages, AppState};

pub const API_PREFIX: &str = "/api/public/v0";

/// Assemble the application: comment API, health check and the static site
///
/// Requests running past `request_timeout` are dropped, which rolls back any
/// open transaction. Comment endpoints still answer with a renderable
/// fragment when that happens.
pub fn create_router(state: AppState, site_dir: &Path, request_timeout: Duration) -> Router {
    let site = pages::router(site_dir).layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        request_timeout,
    ));

    Router::new()
        .merge(health::router())
        .nest(API_PREFIX, comments::router(request_timeout))
        .with_state(state)
        .merge(site)
        .layer(TraceLayer::new_for_http())
}
