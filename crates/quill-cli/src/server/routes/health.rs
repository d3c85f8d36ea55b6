use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/healthz", get(check))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// `ready` once the startup connection has been installed
    pub database: String,
}

async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = if state.comments().handle().is_ready() {
        "ready"
    } else {
        "not_ready"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}
