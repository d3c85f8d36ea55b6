//! Pre-rendered pages and static assets
//!
//! Pages are plain files on disk laid out like the URL space; the server only
//! maps URLs onto them and sends everything else to the landing page.

use std::path::Path;

use axum::{
    handler::HandlerWithoutStateExt,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

pub const LANDING_PAGE: &str = "/p/public/landing-page";

pub fn router(site_dir: &Path) -> Router {
    let site = ServeDir::new(site_dir)
        .append_index_html_on_directories(true)
        .fallback(missing_page.into_service());

    Router::new()
        .route("/", get(landing_redirect))
        .fallback_service(site)
}

/// 302 to the landing page
pub async fn landing_redirect() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, LANDING_PAGE)])
}

async fn missing_page(uri: Uri) -> Response {
    // a missing landing page must not redirect to itself
    if uri.path().trim_end_matches('/') == LANDING_PAGE {
        return StatusCode::NOT_FOUND.into_response();
    }
    landing_redirect().await.into_response()
}
