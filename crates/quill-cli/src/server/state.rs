//! Server application state

use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, SameSite};
use quill_core::{CommentService, Username, COOKIE_NAME};
use quill_db::Database;

/// Identity cookies are kept for a little over a year
const COOKIE_MAX_AGE_DAYS: i64 = 400;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    comments: Arc<CommentService<Database>>,
    secure_cookie: bool,
}

impl AppState {
    pub fn new(comments: CommentService<Database>, secure_cookie: bool) -> Self {
        Self {
            comments: Arc::new(comments),
            secure_cookie,
        }
    }

    /// Get a reference to the comment service
    pub fn comments(&self) -> &CommentService<Database> {
        &self.comments
    }

    /// Cookie handing a freshly generated username to the browser
    pub fn identity_cookie(&self, username: &Username) -> Cookie<'static> {
        Cookie::build((COOKIE_NAME, username.as_str().to_string()))
            .path("/")
            .http_only(true)
            .secure(self.secure_cookie)
            .same_site(SameSite::Strict)
            .max_age(time::Duration::days(COOKIE_MAX_AGE_DAYS))
            .build()
    }
}
