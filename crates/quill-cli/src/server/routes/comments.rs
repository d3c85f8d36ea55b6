use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::{rejection::FormRejection, Path, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    BoxError, Form, Router,
};
use axum_extra::extract::CookieJar;
use quill_core::{Error, Identity, COOKIE_NAME};
use serde::Deserialize;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tracing::{debug, error, warn};

use crate::server::error::Toast;
use crate::server::views;
use crate::server::AppState;

pub fn router(request_timeout: Duration) -> Router<AppState> {
    Router::new()
        .route("/articles/{id}/comments", get(list).post(create))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(timed_out))
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub content: String,
}

async fn list(State(state): State<AppState>, Path(article_id): Path<String>) -> Response {
    match state.comments().list_comments(&article_id).await {
        Ok(comments) => Html(views::comments(&comments).into_string()).into_response(),
        Err(err) => failure(&article_id, &err),
    }
}

async fn create(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(article_id): Path<String>,
    form: Result<Form<CommentForm>, FormRejection>,
) -> (CookieJar, Response) {
    let identity = Identity::resolve(
        jar.get(COOKIE_NAME).map(|cookie| cookie.value()),
        state.comments().ids(),
    );
    let jar = if identity.is_new {
        jar.add(state.identity_cookie(&identity.username))
    } else {
        jar
    };

    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            debug!(%article_id, error = %rejection, "rejected comment form");
            return (jar, empty_thread(Toast::bad_request("failed to decode a form")));
        }
    };

    let response = match state
        .comments()
        .create_comment(&article_id, &identity.username, &form.content)
        .await
    {
        Ok(comments) => Html(views::comments(&comments).into_string()).into_response(),
        Err(err) => failure(&article_id, &err),
    };

    (jar, response)
}

/// Log `err` and answer with the empty thread plus a toast
fn failure(article_id: &str, err: &Error) -> Response {
    match err {
        Error::DatabaseNotReady => warn!(%article_id, "database is not ready yet"),
        Error::BadRequest(_) => debug!(%article_id, error = %err, "bad comment request"),
        _ => error!(%article_id, code = err.code(), error = %err, "comment request failed"),
    }

    empty_thread(Toast::from(err))
}

async fn timed_out(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("comment request timed out");
        return empty_thread(Toast::internal("request timed out"));
    }
    error!(error = %err, "comment request failed");
    empty_thread(Toast::internal("internal server error"))
}

fn empty_thread(toast: Toast) -> Response {
    (toast, Html(views::no_comments().into_string())).into_response()
}
