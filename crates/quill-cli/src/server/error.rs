//! Out-of-band status toasts
//!
//! Comment endpoints always answer with a renderable fragment. When something
//! goes wrong the fragment is the empty thread and the failure travels in an
//! `HX-Trigger` header that the page turns into a toast.

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponseParts, ResponseParts},
};
use quill_core::Error as CoreError;
use serde_json::json;
use std::convert::Infallible;
use tracing::warn;

pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub status: StatusCode,
    pub message: String,
}

impl Toast {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Create a bad request toast
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create an internal error toast
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// JSON event payload for the `HX-Trigger` header
    pub fn trigger(&self) -> String {
        json!({
            "showToast": {
                "message": self.message,
                "statusCode": self.status.as_u16(),
            }
        })
        .to_string()
    }
}

impl From<&CoreError> for Toast {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::BadRequest(message) => Self::bad_request(message.clone()),
            // For internal errors, don't expose details
            CoreError::DatabaseNotReady | CoreError::Database(_) => {
                Self::internal("unexpected database error")
            }
            _ => Self::internal("internal server error"),
        }
    }
}

impl IntoResponseParts for Toast {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        match HeaderValue::from_str(&self.trigger()) {
            Ok(value) => {
                res.headers_mut().insert(HX_TRIGGER, value);
            }
            Err(err) => warn!(error = %err, "toast message is not a valid header value"),
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_keeps_message() {
        let toast = Toast::from(&CoreError::bad_request("id should be a number"));

        assert_eq!(toast.status, StatusCode::BAD_REQUEST);
        assert_eq!(toast.message, "id should be a number");
    }

    #[test]
    fn test_database_errors_are_hidden() {
        let toast = Toast::from(&CoreError::Database(sqlx::Error::PoolTimedOut));

        assert_eq!(toast.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(toast.message, "unexpected database error");

        let toast = Toast::from(&CoreError::DatabaseNotReady);
        assert_eq!(toast.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_trigger_payload() {
        let toast = Toast::bad_request("id should be a number");

        let value: serde_json::Value = serde_json::from_str(&toast.trigger()).unwrap();
        assert_eq!(value["showToast"]["message"], "id should be a number");
        assert_eq!(value["showToast"]["statusCode"], 400);
    }
}
