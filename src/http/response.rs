//! Locally synthesized responses.
//!
//! # Responsibilities
//! - JSON error bodies (`{"error": ..., "message": ...}`)
//! - The CORS preflight answer
//! - Mapping resolver failures and panics to 500 at the hosting boundary
//!
//! Proxied responses never pass through here; they are returned verbatim.

use std::any::Any;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use crate::resolver::ResolveError;

pub const METHOD_NOT_ALLOWED: &str = "Method Not Allowed";
pub const BAD_REQUEST: &str = "Bad Request";
pub const RESOURCE_NOT_FOUND: &str = "Resource Not Found";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Body of every synthesized error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Build a JSON error response.
pub fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: error.to_string(),
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

pub fn method_not_allowed(message: impl Into<String>) -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED, message)
}

pub fn bad_request(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, BAD_REQUEST, message)
}

pub fn not_found(message: impl Into<String>) -> Response {
    error_response(StatusCode::NOT_FOUND, RESOURCE_NOT_FOUND, message)
}

/// 204 answer to a CORS preflight. No body.
pub fn preflight_response() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "*"),
            (header::ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
    )
        .into_response()
}

/// 500 for a request whose handling panicked.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Request handling panicked");

    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_SERVER_ERROR,
        format!("Request handling panicked: {}", detail),
    )
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_SERVER_ERROR,
            self.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let response = not_found("There is no hApp registered for host 'a.example.com'");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = body_of(response).await;
        assert_eq!(body.error, "Resource Not Found");
        assert!(body.message.contains("a.example.com"));
    }

    #[tokio::test]
    async fn test_preflight_has_no_body() {
        let response = preflight_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers().get(header::ACCESS_CONTROL_MAX_AGE).unwrap(), "86400");
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_panic_payload_becomes_message() {
        let response = panic_response(Box::new(String::from("store exploded")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body.error, "Internal Server Error");
        assert_eq!(body.message, "Request handling panicked: store exploded");
    }

    #[tokio::test]
    async fn test_resolve_error_is_500() {
        let err = ResolveError::NoNode("happ".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await.error, "Internal Server Error");
    }
}
