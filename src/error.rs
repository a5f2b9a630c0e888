use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A transport-level failure while talking to the Blackboard backend.
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The backend rejected the session cookies.
    #[error("The session is invalid or has expired")]
    Unauthorized,

    /// The backend does not know the requested resource.
    #[error("Resource not found")]
    NotFound,

    /// The resource exists but is not accessible to this user yet.
    #[error("Resource not accessible")]
    NotAllowed,

    /// The caller supplied input we refuse to forward.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A session token that could not be decoded back into cookies.
    #[error("The provided token is malformed")]
    MalformedToken,

    /// The backend answered with something we could not interpret.
    #[error("Unexpected backend response: {0}")]
    ServerError(String),
}

/// A `Result` type that uses `ApiError` as the error type.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Whether a request that failed with this error may be retried.
    ///
    /// Only transport failures are transient. Anything the backend actually
    /// answered, a rejection or an uninterpretable body alike, is final;
    /// repeating the request would only produce the same answer.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Upstream(_))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Upstream(ref e) => {
                tracing::error!("Upstream request failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SERVER_ERROR",
                    "An unexpected error occurred on the server.".to_string(),
                )
            }

            ApiError::Unauthorized => {
                tracing::warn!("Session rejected by the backend");
                (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_TOKEN",
                    "The provided token is invalid or has expired.".to_string(),
                )
            }

            ApiError::NotFound => {
                tracing::debug!("Resource not found");
                (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "The requested resource was not found on this server.".to_string(),
                )
            }

            ApiError::NotAllowed => {
                tracing::warn!("Resource not accessible");
                (
                    StatusCode::FORBIDDEN,
                    "NOT_ALLOWED",
                    "You do not have access to this resource.".to_string(),
                )
            }

            ApiError::BadRequest(ref msg) => {
                tracing::debug!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }

            ApiError::MalformedToken => {
                tracing::warn!("Malformed session token");
                (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_TOKEN",
                    "The provided token is invalid or has expired.".to_string(),
                )
            }

            ApiError::ServerError(ref msg) => {
                tracing::error!("Unexpected backend response: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SERVER_ERROR",
                    "An unexpected error occurred on the server.".to_string(),
                )
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "code": code,
            "message": message
        }))
        .unwrap_or_else(|_| {
            r#"{"code":"SERVER_ERROR","message":"An unexpected error occurred on the server."}"#
                .to_string()
        });

        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_answers_are_final() {
        assert!(!ApiError::Unauthorized.is_retryable());
        assert!(!ApiError::NotFound.is_retryable());
        assert!(!ApiError::NotAllowed.is_retryable());
        assert!(!ApiError::BadRequest("nope".to_string()).is_retryable());
        assert!(!ApiError::MalformedToken.is_retryable());
        assert!(!ApiError::ServerError("weird body".to_string()).is_retryable());
    }

    #[tokio::test]
    async fn transport_failures_may_be_retried() {
        // A port past 65535 never parses, so the builder hands back an
        // error without touching the network.
        let error = reqwest::Client::new()
            .get("http://bbhosted.cuny.edu:99999")
            .build()
            .unwrap_err();
        assert!(ApiError::Upstream(error).is_retryable());
    }

    #[test]
    fn token_errors_map_to_unauthorized() {
        let response = ApiError::MalformedToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn not_allowed_maps_to_forbidden() {
        let response = ApiError::NotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
