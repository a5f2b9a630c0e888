use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::ApiError, services::token, state::AppState};

/// Extracts the session token from the configured request header.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The incoming request.
///
/// # Returns
///
/// An `Option` containing the token string if found.
fn extract_session_token(state: &AppState, request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get(state.config.token_header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// A middleware that requires a decodable session token to be present.
///
/// The token is only decoded here, never verified against the backend;
/// whether the cookies inside are still alive is the backend's call to
/// make on the request that follows. Handlers behind this layer receive
/// the decoded `Session` as an extension.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// The inner handler's `Response`, or the token rejection.
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    tracing::debug!("🔐 Checking session token...");

    let Some(token) = extract_session_token(&state, &request) else {
        tracing::warn!("❌ No {} header found", state.config.token_header);
        return ApiError::MalformedToken.into_response();
    };

    match token::decode(&token) {
        Ok(session) => {
            tracing::debug!("✅ Session token decoded ({} cookies)", session.len());
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(error) => {
            tracing::warn!("❌ Session token rejected: {}", error);
            error.into_response()
        }
    }
}
