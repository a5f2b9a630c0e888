use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::session::Session,
    services::{auth as auth_service, profile as profile_service, token},
    state::AppState,
    validation::auth::*,
};

/// The request payload for logging in.
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// The response payload for a successful login.
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// The response payload for a successful refresh.
#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
    /// Inactivity window of the refreshed session, in milliseconds.
    pub age: i64,
    /// Absolute expiry of the refreshed session, in epoch milliseconds.
    pub expires_at: i64,
}

/// The response payload for the cookie export.
#[derive(Serialize)]
pub struct CookiesResponse {
    /// The session rendered as a `Cookie` header value, ready to paste
    /// into a browser or another HTTP client.
    pub cookies: String,
}

/// An error payload for rejections this handler expresses itself.
#[derive(Serialize)]
struct RejectionResponse {
    code: &'static str,
    message: &'static str,
}

/// Handles a login attempt.
///
/// Wrong credentials are a regular outcome here, not a fault: they come
/// back as `401` with a stable code, while upstream trouble stays `500`.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt for: {}", payload.username);
    validate_username(&payload.username)?;
    validate_password(&payload.password)?;

    let Some(session) = auth_service::authenticate(&state, &payload.username, payload.password).await?
    else {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(RejectionResponse {
                code: "INVALID_CREDENTIALS",
                message: "Invalid username / email or password",
            }),
        )
            .into_response());
    };

    let token = token::encode(&session)?;
    tracing::info!("✅ Login succeeded for: {}", payload.username);

    Ok((StatusCode::OK, Json(LoginResponse { token })).into_response())
}

/// Handles a session refresh.
///
/// On success the old token keeps working until the backend expires its
/// cookies; the new token simply lasts longer.
#[axum::debug_handler]
pub async fn refresh(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response> {
    tracing::debug!("🔑 Refreshing session...");

    let Some((refreshed, lifetime)) = auth_service::refresh(&state, &session).await? else {
        // The probe answered but rotated us into something unusable.
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(RejectionResponse {
                code: "REFRESH_FAILED",
                message: "Failed to refresh session cookies. Please try again later or log in again.",
            }),
        )
            .into_response());
    };

    let token = token::encode(&refreshed)?;
    tracing::info!("✅ Session refreshed (expires_at: {})", lifetime.expires_at);

    Ok((
        StatusCode::OK,
        Json(RefreshResponse {
            token,
            age: lifetime.age,
            expires_at: lifetime.expires_at,
        }),
    )
        .into_response())
}

/// Handles the cookie export.
///
/// Touches the profile endpoint first so dead sessions come back as the
/// usual `401` instead of exporting cookies that no longer work.
#[axum::debug_handler]
pub async fn cookies(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    profile_service::get_user_profile(&state, &session).await?;

    Ok(Json(CookiesResponse {
        cookies: session.cookie_header(),
    }))
}
