use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    error::Result, models::session::Session, services::profile as profile_service, state::AppState,
};

/// Handles the profile lookup for the signed-in user.
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let profile = profile_service::get_user_profile(&state, &session).await?;
    tracing::debug!("✅ Profile fetched for: {}", profile.username);

    Ok(Json(profile))
}
