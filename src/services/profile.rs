use crate::error::Result;
use crate::models::profile::Profile;
use crate::models::session::Session;
use crate::services::request::{ApiVersion, fetch_json};
use crate::state::AppState;
use sonic_rs::JsonValueTrait;

/// Fetches the signed-in user's profile.
///
/// # Arguments
///
/// * `state` - The application's state.
/// * `session` - The session to act as.
///
/// # Returns
///
/// A `Result` containing the `Profile`.
pub async fn get_user_profile(state: &AppState, session: &Session) -> Result<Profile> {
    let raw = fetch_json(state, session, ApiVersion::V1Private, "/users/me").await?;

    let given = raw.get("givenName").and_then(|v| v.as_str()).unwrap_or("");
    let family = raw.get("familyName").and_then(|v| v.as_str()).unwrap_or("");

    Ok(Profile {
        id: raw
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        email: raw
            .get("emailAddress")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        full_name: format!("{given} {family}").trim().to_string(),
        username: raw
            .get("userName")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
    })
}
