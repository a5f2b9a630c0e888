use serde::{Deserialize, Serialize};

/// The signed-in user, trimmed down to the fields clients actually render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// The backend's opaque user id.
    pub id: String,
    /// The institutional e-mail address.
    pub email: String,
    /// Given and family name joined for display.
    pub full_name: String,
    /// The login username.
    pub username: String,
}
