use serde::{Deserialize, Serialize};

/// A course the user is enrolled in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    /// The backend's opaque course id, used in every per-course route.
    pub id: String,
    /// Absolute URL of the course home page.
    pub url: String,
    /// Display name. The backend stores two name fields; whichever is
    /// present wins.
    pub name: String,
    /// Institutional course code (e.g. `CSC-32200-R01`).
    pub code: String,
    /// Course description, when the instructor wrote one.
    pub description: Option<String>,
    /// Academic term the course belongs to.
    pub term: Option<CourseTerm>,
    /// When the user enrolled, in epoch milliseconds.
    pub enrolled_at: Option<i64>,
    /// When the user last opened the course, in epoch milliseconds.
    pub last_accessed_at: Option<i64>,
    /// When the course itself last changed, in epoch milliseconds.
    pub last_modified_at: Option<i64>,
}

/// An academic term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseTerm {
    pub id: String,
    pub name: String,
}
