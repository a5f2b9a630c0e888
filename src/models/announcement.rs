use serde::{Deserialize, Serialize};

/// A course announcement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub body: AnnouncementBody,
    /// When the announcement was created, in epoch milliseconds.
    pub created_at: Option<i64>,
    /// When the announcement was last edited, in epoch milliseconds.
    pub modified_at: Option<i64>,
    /// When the announcement becomes visible, in epoch milliseconds.
    pub start_at: Option<i64>,
    /// When the announcement is withdrawn, in epoch milliseconds.
    pub end_at: Option<i64>,
}

/// The announcement text in the renditions the backend keeps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnnouncementBody {
    /// The instructor's original markup.
    pub raw_text: String,
    /// Markup normalized by the backend for display.
    pub display_text: String,
    /// Path of the announcement's web page, when it has one.
    pub web_location: Option<String>,
    /// Path of an attached file, when there is one.
    pub file_location: Option<String>,
}
