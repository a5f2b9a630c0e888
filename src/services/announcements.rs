use crate::error::Result;
use crate::models::announcement::{Announcement, AnnouncementBody};
use crate::models::session::Session;
use crate::services::request::{ApiVersion, fetch_json};
use crate::state::AppState;
use crate::util::epoch_ms;
use sonic_rs::{JsonContainerTrait, JsonValueTrait};

/// Fetches the announcements of a course, newest first as the backend
/// returns them. A missing or non-array `results` field yields an empty
/// list.
///
/// # Arguments
///
/// * `state` - The application's state.
/// * `session` - The session to act as.
/// * `course_id` - The backend's opaque course id.
///
/// # Returns
///
/// A `Result` containing the course's `Announcement` list.
pub async fn get_course_announcements(
    state: &AppState,
    session: &Session,
    course_id: &str,
) -> Result<Vec<Announcement>> {
    let raw = fetch_json(
        state,
        session,
        ApiVersion::V1Private,
        &format!("/courses/{course_id}/announcements"),
    )
    .await?;

    let mut announcements = Vec::new();
    let Some(results) = raw.get("results").and_then(|r| r.as_array()) else {
        return Ok(announcements);
    };

    for result in results.iter() {
        let body = result
            .get("body")
            .map(|body| AnnouncementBody {
                raw_text: body
                    .get("rawText")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
                display_text: body
                    .get("displayText")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
                web_location: body
                    .get("webLocation")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                file_location: body
                    .get("fileLocation")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
            })
            .unwrap_or_default();

        announcements.push(Announcement {
            id: result
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            title: result
                .get("title")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            body,
            created_at: epoch_ms(result.get("created").and_then(|v| v.as_str())),
            modified_at: epoch_ms(result.get("modified").and_then(|v| v.as_str())),
            start_at: epoch_ms(result.get("startDate").and_then(|v| v.as_str())),
            end_at: epoch_ms(result.get("endDate").and_then(|v| v.as_str())),
        });
    }

    Ok(announcements)
}
