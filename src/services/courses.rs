use crate::error::Result;
use crate::models::course::{Course, CourseTerm};
use crate::models::session::Session;
use crate::services::request::{ApiVersion, fetch_json};
use crate::state::AppState;
use crate::util::epoch_ms;
use sonic_rs::{JsonContainerTrait, JsonValueTrait};

/// Fetches every course the user is enrolled in.
///
/// Enrollment rows arrive with their course record expanded inline; rows
/// whose expansion is missing are skipped rather than faulted on. A
/// `results` field that is absent or not an array yields an empty list,
/// since the backend serves degenerate shapes for brand-new accounts.
///
/// # Arguments
///
/// * `state` - The application's state.
/// * `session` - The session to act as.
///
/// # Returns
///
/// A `Result` containing the user's `Course` list.
pub async fn get_all_user_courses(state: &AppState, session: &Session) -> Result<Vec<Course>> {
    let raw = fetch_json(
        state,
        session,
        ApiVersion::V1Private,
        "/users/me/memberships?expand=course",
    )
    .await?;

    let mut courses = Vec::new();
    let Some(results) = raw.get("results").and_then(|r| r.as_array()) else {
        return Ok(courses);
    };

    for membership in results.iter() {
        let Some(course) = membership.get("course") else {
            continue;
        };

        let name = course
            .get("name")
            .and_then(|v| v.as_str())
            .or_else(|| course.get("displayName").and_then(|v| v.as_str()))
            .unwrap_or("")
            .to_string();

        let term = course.get("term").and_then(|term| {
            Some(CourseTerm {
                id: term.get("id").and_then(|v| v.as_str())?.to_string(),
                name: term
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
            })
        });

        courses.push(Course {
            id: course
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            url: format!(
                "{}{}",
                state.config.base_url,
                course.get("homePageUrl").and_then(|v| v.as_str()).unwrap_or("")
            ),
            name,
            code: course
                .get("courseId")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            description: course
                .get("description")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            term,
            enrolled_at: epoch_ms(membership.get("enrollmentDate").and_then(|v| v.as_str())),
            last_accessed_at: epoch_ms(membership.get("lastAccessDate").and_then(|v| v.as_str())),
            last_modified_at: epoch_ms(course.get("modifiedDate").and_then(|v| v.as_str())),
        });
    }

    Ok(courses)
}
