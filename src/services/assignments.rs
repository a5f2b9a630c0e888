use crate::error::{ApiError, Result};
use crate::models::assignment::{Assignment, AssignmentAttempt, AssignmentDetails};
use crate::models::session::Session;
use crate::services::request::{ApiVersion, RequestOptions, api_request, fetch_json};
use crate::state::AppState;
use crate::util::epoch_ms;
use base64::{Engine as _, engine::general_purpose};
use reqwest::StatusCode;
use sonic_rs::{JsonContainerTrait, JsonValueTrait};
use std::collections::HashMap;

/// Builds the opaque assignment id out of its two halves.
///
/// The detail route needs both the content item id and the gradebook
/// column id, but clients should not have to know that. The two are glued
/// with a separator neither side ever contains and base64-encoded.
pub fn construct_assignment_id(target_id: &str, column_id: &str) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(format!("{target_id}:{column_id}"))
}

/// Splits an opaque assignment id back into its two halves.
pub fn deconstruct_assignment_id(assignment_id: &str) -> Result<(String, String)> {
    let invalid = || ApiError::BadRequest("The assignment id is not valid.".to_string());

    let decoded = general_purpose::URL_SAFE_NO_PAD
        .decode(assignment_id)
        .map_err(|_| invalid())?;
    let decoded = String::from_utf8(decoded).map_err(|_| invalid())?;
    let (target_id, column_id) = decoded.split_once(':').ok_or_else(invalid)?;
    Ok((target_id.to_string(), column_id.to_string()))
}

/// The browser-facing submission page for a content-backed assignment.
fn submission_url(base_url: &str, course_id: &str, content_id: &str) -> String {
    format!(
        "{base_url}/webapps/assignment/uploadAssignment?content_id={content_id}&course_id={course_id}&mode=view"
    )
}

/// Fetches the gradable assignments of a course.
///
/// The backend keeps this picture in three places: the gradebook columns,
/// their categories, and the user's per-column grades. All three are
/// fetched concurrently and joined here. Columns that resolve no category
/// or are backed by neither a content item nor an external tool are
/// bookkeeping rows (weighted totals, hidden calculations) and are left
/// out.
///
/// # Arguments
///
/// * `state` - The application's state.
/// * `session` - The session to act as.
/// * `course_id` - The backend's opaque course id.
///
/// # Returns
///
/// A `Result` containing the course's `Assignment` list, in the backend's
/// column order.
pub async fn get_course_assignments(
    state: &AppState,
    session: &Session,
    course_id: &str,
) -> Result<Vec<Assignment>> {
    let categories_path = format!("/courses/{course_id}/gradebook/categories");
    let columns_path = format!("/courses/{course_id}/gradebook/columns");
    let grades_path = format!("/courses/{course_id}/gradebook/users/me");
    let (categories, columns, grades) = futures::try_join!(
        fetch_json(state, session, ApiVersion::V1Public, &categories_path),
        fetch_json(state, session, ApiVersion::V1Public, &columns_path),
        fetch_json(state, session, ApiVersion::V1Public, &grades_path),
    )?;

    let mut category_titles: HashMap<String, String> = HashMap::new();
    if let Some(results) = categories.get("results").and_then(|r| r.as_array()) {
        for category in results.iter() {
            if let (Some(id), Some(title)) = (
                category.get("id").and_then(|v| v.as_str()),
                category.get("title").and_then(|v| v.as_str()),
            ) {
                category_titles.insert(id.to_string(), title.to_string());
            }
        }
    }

    let mut grades_by_column: HashMap<String, &sonic_rs::Value> = HashMap::new();
    if let Some(results) = grades.get("results").and_then(|r| r.as_array()) {
        for grade in results.iter() {
            if let Some(column_id) = grade.get("columnId").and_then(|v| v.as_str()) {
                grades_by_column.insert(column_id.to_string(), grade);
            }
        }
    }

    let mut assignments = Vec::new();
    let Some(results) = columns.get("results").and_then(|r| r.as_array()) else {
        return Ok(assignments);
    };

    for column in results.iter() {
        let Some(column_id) = column.get("id").and_then(|v| v.as_str()) else {
            continue;
        };

        let content_id = column.get("contentId").and_then(|v| v.as_str());
        let external_tool_id = column.get("externalToolId").and_then(|v| v.as_str());
        let Some(target_id) = content_id.or(external_tool_id) else {
            continue;
        };

        let grading = column.get("grading");
        let Some(category) = grading
            .and_then(|g| g.get("gradebookCategoryId"))
            .and_then(|v| v.as_str())
            .and_then(|id| category_titles.get(id))
        else {
            continue;
        };

        let grade = grades_by_column.get(column_id);
        assignments.push(Assignment {
            id: construct_assignment_id(target_id, column_id),
            name: column
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            category: category.clone(),
            url: content_id.map(|id| submission_url(&state.config.base_url, course_id, id)),
            deadline: epoch_ms(grading.and_then(|g| g.get("due")).and_then(|v| v.as_str())),
            score: grade.and_then(|g| g.get("score")).and_then(|v| v.as_f64()),
            possible: grade
                .and_then(|g| g.get("possible"))
                .and_then(|v| v.as_f64())
                .or_else(|| {
                    column
                        .get("score")
                        .and_then(|s| s.get("possible"))
                        .and_then(|v| v.as_f64())
                }),
            status: grade
                .and_then(|g| g.get("status"))
                .and_then(|v| v.as_str())
                .map(str::to_string),
        });
    }

    Ok(assignments)
}

/// Fetches one assignment expanded with its submission history.
///
/// The content item is fetched first: instructors can create the gradebook
/// column ahead of releasing the assignment itself, and the backend
/// answers `403` for the unreleased item. That case comes back as `None`
/// so the handler can express it; there is no point asking for attempts on
/// something the user cannot see.
///
/// # Arguments
///
/// * `state` - The application's state.
/// * `session` - The session to act as.
/// * `course_id` - The backend's opaque course id.
/// * `assignment_id` - The opaque composite id from the assignment list.
///
/// # Returns
///
/// A `Result` containing the `AssignmentDetails`, or `None` when the
/// content item is not accessible yet.
pub async fn get_assignment_details(
    state: &AppState,
    session: &Session,
    course_id: &str,
    assignment_id: &str,
) -> Result<Option<AssignmentDetails>> {
    let (content_id, column_id) = deconstruct_assignment_id(assignment_id)?;

    let options = RequestOptions::authenticated(session)?;
    let content_response = api_request(
        state,
        ApiVersion::V1Public,
        &format!("/courses/{course_id}/contents/{content_id}"),
        options,
    )
    .await?;
    if content_response.status() == StatusCode::FORBIDDEN {
        return Ok(None);
    }
    let content_body = content_response.text().await?;
    let content: sonic_rs::Value = sonic_rs::from_str(&content_body).map_err(|e| {
        ApiError::ServerError(format!("backend sent an invalid content item: {e}"))
    })?;

    let attempts_raw = fetch_json(
        state,
        session,
        ApiVersion::V1Public,
        &format!("/courses/{course_id}/gradebook/columns/{column_id}/attempts"),
    )
    .await?;

    let mut attempts = Vec::new();
    if let Some(results) = attempts_raw.get("results").and_then(|r| r.as_array()) {
        for attempt in results.iter() {
            attempts.push(AssignmentAttempt {
                id: attempt
                    .get("id")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
                status: attempt
                    .get("status")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                score: attempt.get("score").and_then(|v| v.as_f64()),
                feedback: attempt
                    .get("feedback")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                submitted_at: epoch_ms(attempt.get("created").and_then(|v| v.as_str())),
            });
        }
    }

    Ok(Some(AssignmentDetails {
        id: assignment_id.to_string(),
        name: content
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        description: content
            .get("body")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        url: submission_url(&state.config.base_url, course_id, &content_id),
        created_at: epoch_ms(content.get("created").and_then(|v| v.as_str())),
        modified_at: epoch_ms(content.get("modified").and_then(|v| v.as_str())),
        attempts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_id_round_trips() {
        let id = construct_assignment_id("_12345_1", "_67890_1");
        let (target, column) = deconstruct_assignment_id(&id).unwrap();
        assert_eq!(target, "_12345_1");
        assert_eq!(column, "_67890_1");
    }

    #[test]
    fn composite_id_is_url_safe() {
        let id = construct_assignment_id("_12345_1", "_67890_1");
        assert!(
            id.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn deconstruct_rejects_garbage() {
        assert!(matches!(
            deconstruct_assignment_id("%%%not-base64%%%"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn deconstruct_rejects_ids_without_a_separator() {
        let id = general_purpose::URL_SAFE_NO_PAD.encode("no-separator-here");
        assert!(matches!(
            deconstruct_assignment_id(&id),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn submission_url_fills_the_template() {
        assert_eq!(
            submission_url("https://bb.example.edu", "_111_1", "_222_1"),
            "https://bb.example.edu/webapps/assignment/uploadAssignment?content_id=_222_1&course_id=_111_1&mode=view"
        );
    }
}
