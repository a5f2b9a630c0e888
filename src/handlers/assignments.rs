use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::{ApiError, Result},
    models::session::Session,
    services::{assignments as assignments_service, grades as grades_service},
    state::AppState,
};

/// Handles the assignment list of a course.
#[axum::debug_handler]
pub async fn assignments(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse> {
    let assignments =
        assignments_service::get_course_assignments(&state, &session, &course_id).await?;
    tracing::debug!(
        "✅ Fetched {} assignments for course {}",
        assignments.len(),
        course_id
    );

    Ok(Json(assignments))
}

/// Handles a single assignment with its submission history.
#[axum::debug_handler]
pub async fn assignment_details(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((course_id, assignment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let details =
        assignments_service::get_assignment_details(&state, &session, &course_id, &assignment_id)
            .await?
            // The column exists but the assignment itself is unreleased.
            .ok_or(ApiError::NotAllowed)?;

    Ok(Json(details))
}

/// Handles the grade center rows of a course.
#[axum::debug_handler]
pub async fn grades(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse> {
    let grades = grades_service::get_course_grades(&state, &session, &course_id).await?;
    tracing::debug!("✅ Parsed {} grade rows for course {}", grades.len(), course_id);

    Ok(Json(grades))
}
