use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::Result,
    models::session::Session,
    services::{announcements as announcements_service, courses as courses_service},
    state::AppState,
};

/// Handles the course list for the signed-in user.
#[axum::debug_handler]
pub async fn courses(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let courses = courses_service::get_all_user_courses(&state, &session).await?;
    tracing::debug!("✅ Fetched {} courses", courses.len());

    Ok(Json(courses))
}

/// Handles the announcement list of a course.
#[axum::debug_handler]
pub async fn announcements(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse> {
    let announcements =
        announcements_service::get_course_announcements(&state, &session, &course_id).await?;
    tracing::debug!(
        "✅ Fetched {} announcements for course {}",
        announcements.len(),
        course_id
    );

    Ok(Json(announcements))
}
