use crate::error::{ApiError, Result};
use crate::models::assignment::GradedAssignment;
use crate::models::session::Session;
use crate::services::request::{ApiVersion, RequestOptions, api_request};
use crate::state::AppState;
use scraper::{ElementRef, Html, Selector};

/// Rows with no real due date carry a sentinel timestamp far beyond any
/// plausible epoch value; anything longer than this many digits is one.
const DUE_DATE_DIGIT_LIMIT: usize = 15;

/// Fetches the legacy grade center page of a course and parses it.
///
/// The gradebook JSON endpoints omit manually created columns, so this is
/// the only complete listing the backend offers. The page is served
/// straight HTML; a redirect in its place means the session is gone, since
/// the login screen is the only thing the backend redirects to here.
///
/// # Arguments
///
/// * `state` - The application's state.
/// * `session` - The session to act as.
/// * `course_id` - The backend's opaque course id.
///
/// # Returns
///
/// A `Result` containing the course's `GradedAssignment` rows, ordered as
/// the page orders them.
pub async fn get_course_grades(
    state: &AppState,
    session: &Session,
    course_id: &str,
) -> Result<Vec<GradedAssignment>> {
    let options = RequestOptions::authenticated(session)?;
    let path = format!(
        "/webapps/bb-mygrades-BBLEARN/myGrades?course_id={course_id}&stream_name=mygrades"
    );
    let response = api_request(state, ApiVersion::Raw, &path, options).await?;
    if response.status().is_redirection() {
        return Err(ApiError::Unauthorized);
    }

    let html = response.text().await?;
    parse_grade_center(&html, &state.config.base_url, course_id)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ApiError::ServerError(format!("bad selector {css}: {e}")))
}

fn shape_error(detail: &str) -> ApiError {
    ApiError::ServerError(format!("the grade center page did not parse: {detail}"))
}

/// Every text fragment of an element, split on embedded newlines, trimmed,
/// empties dropped. The page interleaves markup and whitespace freely;
/// this is the "lines as a human sees them" view.
fn text_lines(element: &ElementRef) -> Vec<String> {
    element
        .text()
        .flat_map(|piece| piece.split('\n'))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

fn joined_text(element: &ElementRef) -> String {
    text_lines(element).join(" ")
}

/// The first single-quoted argument of an inline click handler, which is
/// where the page hides each row's real URL.
fn quoted_fragment(handler: &str) -> Option<String> {
    let start = handler.find('\'')? + 1;
    let end = handler[start..].find('\'')? + start;
    let fragment = &handler[start..end];
    if fragment.is_empty() {
        None
    } else {
        Some(fragment.to_string())
    }
}

/// Instructor feedback embedded in a click handler as an escaped HTML
/// fragment: the text between the first `>` and the last closing tag, with
/// escaped newlines removed.
fn feedback_fragment(handler: &str) -> Option<String> {
    let start = handler.find('>')? + 1;
    let end = handler.rfind("</")?;
    if end <= start {
        return None;
    }
    let text = handler[start..end].replace("\\n", "");
    let text = text.trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

/// `score / possible` as printed in the grade cell. Either side may be a
/// placeholder (`-`), and ungraded rows have no slash at all.
fn parse_score(raw: &str) -> (Option<f64>, Option<f64>) {
    match raw.split_once('/') {
        Some((score, possible)) => (score.trim().parse().ok(), possible.trim().parse().ok()),
        None => (raw.trim().parse().ok(), None),
    }
}

fn parse_grade_center(
    html: &str,
    base_url: &str,
    course_id: &str,
) -> Result<Vec<GradedAssignment>> {
    let row_selector = selector("[duedate]")?;
    let cell_selector = selector(".cell")?;
    let click_selector = selector("[onclick]")?;

    let document = Html::parse_document(html);
    let mut rows: Vec<GradedAssignment> = Vec::new();

    for row in document.select(&row_selector) {
        let due_attr = row.value().attr("duedate").unwrap_or("");
        if due_attr.len() > DUE_DATE_DIGIT_LIMIT {
            continue;
        }
        let deadline = due_attr.parse::<i64>().ok();

        let position = row
            .value()
            .attr("position")
            .and_then(|p| p.parse::<i64>().ok())
            .unwrap_or(0);
        let last_activity_at = row
            .value()
            .attr("lastactivity")
            .and_then(|p| p.parse::<i64>().ok());

        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        let first = cells
            .first()
            .ok_or_else(|| shape_error("a grade row has no cells"))?;

        let lines = text_lines(first);
        let name = lines
            .first()
            .cloned()
            .ok_or_else(|| shape_error("a grade row has no title"))?;
        let kind = lines.get(1).cloned().unwrap_or_default();
        let deadline_text = lines.get(2).cloned();

        let handlers: Vec<&str> = row
            .select(&click_selector)
            .filter_map(|el| el.value().attr("onclick"))
            .collect();

        let url = handlers
            .first()
            .and_then(|handler| quoted_fragment(handler))
            .map(|fragment| format!("{base_url}{fragment}"))
            .unwrap_or_else(|| {
                format!(
                    "{base_url}/webapps/bb-mygrades-BBLEARN/myGrades?course_id={course_id}&stream_name=mygrades"
                )
            });

        let status = cells
            .get(1)
            .map(joined_text)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| "UPCOMING".to_string());

        let (score, possible) = cells
            .get(2)
            .map(|cell| parse_score(&joined_text(cell)))
            .unwrap_or((None, None));

        // Feedback handlers only exist once something was graded; on
        // ungraded rows the second handler is an unrelated control.
        let feedback = if score.is_some() {
            handlers.get(1).and_then(|handler| feedback_fragment(handler))
        } else {
            None
        };

        rows.push(GradedAssignment {
            name,
            kind,
            url,
            status,
            deadline,
            deadline_text,
            last_activity_at,
            position,
            score,
            possible,
            feedback,
        });
    }

    // Document order is not the page's real ordering.
    rows.sort_by_key(|row| row.position);
    Ok(rows)
}
