use serde::{Deserialize, Serialize};

/// A gradable assignment, as assembled from the gradebook JSON endpoints.
///
/// The backend has no single "assignment" resource; this is the join of a
/// gradebook column, its category and the user's grade for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    /// Composite id encoding both halves the detail route needs. Opaque to
    /// clients.
    pub id: String,
    pub name: String,
    /// Category title (e.g. `Homework`, `Exams`).
    pub category: String,
    /// Absolute URL of the submission page. Absent for columns that are not
    /// backed by a content item (external tools).
    pub url: Option<String>,
    /// Due date, in epoch milliseconds.
    pub deadline: Option<i64>,
    /// Points awarded, when graded.
    pub score: Option<f64>,
    /// Points possible.
    pub possible: Option<f64>,
    /// Grading status reported by the backend (e.g. `Graded`).
    pub status: Option<String>,
}

/// A single assignment expanded with its submission history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignmentDetails {
    /// The composite id the caller used to reach this assignment.
    pub id: String,
    pub name: String,
    /// Instructions markup from the content item.
    pub description: Option<String>,
    /// Absolute URL of the submission page.
    pub url: String,
    /// When the content item was created, in epoch milliseconds.
    pub created_at: Option<i64>,
    /// When the content item last changed, in epoch milliseconds.
    pub modified_at: Option<i64>,
    /// The user's submission attempts, oldest first.
    pub attempts: Vec<AssignmentAttempt>,
}

/// One submission attempt against an assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignmentAttempt {
    pub id: String,
    /// Attempt status reported by the backend (e.g. `NeedsGrading`).
    pub status: Option<String>,
    /// Points awarded to this attempt, when graded.
    pub score: Option<f64>,
    /// Instructor feedback on this attempt.
    pub feedback: Option<String>,
    /// When the attempt was submitted, in epoch milliseconds.
    pub submitted_at: Option<i64>,
}

/// A row of the legacy grade center page.
///
/// This view exists because the gradebook JSON endpoints omit manually
/// created columns; the HTML page is the only place the full picture lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradedAssignment {
    pub name: String,
    /// Row kind as printed on the page (e.g. `Assignment`, `Test`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Absolute URL for opening the row in a browser.
    pub url: String,
    /// Status as printed on the page, `UPCOMING` when the cell is blank.
    pub status: String,
    /// Due date in epoch milliseconds, when the page carries a real one.
    pub deadline: Option<i64>,
    /// The human-readable due date as printed on the page.
    pub deadline_text: Option<String>,
    /// Last activity on the row, in epoch milliseconds.
    pub last_activity_at: Option<i64>,
    /// The page's own ordering key. Rows are returned sorted by it.
    pub position: i64,
    /// Points awarded, when the score cell holds a number.
    pub score: Option<f64>,
    /// Points possible, when the score cell carries a denominator.
    pub possible: Option<f64>,
    /// Instructor feedback, only present on graded rows.
    pub feedback: Option<String>,
}
