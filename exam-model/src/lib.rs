//! HellApp Exam Data Model
//!
//! Wire-shaped types shared by the session services. Field names follow the
//! backend's JSON (camelCase); timestamps are RFC 3339 UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The exam definition, as created by an instructor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExamInstance {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "startDate")]
    pub start_date: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end_date: DateTime<Utc>,
    /// Passing score as a percentage, 0.0..=100.0
    #[serde(rename = "passingScore")]
    pub passing_score: f64,
    #[serde(rename = "maxAttempts")]
    pub max_attempts: u32,
    #[serde(rename = "securitySettings")]
    pub security_settings: SecuritySettings,
    #[serde(rename = "createdBy")]
    pub created_by: String,
    #[serde(rename = "questionCount")]
    pub question_count: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SecuritySettings {
    #[serde(rename = "shuffleQuestions")]
    pub shuffle_questions: bool,
    #[serde(rename = "preventTabSwitching")]
    pub prevent_tab_switching: bool,
    #[serde(rename = "tabSwitchLimit")]
    pub tab_switch_limit: Option<u32>,
    #[serde(rename = "allowReview")]
    pub allow_review: bool,
    #[serde(rename = "gazeTracking")]
    pub gaze_tracking: bool,
}

/// A student's relationship to one exam instance.
///
/// Created server-side when an exam is assigned. Mutated by attempt
/// creation/submission; never deleted client-side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExamAssignment {
    pub id: Uuid,
    pub exam: ExamInstance,
    #[serde(rename = "attemptsCount")]
    pub attempts_count: u32,
    #[serde(rename = "currentStatus")]
    pub current_status: ServerStatus,
    #[serde(rename = "latestAttemptId")]
    pub latest_attempt_id: Option<Uuid>,
}

/// Server-reported assignment status. Unrecognized values deserialize to
/// `Unknown` rather than failing the whole record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerStatus {
    NotStarted,
    InProgress,
    Submitted,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    Submitted,
}

/// One take of the exam.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attempt {
    pub id: Uuid,
    #[serde(rename = "assignmentId")]
    pub assignment_id: Uuid,
    #[serde(rename = "startedAt")]
    pub started_at: DateTime<Utc>,
    #[serde(rename = "submittedAt")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub status: AttemptStatus,
    /// Percentage, set once grading has run.
    pub grade: Option<f64>,
    #[serde(rename = "passFail")]
    pub pass_fail: Option<bool>,
    pub responses: Vec<Response>,
    /// Copied from the instance's security settings at submission time.
    #[serde(rename = "allowReview")]
    pub allow_review: bool,
    /// Question ids in presentation order (shuffled if the instance says so).
    #[serde(rename = "questionOrder")]
    pub question_order: Vec<Uuid>,
}

/// One answered (or answerable) question within an attempt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Response {
    pub question: Question,
    /// Selected option ids, for choice types.
    #[serde(rename = "selectedOptionIds")]
    pub selected_option_ids: Vec<Uuid>,
    /// Free text, for short answer.
    #[serde(rename = "textResponse")]
    pub text_response: Option<String>,
    /// 0, or the question weight when correct.
    pub score: f64,
    #[serde(rename = "isFlagged")]
    pub is_flagged: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    #[serde(rename = "questionText")]
    pub question_text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<QuestionOption>,
    /// Expected text for short answer questions.
    #[serde(rename = "correctAnswer")]
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub weight: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: Uuid,
    pub text: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    ShortAnswer,
}

/// The student's working answer for one question.
///
/// Choice answers hold a selected-option id set (length <= 1 for single
/// select); short answers hold free text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Choice(Vec<Uuid>),
    Text(String),
}

impl AnswerValue {
    /// An empty selection or blank text counts as unanswered.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Choice(ids) => ids.is_empty(),
            AnswerValue::Text(text) => text.trim().is_empty(),
        }
    }
}

/// Response body of a final attempt submission. Grade and pass/fail are
/// absent when grading runs asynchronously server-side.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub grade: Option<f64>,
    #[serde(rename = "passFail")]
    pub pass_fail: Option<bool>,
}
