use async_trait::async_trait;
use exam_model::{AnswerValue, Attempt, ExamAssignment, SubmissionOutcome};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::config::EnvVars;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Backend(String),
}

/// The backend REST collaborator, seen from the session.
///
/// Request/response shapes are owned by the backend; the session only relies
/// on `save_answer` being an idempotent per-question upsert, so overlapping
/// manual and scheduled saves are safe-but-redundant.
#[async_trait]
pub trait ExamApi: Send + Sync {
    async fn fetch_assignment(&self, assignment_id: Uuid) -> Result<ExamAssignment, ApiError>;

    /// Creates an attempt, or returns the existing in-progress one. The
    /// server enforces a single in-progress attempt per assignment.
    async fn start_attempt(&self, assignment_id: Uuid) -> Result<Attempt, ApiError>;

    async fn save_answer(
        &self,
        attempt_id: Uuid,
        question_id: Uuid,
        value: &AnswerValue,
    ) -> Result<(), ApiError>;

    async fn submit_attempt(
        &self,
        attempt_id: Uuid,
        auto_submit: bool,
    ) -> Result<SubmissionOutcome, ApiError>;
}

/// `ExamApi` over HTTPS with credentials included (cookie store).
pub struct HttpExamApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExamApi {
    pub fn new(env_vars: &EnvVars) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = env_vars.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: env_vars.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ExamApi for HttpExamApi {
    #[instrument(skip_all, fields(%assignment_id), err(Debug))]
    async fn fetch_assignment(&self, assignment_id: Uuid) -> Result<ExamAssignment, ApiError> {
        let url = format!("{}/api/assignments/{assignment_id}", self.base_url);
        let assignment = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(assignment)
    }

    #[instrument(skip_all, fields(%assignment_id), err(Debug))]
    async fn start_attempt(&self, assignment_id: Uuid) -> Result<Attempt, ApiError> {
        let url = format!("{}/api/assignments/{assignment_id}/attempts", self.base_url);
        let attempt = self
            .client
            .post(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(attempt)
    }

    #[instrument(skip_all, fields(%attempt_id, %question_id), err(Debug))]
    async fn save_answer(
        &self,
        attempt_id: Uuid,
        question_id: Uuid,
        value: &AnswerValue,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/api/attempts/{attempt_id}/answers/{question_id}",
            self.base_url
        );
        let body = match value {
            AnswerValue::Choice(ids) => json!({ "selectedOptionIds": ids }),
            AnswerValue::Text(text) => json!({ "textResponse": text }),
        };
        self.client
            .put(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    #[instrument(skip_all, fields(%attempt_id, auto_submit), err(Debug))]
    async fn submit_attempt(
        &self,
        attempt_id: Uuid,
        auto_submit: bool,
    ) -> Result<SubmissionOutcome, ApiError> {
        let url = format!("{}/api/attempts/{attempt_id}/submit", self.base_url);
        let outcome = self
            .client
            .post(&url)
            .json(&json!({ "autoSubmit": auto_submit }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(outcome)
    }
}
