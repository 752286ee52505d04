//! HellApp Exam Session Service
//!
//! Headless runner for one student exam session: fetches the assignment,
//! starts or resumes the attempt, then drives the countdown/autosave loop
//! until the attempt is submitted.

use anyhow::Context;
use session_utils::status::{self, ExamStatus};

pub mod api;
pub mod clock;
pub mod config;
pub mod session;

use api::{ExamApi, HttpExamApi};
use clock::{Clock, SystemClock};
use config::EnvVars;
use session::{ExamSession, SubmissionState};

/// Runs a full exam session for the configured assignment.
#[tracing::instrument(skip_all, err(Debug))]
pub async fn run_exam_session(env_vars: &EnvVars) -> anyhow::Result<()> {
    let api = HttpExamApi::new(env_vars).context("unable to build API client")?;
    let clock = SystemClock;

    let assignment = api
        .fetch_assignment(env_vars.assignment_id)
        .await
        .context("unable to fetch exam assignment")?;

    let exam_status = status::derive_exam_status(clock.now(), &assignment);
    tracing::info!(
        exam = %assignment.exam.title,
        status = exam_status.badge().label,
        "fetched assignment"
    );
    match exam_status {
        ExamStatus::Active | ExamStatus::InProgress => {}
        other => {
            tracing::info!(status = ?other, "exam is not open for taking; nothing to do");
            return Ok(());
        }
    }

    let attempt = api
        .start_attempt(assignment.id)
        .await
        .context("unable to start or resume attempt")?;
    tracing::info!(
        attempt = %attempt.id,
        questions = assignment.exam.question_count,
        "attempt started"
    );

    let mut session = ExamSession::new(
        api,
        clock,
        &assignment,
        &attempt,
        env_vars.autosave_interval,
    );
    session.run().await;

    match session.submission() {
        SubmissionState::Done(outcome) => {
            tracing::info!(
                grade = ?outcome.grade,
                pass_fail = ?outcome.pass_fail,
                "session finished"
            );
        }
        SubmissionState::Failed { message, .. } => {
            tracing::error!(message, "session finished without a clean submission");
        }
        other => {
            tracing::warn!(state = ?other, "session ended unexpectedly");
        }
    }

    Ok(())
}
