use std::time::Duration;

use chrono::{DateTime, Utc};
use exam_model::{AnswerValue, Attempt, ExamAssignment, Question, SubmissionOutcome};
use session_utils::{answers::AnswerStore, error::Error, order};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    api::{ApiError, ExamApi},
    clock::Clock,
};

pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Transition(#[from] Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Submission pipeline state.
///
/// `Idle -> Confirming -> Saving -> Submitting -> Done | Failed`. Only
/// `Confirming` is cancelable; once saving begins the operation runs to
/// completion or failure. A forced (time-up) submission skips `Confirming`
/// and its failure is not retryable: the student's time is already spent, so
/// the only way out is the exam details escape hatch.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmissionState {
    Idle,
    Confirming { answered: usize, unanswered: usize },
    Saving,
    Submitting,
    Done(SubmissionOutcome),
    Failed { message: String, retryable: bool },
}

/// One student's live exam-taking session.
///
/// Owns the answer store, the countdown, and the submission pipeline; all
/// mutation goes through these methods. Cooperative and single-owner: the
/// countdown tick, the autosave tick, and in-flight saves never overlap
/// within a session.
pub struct ExamSession<A, C> {
    api: A,
    clock: C,
    attempt_id: Uuid,
    question_order: Vec<Uuid>,
    autosave_interval: Duration,
    answers: AnswerStore,
    remaining_seconds: u64,
    time_up_fired: bool,
    last_saved_at: Option<DateTime<Utc>>,
    submission: SubmissionState,
}

impl<A: ExamApi, C: Clock> ExamSession<A, C> {
    pub fn new(
        api: A,
        clock: C,
        assignment: &ExamAssignment,
        attempt: &Attempt,
        autosave_interval: Duration,
    ) -> Self {
        let now = clock.now();
        let remaining_seconds = (assignment.exam.end_date - now).num_seconds().max(0) as u64;

        // Server-assigned order wins; otherwise derive one locally, honoring
        // the instance's shuffle setting.
        let question_order = if attempt.question_order.is_empty() {
            let questions: Vec<Question> = attempt
                .responses
                .iter()
                .map(|r| r.question.clone())
                .collect();
            order::question_order(&questions, &assignment.exam.security_settings)
        } else {
            attempt.question_order.clone()
        };

        Self {
            api,
            clock,
            attempt_id: attempt.id,
            question_order,
            autosave_interval,
            answers: AnswerStore::from_responses(&attempt.responses),
            remaining_seconds,
            time_up_fired: false,
            last_saved_at: None,
            submission: SubmissionState::Idle,
        }
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn question_order(&self) -> &[Uuid] {
        &self.question_order
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn set_answer(&mut self, question_id: Uuid, value: AnswerValue) {
        self.answers.set_answer(question_id, value);
    }

    pub fn toggle_flag(&mut self, question_id: Uuid) {
        self.answers.toggle_flag(question_id);
    }

    /// Drives the session to completion: a 1 s countdown tick and the
    /// configured autosave tick, until time runs out or the submission
    /// pipeline reaches a terminal state.
    #[tracing::instrument(skip_all)]
    pub async fn run(&mut self) {
        // Mounted past the end date: the time-up path fires immediately.
        if self.remaining_seconds == 0 {
            self.handle_time_up().await;
            return;
        }

        let mut countdown = tokio::time::interval(COUNTDOWN_TICK);
        // An in-flight save must not stall the deadline: missed countdown
        // ticks fire back-to-back until the count catches up with the wall.
        countdown.set_missed_tick_behavior(MissedTickBehavior::Burst);
        let mut autosave = tokio::time::interval(self.autosave_interval);
        autosave.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately.
        countdown.tick().await;
        autosave.tick().await;

        loop {
            tokio::select! {
                _ = countdown.tick() => {
                    self.tick_second().await;
                }
                _ = autosave.tick() => {
                    self.autosave_tick().await;
                }
            }
            if self.time_up_fired
                || matches!(
                    self.submission,
                    SubmissionState::Done(_) | SubmissionState::Failed { .. }
                )
            {
                break;
            }
        }
    }

    /// One second of countdown. Remaining time is monotonically
    /// non-increasing and hits exactly 0 before the time-up handler runs.
    pub async fn tick_second(&mut self) {
        if self.time_up_fired {
            return;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.handle_time_up().await;
        }
    }

    /// Scheduled autosave: skipped until something has been answered, and a
    /// no-op when everything is already saved.
    pub async fn autosave_tick(&mut self) {
        if self.answers.answered_count() == 0 || !self.answers.has_unsaved() {
            return;
        }
        if let Err(e) = self.flush_unsaved().await {
            debug!(error = ?e, "autosave tick left unsaved answers");
        }
    }

    /// Manual save; converges on the same primitive as the scheduler.
    #[tracing::instrument(skip_all, err(Debug))]
    pub async fn save_now(&mut self) -> Result<(), ApiError> {
        self.flush_unsaved().await
    }

    /// Time expired: flush unsaved answers, then submit with the autoSubmit
    /// flag. Runs exactly once; errors from either step are logged, never
    /// re-thrown. A submission already saving, submitting, or done is left
    /// alone — the attempt is submitted at most once.
    pub async fn handle_time_up(&mut self) {
        if self.time_up_fired {
            return;
        }
        self.time_up_fired = true;

        if matches!(
            self.submission,
            SubmissionState::Saving | SubmissionState::Submitting | SubmissionState::Done(_)
        ) {
            info!("exam time expired; submission already underway");
            return;
        }
        info!("exam time expired; saving and submitting");

        if let Err(e) = self.flush_unsaved().await {
            error!(error = ?e, "failed to flush answers before forced submit");
        }
        // Proceeds regardless of the flush result; errors land in the
        // submission state and were already logged.
        let _ = self.submit(true).await;
    }

    /// `Idle -> Confirming`, with the counts for the confirmation prompt.
    pub fn request_submit(&mut self) -> Result<(), Error> {
        if !matches!(self.submission, SubmissionState::Idle) {
            return Err(Error::InvalidTransition(format!(
                "request_submit from {:?}",
                self.submission
            )));
        }
        let answered = self.answers.answered_count();
        let unanswered = self.answers.unanswered_count(self.question_order.len());
        self.submission = SubmissionState::Confirming {
            answered,
            unanswered,
        };
        Ok(())
    }

    /// Only the confirmation prompt is cancelable.
    pub fn cancel_submit(&mut self) -> Result<(), Error> {
        if !matches!(self.submission, SubmissionState::Confirming { .. }) {
            return Err(Error::InvalidTransition(format!(
                "cancel_submit from {:?}",
                self.submission
            )));
        }
        self.submission = SubmissionState::Idle;
        Ok(())
    }

    /// `Confirming -> Saving -> Submitting -> Done`. A failed pre-submit
    /// flush returns the pipeline to `Confirming` so the user is prompted
    /// again; a failed submit is retryable.
    #[tracing::instrument(skip_all, err(Debug))]
    pub async fn confirm_submit(&mut self) -> Result<(), SessionError> {
        let SubmissionState::Confirming {
            answered,
            unanswered,
        } = self.submission
        else {
            return Err(Error::InvalidTransition(format!(
                "confirm_submit from {:?}",
                self.submission
            ))
            .into());
        };

        self.submission = SubmissionState::Saving;
        if let Err(e) = self.flush_unsaved().await {
            warn!(error = ?e, "pre-submit save failed; returning to confirmation");
            self.submission = SubmissionState::Confirming {
                answered,
                unanswered,
            };
            return Err(e.into());
        }

        self.submit(false).await
    }

    pub async fn retry_submit(&mut self) -> Result<(), SessionError> {
        if !matches!(
            self.submission,
            SubmissionState::Failed {
                retryable: true,
                ..
            }
        ) {
            return Err(Error::InvalidTransition(format!(
                "retry_submit from {:?}",
                self.submission
            ))
            .into());
        }
        self.submit(false).await
    }

    async fn submit(&mut self, auto_submit: bool) -> Result<(), SessionError> {
        self.submission = SubmissionState::Submitting;
        match self.api.submit_attempt(self.attempt_id, auto_submit).await {
            Ok(outcome) => {
                info!(
                    grade = ?outcome.grade,
                    pass_fail = ?outcome.pass_fail,
                    auto_submit,
                    "attempt submitted"
                );
                self.submission = SubmissionState::Done(outcome);
                Ok(())
            }
            Err(e) => {
                error!(error = ?e, auto_submit, "submission failed");
                self.submission = SubmissionState::Failed {
                    message: e.to_string(),
                    retryable: !auto_submit,
                };
                Err(e.into())
            }
        }
    }

    /// Saves every unsaved answer, one idempotent upsert per question. A
    /// failed save keeps its unsaved marker so the next tick or manual save
    /// retries it; successes update the last-saved timestamp.
    async fn flush_unsaved(&mut self) -> Result<(), ApiError> {
        let batch = self.answers.unsaved();
        let mut first_error = None;

        for (question_id, value) in batch {
            match self
                .api
                .save_answer(self.attempt_id, question_id, &value)
                .await
            {
                Ok(()) => {
                    self.answers.mark_saved(&question_id);
                    self.last_saved_at = Some(self.clock.now());
                }
                Err(e) => {
                    warn!(%question_id, error = ?e, "failed to save answer; will retry");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }
}
