use std::collections::{HashMap, HashSet};

use exam_model::{AnswerValue, Response};
use uuid::Uuid;

/// In-memory working set of answers and flags for the current attempt.
///
/// Nothing here is persisted: an answer survives only once a scheduled or
/// manual save succeeds, at which point its unsaved marker clears. Losing
/// the store loses unsaved answers.
#[derive(Debug, Default)]
pub struct AnswerStore {
    answers: HashMap<Uuid, AnswerValue>,
    flagged: HashSet<Uuid>,
    unsaved: HashSet<Uuid>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store from responses already persisted server-side, so a
    /// resumed attempt does not re-save untouched answers. Empty responses
    /// are skipped; flags are restored.
    pub fn from_responses(responses: &[Response]) -> Self {
        let mut store = Self::new();
        for response in responses {
            let value = match response.question.question_type {
                exam_model::QuestionType::ShortAnswer => match &response.text_response {
                    Some(text) => AnswerValue::Text(text.clone()),
                    None => continue,
                },
                _ => AnswerValue::Choice(response.selected_option_ids.clone()),
            };
            if !value.is_empty() {
                store.answers.insert(response.question.id, value);
            }
            if response.is_flagged {
                store.flagged.insert(response.question.id);
            }
        }
        store
    }

    /// Overwrites the stored value and marks the question unsaved.
    pub fn set_answer(&mut self, question_id: Uuid, value: AnswerValue) {
        self.answers.insert(question_id, value);
        self.unsaved.insert(question_id);
    }

    pub fn answer(&self, question_id: &Uuid) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }

    /// True iff the stored value is non-empty.
    pub fn is_answered(&self, question_id: &Uuid) -> bool {
        self.answers
            .get(question_id)
            .is_some_and(|value| !value.is_empty())
    }

    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|v| !v.is_empty()).count()
    }

    pub fn unanswered_count(&self, total_questions: usize) -> usize {
        total_questions.saturating_sub(self.answered_count())
    }

    /// Flips flag membership, independent of answered state.
    pub fn toggle_flag(&mut self, question_id: Uuid) {
        if !self.flagged.remove(&question_id) {
            self.flagged.insert(question_id);
        }
    }

    pub fn is_flagged(&self, question_id: &Uuid) -> bool {
        self.flagged.contains(question_id)
    }

    /// Snapshot of unsaved answers for a save batch, in a stable order.
    pub fn unsaved(&self) -> Vec<(Uuid, AnswerValue)> {
        let mut batch: Vec<(Uuid, AnswerValue)> = self
            .unsaved
            .iter()
            .filter_map(|id| self.answers.get(id).map(|v| (*id, v.clone())))
            .collect();
        batch.sort_by_key(|(id, _)| *id);
        batch
    }

    pub fn has_unsaved(&self) -> bool {
        !self.unsaved.is_empty()
    }

    /// Clears the unsaved marker after a successful save. Save failures must
    /// not call this, so the next tick retries the question.
    pub fn mark_saved(&mut self, question_id: &Uuid) {
        self.unsaved.remove(question_id);
    }
}
