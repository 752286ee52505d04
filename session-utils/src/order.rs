use exam_model::{Question, SecuritySettings};
use rand::seq::SliceRandom;
use tracing::trace;
use uuid::Uuid;

/// Presentation order for an attempt's questions: authored order, or a
/// random shuffle when the instance enables `shuffle_questions`.
pub fn question_order(questions: &[Question], settings: &SecuritySettings) -> Vec<Uuid> {
    let mut order: Vec<Uuid> = questions.iter().map(|q| q.id).collect();
    if settings.shuffle_questions {
        let mut rng = rand::rng();
        order.shuffle(&mut rng);
        trace!(number_of_questions = order.len(), "shuffled question order");
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_model::QuestionType;
    use std::collections::HashSet;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                id: Uuid::new_v4(),
                question_text: format!("q{i}"),
                question_type: QuestionType::SingleChoice,
                options: vec![],
                correct_answer: None,
                explanation: None,
                weight: 1.0,
            })
            .collect()
    }

    #[test]
    fn order_is_identity_when_shuffle_disabled() {
        let qs = questions(5);
        let settings = SecuritySettings::default();
        let order = question_order(&qs, &settings);
        let expected: Vec<Uuid> = qs.iter().map(|q| q.id).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn shuffle_preserves_the_id_set() {
        let qs = questions(50);
        let settings = SecuritySettings {
            shuffle_questions: true,
            ..Default::default()
        };
        let order = question_order(&qs, &settings);
        let expected: HashSet<Uuid> = qs.iter().map(|q| q.id).collect();
        let got: HashSet<Uuid> = order.iter().copied().collect();
        assert_eq!(order.len(), qs.len());
        assert_eq!(got, expected);
    }
}
