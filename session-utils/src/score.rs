use exam_model::{QuestionType, Response};

use crate::error::Error;

/// Calculates the attempt grade, and compares grade >= passing_score
pub fn check_attempt_pass(responses: &[Response], passing_score: f64) -> bool {
    if let Ok(grade) = calculate_grade(responses) {
        return grade >= passing_score;
    }
    false
}

/// Weighted percentage over all responses. Each question is all-or-nothing:
/// a correct response earns its full weight, anything else earns 0.
pub fn calculate_grade(responses: &[Response]) -> Result<f64, Error> {
    let total_weight: f64 = responses.iter().map(|r| r.question.weight).sum();
    if total_weight <= 0.0 {
        return Err(Error::Grading(
            "Attempt has no weighted questions to grade".to_string(),
        ));
    }

    let earned: f64 = responses.iter().map(score_response).sum();
    Ok((earned / total_weight) * 100.0)
}

/// 0, or the question weight when the response is correct.
pub fn score_response(response: &Response) -> f64 {
    if is_correct(response) {
        response.question.weight
    } else {
        0.0
    }
}

fn is_correct(response: &Response) -> bool {
    let question = &response.question;
    match question.question_type {
        QuestionType::SingleChoice | QuestionType::MultipleChoice => {
            let correct_option_ids: Vec<_> = question
                .options
                .iter()
                .filter(|o| o.is_correct)
                .map(|o| o.id)
                .collect();
            if correct_option_ids.is_empty() {
                return false;
            }
            // Selected set must equal the correct set: all correct options
            // chosen and nothing incorrect.
            let selected = &response.selected_option_ids;
            correct_option_ids.iter().all(|id| selected.contains(id))
                && selected.iter().all(|id| correct_option_ids.contains(id))
        }
        QuestionType::ShortAnswer => {
            let Some(expected) = &question.correct_answer else {
                return false;
            };
            let Some(given) = &response.text_response else {
                return false;
            };
            given.trim().eq_ignore_ascii_case(expected.trim())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_model::{Question, QuestionOption};
    use uuid::Uuid;

    fn option(is_correct: bool) -> QuestionOption {
        QuestionOption {
            id: Uuid::new_v4(),
            text: "opt".to_string(),
            is_correct,
        }
    }

    fn choice_response(
        question_type: QuestionType,
        options: Vec<QuestionOption>,
        selected: Vec<Uuid>,
        weight: f64,
    ) -> Response {
        Response {
            question: Question {
                id: Uuid::new_v4(),
                question_text: "q".to_string(),
                question_type,
                options,
                correct_answer: None,
                explanation: None,
                weight,
            },
            selected_option_ids: selected,
            text_response: None,
            score: 0.0,
            is_flagged: false,
        }
    }

    fn short_answer_response(expected: &str, given: Option<&str>, weight: f64) -> Response {
        Response {
            question: Question {
                id: Uuid::new_v4(),
                question_text: "q".to_string(),
                question_type: QuestionType::ShortAnswer,
                options: vec![],
                correct_answer: Some(expected.to_string()),
                explanation: None,
                weight,
            },
            selected_option_ids: vec![],
            text_response: given.map(str::to_string),
            score: 0.0,
            is_flagged: false,
        }
    }

    #[test]
    fn single_choice_requires_the_correct_option() {
        let correct = option(true);
        let wrong = option(false);
        let options = vec![correct.clone(), wrong.clone()];

        let right = choice_response(
            QuestionType::SingleChoice,
            options.clone(),
            vec![correct.id],
            2.0,
        );
        let missed = choice_response(QuestionType::SingleChoice, options, vec![wrong.id], 2.0);

        assert_eq!(score_response(&right), 2.0);
        assert_eq!(score_response(&missed), 0.0);
    }

    #[test]
    fn multiple_choice_is_all_or_nothing() {
        let correct_a = option(true);
        let correct_b = option(true);
        let wrong = option(false);
        let options = vec![correct_a.clone(), correct_b.clone(), wrong.clone()];

        let complete = choice_response(
            QuestionType::MultipleChoice,
            options.clone(),
            vec![correct_a.id, correct_b.id],
            1.0,
        );
        let partial = choice_response(
            QuestionType::MultipleChoice,
            options.clone(),
            vec![correct_a.id],
            1.0,
        );
        let with_extra = choice_response(
            QuestionType::MultipleChoice,
            options,
            vec![correct_a.id, correct_b.id, wrong.id],
            1.0,
        );

        assert_eq!(score_response(&complete), 1.0);
        assert_eq!(score_response(&partial), 0.0);
        assert_eq!(score_response(&with_extra), 0.0);
    }

    #[test]
    fn short_answer_ignores_case_and_whitespace() {
        assert_eq!(
            score_response(&short_answer_response("Paris", Some("  paris "), 1.0)),
            1.0
        );
        assert_eq!(
            score_response(&short_answer_response("Paris", Some("London"), 1.0)),
            0.0
        );
        assert_eq!(
            score_response(&short_answer_response("Paris", None, 1.0)),
            0.0
        );
    }

    #[test]
    fn grade_is_weighted() {
        let correct = option(true);
        let wrong = option(false);
        let options = vec![correct.clone(), wrong.clone()];

        let responses = vec![
            // 3.0 of weight, correct
            choice_response(
                QuestionType::SingleChoice,
                options.clone(),
                vec![correct.id],
                3.0,
            ),
            // 1.0 of weight, wrong
            choice_response(QuestionType::SingleChoice, options, vec![wrong.id], 1.0),
        ];

        let grade = calculate_grade(&responses).unwrap();
        assert_eq!(grade, 75.0);
        assert!(check_attempt_pass(&responses, 75.0));
        assert!(!check_attempt_pass(&responses, 80.0));
    }

    #[test]
    fn zero_weight_attempt_is_an_error() {
        assert!(calculate_grade(&[]).is_err());
    }
}
