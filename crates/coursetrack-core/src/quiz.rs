//! Quiz submission scoring.

use serde::Serialize;

use crate::model::Question;
use crate::progress::QuizScore;

/// Score a submission.
///
/// `selections[i]` is the option chosen for `questions[i]`; `None` marks an
/// unanswered question. Missing trailing selections count as unanswered, and
/// unanswered questions are simply wrong. `total` is always the number of
/// questions.
///
/// The evaluator does not know whether this quiz was already submitted;
/// locking a submitted quiz is the caller's concern.
pub fn evaluate(questions: &[Question], selections: &[Option<usize>]) -> QuizScore {
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| selected(selections, *i) == Some(q.answer_index))
        .count();

    QuizScore::new(correct as u32, questions.len() as u32)
}

/// Per-question feedback shown after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerReview {
    pub question_id: String,
    pub selected: Option<usize>,
    pub answer_index: usize,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

pub fn review(questions: &[Question], selections: &[Option<usize>]) -> Vec<AnswerReview> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let selected = selected(selections, i);
            AnswerReview {
                question_id: q.id.clone(),
                selected,
                answer_index: q.answer_index,
                is_correct: selected == Some(q.answer_index),
                explanation: q.explanation.clone(),
            }
        })
        .collect()
}

fn selected(selections: &[Option<usize>], index: usize) -> Option<usize> {
    selections.get(index).copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, answer_index: usize) -> Question {
        Question {
            id: id.into(),
            prompt: format!("Question {id}"),
            options: vec!["a".into(), "b".into(), "c".into()],
            answer_index,
            explanation: Some(format!("because {answer_index}")),
        }
    }

    fn three_questions() -> Vec<Question> {
        vec![question("q1", 1), question("q2", 0), question("q3", 2)]
    }

    #[test]
    fn only_matching_selections_score() {
        let score = evaluate(&three_questions(), &[Some(1), Some(1), Some(0)]);
        assert_eq!(score, QuizScore::new(1, 3));
    }

    #[test]
    fn all_correct() {
        let score = evaluate(&three_questions(), &[Some(1), Some(0), Some(2)]);
        assert_eq!(score, QuizScore::new(3, 3));
        assert!(score.is_passing());
    }

    #[test]
    fn unanswered_questions_are_wrong() {
        let qs = three_questions();
        assert_eq!(evaluate(&qs, &[None, None, None]), QuizScore::new(0, 3));
        assert_eq!(evaluate(&qs, &[]), QuizScore::new(0, 3));
        assert_eq!(evaluate(&qs, &[Some(1)]), QuizScore::new(1, 3));
    }

    #[test]
    fn extra_selections_are_ignored() {
        let score = evaluate(&three_questions(), &[Some(1), Some(0), Some(2), Some(5)]);
        assert_eq!(score.total, 3);
        assert_eq!(score.correct, 3);
    }

    #[test]
    fn empty_quiz_scores_zero_of_zero() {
        let score = evaluate(&[], &[Some(0)]);
        assert_eq!(score, QuizScore::new(0, 0));
        assert!(!score.is_passing());
    }

    #[test]
    fn review_marks_each_answer() {
        let reviews = review(&three_questions(), &[Some(1), None]);
        assert_eq!(reviews.len(), 3);
        assert!(reviews[0].is_correct);
        assert_eq!(reviews[1].selected, None);
        assert!(!reviews[1].is_correct);
        assert_eq!(reviews[2].answer_index, 2);
        assert_eq!(reviews[2].explanation.as_deref(), Some("because 2"));
    }
}
