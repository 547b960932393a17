// src/session/scoring.rs

//! Score computation and the review-page breakdown.
//!
//! Everything here is a pure function of its inputs. The submission
//! timestamp is supplied by the caller so repeated calls give identical
//! results.

use sqlx::types::Json;

use crate::models::{
    question::Question,
    result::{Answer, QuizResult},
};

/// Outcome of reducing a set of answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSummary<'a> {
    /// Number of correct answers.
    pub score: usize,
    pub incorrect: usize,
    /// Questions without a recorded answer.
    pub skipped: usize,
    pub total_questions: usize,
    pub correct_answers: Vec<&'a Answer>,
    pub incorrect_answers: Vec<&'a Answer>,
}

/// Scores a list of recorded answers against the quiz size.
///
/// Only answered questions appear in `answers`, so skipped questions are
/// whatever is left of `total_questions`.
pub fn summarize(answers: &[Answer], total_questions: usize) -> ScoreSummary<'_> {
    let (correct_answers, incorrect_answers): (Vec<&Answer>, Vec<&Answer>) =
        answers.iter().partition(|a| a.is_correct);

    ScoreSummary {
        score: correct_answers.len(),
        incorrect: incorrect_answers.len(),
        skipped: total_questions.saturating_sub(answers.len()),
        total_questions,
        correct_answers,
        incorrect_answers,
    }
}

/// Who took the quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub roll_number: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>, roll_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roll_number: roll_number.into(),
        }
    }

    /// Both identity fields must be non-blank before a result can be built.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.roll_number.trim().is_empty()
    }
}

/// Assembles the record sent to the result store.
pub fn build_result(
    candidate: &Candidate,
    quiz_title: &str,
    category: &str,
    answers: Vec<Answer>,
    total_questions: usize,
    timestamp: i64,
) -> QuizResult {
    let score = summarize(&answers, total_questions).score;

    QuizResult {
        id: None,
        name: candidate.name.trim().to_string(),
        roll_number: candidate.roll_number.trim().to_string(),
        quiz_title: quiz_title.to_string(),
        category: Some(category.to_string()),
        answers: Json(answers),
        score: score as i32,
        total_questions: total_questions as i32,
        timestamp,
    }
}

/// Question numbers (1-based) grouped by outcome, for the review page.
/// `None` marks an answer whose question is no longer in the bank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Review {
    pub correct: Vec<Option<usize>>,
    pub incorrect: Vec<Option<usize>>,
    pub skipped: Vec<usize>,
}

/// Lines a stored result up against the category's current questions.
pub fn review(result: &QuizResult, questions: &[Question]) -> Review {
    let number_of = |question_id: &str| {
        questions
            .iter()
            .position(|q| q.id == question_id)
            .map(|index| index + 1)
    };

    let summary = summarize(&result.answers, result.total_questions.max(0) as usize);

    let skipped = questions
        .iter()
        .enumerate()
        .filter(|(_, q)| !result.answers.iter().any(|a| a.question_id == q.id))
        .map(|(index, _)| index + 1)
        .collect();

    Review {
        correct: summary
            .correct_answers
            .iter()
            .map(|a| number_of(&a.question_id))
            .collect(),
        incorrect: summary
            .incorrect_answers
            .iter()
            .map(|a| number_of(&a.question_id))
            .collect(),
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn answer(id: &str, option: &str, correct: bool) -> Answer {
        Answer {
            question_id: id.into(),
            selected_option: option.into(),
            is_correct: correct,
        }
    }

    fn question(id: &str) -> Question {
        let options: BTreeMap<String, String> = [("a", "yes"), ("b", "no")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Question {
            id: id.into(),
            category: "java".into(),
            text: format!("Question {}", id),
            options: Json(options),
            answer: "a".into(),
        }
    }

    #[test]
    fn counts_add_up_to_total() {
        let answers = vec![answer("q1", "a", true), answer("q3", "b", false)];
        let summary = summarize(&answers, 3);
        assert_eq!(summary.score, 1);
        assert_eq!(summary.incorrect, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.score + summary.incorrect + summary.skipped, 3);
    }

    #[test]
    fn no_answers_means_everything_skipped() {
        let summary = summarize(&[], 4);
        assert_eq!(summary.score, 0);
        assert_eq!(summary.skipped, 4);
        assert!(summary.correct_answers.is_empty());
    }

    #[test]
    fn summarize_is_idempotent() {
        let answers = vec![answer("q1", "a", true), answer("q2", "a", true)];
        assert_eq!(summarize(&answers, 5), summarize(&answers, 5));
    }

    #[test]
    fn build_result_uses_caller_timestamp() {
        let candidate = Candidate::new(" Ada ", "R-7");
        let answers = vec![answer("q1", "a", true), answer("q3", "b", false)];
        let first = build_result(&candidate, "Java Developer Test", "java", answers.clone(), 3, 42);
        let second = build_result(&candidate, "Java Developer Test", "java", answers, 3, 42);
        assert_eq!(first, second);
        assert_eq!(first.name, "Ada");
        assert_eq!(first.score, 1);
        assert_eq!(first.total_questions, 3);
        assert_eq!(first.category.as_deref(), Some("java"));
        assert_eq!(first.timestamp, 42);
    }

    #[test]
    fn candidate_requires_both_fields() {
        assert!(Candidate::new("Ada", "R-1").is_complete());
        assert!(!Candidate::new("Ada", "  ").is_complete());
        assert!(!Candidate::new("", "R-1").is_complete());
    }

    #[test]
    fn review_numbers_questions_by_position() {
        let questions = vec![question("q1"), question("q2"), question("q3")];
        let result = build_result(
            &Candidate::new("Ada", "R-1"),
            "Java Developer Test",
            "java",
            vec![
                answer("q1", "a", true),
                answer("q3", "b", false),
                answer("gone", "a", true),
            ],
            3,
            0,
        );

        let review = review(&result, &questions);
        assert_eq!(review.correct, vec![Some(1), None]);
        assert_eq!(review.incorrect, vec![Some(3)]);
        assert_eq!(review.skipped, vec![2]);
    }
}
