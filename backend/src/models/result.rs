// src/models/result.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use validator::Validate;

/// One recorded selection. Created at most once per question per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub selected_option: String,
    pub is_correct: bool,
}

/// Represents the 'user_results' table in the database.
///
/// Columns are snake_case; the JSON form is camelCase, which is the only
/// translation the REST layer performs.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub roll_number: String,
    pub quiz_title: String,
    /// Category the quiz was drawn from. Older records may lack it.
    #[serde(default)]
    pub category: Option<String>,
    pub answers: Json<Vec<Answer>>,
    pub score: i32,
    pub total_questions: i32,
    /// Submission time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl QuizResult {
    /// Category used to look the questions back up for the review page.
    ///
    /// Falls back to the first word of the title for records written before
    /// the category was stored explicitly.
    pub fn review_category(&self) -> Option<String> {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            return Some(category.to_string());
        }
        self.quiz_title
            .split_whitespace()
            .next()
            .map(|word| word.to_lowercase())
    }
}

/// DTO for submitting a finished attempt.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub roll_number: String,
    #[validate(length(min = 1, max = 200))]
    pub quiz_title: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    pub answers: Vec<Answer>,
    #[validate(range(min = 0))]
    pub score: i32,
    #[validate(range(min = 1))]
    pub total_questions: i32,
    #[validate(range(min = 0))]
    pub timestamp: i64,
}

impl From<&QuizResult> for SubmitResultRequest {
    fn from(result: &QuizResult) -> Self {
        Self {
            name: result.name.clone(),
            roll_number: result.roll_number.clone(),
            quiz_title: result.quiz_title.clone(),
            category: result.category.clone(),
            answers: result.answers.0.clone(),
            score: result.score,
            total_questions: result.total_questions,
            timestamp: result.timestamp,
        }
    }
}
