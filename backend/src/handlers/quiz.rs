// src/handlers/quiz.rs

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::AppError,
    models::{question::Question, result::SubmitResultRequest},
    session::scoring::summarize,
};

/// Lists every distinct category, sorted.
pub async fn list_categories(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let categories: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT category FROM questions ORDER BY category")
            .fetch_all(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch categories: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

    Ok(Json(categories))
}

/// Returns all questions of one category ordered by id.
///
/// An unknown category yields an empty list; the client treats that as
/// "quiz not found".
pub async fn list_questions(
    State(pool): State<PgPool>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, category, text, options, answer
        FROM questions
        WHERE category = $1
        ORDER BY id
        "#,
    )
    .bind(&category)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch questions for '{}': {:?}", category, e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(questions))
}

/// Stores a finished attempt.
///
/// The payload is scored client side; it is only accepted when the score is
/// consistent with the recorded answers.
pub async fn submit_result(
    State(pool): State<PgPool>,
    Json(req): Json<SubmitResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    check_consistency(&req)?;

    sqlx::query(
        r#"
        INSERT INTO user_results
        (name, roll_number, quiz_title, category, answers, score, total_questions, timestamp)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(req.name.trim())
    .bind(req.roll_number.trim())
    .bind(&req.quiz_title)
    .bind(&req.category)
    .bind(SqlJson(&req.answers))
    .bind(req.score)
    .bind(req.total_questions)
    .bind(req.timestamp)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to save result: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!(
        "Result saved for '{}' ({}): {}/{}",
        req.name,
        req.quiz_title,
        req.score,
        req.total_questions
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Result saved successfully" })),
    ))
}

fn check_consistency(req: &SubmitResultRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty() || req.roll_number.trim().is_empty() {
        return Err(AppError::BadRequest("Name and roll number are required".to_string()));
    }

    if req.answers.len() > req.total_questions as usize {
        return Err(AppError::BadRequest(
            "More answers than questions in the quiz".to_string(),
        ));
    }

    let answered: HashSet<&str> = req.answers.iter().map(|a| a.question_id.as_str()).collect();
    if answered.len() != req.answers.len() {
        return Err(AppError::BadRequest(
            "Each question can only be answered once".to_string(),
        ));
    }

    let summary = summarize(&req.answers, req.total_questions as usize);
    if summary.score != req.score as usize {
        return Err(AppError::BadRequest(format!(
            "Score {} does not match {} correct answers",
            req.score, summary.score
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::result::Answer;

    fn answer(id: &str, correct: bool) -> Answer {
        Answer {
            question_id: id.into(),
            selected_option: "a".into(),
            is_correct: correct,
        }
    }

    fn request(answers: Vec<Answer>, score: i32, total: i32) -> SubmitResultRequest {
        SubmitResultRequest {
            name: "Ada".into(),
            roll_number: "R-1".into(),
            quiz_title: "Java Developer Test".into(),
            category: Some("java".into()),
            answers,
            score,
            total_questions: total,
            timestamp: 1,
        }
    }

    #[test]
    fn consistent_result_is_accepted() {
        let req = request(vec![answer("q1", true), answer("q3", false)], 1, 3);
        assert!(check_consistency(&req).is_ok());
    }

    #[test]
    fn inflated_score_is_rejected() {
        let req = request(vec![answer("q1", true), answer("q3", false)], 2, 3);
        assert!(matches!(check_consistency(&req), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn repeated_answer_is_rejected() {
        let req = request(vec![answer("q1", true), answer("q1", true)], 2, 2);
        assert!(matches!(check_consistency(&req), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn more_answers_than_questions_is_rejected() {
        let req = request(vec![answer("q1", true), answer("q2", true)], 2, 1);
        assert!(check_consistency(&req).is_err());
    }

    #[test]
    fn blank_identity_is_rejected() {
        let mut req = request(vec![], 0, 3);
        req.name = "   ".into();
        assert!(check_consistency(&req).is_err());
    }
}
