// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::{AppError, is_unique_violation},
    models::question::{CreateQuestionRequest, Question, UpdateQuestionRequest},
    utils::html::{clean_html, clean_options},
};

const QUESTION_COLUMNS: &str = "id, category, text, options, answer";

/// Creates a new quiz question.
/// Admin only.
pub async fn create_question(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let question = sqlx::query_as::<_, Question>(&format!(
        r#"
        INSERT INTO questions (id, category, text, options, answer)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {QUESTION_COLUMNS}
        "#
    ))
    .bind(&payload.id)
    .bind(&payload.category)
    .bind(clean_html(&payload.text))
    .bind(SqlJson(clean_options(&payload.options)))
    .bind(&payload.answer)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!(
                "Question '{}' already exists in '{}'",
                payload.id, payload.category
            ))
        } else {
            tracing::error!("Failed to create question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    tracing::info!("Created question {}/{}", question.category, question.id);

    Ok((StatusCode::CREATED, Json(question)))
}

/// Updates a question's text, options or answer.
/// Admin only.
pub async fn update_question(
    State(pool): State<PgPool>,
    Path((category, id)): Path<(String, String)>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let current = fetch_question(&pool, &category, &id).await?;

    if payload.is_empty() {
        return Ok(Json(current));
    }

    // The answer key has to stay one of the options after the update.
    let options = payload.options.as_ref().unwrap_or(&current.options.0);
    let answer = payload.answer.as_deref().unwrap_or(current.answer.as_str());
    if !options.contains_key(answer) {
        return Err(AppError::BadRequest(format!(
            "Answer '{}' is not one of the options",
            answer
        )));
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE questions SET ");
    let mut separated = builder.separated(", ");

    if let Some(text) = &payload.text {
        separated.push("text = ");
        separated.push_bind_unseparated(clean_html(text));
    }

    if let Some(options) = &payload.options {
        separated.push("options = ");
        separated.push_bind_unseparated(SqlJson(clean_options(options)));
    }

    if let Some(answer) = &payload.answer {
        separated.push("answer = ");
        separated.push_bind_unseparated(answer.clone());
    }

    builder.push(" WHERE category = ");
    builder.push_bind(&category);
    builder.push(" AND id = ");
    builder.push_bind(&id);
    builder.push(format!(" RETURNING {QUESTION_COLUMNS}"));

    let updated = builder
        .build_query_as::<Question>()
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?
        .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(updated))
}

/// Deletes a quiz question.
/// Admin only.
pub async fn delete_question(
    State(pool): State<PgPool>,
    Path((category, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE category = $1 AND id = $2")
        .bind(&category)
        .bind(&id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Question deleted successfully" })))
}

async fn fetch_question(pool: &PgPool, category: &str, id: &str) -> Result<Question, AppError> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE category = $1 AND id = $2"
    ))
    .bind(category)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Question not found".to_string()))
}
