// src/handlers/results.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{error::AppError, models::result::QuizResult};

/// Lists every stored result, newest first.
/// Admin only.
pub async fn list_results(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let results = sqlx::query_as::<_, QuizResult>(
        r#"
        SELECT id, name, roll_number, quiz_title, category, answers, score, total_questions, timestamp
        FROM user_results
        ORDER BY timestamp DESC, id DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch results: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(results))
}

/// Deletes one result by ID.
/// Admin only.
pub async fn delete_result(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM user_results WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete result {}: {:?}", id, e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Result not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Result deleted successfully" })))
}

/// Deletes every stored result.
/// Admin only.
pub async fn delete_all_results(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM user_results")
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete all results: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    tracing::info!("Deleted {} results", result.rows_affected());

    Ok(Json(serde_json::json!({
        "message": "All results deleted successfully",
        "deleted": result.rows_affected()
    })))
}
