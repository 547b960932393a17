// src/handlers/auth.rs

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::admin::{AdminUser, LoginRequest, LoginResponse},
    utils::{
        hash::verify_password,
        jwt::{ADMIN_ROLE, sign_jwt},
    },
};

/// Authenticates an admin and returns a JWT carrying the admin role.
///
/// Unknown usernames and wrong passwords get the same 401 so the response
/// does not reveal which one was wrong.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = sqlx::query_as::<_, AdminUser>(
        "SELECT id, username, password FROM admin_users WHERE username = $1",
    )
    .bind(&payload.username)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let invalid = || AppError::AuthError("Invalid credentials".to_string());

    let user = user.ok_or_else(invalid)?;
    if !verify_password(&payload.password, &user.password)? {
        tracing::warn!("Failed admin login for '{}'", payload.username);
        return Err(invalid());
    }

    let token = sign_jwt(
        &user.username,
        ADMIN_ROLE,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    tracing::info!("Admin '{}' (id {}) logged in", user.username, user.id);

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: config.jwt_expiration,
    }))
}
