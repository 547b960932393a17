// src/config.rs

use std::env;
use dotenvy::dotenv;

use crate::error::AppError;

/// Default token lifetime for the admin session (one hour).
pub const DEFAULT_JWT_EXPIRATION: u64 = 3600;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Admin token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    /// Browser origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
    pub log_dir: String,
    /// Directory holding the built frontend, served as a fallback when set.
    pub static_dir: Option<String>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let jwt_expiration = match env::var("JWT_EXPIRATION") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::InternalServerError(format!("JWT_EXPIRATION must be a number of seconds, got '{}'", raw))
            })?,
            Err(_) => DEFAULT_JWT_EXPIRATION,
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::InternalServerError(format!("PORT must be a valid port, got '{}'", raw)))?,
            Err(_) => 8080,
        };

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let cors_origins = parse_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".to_string()),
        );

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            cors_origins,
            log_dir,
            static_dir: optional("STATIC_DIR"),
            admin_username: optional("ADMIN_USERNAME"),
            admin_password: optional("ADMIN_PASSWORD"),
        })
    }
}

fn required(key: &str) -> Result<String, AppError> {
    optional(key).ok_or_else(|| AppError::InternalServerError(format!("{} must be set", key)))
}

/// Reads an environment variable, treating blank values as unset.
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Splits a comma separated origin list, dropping empty entries.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
