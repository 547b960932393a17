// src/session/store.rs

use std::fmt;

use async_trait::async_trait;

use crate::models::{question::Question, result::QuizResult};

/// Failure reported by a question or result store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested category or record does not exist.
    NotFound(String),
    /// The store rejected the payload.
    Validation(String),
    /// Missing, expired or rejected admin credential. Re-authenticate.
    Unauthorized(String),
    /// Network or server failure. The caller may retry.
    Transient(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(msg) => write!(f, "not found: {}", msg),
            StoreError::Validation(msg) => write!(f, "rejected: {}", msg),
            StoreError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            StoreError::Transient(msg) => write!(f, "store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read side of the question bank, as seen by a quiz session.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn categories(&self) -> Result<Vec<String>, StoreError>;

    async fn questions(&self, category: &str) -> Result<Vec<Question>, StoreError>;
}

/// Where finished attempts are sent.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save_result(&self, result: &QuizResult) -> Result<(), StoreError>;
}

/// Fetches the category list for the dashboard, logging and swallowing
/// failures so the page still renders with an empty list.
pub async fn categories_or_empty<S: QuestionStore + ?Sized>(store: &S) -> Vec<String> {
    match store.categories().await {
        Ok(categories) => categories,
        Err(e) => {
            tracing::warn!("Failed to fetch categories: {}", e);
            Vec::new()
        }
    }
}
