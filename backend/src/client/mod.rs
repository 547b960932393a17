// src/client/mod.rs

//! HTTP client for the REST API.
//!
//! `ApiClient` is the network-backed [`QuestionStore`] / [`ResultStore`] a
//! quiz session runs against, plus the admin operations. Admin calls take an
//! explicit [`AdminCredential`]; nothing is kept between calls.

pub mod link;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    models::{
        admin::{LoginRequest, LoginResponse},
        question::{CreateQuestionRequest, Question, UpdateQuestionRequest},
        result::{QuizResult, SubmitResultRequest},
    },
    session::store::{QuestionStore, ResultStore, StoreError},
};

/// A signed admin token together with the moment it stops being valid.
#[derive(Debug, Clone)]
pub struct AdminCredential {
    token: String,
    expires_at: DateTime<Utc>,
}

impl AdminCredential {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Credential for a login response received at `issued_at`.
    pub fn from_login(response: LoginResponse, issued_at: DateTime<Utc>) -> Self {
        let lifetime = i64::try_from(response.expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        let expires_at = issued_at
            .checked_add_signed(lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self::new(response.token, expires_at)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// The token, if it is still valid at `now`.
    pub fn token_at(&self, now: DateTime<Utc>) -> Result<&str, StoreError> {
        if self.is_expired_at(now) {
            return Err(StoreError::Unauthorized(
                "Admin session expired, please log in again".to_string(),
            ));
        }
        Ok(&self.token)
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transient(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::Validation(format!("invalid base url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Validation(format!(
                "'{}' cannot be used as a base url",
                base_url
            )));
        }
        Ok(Self { http, base_url })
    }

    /// Builds `<base>/api/<segments..>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Validation("base url cannot take a path".to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, StoreError> {
        Ok(self.http.request(method, self.endpoint(segments)?))
    }

    fn admin_request(
        &self,
        method: Method,
        segments: &[&str],
        credential: &AdminCredential,
    ) -> Result<RequestBuilder, StoreError> {
        let token = credential.token_at(Utc::now())?;
        Ok(self.request(method, segments)?.bearer_auth(token))
    }

    /// Exchanges admin credentials for a token.
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminCredential, StoreError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .request(Method::POST, &["admin", "login"])?
            .json(&body)
            .send()
            .await?;
        let login: LoginResponse = decode(response).await?;
        Ok(AdminCredential::from_login(login, Utc::now()))
    }

    /// All results, newest first.
    pub async fn list_results(&self, credential: &AdminCredential) -> Result<Vec<QuizResult>, StoreError> {
        let response = self
            .admin_request(Method::GET, &["results"], credential)?
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete_result(&self, credential: &AdminCredential, id: i64) -> Result<(), StoreError> {
        let id = id.to_string();
        let response = self
            .admin_request(Method::DELETE, &["results", &id], credential)?
            .send()
            .await?;
        check(response).await.map(drop)
    }

    pub async fn delete_all_results(&self, credential: &AdminCredential) -> Result<(), StoreError> {
        let response = self
            .admin_request(Method::DELETE, &["results"], credential)?
            .send()
            .await?;
        check(response).await.map(drop)
    }

    pub async fn create_question(
        &self,
        credential: &AdminCredential,
        question: &CreateQuestionRequest,
    ) -> Result<Question, StoreError> {
        let response = self
            .admin_request(Method::POST, &["questions"], credential)?
            .json(question)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn update_question(
        &self,
        credential: &AdminCredential,
        category: &str,
        id: &str,
        changes: &UpdateQuestionRequest,
    ) -> Result<Question, StoreError> {
        let response = self
            .admin_request(Method::PUT, &["questions", category, id], credential)?
            .json(changes)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete_question(
        &self,
        credential: &AdminCredential,
        category: &str,
        id: &str,
    ) -> Result<(), StoreError> {
        let response = self
            .admin_request(Method::DELETE, &["questions", category, id], credential)?
            .send()
            .await?;
        check(response).await.map(drop)
    }
}

#[async_trait]
impl QuestionStore for ApiClient {
    async fn categories(&self) -> Result<Vec<String>, StoreError> {
        let response = self.request(Method::GET, &["categories"])?.send().await?;
        decode(response).await
    }

    async fn questions(&self, category: &str) -> Result<Vec<Question>, StoreError> {
        let response = self
            .request(Method::GET, &["questions", category])?
            .send()
            .await?;
        decode(response).await
    }
}

#[async_trait]
impl ResultStore for ApiClient {
    async fn save_result(&self, result: &QuizResult) -> Result<(), StoreError> {
        let response = self
            .request(Method::POST, &["results"])?
            .json(&SubmitResultRequest::from(result))
            .send()
            .await?;
        check(response).await.map(drop)
    }
}

/// Maps an HTTP status onto the store error taxonomy.
pub fn classify_status(status: StatusCode, message: String) -> StoreError {
    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT => {
            StoreError::Validation(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized(message),
        _ => StoreError::Transient(message),
    }
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Server errors come back as {"error": "..."}; fall back to the status text.
    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| status.to_string());

    Err(classify_status(status, message))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let response = check(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| StoreError::Transient(format!("unexpected response body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_segments() {
        let client = ApiClient::new("http://localhost:8080").unwrap();
        let url = client.endpoint(&["questions", "java", "q 1"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/questions/java/q%201");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = ApiClient::new("http://host/quiz/").unwrap();
        let url = client.endpoint(&["categories"]).unwrap();
        assert_eq!(url.as_str(), "http://host/quiz/api/categories");
    }

    #[test]
    fn expired_credential_is_refused_before_sending() {
        let now = Utc::now();
        let credential = AdminCredential::new("tok", now - Duration::seconds(1));
        assert!(credential.is_expired_at(now));
        assert!(matches!(
            credential.token_at(now),
            Err(StoreError::Unauthorized(_))
        ));
    }

    #[test]
    fn login_lifetime_sets_expiry() {
        let issued = Utc::now();
        let credential = AdminCredential::from_login(
            LoginResponse {
                token: "tok".into(),
                token_type: "Bearer".into(),
                expires_in: 3600,
            },
            issued,
        );
        assert_eq!(credential.expires_at(), issued + Duration::seconds(3600));
        assert_eq!(credential.token_at(issued).unwrap(), "tok");
    }

    #[test]
    fn statuses_map_to_taxonomy() {
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN, "no".into()),
            StoreError::Unauthorized("no".into())
        );
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND, "gone".into()),
            StoreError::NotFound("gone".into())
        );
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "down".into()),
            StoreError::Transient(_)
        ));
    }
}
