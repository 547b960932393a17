// src/models/question.rs

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::{Validate, ValidationError};

static CATEGORY_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]{0,49}$").expect("category pattern is valid"));

/// Represents the 'questions' table in the database.
///
/// A question is identified by `(category, id)`; ids are only unique inside
/// their category.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: String,

    /// Category (quiz) the question belongs to, e.g. "java".
    pub category: String,

    /// The prompt shown to the candidate.
    pub text: String,

    /// Option key -> option text. Keys are conventionally `a`..`d`.
    /// Stored as a JSON object; `BTreeMap` keeps the keys ordered.
    pub options: Json<BTreeMap<String, String>>,

    /// Key of the correct option.
    pub answer: String,
}

impl Question {
    pub fn is_correct(&self, option_key: &str) -> bool {
        self.answer == option_key
    }

    pub fn has_option(&self, option_key: &str) -> bool {
        self.options.contains_key(option_key)
    }
}

/// DTO for creating a new question.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_new_answer_key))]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[validate(custom(function = validate_category))]
    pub category: String,
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
    #[validate(custom(function = validate_options))]
    pub options: BTreeMap<String, String>,
    #[validate(length(min = 1, max = 16))]
    pub answer: String,
}

/// DTO for updating a question. Fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub text: Option<String>,
    #[validate(custom(function = validate_options))]
    pub options: Option<BTreeMap<String, String>>,
    #[validate(length(min = 1, max = 16))]
    pub answer: Option<String>,
}

impl UpdateQuestionRequest {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.options.is_none() && self.answer.is_none()
    }
}

/// Category names double as URL segments in share links, so they are kept to
/// lowercase slugs.
pub fn validate_category(category: &str) -> Result<(), ValidationError> {
    if !CATEGORY_SLUG.is_match(category) {
        return Err(ValidationError::new("invalid_category"));
    }
    Ok(())
}

fn validate_options(options: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    if options.len() < 2 || options.len() > 8 {
        return Err(ValidationError::new("option_count"));
    }
    for (key, text) in options {
        if key.is_empty() || key.len() > 16 {
            return Err(ValidationError::new("invalid_option_key"));
        }
        if text.is_empty() || text.len() > 500 {
            return Err(ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

fn validate_new_answer_key(req: &CreateQuestionRequest) -> Result<(), ValidationError> {
    if !req.options.contains_key(&req.answer) {
        return Err(ValidationError::new("answer_not_an_option"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> BTreeMap<String, String> {
        [("a", "JVM"), ("b", "CLR"), ("c", "V8"), ("d", "BEAM")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn request() -> CreateQuestionRequest {
        CreateQuestionRequest {
            id: "q1".into(),
            category: "java".into(),
            text: "Which runtime executes Java bytecode?".into(),
            options: options(),
            answer: "a".into(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn answer_must_be_an_offered_option() {
        let mut req = request();
        req.answer = "e".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn category_must_be_a_slug() {
        assert!(validate_category("java").is_ok());
        assert!(validate_category("full-stack_2").is_ok());
        assert!(validate_category("Java Basics").is_err());
        assert!(validate_category("").is_err());
    }

    #[test]
    fn single_option_is_rejected() {
        let mut req = request();
        req.options = [("a".to_string(), "only".to_string())].into_iter().collect();
        req.answer = "a".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn options_serialize_in_key_order() {
        let q = Question {
            id: "q1".into(),
            category: "java".into(),
            text: "t".into(),
            options: Json(options()),
            answer: "a".into(),
        };
        let json = serde_json::to_string(&q).unwrap();
        let a = json.find("\"a\"").unwrap();
        let d = json.find("\"d\"").unwrap();
        assert!(a < d);
        assert!(q.is_correct("a"));
        assert!(!q.is_correct("b"));
        assert!(q.has_option("d"));
    }
}
