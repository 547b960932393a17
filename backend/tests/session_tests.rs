// tests/session_tests.rs

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use quiz_server::{
    models::{question::Question, result::QuizResult},
    session::{
        AnswerState, QuestionStore, QuizSession, ResultStore, SessionError, SessionStatus,
        StoreError, Tally, categories_or_empty, summarize,
    },
};
use sqlx::types::Json;

/// In-memory question bank and result table.
#[derive(Default)]
struct MemoryStore {
    questions: HashMap<String, Vec<Question>>,
    results: Mutex<Vec<QuizResult>>,
    offline: bool,
}

impl MemoryStore {
    fn with_quiz(category: &str, answers: &[&str]) -> Self {
        let questions = answers
            .iter()
            .enumerate()
            .map(|(i, answer)| question(category, &format!("q{}", i + 1), answer))
            .collect();
        let mut store = Self::default();
        store.questions.insert(category.to_string(), questions);
        store
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn categories(&self) -> Result<Vec<String>, StoreError> {
        if self.offline {
            return Err(StoreError::Transient("offline".into()));
        }
        let mut categories: Vec<String> = self.questions.keys().cloned().collect();
        categories.sort();
        Ok(categories)
    }

    async fn questions(&self, category: &str) -> Result<Vec<Question>, StoreError> {
        if self.offline {
            return Err(StoreError::Transient("offline".into()));
        }
        Ok(self.questions.get(category).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn save_result(&self, result: &QuizResult) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Transient("offline".into()));
        }
        self.results.lock().unwrap().push(result.clone());
        Ok(())
    }
}

fn question(category: &str, id: &str, answer: &str) -> Question {
    let options: BTreeMap<String, String> = [("a", "one"), ("b", "two"), ("c", "three"), ("d", "four")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Question {
        id: id.to_string(),
        category: category.to_string(),
        text: format!("Pick the answer to {}", id),
        options: Json(options),
        answer: answer.to_string(),
    }
}

#[tokio::test]
async fn unknown_category_creates_no_session() {
    let store = MemoryStore::with_quiz("java", &["a"]);
    let err = QuizSession::open(&store, "cobol").await.unwrap_err();
    assert_eq!(err, SessionError::NotFound("cobol".into()));
}

#[tokio::test]
async fn fetch_failure_is_a_store_error() {
    let store = MemoryStore {
        offline: true,
        ..MemoryStore::default()
    };
    let err = QuizSession::open(&store, "java").await.unwrap_err();
    assert!(matches!(err, SessionError::Store(StoreError::Transient(_))));
}

#[tokio::test]
async fn dashboard_categories_fall_back_to_empty() {
    let offline = MemoryStore {
        offline: true,
        ..MemoryStore::default()
    };
    assert!(categories_or_empty(&offline).await.is_empty());

    let mut online = MemoryStore::with_quiz("python", &["a"]);
    online
        .questions
        .insert("java".into(), vec![question("java", "q1", "b")]);
    assert_eq!(categories_or_empty(&online).await, vec!["java", "python"]);
}

#[tokio::test]
async fn scenario_correct_skipped_wrong() {
    let store = MemoryStore::with_quiz("java", &["a", "b", "c"]);
    let mut session = QuizSession::open(&store, "java").await.unwrap();

    session.select_option("q1", "a");
    session.advance();
    session.advance();
    session.select_option("q3", "d");

    assert_eq!(session.classify("q1", session.cursor()), Some(AnswerState::Correct));
    assert_eq!(session.classify("q2", session.cursor()), Some(AnswerState::Skipped));
    assert_eq!(session.classify("q3", session.cursor()), Some(AnswerState::Wrong));

    session.set_name("Grace");
    session.set_roll_number("R-9");
    session.request_submit().unwrap();
    let result = session.submit_at(&store, 1_700_000_000_000).await.unwrap();

    assert_eq!(result.score, 1);
    assert_eq!(result.total_questions, 3);
    assert_eq!(result.answers.len(), 2);

    let summary = summarize(&result.answers, result.total_questions as usize);
    assert_eq!(
        summary.score + summary.incorrect + summary.skipped,
        result.total_questions as usize
    );

    let saved = store.results.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0], result);
}

#[tokio::test]
async fn selecting_twice_keeps_first_answer_for_every_question() {
    let store = MemoryStore::with_quiz("java", &["a", "b", "c", "d"]);
    let mut session = QuizSession::open(&store, "java").await.unwrap();

    for q in session.questions().to_vec() {
        assert!(session.select_option(&q.id, "b"));
        assert!(!session.select_option(&q.id, "c"));
        assert_eq!(session.answer(&q.id).unwrap().selected_option, "b");
    }
    assert_eq!(
        session.summary(),
        Tally {
            score: 1,
            incorrect: 3,
            skipped: 0
        }
    );
}

#[tokio::test]
async fn unanswered_quiz_submits_with_everything_skipped() {
    let store = MemoryStore::with_quiz("java", &["a", "b"]);
    let mut session = QuizSession::open(&store, "java").await.unwrap();
    session.set_name("Grace");
    session.set_roll_number("R-9");
    session.request_submit().unwrap();

    let result = session.submit(&store).await.unwrap();
    assert_eq!(result.score, 0);
    assert!(result.answers.is_empty());
    assert_eq!(summarize(&result.answers, 2).skipped, 2);
    assert_eq!(session.status(), SessionStatus::Completed);
}
