// src/session/mod.rs

//! A candidate's in-progress attempt at one quiz.
//!
//! A session is built from the questions of a category, tracks the cursor and
//! the (at most one) answer per question, and turns into a [`QuizResult`] on
//! submission. Submission is two-phase: [`QuizSession::request_submit`] checks
//! the candidate identity and arms confirmation, [`QuizSession::submit`] sends
//! the result.

pub mod scoring;
pub mod store;

use std::{collections::HashMap, fmt};

use crate::models::{
    question::Question,
    result::{Answer, QuizResult},
};

pub use scoring::{Candidate, Review, ScoreSummary, build_result, review, summarize};
pub use store::{QuestionStore, ResultStore, StoreError, categories_or_empty};

/// Per-question status shown in the navigator. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerState {
    Unanswered,
    Correct,
    Wrong,
    /// No answer and the cursor has moved past the question.
    Skipped,
}

/// Lifecycle of a constructed session. Loading happens inside
/// [`QuizSession::open`], so a session value starts out `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Ready,
    Submitting,
    Completed,
    /// Last submission failed; the session is still usable and `submit` can
    /// be called again.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The category has no questions.
    NotFound(String),
    /// Candidate identity is incomplete.
    Validation(String),
    /// `submit` was called without a prior `request_submit`.
    ConfirmationRequired,
    /// The session is submitting or already completed.
    Closed,
    Store(StoreError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotFound(category) => write!(f, "quiz '{}' not found", category),
            SessionError::Validation(msg) => write!(f, "{}", msg),
            SessionError::ConfirmationRequired => write!(f, "submission was not confirmed"),
            SessionError::Closed => write!(f, "session no longer accepts changes"),
            SessionError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        SessionError::Store(err)
    }
}

/// Display title for a category, e.g. `java` -> `Java Developer Test`.
pub fn quiz_title(category: &str) -> String {
    let mut chars = category.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{} Developer Test", capitalized)
}

/// Pure classification of one question given its answer, its position and
/// the cursor.
pub fn classify_answer(answer: Option<&Answer>, index: usize, cursor: usize) -> AnswerState {
    match answer {
        Some(a) if a.is_correct => AnswerState::Correct,
        Some(_) => AnswerState::Wrong,
        None if index < cursor => AnswerState::Skipped,
        None => AnswerState::Unanswered,
    }
}

/// Running counts of a session; they always add up to the question count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub score: usize,
    pub incorrect: usize,
    pub skipped: usize,
}

/// Holds a session in `Submitting` while the result is in flight. If the
/// submission is dropped before it settles, the session falls back to
/// `Failed` so it can be retried.
struct SubmitGuard<'a> {
    status: &'a mut SessionStatus,
}

impl<'a> SubmitGuard<'a> {
    fn begin(status: &'a mut SessionStatus) -> Self {
        *status = SessionStatus::Submitting;
        Self { status }
    }

    fn settle(&mut self, status: SessionStatus) {
        *self.status = status;
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if *self.status == SessionStatus::Submitting {
            *self.status = SessionStatus::Failed;
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    category: String,
    title: String,
    questions: Vec<Question>,
    cursor: usize,
    /// Exactly one entry per question; `None` until the question is answered.
    answers: HashMap<String, Option<Answer>>,
    candidate: Candidate,
    status: SessionStatus,
    confirmation_pending: bool,
}

impl QuizSession {
    /// Fetches the category's questions and starts a session.
    ///
    /// A category without questions is `NotFound`; no session is built and
    /// the caller should send the candidate back to the dashboard.
    pub async fn open<S>(store: &S, category: &str) -> Result<Self, SessionError>
    where
        S: QuestionStore + ?Sized,
    {
        let questions = store.questions(category).await.map_err(|e| match e {
            StoreError::NotFound(_) => SessionError::NotFound(category.to_string()),
            other => SessionError::Store(other),
        })?;

        let session = Self::new(category, questions)?;
        tracing::debug!(
            "Opened session for '{}' with {} questions",
            category,
            session.questions.len()
        );
        Ok(session)
    }

    pub fn new(category: &str, questions: Vec<Question>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NotFound(category.to_string()));
        }

        let answers = questions.iter().map(|q| (q.id.clone(), None)).collect();

        Ok(Self {
            category: category.to_string(),
            title: quiz_title(category),
            questions,
            cursor: 0,
            answers,
            candidate: Candidate::default(),
            status: SessionStatus::Ready,
            confirmation_pending: false,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.cursor]
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn is_confirmation_pending(&self) -> bool {
        self.confirmation_pending
    }

    pub fn answer(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id).and_then(Option::as_ref)
    }

    fn is_interactive(&self) -> bool {
        matches!(self.status, SessionStatus::Ready | SessionStatus::Failed)
    }

    /// Records the candidate's choice for a question.
    ///
    /// The first selection is final: later selections for the same question
    /// are ignored, as are unknown questions and keys the question does not
    /// offer. Returns whether an answer was recorded.
    pub fn select_option(&mut self, question_id: &str, option_key: &str) -> bool {
        if !self.is_interactive() {
            return false;
        }

        let Some(question) = self.questions.iter().find(|q| q.id == question_id) else {
            return false;
        };
        if !question.has_option(option_key) {
            return false;
        }

        let is_correct = question.is_correct(option_key);
        match self.answers.get_mut(question_id) {
            Some(slot) if slot.is_none() => {
                *slot = Some(Answer {
                    question_id: question_id.to_string(),
                    selected_option: option_key.to_string(),
                    is_correct,
                });
                true
            }
            _ => false,
        }
    }

    /// Answers the question under the cursor.
    pub fn select_current(&mut self, option_key: &str) -> bool {
        let question_id = self.current_question().id.clone();
        self.select_option(&question_id, option_key)
    }

    pub fn advance(&mut self) -> usize {
        self.jump_to(self.cursor.saturating_add(1))
    }

    pub fn retreat(&mut self) -> usize {
        self.jump_to(self.cursor.saturating_sub(1))
    }

    /// Moves the cursor, clamped to the question range. Unanswered questions
    /// may be left behind.
    pub fn jump_to(&mut self, index: usize) -> usize {
        if self.is_interactive() {
            self.cursor = index.min(self.questions.len() - 1);
        }
        self.cursor
    }

    pub fn is_last_question(&self) -> bool {
        self.cursor + 1 == self.questions.len()
    }

    /// Status of a question as if the cursor were at `cursor`.
    /// `None` for ids that are not part of this quiz.
    pub fn classify(&self, question_id: &str, cursor: usize) -> Option<AnswerState> {
        let index = self.questions.iter().position(|q| q.id == question_id)?;
        Some(classify_answer(self.answer(question_id), index, cursor))
    }

    /// Status of every question at the current cursor, in quiz order.
    pub fn navigator(&self) -> Vec<AnswerState> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, q)| classify_answer(self.answer(&q.id), index, self.cursor))
            .collect()
    }

    /// Recorded answers in quiz order; unanswered questions are left out.
    pub fn recorded_answers(&self) -> Vec<Answer> {
        self.questions
            .iter()
            .filter_map(|q| self.answer(&q.id).cloned())
            .collect()
    }

    /// Current tally, e.g. for a progress display.
    pub fn summary(&self) -> Tally {
        let answers = self.recorded_answers();
        let summary = summarize(&answers, self.questions.len());
        Tally {
            score: summary.score,
            incorrect: summary.incorrect,
            skipped: summary.skipped,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        if self.is_interactive() {
            self.candidate.name = name.into();
        }
    }

    pub fn set_roll_number(&mut self, roll_number: impl Into<String>) {
        if self.is_interactive() {
            self.candidate.roll_number = roll_number.into();
        }
    }

    /// First submission phase: checks the identity fields and asks for
    /// confirmation.
    pub fn request_submit(&mut self) -> Result<(), SessionError> {
        if !self.is_interactive() {
            return Err(SessionError::Closed);
        }
        if !self.candidate.is_complete() {
            return Err(SessionError::Validation(
                "Please fill in your name and roll number before submitting.".to_string(),
            ));
        }
        self.confirmation_pending = true;
        Ok(())
    }

    pub fn cancel_submit(&mut self) {
        if self.is_interactive() {
            self.confirmation_pending = false;
        }
    }

    /// Second submission phase, stamped with the current time.
    pub async fn submit<S>(&mut self, store: &S) -> Result<QuizResult, SessionError>
    where
        S: ResultStore + ?Sized,
    {
        self.submit_at(store, chrono::Utc::now().timestamp_millis())
            .await
    }

    /// Scores the attempt and sends it to `store`.
    ///
    /// On failure the session moves to `Failed` with confirmation still armed,
    /// so calling `submit` again retries. On success it is `Completed` and
    /// accepts no further changes.
    pub async fn submit_at<S>(&mut self, store: &S, timestamp: i64) -> Result<QuizResult, SessionError>
    where
        S: ResultStore + ?Sized,
    {
        if !self.is_interactive() {
            return Err(SessionError::Closed);
        }
        if !self.confirmation_pending {
            return Err(SessionError::ConfirmationRequired);
        }
        if !self.candidate.is_complete() {
            self.confirmation_pending = false;
            return Err(SessionError::Validation(
                "Please fill in your name and roll number before submitting.".to_string(),
            ));
        }

        let result = build_result(
            &self.candidate,
            &self.title,
            &self.category,
            self.recorded_answers(),
            self.questions.len(),
            timestamp,
        );

        let mut guard = SubmitGuard::begin(&mut self.status);
        match store.save_result(&result).await {
            Ok(()) => {
                guard.settle(SessionStatus::Completed);
                self.confirmation_pending = false;
                tracing::info!(
                    "Submitted '{}' for {}: {}/{}",
                    self.title,
                    result.roll_number,
                    result.score,
                    result.total_questions
                );
                Ok(result)
            }
            Err(e) => {
                guard.settle(SessionStatus::Failed);
                tracing::warn!("Failed to submit '{}': {}", self.title, e);
                Err(SessionError::Store(e))
            }
        }
    }
}
