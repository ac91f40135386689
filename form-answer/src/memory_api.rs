//! In-memory persistence for running forms without a server.
//!
//! `MemoryApi` holds forms and answer records in memory and applies the same
//! rules the real backend does: an answer can be submitted once. Submissions can
//! be made to fail on demand, which lets tests exercise the retry path.
//!
//! # Example
//!
//! ```rust,ignore
//! use form_answer::{AnswerSession, MemoryApi};
//!
//! let api = MemoryApi::new().with_answer(answer);
//! let mut session = AnswerSession::load(&api, form_id, answer_id).await?;
//! // ... fill the draft ...
//! api.fail_next_submit("gateway timeout");
//! assert!(session.submit(&api).await.is_err());
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use form_answer_types::{AnswerApi, AnswerId, Form, FormId, PersistedAnswer, SubmitPayload};

/// An answer store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryApi {
    state: Mutex<State>,
    latency: Option<Duration>,
}

#[derive(Debug, Default)]
struct State {
    forms: HashMap<FormId, Form>,
    answers: HashMap<AnswerId, PersistedAnswer>,
    fail_next_submit: Option<String>,
    submits: usize,
}

/// Error type for MemoryApi.
#[derive(Debug, thiserror::Error)]
pub enum MemoryApiError {
    #[error("Form {0} not found")]
    FormNotFound(FormId),

    #[error("Answer {0} not found")]
    AnswerNotFound(AnswerId),

    #[error("Answer {0} was already submitted")]
    AlreadyAnswered(AnswerId),

    #[error("Submission rejected: {0}")]
    Rejected(String),
}

impl MemoryApi {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a form.
    pub fn with_form(self, form: Form) -> Self {
        self.lock().forms.insert(form.id, form);
        self
    }

    /// Add an answer record. Its form is added too unless already present.
    pub fn with_answer(self, answer: PersistedAnswer) -> Self {
        {
            let mut state = self.lock();
            state
                .forms
                .entry(answer.form.id)
                .or_insert_with(|| answer.form.clone());
            state.answers.insert(answer.id, answer);
        }
        self
    }

    /// Delay every call, to make in-flight states observable.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next submission fail with `message`. The record is left untouched.
    pub fn fail_next_submit(&self, message: impl Into<String>) {
        self.lock().fail_next_submit = Some(message.into());
    }

    /// Get the current state of an answer record.
    pub fn answer(&self, id: AnswerId) -> Option<PersistedAnswer> {
        self.lock().answers.get(&id).cloned()
    }

    /// All answer records, ordered by id.
    pub fn answers(&self) -> Vec<PersistedAnswer> {
        let mut answers: Vec<_> = self.lock().answers.values().cloned().collect();
        answers.sort_by_key(|a| a.id);
        answers
    }

    /// Number of submissions that reached the store, failed ones included.
    pub fn submit_count(&self) -> usize {
        self.lock().submits
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl AnswerApi for MemoryApi {
    type Error = MemoryApiError;

    async fn fetch_form_to_answer(&self, form: FormId) -> Result<Form, Self::Error> {
        self.delay().await;
        self.lock()
            .forms
            .get(&form)
            .cloned()
            .ok_or(MemoryApiError::FormNotFound(form))
    }

    async fn fetch_answer(&self, answer: AnswerId) -> Result<PersistedAnswer, Self::Error> {
        self.delay().await;
        self.lock()
            .answers
            .get(&answer)
            .cloned()
            .ok_or(MemoryApiError::AnswerNotFound(answer))
    }

    async fn submit_answer(
        &self,
        answer: AnswerId,
        payload: &SubmitPayload,
    ) -> Result<PersistedAnswer, Self::Error> {
        self.delay().await;
        let mut state = self.lock();
        state.submits += 1;

        if let Some(message) = state.fail_next_submit.take() {
            debug!(%answer, %message, "injected submission failure");
            return Err(MemoryApiError::Rejected(message));
        }

        let record = state
            .answers
            .get_mut(&answer)
            .ok_or(MemoryApiError::AnswerNotFound(answer))?;
        if record.user_has_answered {
            return Err(MemoryApiError::AlreadyAnswered(answer));
        }

        record.user_answers = Some(payload.user_answers.clone());
        record.user_has_answered = payload.user_has_answered;
        record.updated_at = Some(Utc::now());
        debug!(%answer, "answer stored");
        Ok(record.clone())
    }
}
