//! # form-answer
//!
//! Answer dynamic forms. Presentation-agnostic.
//!
//! A form is an ordered list of questions of three kinds (long text, multiple
//! choice, single choice). This crate drives the single transition a persisted
//! answer goes through: load (unanswered) → edit → validate → encode → submit
//! (answered, terminal). Committed answers can then be replayed read-only, alone
//! or two side by side.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use form_answer::{AnswerSession, AnswerValue, QuestionId};
//!
//! let mut session = AnswerSession::load(&api, form_id, answer_id).await?;
//! session.set(QuestionId(1), AnswerValue::text("yes"))?;
//! session.set(QuestionId(2), AnswerValue::choice("B"))?;
//!
//! if session.can_submit() {
//!     session.submit(&api).await?;
//! }
//! ```
//!
//! ## Persistence
//!
//! Collaborators implement `AnswerApi`:
//! - `MemoryApi` (this crate) - In-memory store for tests and demos
//! - `form-answer-http` - The REST backend over reqwest
//!
//! ## Presentation
//!
//! - `form-answer-ratatui` - Terminal editor and comparison screen

// Re-export all types from form-answer-types
pub use form_answer_types::*;

mod session;
pub use session::{AnswerSession, SubmitState};

// In-memory persistence for tests and demos
mod memory_api;
pub use memory_api::{MemoryApi, MemoryApiError};
