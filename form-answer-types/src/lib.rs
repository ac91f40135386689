//! Core types for the form-answer engine.
//!
//! This crate provides everything that does not depend on a presentation layer
//! or a transport:
//! - `Form`, `Question` and `QuestionKind` - The question model
//! - `Draft` and `DraftStore` - The in-progress answer set and its guarded store
//! - `validation` - The gate deciding whether a draft may be submitted
//! - `codec` - Conversion between drafts and the persisted `userAnswers` string
//! - `PersistedAnswer`, `Replay` and `ComparisonSelector` - Redisplay of committed answers
//! - `AnswerApi` trait - For implementing persistence collaborators

mod answer_value;
pub use answer_value::AnswerValue;

mod question;
pub use question::{MAX_ALTERNATIVES, MIN_LONG_TEXT_CHARS, Question, QuestionId, QuestionKind};

mod form;
pub use form::{Form, FormId, Team, question_label};

mod draft;
pub use draft::Draft;

mod store;
pub use store::DraftStore;

pub mod validation;

pub mod codec;
pub use codec::{CodecError, DecodeIssue, Decoded};

mod persisted;
pub use persisted::{AnswerId, PersistedAnswer, SubmitPayload, User};

mod replay;
pub use replay::{Replay, ReplayItem};

mod comparison;
pub use comparison::{
    AlignedRow, ComparisonSelector, ComparisonView, MAX_COMPARED, SelectOutcome, align,
};

mod error;
pub use error::{DraftError, EngineError};

mod traits;
pub use traits::AnswerApi;
