use crate::{AnswerId, CodecError, QuestionId};

/// Error type for the answer lifecycle (load, submit, replay).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The draft does not satisfy the validation gate. Never sent to the backend.
    #[error("Answer is incomplete: {} question(s) unanswered", missing.len())]
    IncompleteAnswer { missing: Vec<QuestionId> },

    /// A committed `userAnswers` payload did not decode cleanly.
    #[error("Stored answers of answer {answer} are malformed ({issues} entries dropped)")]
    MalformedPersistedAnswer { answer: AnswerId, issues: usize },

    /// The write call failed or the server answered with an error payload.
    /// The draft is kept so the user can retry.
    #[error("Submission failed: {0}")]
    SubmissionFailure(anyhow::Error),

    /// The answer already left the unanswered state and cannot be edited again.
    #[error("Answer {0} has already been submitted")]
    AlreadyAnswered(AnswerId),

    /// A submission for this answer is still awaiting the backend.
    #[error("A submission is already in flight")]
    SubmitInFlight,

    /// A submission was abandoned before the backend answered. The record must
    /// be fetched again before anything else is sent.
    #[error("Outcome of the submission for answer {0} is unknown")]
    SubmitOutcomeUnknown(AnswerId),

    /// An edit was rejected by the draft store.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// Encoding the draft failed.
    #[error("Encoding failed: {0}")]
    Codec(#[from] CodecError),

    /// The persistence collaborator failed (fetch errors, transport, etc.)
    #[error("Persistence error: {0}")]
    Api(#[from] anyhow::Error),
}

impl EngineError {
    /// Create a persistence error from any error type.
    pub fn api(err: impl Into<anyhow::Error>) -> Self {
        Self::Api(err.into())
    }

    /// Check whether the user can retry the action that produced this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SubmissionFailure(_))
    }
}

/// Error type for draft mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Question {0} is not part of the loaded form")]
    UnknownQuestion(QuestionId),

    #[error("Question {question} expects a {expected} answer, got {actual}")]
    KindMismatch {
        question: QuestionId,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("'{option}' is not an alternative of question {question}")]
    UnknownAlternative { question: QuestionId, option: String },
}
