use std::future::Future;

use crate::{AnswerId, Form, FormId, PersistedAnswer, SubmitPayload};

/// Trait for the persistence collaborator that stores forms and answers.
///
/// Implementations decide the transport (HTTP, in-memory, ...). The engine only
/// awaits these calls; timeouts and retries on transport errors are the
/// implementation's concern.
pub trait AnswerApi {
    /// The error type for this collaborator.
    type Error: Into<anyhow::Error>;

    /// Fetch the definition of a form, with its questions in display order.
    fn fetch_form_to_answer(
        &self,
        form: FormId,
    ) -> impl Future<Output = Result<Form, Self::Error>> + Send;

    /// Fetch one answer record.
    fn fetch_answer(
        &self,
        answer: AnswerId,
    ) -> impl Future<Output = Result<PersistedAnswer, Self::Error>> + Send;

    /// Commit an encoded answer set. This is the only write the engine performs.
    ///
    /// # Returns
    /// * `Ok(record)` with the record as stored after the write
    /// * `Err` on transport failure or when the server reports an error payload
    fn submit_answer(
        &self,
        answer: AnswerId,
        payload: &SubmitPayload,
    ) -> impl Future<Output = Result<PersistedAnswer, Self::Error>> + Send;
}
