use anyhow::anyhow;
use tracing::{info, warn};

use form_answer_types::{
    AnswerApi, AnswerId, AnswerValue, DraftStore, EngineError, Form, FormId, PersistedAnswer,
    QuestionId, SubmitPayload, codec,
};

/// Where a session stands with respect to its single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    /// The draft is editable and no write is pending.
    Editing,
    /// A write is awaiting the backend. Edits and further submits are refused.
    InFlight,
    /// The write succeeded. The session is terminal.
    Submitted,
    /// A write was abandoned without a response and may still have landed.
    /// Only [`AnswerSession::refresh`] leaves this state.
    Unknown,
}

/// One user answering one form.
///
/// Owns the draft store for the form and enforces the answer lifecycle: at most
/// one submission in flight, and no edits once the answer has been committed.
/// Dropping the session discards the draft; nothing is saved until submit.
#[derive(Debug)]
pub struct AnswerSession {
    answer: PersistedAnswer,
    store: DraftStore,
    state: SubmitState,
}

impl AnswerSession {
    /// Fetch the form and the answer record concurrently and open a session.
    ///
    /// Fails with [`EngineError::AlreadyAnswered`] if the record is already
    /// committed; the caller should show it read-only instead.
    pub async fn load<A: AnswerApi>(
        api: &A,
        form: FormId,
        answer: AnswerId,
    ) -> Result<Self, EngineError> {
        let (form, answer) = tokio::join!(api.fetch_form_to_answer(form), api.fetch_answer(answer));
        let form = form.map_err(EngineError::api)?;
        let answer = answer.map_err(EngineError::api)?;
        Self::open(form, answer)
    }

    /// Open a session over already-fetched parts.
    pub fn open(form: Form, answer: PersistedAnswer) -> Result<Self, EngineError> {
        if answer.user_has_answered {
            info!(answer = %answer.id, "answer already submitted, refusing to edit");
            return Err(EngineError::AlreadyAnswered(answer.id));
        }
        if answer.form.id != form.id {
            return Err(EngineError::api(anyhow!(
                "answer {} belongs to form {}, not {}",
                answer.id,
                answer.form.id,
                form.id
            )));
        }

        info!(answer = %answer.id, form = %form.id, questions = form.len(), "answer session opened");
        Ok(Self {
            answer,
            store: DraftStore::new(form),
            state: SubmitState::Editing,
        })
    }

    pub fn form(&self) -> &Form {
        self.store.form()
    }

    /// The answer record, as last seen from the backend.
    pub fn answer(&self) -> &PersistedAnswer {
        &self.answer
    }

    pub fn store(&self) -> &DraftStore {
        &self.store
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Refuse anything but editing.
    fn ensure_editing(&self) -> Result<(), EngineError> {
        match self.state {
            SubmitState::Editing => Ok(()),
            SubmitState::InFlight => Err(EngineError::SubmitInFlight),
            SubmitState::Submitted => Err(EngineError::AlreadyAnswered(self.answer.id)),
            SubmitState::Unknown => Err(EngineError::SubmitOutcomeUnknown(self.answer.id)),
        }
    }

    fn store_mut(&mut self) -> Result<&mut DraftStore, EngineError> {
        self.ensure_editing()?;
        Ok(&mut self.store)
    }

    pub fn set(&mut self, id: QuestionId, value: impl Into<AnswerValue>) -> Result<(), EngineError> {
        Ok(self.store_mut()?.set(id, value)?)
    }

    pub fn toggle(&mut self, id: QuestionId, option: &str) -> Result<(), EngineError> {
        Ok(self.store_mut()?.toggle(id, option)?)
    }

    pub fn clear(&mut self, id: QuestionId) -> Result<(), EngineError> {
        self.store_mut()?.clear(id);
        Ok(())
    }

    /// The gate result for the current draft.
    pub fn is_ready(&self) -> bool {
        self.store.is_ready()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.state == SubmitState::Editing && self.store.is_ready()
    }

    pub fn missing(&self) -> Vec<QuestionId> {
        self.store.missing()
    }

    /// Validate and encode the draft, and mark the write as in flight.
    ///
    /// Nothing is sent; pass the payload to the backend and report the outcome
    /// with [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Result<SubmitPayload, EngineError> {
        self.ensure_editing()?;
        if !self.store.is_ready() {
            return Err(EngineError::IncompleteAnswer {
                missing: self.store.missing(),
            });
        }

        let encoded = codec::encode(self.store.form(), self.store.draft())?;
        self.state = SubmitState::InFlight;
        info!(answer = %self.answer.id, bytes = encoded.len(), "submitting answer");
        Ok(SubmitPayload::new(encoded))
    }

    /// Apply the backend's response to an in-flight write.
    ///
    /// On failure the draft is kept and editing resumes. On success the stored
    /// record replaces the local one and the draft is discarded.
    pub fn finish_submit(
        &mut self,
        result: Result<PersistedAnswer, anyhow::Error>,
    ) -> Result<&PersistedAnswer, EngineError> {
        match self.state {
            SubmitState::InFlight => {}
            SubmitState::Submitted => return Err(EngineError::AlreadyAnswered(self.answer.id)),
            SubmitState::Unknown => return Err(EngineError::SubmitOutcomeUnknown(self.answer.id)),
            SubmitState::Editing => {
                return Err(EngineError::SubmissionFailure(anyhow!(
                    "no submission in flight for answer {}",
                    self.answer.id
                )));
            }
        }

        let error = match result {
            Ok(record) if record.user_has_answered => {
                info!(answer = %record.id, "answer submitted");
                self.answer = record;
                self.store = DraftStore::new(self.store.form().clone());
                self.state = SubmitState::Submitted;
                return Ok(&self.answer);
            }
            Ok(record) => anyhow!("backend did not record answer {} as answered", record.id),
            Err(err) => err,
        };

        warn!(answer = %self.answer.id, error = %error, "submission failed, draft kept");
        self.state = SubmitState::Editing;
        Err(EngineError::SubmissionFailure(error))
    }

    /// Give up waiting for an in-flight write.
    ///
    /// The request may still reach the server, so the session refuses edits and
    /// submits until [`refresh`](Self::refresh) has seen the stored record.
    pub fn abandon_submit(&mut self) {
        if self.state == SubmitState::InFlight {
            warn!(answer = %self.answer.id, "in-flight submission abandoned, outcome unknown");
            self.state = SubmitState::Unknown;
        }
    }

    /// Settle an unknown outcome against the record as the backend now stores it.
    ///
    /// An answered record makes the session terminal; otherwise editing resumes
    /// with the draft intact.
    pub fn reconcile(&mut self, record: PersistedAnswer) -> Result<SubmitState, EngineError> {
        if self.state != SubmitState::Unknown {
            return Ok(self.state);
        }
        if record.id != self.answer.id {
            return Err(EngineError::api(anyhow!(
                "expected answer {}, got {}",
                self.answer.id,
                record.id
            )));
        }

        self.state = if record.user_has_answered {
            info!(answer = %record.id, "abandoned submission was stored");
            self.store = DraftStore::new(self.store.form().clone());
            SubmitState::Submitted
        } else {
            info!(answer = %record.id, "abandoned submission was not stored, editing resumes");
            SubmitState::Editing
        };
        self.answer = record;
        Ok(self.state)
    }

    /// Fetch the record again and [`reconcile`](Self::reconcile) with it.
    pub async fn refresh<A: AnswerApi>(&mut self, api: &A) -> Result<SubmitState, EngineError> {
        let record = api.fetch_answer(self.answer.id).await.map_err(EngineError::api)?;
        self.reconcile(record)
    }

    /// Validate, encode and commit the draft.
    pub async fn submit<A: AnswerApi>(&mut self, api: &A) -> Result<&PersistedAnswer, EngineError> {
        let payload = self.begin_submit()?;
        let result = api
            .submit_answer(self.answer.id, &payload)
            .await
            .map_err(Into::into);
        self.finish_submit(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_answer_types::{Question, User};

    fn form() -> Form {
        Form::new(
            1,
            "Session",
            vec![
                Question::long_text(1, "Why?"),
                Question::single_choice(2, "Pick", ["A", "B"]),
            ],
        )
    }

    fn session() -> AnswerSession {
        let answer = PersistedAnswer::unanswered(10, form(), User::new(1, "Ana"));
        AnswerSession::open(form(), answer).unwrap()
    }

    fn fill(session: &mut AnswerSession) {
        session.set(QuestionId(1), AnswerValue::text("yes")).unwrap();
        session.set(QuestionId(2), AnswerValue::choice("B")).unwrap();
    }

    #[test]
    fn incomplete_draft_is_refused_locally() {
        let mut session = session();
        session.set(QuestionId(1), AnswerValue::text("ok")).unwrap();

        assert!(!session.can_submit());
        assert!(matches!(
            session.begin_submit(),
            Err(EngineError::IncompleteAnswer { missing }) if missing == vec![QuestionId(1), QuestionId(2)]
        ));
        assert_eq!(session.state(), SubmitState::Editing);
    }

    #[test]
    fn in_flight_blocks_edits_and_second_submit() {
        let mut session = session();
        fill(&mut session);
        let payload = session.begin_submit().unwrap();
        assert_eq!(payload.user_answers, r#"{"1":"yes","2":"B"}"#);
        assert!(payload.user_has_answered);

        assert!(!session.can_submit());
        assert!(matches!(session.begin_submit(), Err(EngineError::SubmitInFlight)));
        assert!(matches!(
            session.set(QuestionId(1), AnswerValue::text("changed")),
            Err(EngineError::SubmitInFlight)
        ));
    }

    #[test]
    fn failure_keeps_the_draft() {
        let mut session = session();
        fill(&mut session);
        session.begin_submit().unwrap();

        let err = session.finish_submit(Err(anyhow!("503"))).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(session.state(), SubmitState::Editing);
        assert_eq!(session.store().draft().len(), 2);
        assert!(session.can_submit());
    }

    #[test]
    fn unanswered_response_counts_as_failure() {
        let mut session = session();
        fill(&mut session);
        session.begin_submit().unwrap();

        let echoed = session.answer().clone();
        assert!(matches!(
            session.finish_submit(Ok(echoed)),
            Err(EngineError::SubmissionFailure(_))
        ));
        assert!(session.can_submit());
    }

    #[test]
    fn success_is_terminal() {
        let mut session = session();
        fill(&mut session);
        let payload = session.begin_submit().unwrap();

        let stored = session.answer().clone().answered_with(payload.user_answers);
        session.finish_submit(Ok(stored)).unwrap();

        assert_eq!(session.state(), SubmitState::Submitted);
        assert!(session.answer().user_has_answered);
        assert!(session.store().draft().is_empty());
        assert!(matches!(
            session.begin_submit(),
            Err(EngineError::AlreadyAnswered(AnswerId(10)))
        ));
        assert!(session.set(QuestionId(1), AnswerValue::text("again")).is_err());
    }

    #[test]
    fn abandoned_submit_cannot_be_started_again() {
        let mut session = session();
        fill(&mut session);
        session.begin_submit().unwrap();
        session.abandon_submit();

        assert_eq!(session.state(), SubmitState::Unknown);
        assert!(!session.can_submit());
        assert!(matches!(
            session.begin_submit(),
            Err(EngineError::SubmitOutcomeUnknown(AnswerId(10)))
        ));
        assert!(matches!(
            session.set(QuestionId(1), AnswerValue::text("again")),
            Err(EngineError::SubmitOutcomeUnknown(_))
        ));
        assert!(session.finish_submit(Err(anyhow!("late"))).is_err());
    }

    #[test]
    fn reconcile_with_stored_record_is_terminal() {
        let mut session = session();
        fill(&mut session);
        let payload = session.begin_submit().unwrap();
        session.abandon_submit();

        let stored = session.answer().clone().answered_with(payload.user_answers);
        assert_eq!(session.reconcile(stored).unwrap(), SubmitState::Submitted);
        assert!(session.answer().user_has_answered);
        assert!(matches!(session.begin_submit(), Err(EngineError::AlreadyAnswered(_))));
    }

    #[test]
    fn reconcile_with_unanswered_record_resumes_editing() {
        let mut session = session();
        fill(&mut session);
        session.begin_submit().unwrap();
        session.abandon_submit();

        let unchanged = session.answer().clone();
        assert_eq!(session.reconcile(unchanged).unwrap(), SubmitState::Editing);
        assert_eq!(session.store().draft().len(), 2);
        assert!(session.can_submit());
    }

    #[test]
    fn answered_record_cannot_be_opened() {
        let answer = PersistedAnswer::unanswered(10, form(), User::new(1, "Ana"))
            .answered_with(r#"{"1":"yes","2":"B"}"#);
        assert!(matches!(
            AnswerSession::open(form(), answer),
            Err(EngineError::AlreadyAnswered(AnswerId(10)))
        ));
    }
}
