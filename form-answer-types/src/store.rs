use tracing::debug;

use crate::{AnswerValue, Draft, DraftError, Form, QuestionId, QuestionKind, validation};

/// The answer draft store: one form plus the user's current responses to it.
///
/// Every mutation goes through the store so that two guarantees hold:
/// - the draft never holds an entry for a question outside the loaded form;
/// - the validation gate is re-evaluated after every change, so
///   [`is_ready`](Self::is_ready) always reflects the current draft.
///
/// A store is created when a form is loaded and dropped on navigation or after
/// a successful submit.
#[derive(Debug, Clone)]
pub struct DraftStore {
    form: Form,
    draft: Draft,
    ready: bool,
}

impl DraftStore {
    /// Create an empty store for a freshly loaded form.
    pub fn new(form: Form) -> Self {
        Self::with_draft(form, Draft::new())
    }

    /// Create a store seeded with an existing draft.
    ///
    /// Entries for questions outside `form` are discarded.
    pub fn with_draft(form: Form, mut draft: Draft) -> Self {
        let stale = draft.retain_form(&form);
        if !stale.is_empty() {
            debug!(form = %form.id, ?stale, "discarded draft entries for unknown questions");
        }
        let ready = validation::is_complete(&form, &draft);
        Self { form, draft, ready }
    }

    /// Get the loaded form.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Get the current draft.
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Consume the store, returning the draft.
    pub fn into_draft(self) -> Draft {
        self.draft
    }

    /// Get the current value for a question, if answered.
    pub fn get(&self, id: QuestionId) -> Option<&AnswerValue> {
        self.draft.get(id)
    }

    /// Replace the value for a question. No merging takes place.
    pub fn set(
        &mut self,
        id: QuestionId,
        value: impl Into<AnswerValue>,
    ) -> Result<(), DraftError> {
        let value = value.into();
        let kind = self.kind_of(id)?;
        if !kind.matches_shape(&value) {
            return Err(DraftError::KindMismatch {
                question: id,
                expected: kind.value_type_name(),
                actual: value.type_name(),
            });
        }

        debug!(question = %id, value = ?value, "draft set");
        self.draft.insert(id, value);
        self.reevaluate();
        Ok(())
    }

    /// Flip one alternative of a multiple-choice question.
    ///
    /// Adds `option` if absent and removes it if present. Removing the last
    /// selection removes the entry. Does nothing for other question kinds.
    pub fn toggle(&mut self, id: QuestionId, option: &str) -> Result<(), DraftError> {
        let kind = self.kind_of(id)?;
        let QuestionKind::MultipleChoice { alternatives } = kind else {
            return Ok(());
        };
        if !alternatives.iter().any(|a| a == option) {
            return Err(DraftError::UnknownAlternative {
                question: id,
                option: option.to_string(),
            });
        }

        let mut selected = match self.draft.remove(id) {
            Some(AnswerValue::Choices(set)) => set,
            _ => Default::default(),
        };
        if !selected.remove(option) {
            selected.insert(option.to_string());
        }
        debug!(question = %id, option, selected = selected.len(), "draft toggle");
        if !selected.is_empty() {
            self.draft.insert(id, AnswerValue::Choices(selected));
        }
        self.reevaluate();
        Ok(())
    }

    /// Remove the value for a question, marking it unanswered.
    pub fn clear(&mut self, id: QuestionId) -> Option<AnswerValue> {
        let removed = self.draft.remove(id);
        if removed.is_some() {
            self.reevaluate();
        }
        removed
    }

    /// Switch to another form. All entries of the previous form are dropped.
    pub fn load_form(&mut self, form: Form) {
        debug!(previous = %self.form.id, next = %form.id, "draft store switched form");
        self.form = form;
        self.draft = Draft::new();
        self.reevaluate();
    }

    /// Result of the validation gate for the current draft.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Questions still blocking submission, in form order.
    pub fn missing(&self) -> Vec<QuestionId> {
        validation::missing(&self.form, &self.draft)
    }

    fn kind_of(&self, id: QuestionId) -> Result<&QuestionKind, DraftError> {
        self.form
            .question(id)
            .map(|q| &q.kind)
            .ok_or(DraftError::UnknownQuestion(id))
    }

    fn reevaluate(&mut self) {
        let ready = validation::is_complete(&self.form, &self.draft);
        if ready != self.ready {
            debug!(form = %self.form.id, ready, "validation gate changed");
        }
        self.ready = ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Question;

    fn form() -> Form {
        Form::new(
            1,
            "Store",
            vec![
                Question::long_text(1, "Why?"),
                Question::single_choice(2, "Pick", ["A", "B"]),
                Question::multiple_choice(3, "Tick", ["X", "Y"]),
            ],
        )
    }

    #[test]
    fn gate_follows_every_mutation() {
        let mut store = DraftStore::new(form());
        assert!(!store.is_ready());

        store.set(QuestionId(1), AnswerValue::text("yes")).unwrap();
        store.set(QuestionId(2), AnswerValue::choice("B")).unwrap();
        assert!(!store.is_ready());

        store.toggle(QuestionId(3), "Y").unwrap();
        assert!(store.is_ready());

        store.toggle(QuestionId(3), "Y").unwrap();
        assert!(!store.is_ready());
        assert_eq!(store.get(QuestionId(3)), None);

        store.toggle(QuestionId(3), "X").unwrap();
        assert!(store.is_ready());
        store.set(QuestionId(1), AnswerValue::text("no")).unwrap();
        assert!(!store.is_ready());
    }

    #[test]
    fn set_replaces_without_merge() {
        let mut store = DraftStore::new(form());
        store.toggle(QuestionId(3), "X").unwrap();
        store.set(QuestionId(3), AnswerValue::choices(["Y"])).unwrap();
        assert_eq!(store.get(QuestionId(3)), Some(&AnswerValue::choices(["Y"])));
    }

    #[test]
    fn toggle_is_noop_for_other_kinds() {
        let mut store = DraftStore::new(form());
        store.set(QuestionId(2), AnswerValue::choice("A")).unwrap();
        store.toggle(QuestionId(2), "B").unwrap();
        store.toggle(QuestionId(1), "anything").unwrap();
        assert_eq!(store.get(QuestionId(2)), Some(&AnswerValue::choice("A")));
        assert_eq!(store.get(QuestionId(1)), None);
    }

    #[test]
    fn rejects_unknown_questions_and_shapes() {
        let mut store = DraftStore::new(form());
        assert_eq!(
            store.set(QuestionId(99), AnswerValue::text("x")),
            Err(DraftError::UnknownQuestion(QuestionId(99)))
        );
        assert!(matches!(
            store.set(QuestionId(1), AnswerValue::choice("A")),
            Err(DraftError::KindMismatch { .. })
        ));
        assert!(matches!(
            store.toggle(QuestionId(3), "Z"),
            Err(DraftError::UnknownAlternative { .. })
        ));
        assert!(store.draft().is_empty());
    }

    #[test]
    fn switching_form_clears_entries() {
        let mut store = DraftStore::new(form());
        store.set(QuestionId(1), AnswerValue::text("stale")).unwrap();

        let other = Form::new(2, "Other", vec![Question::long_text(1, "Same id")]);
        store.load_form(other);
        assert!(store.draft().is_empty());
        assert_eq!(store.form().id, crate::FormId(2));
    }

    #[test]
    fn seeded_store_drops_foreign_entries() {
        let draft = Draft::new()
            .with(1, AnswerValue::text("keep"))
            .with(42, AnswerValue::text("drop"));
        let store = DraftStore::with_draft(form(), draft);
        assert_eq!(store.draft().len(), 1);
        assert_eq!(store.missing(), vec![QuestionId(2), QuestionId(3)]);
    }
}
