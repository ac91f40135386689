use crate::{
    AnswerValue, DecodeIssue, Draft, EngineError, PersistedAnswer, Question, QuestionId, codec,
    question_label,
};

/// A read-only redisplay of a persisted answer.
///
/// The committed payload is decoded leniently: questions whose stored entry is
/// malformed show as unanswered and the rest of the replay is unaffected.
#[derive(Debug, Clone)]
pub struct Replay<'a> {
    answer: &'a PersistedAnswer,
    draft: Draft,
    issues: Vec<DecodeIssue>,
}

/// One question of a replay, with the value it was answered with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayItem<'r> {
    /// Zero-based position within the replayed form.
    pub index: usize,
    pub question: &'r Question,
    pub value: Option<&'r AnswerValue>,
}

impl ReplayItem<'_> {
    /// Display label, `"<index+1>) <title>"`.
    pub fn label(&self) -> String {
        question_label(self.index, self.question)
    }

    pub fn is_answered(&self) -> bool {
        self.value.is_some()
    }
}

impl<'a> Replay<'a> {
    pub fn new(answer: &'a PersistedAnswer) -> Self {
        let decoded = codec::decode_answer(answer);
        Self {
            answer,
            draft: decoded.draft,
            issues: decoded.issues,
        }
    }

    pub fn answer(&self) -> &'a PersistedAnswer {
        self.answer
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Entries dropped while decoding.
    pub fn issues(&self) -> &[DecodeIssue] {
        &self.issues
    }

    /// The decode problem as an engine error, for display. `None` if the payload was clean.
    pub fn error(&self) -> Option<EngineError> {
        (!self.issues.is_empty()).then(|| EngineError::MalformedPersistedAnswer {
            answer: self.answer.id,
            issues: self.issues.len(),
        })
    }

    pub fn form_name(&self) -> &'a str {
        &self.answer.form.name
    }

    pub fn category(&self) -> &'a str {
        &self.answer.form.category
    }

    /// Name of the user the answers are about.
    pub fn subject_name(&self) -> &'a str {
        &self.answer.subject().name
    }

    /// Every question of the form in display order, paired with its value.
    pub fn items(&self) -> Vec<ReplayItem<'_>> {
        self.answer
            .form
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| ReplayItem {
                index,
                question,
                value: self.draft.get(question.id),
            })
            .collect()
    }

    /// The item for a question id, if the form has it.
    pub fn item(&self, id: QuestionId) -> Option<ReplayItem<'_>> {
        let index = self.answer.form.position(id)?;
        let question = &self.answer.form.questions()[index];
        Some(ReplayItem {
            index,
            question,
            value: self.draft.get(id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Form, User};

    fn answer(payload: &str) -> PersistedAnswer {
        let form = Form::new(
            1,
            "Peer review",
            vec![
                Question::long_text(1, "Strengths"),
                Question::single_choice(2, "Overall", ["Good", "Poor"]),
            ],
        )
        .with_category("Evaluation");
        PersistedAnswer::unanswered(4, form, User::new(1, "Ana"))
            .evaluating(User::new(2, "Bruno"))
            .answered_with(payload)
    }

    #[test]
    fn items_follow_form_order() {
        let answer = answer(r#"{"2":"Good","1":"Focus"}"#);
        let replay = Replay::new(&answer);
        let items = replay.items();

        assert_eq!(items[0].label(), "1) Strengths");
        assert_eq!(items[0].value, Some(&AnswerValue::text("Focus")));
        assert_eq!(items[1].label(), "2) Overall");
        assert!(replay.error().is_none());
    }

    #[test]
    fn malformed_entry_renders_unanswered() {
        let answer = answer(r#"{"1":"Focus","2":"Excellent"}"#);
        let replay = Replay::new(&answer);

        assert!(replay.items()[0].is_answered());
        assert!(!replay.items()[1].is_answered());
        assert!(matches!(
            replay.error(),
            Some(EngineError::MalformedPersistedAnswer { issues: 1, .. })
        ));
    }

    #[test]
    fn header_names_the_evaluated_user() {
        let answer = answer("{}");
        let replay = Replay::new(&answer);
        assert_eq!(replay.form_name(), "Peer review");
        assert_eq!(replay.category(), "Evaluation");
        assert_eq!(replay.subject_name(), "Bruno");
    }
}
