//! The validation gate: the sole authority on whether a draft may be submitted.

use crate::{Draft, Form, QuestionId};

/// Check that every question of `form` has a draft entry satisfying its rule.
///
/// A form without questions is trivially complete.
pub fn is_complete(form: &Form, draft: &Draft) -> bool {
    form.questions()
        .iter()
        .all(|q| draft.get(q.id).is_some_and(|v| q.is_answered_by(v)))
}

/// List the questions that block submission, in form order.
pub fn missing(form: &Form, draft: &Draft) -> Vec<QuestionId> {
    form.questions()
        .iter()
        .filter(|q| !draft.get(q.id).is_some_and(|v| q.is_answered_by(v)))
        .map(|q| q.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnswerValue, Question};

    fn form() -> Form {
        Form::new(
            1,
            "Gate",
            vec![
                Question::long_text(1, "Why?"),
                Question::single_choice(2, "Pick", ["A", "B"]),
                Question::multiple_choice(3, "Tick", ["X", "Y", "Z"]),
            ],
        )
    }

    fn complete_draft() -> Draft {
        Draft::new()
            .with(1, AnswerValue::text("because"))
            .with(2, AnswerValue::choice("A"))
            .with(3, AnswerValue::choices(["X", "Z"]))
    }

    #[test]
    fn complete_draft_passes() {
        assert!(is_complete(&form(), &complete_draft()));
        assert!(missing(&form(), &complete_draft()).is_empty());
    }

    #[test]
    fn any_single_missing_entry_fails() {
        let form = form();
        for question in form.questions() {
            let mut draft = complete_draft();
            draft.remove(question.id);
            assert!(!is_complete(&form, &draft));
            assert_eq!(missing(&form, &draft), vec![question.id]);
        }
    }

    #[test]
    fn long_text_boundary() {
        let form = form();
        let short = complete_draft().with(1, AnswerValue::text("ab"));
        let exact = complete_draft().with(1, AnswerValue::text("abc"));
        assert!(!is_complete(&form, &short));
        assert!(is_complete(&form, &exact));
    }

    #[test]
    fn multiple_choice_bounds() {
        let form = form();
        let none = complete_draft().with(3, AnswerValue::choices(Vec::<String>::new()));
        let all = complete_draft().with(3, AnswerValue::choices(["X", "Y", "Z"]));
        assert!(!is_complete(&form, &none));
        assert!(is_complete(&form, &all));
    }

    #[test]
    fn wrong_shape_is_unanswered() {
        let draft = complete_draft().with(2, AnswerValue::choices(["A"]));
        assert_eq!(missing(&form(), &draft), vec![QuestionId(2)]);
    }

    #[test]
    fn empty_form_is_complete() {
        let form = Form::new(1, "Empty", Vec::new());
        assert!(is_complete(&form, &Draft::new()));
    }
}
