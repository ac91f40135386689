//! The serialization codec between a [`Draft`] and the `userAnswers` string.
//!
//! The encoding is a JSON object keyed by the decimal question id:
//!
//! ```text
//! {"1": "free text", "2": "B", "3": ["X", "Z"]}
//! ```
//!
//! Long-text and single-choice answers are strings. Multiple-choice answers are
//! always arrays, ordered by the question's alternative list, so that equal
//! selections always encode to equal text. Keys are written in form order.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::{AnswerValue, Draft, Form, PersistedAnswer, Question, QuestionId, QuestionKind, validation};

/// Errors from encoding a draft or strictly decoding a payload.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The draft does not pass the validation gate.
    #[error("Cannot encode an incomplete draft ({} question(s) unanswered)", missing.len())]
    Incomplete { missing: Vec<QuestionId> },

    /// The draft holds an entry for a question outside the form.
    #[error("Draft holds an answer for unknown question {0}")]
    UnknownQuestion(QuestionId),

    /// The payload parsed but violates the grammar.
    #[error("Malformed answer payload: {0}")]
    Malformed(#[from] DecodeIssue),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One entry a lenient decode had to drop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeIssue {
    #[error("payload is not an object")]
    NotAnObject,

    /// The record is marked answered but carries no payload.
    #[error("answered record has no payload")]
    MissingPayload,

    #[error("payload is not valid JSON: {0}")]
    Unparseable(String),

    #[error("key '{0}' does not name a question of the form")]
    UnknownQuestion(String),

    #[error("question {question} expects {expected}")]
    WrongShape {
        question: QuestionId,
        expected: &'static str,
    },

    #[error("'{value}' is not an alternative of question {question}")]
    UnknownAlternative { question: QuestionId, value: String },
}

impl DecodeIssue {
    /// The question this issue affects, if it could be identified.
    pub fn question(&self) -> Option<QuestionId> {
        match self {
            Self::WrongShape { question, .. } | Self::UnknownAlternative { question, .. } => {
                Some(*question)
            }
            _ => None,
        }
    }
}

/// Result of a lenient decode: whatever could be recovered, plus what was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub draft: Draft,
    pub issues: Vec<DecodeIssue>,
}

impl Decoded {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Encode a complete draft into the `userAnswers` payload.
pub fn encode(form: &Form, draft: &Draft) -> Result<String, CodecError> {
    if let Some((id, _)) = draft.iter().find(|(id, _)| !form.contains(**id)) {
        return Err(CodecError::UnknownQuestion(*id));
    }
    if !validation::is_complete(form, draft) {
        return Err(CodecError::Incomplete {
            missing: validation::missing(form, draft),
        });
    }
    Ok(serde_json::to_string(&Encoded { form, draft })?)
}

/// Decode a payload, failing on the first grammar violation.
pub fn decode(form: &Form, payload: &str) -> Result<Draft, CodecError> {
    let value: Value = serde_json::from_str(payload)?;
    let Value::Object(entries) = value else {
        return Err(DecodeIssue::NotAnObject.into());
    };

    let mut draft = Draft::new();
    for (key, raw) in entries {
        let question = lookup(form, &key)?;
        draft.insert(question.id, decode_value(question, raw)?);
    }
    Ok(draft)
}

/// Decode a payload, dropping the entries that violate the grammar.
///
/// Never fails. A payload that is not a JSON object yields an empty draft.
pub fn decode_lenient(form: &Form, payload: &str) -> Decoded {
    let value: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(err) => {
            return Decoded {
                draft: Draft::new(),
                issues: vec![DecodeIssue::Unparseable(err.to_string())],
            };
        }
    };
    let Value::Object(entries) = value else {
        return Decoded {
            draft: Draft::new(),
            issues: vec![DecodeIssue::NotAnObject],
        };
    };

    let mut decoded = Decoded::default();
    for (key, raw) in entries {
        let entry = lookup(form, &key).and_then(|q| Ok((q.id, decode_value(q, raw)?)));
        match entry {
            Ok((id, value)) => decoded.draft.insert(id, value),
            Err(issue) => decoded.issues.push(issue),
        }
    }
    decoded
}

/// Decode the committed answers of a persisted record against its own form.
///
/// A record that is not answered yet decodes to an empty draft, whatever its
/// payload holds. An answered record without a payload is malformed.
pub fn decode_answer(answer: &PersistedAnswer) -> Decoded {
    if !answer.user_has_answered {
        return Decoded::default();
    }
    let Some(payload) = answer.committed_payload() else {
        warn!(answer = %answer.id, "answered record has no stored answers");
        return Decoded {
            draft: Draft::default(),
            issues: vec![DecodeIssue::MissingPayload],
        };
    };
    let decoded = decode_lenient(&answer.form, payload);
    for issue in &decoded.issues {
        warn!(answer = %answer.id, %issue, "dropped malformed stored answer entry");
    }
    decoded
}

fn lookup<'f>(form: &'f Form, key: &str) -> Result<&'f Question, DecodeIssue> {
    key.trim()
        .parse::<i64>()
        .ok()
        .and_then(|id| form.question(QuestionId(id)))
        .ok_or_else(|| DecodeIssue::UnknownQuestion(key.to_string()))
}

fn decode_value(question: &Question, raw: Value) -> Result<AnswerValue, DecodeIssue> {
    let wrong_shape = |expected| DecodeIssue::WrongShape {
        question: question.id,
        expected,
    };
    let check = |value: String| {
        if question.alternatives().contains(&value) {
            Ok(value)
        } else {
            Err(DecodeIssue::UnknownAlternative {
                question: question.id,
                value,
            })
        }
    };

    match (&question.kind, raw) {
        (QuestionKind::LongText, Value::String(text)) => Ok(AnswerValue::Text(text)),
        (QuestionKind::LongText, _) => Err(wrong_shape("a string")),

        (QuestionKind::SingleChoice { .. }, Value::String(choice)) => {
            Ok(AnswerValue::Choice(check(choice)?))
        }
        (QuestionKind::SingleChoice { .. }, _) => Err(wrong_shape("a string")),

        (QuestionKind::MultipleChoice { .. }, Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => check(s),
                _ => Err(wrong_shape("an array of strings")),
            })
            .collect::<Result<_, _>>()
            .map(AnswerValue::Choices),
        (QuestionKind::MultipleChoice { .. }, _) => Err(wrong_shape("an array of strings")),
    }
}

/// Serializes a draft as a map in form order.
struct Encoded<'a> {
    form: &'a Form,
    draft: &'a Draft,
}

impl Serialize for Encoded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.draft.len()))?;
        for question in self.form.questions() {
            let Some(value) = self.draft.get(question.id) else {
                continue;
            };
            let key = question.id.to_string();
            match value {
                AnswerValue::Text(s) | AnswerValue::Choice(s) => map.serialize_entry(&key, s)?,
                AnswerValue::Choices(set) => {
                    map.serialize_entry(&key, &question.kind.ordered_selection(set))?
                }
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::User;

    fn scenario_form() -> Form {
        Form::new(
            1,
            "Scenario",
            vec![
                Question::long_text(1, "Anything to add?"),
                Question::single_choice(2, "Pick one", ["A", "B"]),
            ],
        )
    }

    fn five_way_form() -> Form {
        Form::new(
            2,
            "Five",
            vec![
                Question::multiple_choice(7, "Tick", ["E", "D", "C", "B", "A"]),
                Question::long_text(3, "Why?"),
            ],
        )
    }

    #[test]
    fn scenario_round_trip() {
        let form = scenario_form();
        let draft = Draft::new()
            .with(1, AnswerValue::text("yes"))
            .with(2, AnswerValue::choice("B"));

        let payload = encode(&form, &draft).unwrap();
        assert_eq!(payload, r#"{"1":"yes","2":"B"}"#);
        assert_eq!(decode(&form, &payload).unwrap(), draft);
    }

    #[test]
    fn round_trip_with_one_and_all_selections() {
        let form = five_way_form();
        for selection in [vec!["C"], vec!["A", "B", "C", "D", "E"]] {
            let draft = Draft::new()
                .with(7, AnswerValue::choices(selection))
                .with(3, AnswerValue::text("because"));
            let payload = encode(&form, &draft).unwrap();
            assert_eq!(decode(&form, &payload).unwrap(), draft);
        }
    }

    #[test]
    fn selections_follow_alternative_order_and_keys_follow_form_order() {
        let form = five_way_form();
        let draft = Draft::new()
            .with(3, AnswerValue::text("because"))
            .with(7, AnswerValue::choices(["A", "E", "C"]));
        assert_eq!(
            encode(&form, &draft).unwrap(),
            r#"{"7":["E","C","A"],"3":"because"}"#
        );
    }

    #[test]
    fn single_selection_stays_an_array() {
        let form = five_way_form();
        let draft = Draft::new()
            .with(7, AnswerValue::choices(["B"]))
            .with(3, AnswerValue::text("because"));
        assert!(encode(&form, &draft).unwrap().contains(r#""7":["B"]"#));
    }

    #[test]
    fn refuses_incomplete_or_foreign_drafts() {
        let form = scenario_form();
        let short = Draft::new()
            .with(1, AnswerValue::text("no"))
            .with(2, AnswerValue::choice("A"));
        assert!(matches!(
            encode(&form, &short),
            Err(CodecError::Incomplete { missing }) if missing == vec![QuestionId(1)]
        ));

        let foreign = short.with(1, AnswerValue::text("yes")).with(9, AnswerValue::text("?"));
        assert!(matches!(
            encode(&form, &foreign),
            Err(CodecError::UnknownQuestion(QuestionId(9)))
        ));
    }

    #[test]
    fn strict_decode_rejects_violations() {
        let form = scenario_form();
        assert!(matches!(decode(&form, "yes,B"), Err(CodecError::Json(_))));
        assert!(matches!(
            decode(&form, r#"["yes"]"#),
            Err(CodecError::Malformed(DecodeIssue::NotAnObject))
        ));
        assert!(matches!(
            decode(&form, r#"{"2":"C"}"#),
            Err(CodecError::Malformed(DecodeIssue::UnknownAlternative { .. }))
        ));
    }

    #[test]
    fn lenient_decode_keeps_good_entries() {
        let form = five_way_form();
        let decoded = decode_lenient(&form, r#"{"7":"E","3":"kept","99":"x","abc":1}"#);

        assert_eq!(decoded.draft, Draft::new().with(3, AnswerValue::text("kept")));
        assert_eq!(decoded.issues.len(), 3);
        assert!(decoded.issues.contains(&DecodeIssue::WrongShape {
            question: QuestionId(7),
            expected: "an array of strings",
        }));
        assert!(decoded.issues.contains(&DecodeIssue::UnknownQuestion("99".into())));
    }

    #[test]
    fn lenient_decode_of_garbage_is_empty() {
        let form = scenario_form();
        let decoded = decode_lenient(&form, "yes,B");
        assert!(decoded.draft.is_empty());
        assert!(matches!(decoded.issues[..], [DecodeIssue::Unparseable(_)]));

        let decoded = decode_lenient(&form, "42");
        assert!(decoded.draft.is_empty());
        assert_eq!(decoded.issues, vec![DecodeIssue::NotAnObject]);
    }

    #[test]
    fn unanswered_records_decode_to_nothing() {
        let mut answer = PersistedAnswer::unanswered(1, scenario_form(), User::new(1, "Ana"));
        answer.user_answers = Some("not json at all".into());
        let decoded = decode_answer(&answer);
        assert!(decoded.draft.is_empty());
        assert!(decoded.is_clean());
    }

    #[test]
    fn answered_records_decode_against_their_form() {
        let answer = PersistedAnswer::unanswered(1, scenario_form(), User::new(1, "Ana"))
            .answered_with(r#"{"1":"yes","2":"B"}"#);
        let decoded = decode_answer(&answer);
        assert!(decoded.is_clean());
        assert!(validation::is_complete(&answer.form, &decoded.draft));
    }

    #[test]
    fn answered_record_without_payload_is_malformed() {
        let mut answer = PersistedAnswer::unanswered(1, scenario_form(), User::new(1, "Ana"))
            .answered_with("{}");
        answer.user_answers = None;
        let decoded = decode_answer(&answer);
        assert!(decoded.draft.is_empty());
        assert_eq!(decoded.issues, vec![DecodeIssue::MissingPayload]);
    }
}
