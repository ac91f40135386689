use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::AnswerValue;

/// Minimum number of characters for a long-text answer to count as answered.
pub const MIN_LONG_TEXT_CHARS: usize = 3;

/// Maximum number of alternatives a choice question may carry.
pub const MAX_ALTERNATIVES: usize = 5;

/// Identity of a question, unique and stable within a form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub i64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for QuestionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<i32> for QuestionId {
    fn from(id: i32) -> Self {
        Self(i64::from(id))
    }
}

/// A single question in a form.
///
/// On the wire a question is a flat object: `{ "id", "title", "type", "alternatives" }`.
/// The `type` tag and the alternatives are folded into [`QuestionKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identity, used as the key in drafts and encoded answers.
    pub id: QuestionId,

    /// The prompt text shown to the user.
    pub title: String,

    /// The kind of question (determines widget, completeness rule and encoding).
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    /// Create a new question.
    pub fn new(id: impl Into<QuestionId>, title: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
        }
    }

    /// Create a free-text question.
    pub fn long_text(id: impl Into<QuestionId>, title: impl Into<String>) -> Self {
        Self::new(id, title, QuestionKind::LongText)
    }

    /// Create a question where any non-empty subset of alternatives may be picked.
    pub fn multiple_choice<S: Into<String>>(
        id: impl Into<QuestionId>,
        title: impl Into<String>,
        alternatives: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            id,
            title,
            QuestionKind::MultipleChoice {
                alternatives: alternatives.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Create a question where exactly one alternative must be picked.
    pub fn single_choice<S: Into<String>>(
        id: impl Into<QuestionId>,
        title: impl Into<String>,
        alternatives: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            id,
            title,
            QuestionKind::SingleChoice {
                alternatives: alternatives.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Get the alternatives (empty for long-text questions).
    pub fn alternatives(&self) -> &[String] {
        self.kind.alternatives()
    }

    /// Check whether `value` satisfies this question's completeness rule.
    pub fn is_answered_by(&self, value: &AnswerValue) -> bool {
        self.kind.accepts(value)
    }
}

/// The kind of question, carrying everything that varies per type.
///
/// Every per-type decision in the engine (widget, completeness, encoding) is an
/// exhaustive match on this enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QuestionKind {
    /// Free text, answered once it reaches [`MIN_LONG_TEXT_CHARS`].
    #[serde(rename = "Texto Longo")]
    LongText,

    /// Pick any non-empty subset of the alternatives.
    #[serde(rename = "Múltipla Escolha")]
    MultipleChoice {
        #[serde(default)]
        alternatives: Vec<String>,
    },

    /// Pick exactly one of the alternatives.
    #[serde(rename = "Escolha Única")]
    SingleChoice {
        #[serde(default)]
        alternatives: Vec<String>,
    },
}

impl QuestionKind {
    /// The tag used for this kind in form definitions.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            Self::LongText => "Texto Longo",
            Self::MultipleChoice { .. } => "Múltipla Escolha",
            Self::SingleChoice { .. } => "Escolha Única",
        }
    }

    /// Name of the answer shape this kind expects, for error messages.
    pub fn value_type_name(&self) -> &'static str {
        match self {
            Self::LongText => "Text",
            Self::MultipleChoice { .. } => "Choices",
            Self::SingleChoice { .. } => "Choice",
        }
    }

    /// Get the alternatives (empty for long-text questions).
    pub fn alternatives(&self) -> &[String] {
        match self {
            Self::LongText => &[],
            Self::MultipleChoice { alternatives } | Self::SingleChoice { alternatives } => {
                alternatives
            }
        }
    }

    /// Check whether this kind has any alternative that could be picked.
    ///
    /// A choice question without alternatives can be rendered but never answered.
    pub fn is_answerable(&self) -> bool {
        match self {
            Self::LongText => true,
            Self::MultipleChoice { alternatives } | Self::SingleChoice { alternatives } => {
                !alternatives.is_empty()
            }
        }
    }

    /// Check whether `value` has the shape this kind stores, regardless of completeness.
    pub fn matches_shape(&self, value: &AnswerValue) -> bool {
        matches!(
            (self, value),
            (Self::LongText, AnswerValue::Text(_))
                | (Self::MultipleChoice { .. }, AnswerValue::Choices(_))
                | (Self::SingleChoice { .. }, AnswerValue::Choice(_))
        )
    }

    /// Completeness predicate for this kind.
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        match (self, value) {
            (Self::LongText, AnswerValue::Text(text)) => {
                text.chars().count() >= MIN_LONG_TEXT_CHARS
            }
            (Self::MultipleChoice { alternatives }, AnswerValue::Choices(selected)) => {
                !selected.is_empty() && selected.iter().all(|s| alternatives.contains(s))
            }
            (Self::SingleChoice { alternatives }, AnswerValue::Choice(choice)) => {
                alternatives.contains(choice)
            }
            _ => false,
        }
    }

    /// Order a multiple-choice selection by alternative-list order.
    ///
    /// Selections that are not alternatives sort after the known ones, lexicographically.
    pub fn ordered_selection<'a>(&self, selected: &'a BTreeSet<String>) -> Vec<&'a str> {
        let alternatives = self.alternatives();
        let mut ordered: Vec<&str> = selected.iter().map(String::as_str).collect();
        ordered.sort_by_key(|s| {
            alternatives
                .iter()
                .position(|a| a.as_str() == *s)
                .unwrap_or(usize::MAX)
        });
        ordered
    }
}
