use std::collections::BTreeSet;

/// The response held for one question in a draft.
///
/// The variant mirrors the question kind it answers; see
/// [`QuestionKind::matches_shape`](crate::QuestionKind::matches_shape).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    /// Free text (from LongText questions). May be empty while incomplete.
    Text(String),

    /// The picked alternative (from SingleChoice questions).
    Choice(String),

    /// The picked alternatives (from MultipleChoice questions). Unordered.
    Choices(BTreeSet<String>),
}

impl AnswerValue {
    /// Create a text value.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a single-choice value.
    pub fn choice(choice: impl Into<String>) -> Self {
        Self::Choice(choice.into())
    }

    /// Create a multiple-choice value.
    pub fn choices<S: Into<String>>(choices: impl IntoIterator<Item = S>) -> Self {
        Self::Choices(choices.into_iter().map(Into::into).collect())
    }

    /// Try to get this value as free text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a single choice.
    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Self::Choice(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a set of choices.
    pub fn as_choices(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Choices(set) => Some(set),
            _ => None,
        }
    }

    /// Check whether `option` is picked by this value.
    pub fn is_picked(&self, option: &str) -> bool {
        match self {
            Self::Text(_) => false,
            Self::Choice(choice) => choice == option,
            Self::Choices(set) => set.contains(option),
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Choice(_) => "Choice",
            Self::Choices(_) => "Choices",
        }
    }
}

impl From<BTreeSet<String>> for AnswerValue {
    fn from(set: BTreeSet<String>) -> Self {
        Self::Choices(set)
    }
}
