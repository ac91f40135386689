use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Question, QuestionId};

/// Identity of a form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(pub i64);

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for FormId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<i32> for FormId {
    fn from(id: i32) -> Self {
        Self(i64::from(id))
    }
}

/// A team owning a form or a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
}

/// An ordered set of questions administered to a user.
///
/// Question order is significant: it is both the display order and the index
/// used in labels like `"2) How often?"`. The engine never mutates a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: FormId,

    pub name: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub description: Option<String>,

    /// All questions, in display order.
    #[serde(default)]
    pub questions: Vec<Question>,

    #[serde(default)]
    pub team: Option<Team>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Form {
    /// Create a new form with the given questions.
    pub fn new(id: impl Into<FormId>, name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            description: None,
            questions,
            team: None,
            created_at: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the owning team.
    pub fn with_team(mut self, team: Team) -> Self {
        self.team = Some(team);
        self
    }

    /// Get the questions.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Look up a question by id.
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Zero-based display position of a question.
    pub fn position(&self, id: QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }

    /// Check whether the form contains a question with this id.
    pub fn contains(&self, id: QuestionId) -> bool {
        self.question(id).is_some()
    }

    /// Display label for the question at `index`: `"<index+1>) <title>"`.
    pub fn label(&self, index: usize) -> Option<String> {
        self.questions.get(index).map(|q| question_label(index, q))
    }

    /// Check if the form has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }
}

/// Display label for `question` shown at zero-based `index`.
pub fn question_label(index: usize, question: &Question) -> String {
    format!("{}) {}", index + 1, question.title)
}
