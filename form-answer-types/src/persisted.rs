use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Form, Team};

/// Identity of a persisted answer record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerId(pub i64);

impl fmt::Display for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AnswerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<i32> for AnswerId {
    fn from(id: i32) -> Self {
        Self(i64::from(id))
    }
}

/// A user as embedded in answer records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
            role: None,
            team: None,
        }
    }
}

/// The server-held record pairing a user, a form and (once submitted) the
/// encoded answer set.
///
/// `user_has_answered` has exactly one transition, `false -> true`. While it is
/// `false`, `user_answers` is not a committed encoding and is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAnswer {
    pub id: AnswerId,

    pub form: Form,

    /// The user filling in the form.
    pub user: User,

    /// The user being evaluated, when the form is about someone else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_to_evaluate: Option<User>,

    #[serde(default)]
    pub user_has_answered: bool,

    #[serde(default)]
    pub user_answers: Option<String>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PersistedAnswer {
    /// Create an unanswered record for `user` on `form`.
    pub fn unanswered(id: impl Into<AnswerId>, form: Form, user: User) -> Self {
        Self {
            id: id.into(),
            form,
            user,
            user_to_evaluate: None,
            user_has_answered: false,
            user_answers: None,
            updated_at: None,
        }
    }

    /// Mark the record as answered with an already-encoded payload.
    pub fn answered_with(mut self, payload: impl Into<String>) -> Self {
        self.user_answers = Some(payload.into());
        self.user_has_answered = true;
        self
    }

    pub fn evaluating(mut self, subject: User) -> Self {
        self.user_to_evaluate = Some(subject);
        self
    }

    pub fn updated(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// The encoded answer set, only if it has been committed.
    pub fn committed_payload(&self) -> Option<&str> {
        if self.user_has_answered {
            self.user_answers.as_deref()
        } else {
            None
        }
    }

    /// The user the answers are about: the evaluated user if any, else the author.
    pub fn subject(&self) -> &User {
        self.user_to_evaluate.as_ref().unwrap_or(&self.user)
    }

    /// Last update as `dd/mm/yyyy`, if known.
    pub fn answered_on(&self) -> Option<String> {
        self.updated_at.map(|at| at.format("%d/%m/%Y").to_string())
    }
}

/// Body of the single write call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub user_answers: String,
    pub user_has_answered: bool,
}

impl SubmitPayload {
    /// A submit body for an encoded answer set. Always marks the record answered.
    pub fn new(user_answers: impl Into<String>) -> Self {
        Self {
            user_answers: user_answers.into(),
            user_has_answered: true,
        }
    }
}
