use std::collections::BTreeMap;

use crate::{AnswerValue, Form, QuestionId};

/// An in-progress answer set, keyed by question id.
///
/// Absence of a key means "unanswered". A `Draft` on its own is a plain map;
/// [`DraftStore`](crate::DraftStore) pairs it with a form and keeps it
/// consistent with that form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    values: BTreeMap<QuestionId, AnswerValue>,
}

impl Draft {
    /// Create a new empty draft.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Insert a value for the given question, replacing any previous one.
    pub fn insert(&mut self, id: impl Into<QuestionId>, value: impl Into<AnswerValue>) {
        self.values.insert(id.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, id: impl Into<QuestionId>, value: impl Into<AnswerValue>) -> Self {
        self.insert(id, value);
        self
    }

    /// Get the value for the given question.
    pub fn get(&self, id: QuestionId) -> Option<&AnswerValue> {
        self.values.get(&id)
    }

    /// Get a mutable reference to the value for the given question.
    pub fn get_mut(&mut self, id: QuestionId) -> Option<&mut AnswerValue> {
        self.values.get_mut(&id)
    }

    /// Check if a value exists for the given question.
    pub fn contains(&self, id: QuestionId) -> bool {
        self.values.contains_key(&id)
    }

    /// Remove the value for the given question.
    pub fn remove(&mut self, id: QuestionId) -> Option<AnswerValue> {
        self.values.remove(&id)
    }

    /// Get an iterator over all id-value pairs, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerValue)> {
        self.values.iter()
    }

    /// Get the number of answered entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every entry whose question is not part of `form`.
    ///
    /// Returns the ids that were dropped.
    pub fn retain_form(&mut self, form: &Form) -> Vec<QuestionId> {
        let stale: Vec<QuestionId> = self
            .values
            .keys()
            .filter(|id| !form.contains(**id))
            .copied()
            .collect();
        for id in &stale {
            self.values.remove(id);
        }
        stale
    }
}

impl FromIterator<(QuestionId, AnswerValue)> for Draft {
    fn from_iter<T: IntoIterator<Item = (QuestionId, AnswerValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Draft {
    type Item = (QuestionId, AnswerValue);
    type IntoIter = std::collections::btree_map::IntoIter<QuestionId, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Draft {
    type Item = (&'a QuestionId, &'a AnswerValue);
    type IntoIter = std::collections::btree_map::Iter<'a, QuestionId, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
