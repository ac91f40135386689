//! The comparison selector: pick up to two answered records and replay them.

use tracing::debug;

use crate::{AnswerId, PersistedAnswer, QuestionId, Replay, ReplayItem};

/// Maximum number of answers compared side by side.
pub const MAX_COMPARED: usize = 2;

/// Result of a selection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    Deselected,
    AlreadySelected,
    /// Two answers are already selected; the request changed nothing.
    CapReached,
    /// The candidate has not been answered and cannot be replayed.
    NotAnswered,
    UnknownCandidate,
}

impl SelectOutcome {
    /// Check whether the selection set changed.
    pub fn changed(self) -> bool {
        matches!(self, Self::Selected | Self::Deselected)
    }
}

/// What the comparison screen shows for the current selection.
#[derive(Debug, Clone)]
pub enum ComparisonView<'a> {
    Empty,
    Single(Replay<'a>),
    Pair(Replay<'a>, Replay<'a>),
}

/// A bounded selection over a list of persisted answers.
///
/// Once two answers are selected, further selections are refused until one is
/// deselected. The first two selections win; nothing is ever rotated out.
#[derive(Debug, Clone)]
pub struct ComparisonSelector {
    candidates: Vec<PersistedAnswer>,
    selected: Vec<AnswerId>,
}

impl ComparisonSelector {
    pub fn new(candidates: Vec<PersistedAnswer>) -> Self {
        Self {
            candidates,
            selected: Vec::with_capacity(MAX_COMPARED),
        }
    }

    pub fn candidates(&self) -> &[PersistedAnswer] {
        &self.candidates
    }

    pub fn candidate(&self, id: AnswerId) -> Option<&PersistedAnswer> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// Selected ids, in selection order.
    pub fn selected(&self) -> &[AnswerId] {
        &self.selected
    }

    pub fn is_selected(&self, id: AnswerId) -> bool {
        self.selected.contains(&id)
    }

    /// Whether the selection control for `id` is enabled.
    ///
    /// True for an answered candidate while the cap is not reached, and always
    /// true for a selected one so it can be deselected.
    pub fn is_selectable(&self, id: AnswerId) -> bool {
        let answered = self.candidate(id).is_some_and(|c| c.user_has_answered);
        answered && (self.selected.len() < MAX_COMPARED || self.is_selected(id))
    }

    pub fn select(&mut self, id: AnswerId) -> SelectOutcome {
        let outcome = match self.candidate(id) {
            None => SelectOutcome::UnknownCandidate,
            Some(_) if self.is_selected(id) => SelectOutcome::AlreadySelected,
            Some(c) if !c.user_has_answered => SelectOutcome::NotAnswered,
            Some(_) if self.selected.len() >= MAX_COMPARED => SelectOutcome::CapReached,
            Some(_) => SelectOutcome::Selected,
        };
        if outcome == SelectOutcome::Selected {
            self.selected.push(id);
        }
        debug!(answer = %id, ?outcome, selected = ?self.selected, "comparison select");
        outcome
    }

    /// Remove `id` from the selection. Returns `false` if it was not selected.
    pub fn deselect(&mut self, id: AnswerId) -> bool {
        let before = self.selected.len();
        self.selected.retain(|s| *s != id);
        before != self.selected.len()
    }

    /// Deselect if selected, otherwise select.
    pub fn toggle(&mut self, id: AnswerId) -> SelectOutcome {
        if self.deselect(id) {
            SelectOutcome::Deselected
        } else {
            self.select(id)
        }
    }

    /// Replace the whole selection with a single answered candidate.
    pub fn show_single(&mut self, id: AnswerId) -> SelectOutcome {
        let outcome = match self.candidate(id) {
            None => SelectOutcome::UnknownCandidate,
            Some(c) if !c.user_has_answered => SelectOutcome::NotAnswered,
            Some(_) => SelectOutcome::Selected,
        };
        if outcome == SelectOutcome::Selected {
            self.selected = vec![id];
        }
        outcome
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Decode the selected answers, each independently.
    pub fn view(&self) -> ComparisonView<'_> {
        let mut replays = self
            .selected
            .iter()
            .filter_map(|id| self.candidate(*id))
            .map(Replay::new);
        match (replays.next(), replays.next()) {
            (Some(left), Some(right)) => ComparisonView::Pair(left, right),
            (Some(only), None) => ComparisonView::Single(only),
            _ => ComparisonView::Empty,
        }
    }
}

/// One display row of a side-by-side comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedRow<'r> {
    pub question_id: QuestionId,
    pub left: Option<ReplayItem<'r>>,
    pub right: Option<ReplayItem<'r>>,
}

/// Pair the questions of two replays by question id.
///
/// Rows follow the left form's order, then the questions only the right form has.
/// For identical forms this is plain positional alignment.
pub fn align<'r>(left: &'r Replay<'_>, right: &'r Replay<'_>) -> Vec<AlignedRow<'r>> {
    let mut rows: Vec<AlignedRow<'r>> = left
        .items()
        .into_iter()
        .map(|item| AlignedRow {
            question_id: item.question.id,
            left: Some(item),
            right: right.item(item.question.id),
        })
        .collect();

    rows.extend(
        right
            .items()
            .into_iter()
            .filter(|item| left.item(item.question.id).is_none())
            .map(|item| AlignedRow {
                question_id: item.question.id,
                left: None,
                right: Some(item),
            }),
    );
    rows
}
