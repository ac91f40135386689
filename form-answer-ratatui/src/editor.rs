//! The interactive answer editor: every question of the form on one scrollable page.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use form_answer::{
    AnswerApi, AnswerSession, AnswerValue, EngineError, PersistedAnswer, QuestionKind,
    SubmitState, question_label,
};
use futures::StreamExt;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, warn};

use crate::field::{self, FieldView, Mode};
use crate::terminal::{Term, restore_terminal, setup_terminal};
use crate::{AnswerTuiError, Theme};

/// What the caller should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    /// The gate passed and the user asked to submit.
    Submit,
    Cancel,
}

/// Message line under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// Focus, cursors and scroll position of the editor.
///
/// Values are never stored here: every edit goes straight into the session's
/// draft store, so the submit control always reflects the validation gate.
#[derive(Debug, Clone)]
pub struct EditorState {
    /// Focused question; `questions.len()` means the submit button.
    focused: usize,
    highlights: Vec<usize>,
    cursors: Vec<usize>,
    scroll: u16,
    status: Option<Status>,
}

impl EditorState {
    pub fn new(session: &AnswerSession) -> Self {
        let len = session.form().len();
        Self {
            focused: 0,
            highlights: vec![0; len],
            cursors: vec![0; len],
            scroll: 0,
            status: None,
        }
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn submit_focused(&self, session: &AnswerSession) -> bool {
        self.focused >= session.form().len()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some(Status::Error(message.into()));
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.status = Some(Status::Info(message.into()));
    }

    /// Apply a key press to the focused control.
    pub fn handle_key(&mut self, session: &mut AnswerSession, key: KeyEvent) -> EditorAction {
        if key.kind != KeyEventKind::Press {
            return EditorAction::None;
        }
        let choice = self.focused_kind(session).is_some_and(|k| !matches!(k, QuestionKind::LongText));

        match key.code {
            KeyCode::Esc => return EditorAction::Cancel,
            KeyCode::F(10) => return self.request_submit(session),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return self.request_submit(session);
            }
            KeyCode::Enter if self.submit_focused(session) => return self.request_submit(session),
            KeyCode::BackTab => self.prev(),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => self.prev(),
            KeyCode::Tab => self.next(session),
            KeyCode::Up if choice => self.move_highlight(session, -1),
            KeyCode::Down if choice => self.move_highlight(session, 1),
            KeyCode::Up => self.prev(),
            KeyCode::Down => self.next(session),
            KeyCode::Enter | KeyCode::Char(' ') if choice => {
                let highlight = self.highlights[self.focused];
                self.pick(session, highlight);
            }
            KeyCode::Enter => self.next(session),
            KeyCode::Char(c) if choice && c.is_ascii_digit() => {
                if let Some(n) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                    self.pick(session, n);
                }
            }
            KeyCode::Char(c) => self.edit_text(session, |text, cursor| {
                text.insert(byte_index(text, *cursor), c);
                *cursor += 1;
            }),
            KeyCode::Backspace => self.edit_text(session, |text, cursor| {
                if *cursor > 0 {
                    *cursor -= 1;
                    text.remove(byte_index(text, *cursor));
                }
            }),
            KeyCode::Delete => self.edit_text(session, |text, cursor| {
                if *cursor < text.chars().count() {
                    text.remove(byte_index(text, *cursor));
                }
            }),
            KeyCode::Left => self.move_cursor(session, |_, cursor| cursor.saturating_sub(1)),
            KeyCode::Right => self.move_cursor(session, |len, cursor| (cursor + 1).min(len)),
            KeyCode::Home => self.move_cursor(session, |_, _| 0),
            KeyCode::End => self.move_cursor(session, |len, _| len),
            _ => {}
        }
        EditorAction::None
    }

    fn focused_kind<'s>(&self, session: &'s AnswerSession) -> Option<&'s QuestionKind> {
        session.form().questions().get(self.focused).map(|q| &q.kind)
    }

    fn next(&mut self, session: &AnswerSession) {
        self.focused = (self.focused + 1).min(session.form().len());
    }

    fn prev(&mut self) {
        self.focused = self.focused.saturating_sub(1);
    }

    fn request_submit(&mut self, session: &AnswerSession) -> EditorAction {
        if session.can_submit() {
            return EditorAction::Submit;
        }
        let missing = session.missing();
        if let Some(first) = missing.first().and_then(|id| session.form().position(*id)) {
            self.focused = first;
            self.set_error(format!(
                "{} question(s) still unanswered, long answers need at least 3 characters",
                missing.len()
            ));
        }
        EditorAction::None
    }

    fn move_highlight(&mut self, session: &AnswerSession, delta: isize) {
        let count = self.focused_kind(session).map_or(0, |k| k.alternatives().len());
        if count == 0 {
            return;
        }
        let highlight = &mut self.highlights[self.focused];
        *highlight = (*highlight as isize + delta).rem_euclid(count as isize) as usize;
    }

    /// Select (single choice) or flip (multiple choice) the alternative at `index`.
    fn pick(&mut self, session: &mut AnswerSession, index: usize) {
        let Some(question) = session.form().questions().get(self.focused) else {
            return;
        };
        let Some(option) = question.alternatives().get(index).cloned() else {
            return;
        };
        let id = question.id;
        let single = matches!(question.kind, QuestionKind::SingleChoice { .. });
        self.highlights[self.focused] = index;

        let result = if single {
            session.set(id, AnswerValue::Choice(option))
        } else {
            session.toggle(id, &option)
        };
        self.report(result);
    }

    fn edit_text(&mut self, session: &mut AnswerSession, edit: impl FnOnce(&mut String, &mut usize)) {
        let Some(question) = session.form().questions().get(self.focused) else {
            return;
        };
        if !matches!(question.kind, QuestionKind::LongText) {
            return;
        }
        let id = question.id;
        let mut text = session
            .store()
            .get(id)
            .and_then(AnswerValue::as_text)
            .unwrap_or_default()
            .to_string();

        let cursor = &mut self.cursors[self.focused];
        *cursor = (*cursor).min(text.chars().count());
        edit(&mut text, cursor);

        let result = session.set(id, AnswerValue::Text(text));
        self.report(result);
    }

    fn move_cursor(&mut self, session: &AnswerSession, step: impl FnOnce(usize, usize) -> usize) {
        let Some(question) = session.form().questions().get(self.focused) else {
            return;
        };
        let len = session
            .store()
            .get(question.id)
            .and_then(AnswerValue::as_text)
            .map_or(0, |t| t.chars().count());
        let cursor = &mut self.cursors[self.focused];
        *cursor = step(len, (*cursor).min(len));
    }

    fn report(&mut self, result: Result<(), EngineError>) {
        match result {
            Ok(()) => {
                if matches!(self.status, Some(Status::Error(_))) {
                    self.status = None;
                }
            }
            Err(err) => {
                debug!(error = %err, "edit rejected");
                self.set_error(err.to_string());
            }
        }
    }
}

fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

/// Draw the whole editor page.
pub fn draw_editor(frame: &mut Frame, state: &mut EditorState, session: &AnswerSession, theme: &Theme) {
    let form = session.form();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Questions
            Constraint::Length(3), // Submit button
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    let mut title = form.name.clone();
    if !form.category.is_empty() {
        title = format!("{title} · {}", form.category);
    }
    if let Some(description) = &form.description {
        title = format!("{title}\n{description}");
    }
    let title = Paragraph::new(title)
        .style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border)),
        );
    frame.render_widget(title, chunks[0]);

    let content = chunks[1];
    let heights: Vec<u16> = form.questions().iter().map(field::field_height).collect();
    if state.focused < heights.len() {
        state.scroll = field::scroll_to(&heights, state.focused, state.scroll, content.height);
    }
    let in_flight = session.state() == SubmitState::InFlight;

    for (index, area) in field::place(&heights, state.scroll, content) {
        let question = &form.questions()[index];
        let view = FieldView {
            label: question_label(index, question),
            question,
            value: session.store().get(question.id),
            mode: Mode::Editable,
            focused: !in_flight && index == state.focused,
            highlight: state.highlights[index],
            cursor: state.cursors[index],
        };
        field::draw_field(frame, &view, area, theme);
    }
    field::draw_scrollbar(frame, content, field::total_height(&heights), state.scroll);

    let submit_focused = state.submit_focused(session);
    let (label, style) = if in_flight {
        ("Submitting…".to_string(), Style::default().fg(theme.disabled))
    } else if session.can_submit() {
        let style = if submit_focused {
            Style::default().fg(theme.text).bg(theme.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
        };
        ("Submit".to_string(), style)
    } else {
        (
            format!("Submit ({} unanswered)", session.missing().len()),
            Style::default().fg(theme.disabled),
        )
    };
    let button = Paragraph::new(label)
        .style(style)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if submit_focused {
                    theme.primary
                } else {
                    theme.border
                })),
        );
    frame.render_widget(button, chunks[2]);

    if let Some(status) = &state.status {
        let (text, color) = match status {
            Status::Info(text) => (text.as_str(), theme.success),
            Status::Error(text) => (text.as_str(), theme.error),
        };
        frame.render_widget(Paragraph::new(text).style(Style::default().fg(color)), chunks[3]);
    }

    let help = "Tab: Next  ↑/↓: Navigate  Space/1-5: Select  F10: Submit  Esc: Cancel";
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(theme.border)),
        chunks[4],
    );
}

/// Full-screen editor that fills in a session and submits it.
#[derive(Debug, Clone, Default)]
pub struct AnswerEditor {
    theme: Theme,
}

impl AnswerEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom color theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Run the editor until the answer is submitted or the user cancels.
    ///
    /// A failed submission keeps the draft and the editor open for a retry.
    pub async fn run<A: AnswerApi>(
        &self,
        session: &mut AnswerSession,
        api: &A,
    ) -> Result<PersistedAnswer, AnswerTuiError> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal, session, api).await;
        restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop<A: AnswerApi>(
        &self,
        terminal: &mut Term,
        session: &mut AnswerSession,
        api: &A,
    ) -> Result<PersistedAnswer, AnswerTuiError> {
        let mut events = EventStream::new();
        let mut state = EditorState::new(session);

        loop {
            terminal.draw(|frame| draw_editor(frame, &mut state, session, &self.theme))?;

            let Some(event) = events.next().await else {
                return Err(AnswerTuiError::Cancelled);
            };
            let Event::Key(key) = event? else {
                continue;
            };

            match state.handle_key(session, key) {
                EditorAction::None => {}
                EditorAction::Cancel => return Err(AnswerTuiError::Cancelled),
                EditorAction::Submit => {
                    let payload = match session.begin_submit() {
                        Ok(payload) => payload,
                        Err(err) => {
                            state.set_error(err.to_string());
                            continue;
                        }
                    };
                    state.set_info("Submitting…");
                    terminal.draw(|frame| draw_editor(frame, &mut state, session, &self.theme))?;

                    let submit = api.submit_answer(session.answer().id, &payload);
                    tokio::pin!(submit);
                    // Other keys are ignored until the backend answers; Esc abandons.
                    let result: Option<Result<PersistedAnswer, anyhow::Error>> = loop {
                        tokio::select! {
                            result = &mut submit => break Some(result.map_err(Into::into)),
                            event = events.next() => match event {
                                Some(Ok(Event::Key(key))) if key.code == KeyCode::Esc => break None,
                                None => break None,
                                _ => {}
                            },
                        }
                    };
                    let Some(result) = result else {
                        session.abandon_submit();
                        return Err(AnswerTuiError::SubmitAbandoned(session.answer().id));
                    };

                    match session.finish_submit(result) {
                        Ok(record) => return Ok(record.clone()),
                        Err(err) => {
                            warn!(error = %err, "submission failed in editor");
                            state.set_error(format!("{err}. Press F10 to retry."));
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_answer::{Form, Question, QuestionId, User};
    use ratatui::{Terminal, backend::TestBackend};

    fn session() -> AnswerSession {
        let form = Form::new(
            1,
            "Editor",
            vec![
                Question::long_text(1, "Notes"),
                Question::single_choice(2, "Grade", ["A", "B"]),
                Question::multiple_choice(3, "Tags", ["x", "y", "z"]),
            ],
        );
        let answer = PersistedAnswer::unanswered(9, form.clone(), User::new(1, "Ana"));
        AnswerSession::open(form, answer).unwrap()
    }

    fn press(state: &mut EditorState, session: &mut AnswerSession, code: KeyCode) -> EditorAction {
        state.handle_key(session, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(state: &mut EditorState, session: &mut AnswerSession, text: &str) {
        for c in text.chars() {
            press(state, session, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_writes_through_to_the_draft() {
        let mut session = session();
        let mut state = EditorState::new(&session);

        type_text(&mut state, &mut session, "olá");
        press(&mut state, &mut session, KeyCode::Left);
        press(&mut state, &mut session, KeyCode::Backspace);
        assert_eq!(
            session.store().get(QuestionId(1)),
            Some(&AnswerValue::text("oá"))
        );

        press(&mut state, &mut session, KeyCode::End);
        type_text(&mut state, &mut session, "!");
        assert_eq!(
            session.store().get(QuestionId(1)),
            Some(&AnswerValue::text("oá!"))
        );
    }

    #[test]
    fn choices_follow_highlight_and_digits() {
        let mut session = session();
        let mut state = EditorState::new(&session);

        press(&mut state, &mut session, KeyCode::Tab);
        press(&mut state, &mut session, KeyCode::Down);
        press(&mut state, &mut session, KeyCode::Char(' '));
        assert_eq!(
            session.store().get(QuestionId(2)),
            Some(&AnswerValue::choice("B"))
        );

        press(&mut state, &mut session, KeyCode::Tab);
        press(&mut state, &mut session, KeyCode::Char('3'));
        press(&mut state, &mut session, KeyCode::Char('1'));
        press(&mut state, &mut session, KeyCode::Char('3'));
        assert_eq!(
            session.store().get(QuestionId(3)),
            Some(&AnswerValue::choices(["x"]))
        );
    }

    #[test]
    fn submit_waits_for_the_gate() {
        let mut session = session();
        let mut state = EditorState::new(&session);

        type_text(&mut state, &mut session, "ok");
        assert_eq!(press(&mut state, &mut session, KeyCode::F(10)), EditorAction::None);
        assert!(matches!(state.status(), Some(Status::Error(_))));
        assert_eq!(state.focused(), 0);

        type_text(&mut state, &mut session, "!");
        press(&mut state, &mut session, KeyCode::Tab);
        press(&mut state, &mut session, KeyCode::Char('1'));
        press(&mut state, &mut session, KeyCode::Tab);
        press(&mut state, &mut session, KeyCode::Char('2'));
        press(&mut state, &mut session, KeyCode::Tab);
        assert!(state.submit_focused(&session));
        assert_eq!(press(&mut state, &mut session, KeyCode::Enter), EditorAction::Submit);
    }

    #[test]
    fn escape_cancels() {
        let mut session = session();
        let mut state = EditorState::new(&session);
        assert_eq!(press(&mut state, &mut session, KeyCode::Esc), EditorAction::Cancel);
    }

    #[test]
    fn in_flight_session_rejects_edits() {
        let mut session = session();
        let mut state = EditorState::new(&session);
        type_text(&mut state, &mut session, "yes");
        session.set(QuestionId(2), AnswerValue::choice("A")).unwrap();
        session.toggle(QuestionId(3), "y").unwrap();
        session.begin_submit().unwrap();

        type_text(&mut state, &mut session, "more");
        assert_eq!(
            session.store().get(QuestionId(1)),
            Some(&AnswerValue::text("yes"))
        );
        assert!(matches!(state.status(), Some(Status::Error(_))));
    }

    #[test]
    fn submit_button_shows_gate_state() {
        let mut session = session();
        let mut state = EditorState::new(&session);
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();

        terminal
            .draw(|frame| draw_editor(frame, &mut state, &session, &Theme::default()))
            .unwrap();
        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains("Submit (3 unanswered)"));
        assert!(screen.contains("1) Notes"));

        session.set(QuestionId(1), AnswerValue::text("yes")).unwrap();
        session.set(QuestionId(2), AnswerValue::choice("A")).unwrap();
        session.toggle(QuestionId(3), "z").unwrap();
        terminal
            .draw(|frame| draw_editor(frame, &mut state, &session, &Theme::default()))
            .unwrap();
        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(!screen.contains("unanswered"));
        assert!(screen.contains("Submit"));
    }
}
