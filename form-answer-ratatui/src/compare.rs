//! Read-only replay of committed answers, alone or two side by side.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use form_answer::{
    AnswerId, ComparisonSelector, ComparisonView, PersistedAnswer, Replay, ReplayItem,
    SelectOutcome, align,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::field::{self, FieldView};
use crate::terminal::{restore_terminal, setup_terminal};
use crate::{AnswerTuiError, Theme};

const HEADER_HEIGHT: u16 = 4;

/// What the caller should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareAction {
    None,
    Quit,
}

/// Candidate list cursor, selection and replay scroll.
#[derive(Debug, Clone)]
pub struct ComparisonState {
    selector: ComparisonSelector,
    cursor: usize,
    scroll: u16,
    status: Option<String>,
}

impl ComparisonState {
    pub fn new(candidates: Vec<PersistedAnswer>) -> Self {
        Self {
            selector: ComparisonSelector::new(candidates),
            cursor: 0,
            scroll: 0,
            status: None,
        }
    }

    pub fn selector(&self) -> &ComparisonSelector {
        &self.selector
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Open directly on one answer.
    pub fn show_single(&mut self, id: AnswerId) -> SelectOutcome {
        if let Some(index) = self.selector.candidates().iter().position(|c| c.id == id) {
            self.cursor = index;
        }
        let outcome = self.selector.show_single(id);
        self.report(outcome);
        outcome
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> CompareAction {
        if key.kind != KeyEventKind::Press {
            return CompareAction::None;
        }
        let count = self.selector.candidates().len();

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return CompareAction::Quit,
            KeyCode::Up if self.cursor > 0 => self.cursor -= 1,
            KeyCode::Down if self.cursor + 1 < count => self.cursor += 1,
            KeyCode::Char(' ') => {
                if let Some(id) = self.cursor_id() {
                    let outcome = self.selector.toggle(id);
                    self.report(outcome);
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.cursor_id() {
                    let outcome = self.selector.show_single(id);
                    self.report(outcome);
                }
            }
            KeyCode::Char('c') => {
                self.selector.clear();
                self.scroll = 0;
                self.status = None;
            }
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(5),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(5),
            _ => {}
        }
        CompareAction::None
    }

    fn cursor_id(&self) -> Option<AnswerId> {
        self.selector.candidates().get(self.cursor).map(|c| c.id)
    }

    fn report(&mut self, outcome: SelectOutcome) {
        if outcome.changed() {
            self.scroll = 0;
        }
        self.status = match outcome {
            SelectOutcome::CapReached => {
                Some("Only two answers can be compared, deselect one first".to_string())
            }
            SelectOutcome::NotAnswered => Some("This form has not been answered yet".to_string()),
            _ => None,
        };
    }
}

/// Draw the candidate list and the replay pane.
pub fn draw_comparison(frame: &mut Frame, state: &mut ComparisonState, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1), Constraint::Length(1)])
        .split(frame.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(48), Constraint::Min(20)])
        .split(rows[0]);

    draw_candidates(frame, state, columns[0], theme);

    let pane = columns[1];
    match state.selector.view() {
        ComparisonView::Empty => {
            let hint = Paragraph::new("Space: select up to two answers  Enter: view one")
                .style(Style::default().fg(theme.border));
            frame.render_widget(hint, pane);
        }
        ComparisonView::Single(replay) => draw_single(frame, &replay, &mut state.scroll, pane, theme),
        ComparisonView::Pair(left, right) => {
            draw_pair(frame, &left, &right, &mut state.scroll, pane, theme);
        }
    }

    if let Some(status) = &state.status {
        frame.render_widget(
            Paragraph::new(status.as_str()).style(Style::default().fg(theme.error)),
            rows[1],
        );
    }
    let help = "↑/↓: Move  Space: Compare  Enter: View  c: Clear  PgUp/PgDn: Scroll  Esc: Back";
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(theme.border)),
        rows[2],
    );
}

fn draw_candidates(frame: &mut Frame, state: &ComparisonState, area: Rect, theme: &Theme) {
    let selector = &state.selector;
    let items: Vec<ListItem> = selector
        .candidates()
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let marker = if selector.is_selected(candidate.id) { "[✓]" } else { "[ ]" };
            let when = if candidate.user_has_answered {
                candidate.answered_on().unwrap_or_else(|| "answered".to_string())
            } else {
                "pending".to_string()
            };
            let style = if idx == state.cursor {
                Style::default()
                    .fg(theme.text)
                    .bg(theme.selected_bg)
                    .add_modifier(Modifier::BOLD)
            } else if !selector.is_selectable(candidate.id) {
                Style::default().fg(theme.disabled)
            } else if selector.is_selected(candidate.id) {
                Style::default().fg(theme.highlight)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(format!(
                "{marker} {when:<10} {} · {}",
                candidate.subject().name,
                candidate.form.name
            ))
            .style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(" Answers "),
    );
    frame.render_widget(list, area);
}

fn draw_header(frame: &mut Frame, replay: &Replay<'_>, area: Rect, theme: &Theme) {
    let mut lines = vec![
        Line::styled(
            replay.form_name().to_string(),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            format!("Category: {}", replay.category()),
            Style::default().fg(theme.text),
        ),
        Line::styled(
            format!("User: {}", replay.subject_name()),
            Style::default().fg(theme.text),
        ),
    ];
    if let Some(err) = replay.error() {
        lines.push(Line::styled(err.to_string(), Style::default().fg(theme.error)));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn split_header(area: Rect) -> (Rect, Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(1)])
        .split(area);
    (parts[0], parts[1])
}

fn draw_single(frame: &mut Frame, replay: &Replay<'_>, scroll: &mut u16, area: Rect, theme: &Theme) {
    let (header, body) = split_header(area);
    draw_header(frame, replay, header, theme);

    let items = replay.items();
    let heights: Vec<u16> = items.iter().map(|i| field::field_height(i.question)).collect();
    let total = field::total_height(&heights);
    *scroll = (*scroll).min(total.saturating_sub(body.height));

    for (index, rect) in field::place(&heights, *scroll, body) {
        draw_item(frame, Some(&items[index]), rect, theme);
    }
    field::draw_scrollbar(frame, body, total, *scroll);
}

fn draw_pair(
    frame: &mut Frame,
    left: &Replay<'_>,
    right: &Replay<'_>,
    scroll: &mut u16,
    area: Rect,
    theme: &Theme,
) {
    let (header, body) = split_header(area);
    let halves = |rect: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rect)
    };
    let header_halves = halves(header);
    draw_header(frame, left, header_halves[0], theme);
    draw_header(frame, right, header_halves[1], theme);

    let rows = align(left, right);
    let height_of = |item: Option<ReplayItem<'_>>| item.map_or(3, |i| field::field_height(i.question));
    let heights: Vec<u16> = rows
        .iter()
        .map(|row| height_of(row.left).max(height_of(row.right)))
        .collect();
    let total = field::total_height(&heights);
    *scroll = (*scroll).min(total.saturating_sub(body.height));

    for (index, rect) in field::place(&heights, *scroll, body) {
        let row = &rows[index];
        let sides = halves(rect);
        draw_item(frame, row.left.as_ref(), sides[0], theme);
        draw_item(frame, row.right.as_ref(), sides[1], theme);
    }
    field::draw_scrollbar(frame, body, total, *scroll);
}

fn draw_item(frame: &mut Frame, item: Option<&ReplayItem<'_>>, area: Rect, theme: &Theme) {
    match item {
        Some(item) => {
            let view = FieldView::read_only(item.label(), item.question, item.value);
            field::draw_field(frame, &view, area, theme);
        }
        None => {
            let placeholder = Paragraph::new("(not in this form)")
                .style(Style::default().fg(theme.disabled))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(theme.disabled)),
                );
            frame.render_widget(placeholder, area);
        }
    }
}

/// Full-screen viewer over a list of answers.
#[derive(Debug, Clone)]
pub struct ComparisonScreen {
    state: ComparisonState,
    theme: Theme,
}

impl ComparisonScreen {
    pub fn new(candidates: Vec<PersistedAnswer>) -> Self {
        Self {
            state: ComparisonState::new(candidates),
            theme: Theme::default(),
        }
    }

    /// Set a custom color theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Start with a single answer on screen.
    pub fn showing(mut self, id: AnswerId) -> Self {
        self.state.show_single(id);
        self
    }

    /// Run until the user leaves the screen.
    pub fn run(mut self) -> Result<(), AnswerTuiError> {
        let mut terminal = setup_terminal()?;

        let result = (|| -> Result<(), AnswerTuiError> {
            loop {
                terminal.draw(|frame| draw_comparison(frame, &mut self.state, &self.theme))?;
                if let Event::Key(key) = event::read()?
                    && self.state.handle_key(key) == CompareAction::Quit
                {
                    return Ok(());
                }
            }
        })();

        restore_terminal(&mut terminal)?;
        result
    }
}
