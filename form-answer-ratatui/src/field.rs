//! The input renderer: one widget per question kind, editable or locked.
//!
//! The same layout serves the live editor and read-only replays; only the
//! source of the value and the [`Mode`] differ.

use form_answer::{AnswerValue, Question, QuestionKind};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use crate::Theme;

/// Extra vertical space between two questions.
pub(crate) const FIELD_SPACING: u16 = 1;

/// Whether a rendered question accepts input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Editable,
    /// Controls are locked; the value comes from a decoded persisted answer.
    ReadOnly,
}

/// Everything needed to draw one question.
#[derive(Debug, Clone)]
pub struct FieldView<'a> {
    /// `"<index+1>) <title>"`.
    pub label: String,
    pub question: &'a Question,
    pub value: Option<&'a AnswerValue>,
    pub mode: Mode,
    pub focused: bool,
    /// Highlighted alternative, for choice questions.
    pub highlight: usize,
    /// Cursor position in characters, for long-text questions.
    pub cursor: usize,
}

impl<'a> FieldView<'a> {
    /// A locked view of a replayed answer.
    pub fn read_only(label: String, question: &'a Question, value: Option<&'a AnswerValue>) -> Self {
        Self {
            label,
            question,
            value,
            mode: Mode::ReadOnly,
            focused: false,
            highlight: 0,
            cursor: 0,
        }
    }
}

/// Rows a question occupies, borders included.
pub fn field_height(question: &Question) -> u16 {
    match &question.kind {
        QuestionKind::LongText => 3,
        QuestionKind::MultipleChoice { alternatives } | QuestionKind::SingleChoice { alternatives } => {
            2 + alternatives.len().max(1) as u16
        }
    }
}

pub fn draw_field(frame: &mut Frame, view: &FieldView<'_>, area: Rect, theme: &Theme) {
    let answered = view.value.is_some_and(|v| view.question.is_answered_by(v));
    let editable = view.mode == Mode::Editable;

    let border_color = if view.focused {
        theme.primary
    } else if editable && answered {
        theme.success
    } else {
        theme.border
    };
    let title = if editable && answered {
        format!(" {} ✓ ", view.label)
    } else {
        format!(" {} ", view.label)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title)
        .title_style(Style::default().fg(if view.focused {
            theme.highlight
        } else {
            theme.text
        }));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &view.question.kind {
        QuestionKind::LongText => draw_long_text(frame, view, inner, theme),
        QuestionKind::SingleChoice { alternatives } | QuestionKind::MultipleChoice { alternatives }
            if alternatives.is_empty() =>
        {
            let text = Paragraph::new("(no alternatives, cannot be answered)")
                .style(Style::default().fg(theme.error));
            frame.render_widget(text, inner);
        }
        QuestionKind::SingleChoice { alternatives } => {
            draw_choices(frame, view, inner, theme, alternatives, ("(●)", "( )"));
        }
        QuestionKind::MultipleChoice { alternatives } => {
            draw_choices(frame, view, inner, theme, alternatives, ("[✓]", "[ ]"));
        }
    }
}

fn draw_long_text(frame: &mut Frame, view: &FieldView<'_>, inner: Rect, theme: &Theme) {
    let text = view.value.and_then(AnswerValue::as_text).unwrap_or_default();

    if view.mode == Mode::ReadOnly {
        let paragraph = if view.value.is_some() {
            Paragraph::new(format!("R: {text}")).style(Style::default().fg(theme.text))
        } else {
            Paragraph::new("(no answer)").style(Style::default().fg(theme.disabled))
        };
        frame.render_widget(paragraph, inner);
        return;
    }

    let width = usize::from(inner.width.max(1));
    let skip = (view.cursor + 1).saturating_sub(width);
    let visible: String = text.chars().skip(skip).take(width).collect();
    frame.render_widget(
        Paragraph::new(visible).style(Style::default().fg(theme.text)),
        inner,
    );

    if view.focused {
        let cursor_x = inner.x + (view.cursor - skip) as u16;
        if cursor_x < inner.x + inner.width {
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }
}

fn draw_choices(
    frame: &mut Frame,
    view: &FieldView<'_>,
    inner: Rect,
    theme: &Theme,
    alternatives: &[String],
    (on, off): (&str, &str),
) {
    let editable = view.mode == Mode::Editable;
    let items: Vec<ListItem> = alternatives
        .iter()
        .enumerate()
        .map(|(idx, alternative)| {
            let picked = view.value.is_some_and(|v| v.is_picked(alternative));
            let marker = if picked { on } else { off };
            let style = if editable && view.focused && idx == view.highlight {
                Style::default()
                    .fg(if picked { theme.success } else { theme.text })
                    .bg(theme.selected_bg)
                    .add_modifier(Modifier::BOLD)
            } else if picked {
                Style::default().fg(theme.highlight)
            } else if editable {
                Style::default().fg(theme.text)
            } else {
                Style::default().fg(theme.disabled)
            };
            ListItem::new(format!("{marker} {alternative}")).style(style)
        })
        .collect();
    frame.render_widget(List::new(items), inner);
}

/// Virtual y offset of every field in a scrolled column, spacing included.
pub(crate) fn offsets(heights: &[u16]) -> Vec<u16> {
    let mut y = 0;
    heights
        .iter()
        .map(|h| {
            let top = y;
            y += h + FIELD_SPACING;
            top
        })
        .collect()
}

pub(crate) fn total_height(heights: &[u16]) -> u16 {
    let sum: u16 = heights.iter().sum();
    sum + FIELD_SPACING * heights.len().saturating_sub(1) as u16
}

/// Adjust `scroll` so that field `index` is fully inside a viewport of `viewport` rows.
pub(crate) fn scroll_to(heights: &[u16], index: usize, scroll: u16, viewport: u16) -> u16 {
    let Some((&top, &height)) = offsets(heights).get(index).zip(heights.get(index)) else {
        return scroll;
    };
    if top < scroll {
        top
    } else if top + height > scroll + viewport {
        (top + height).saturating_sub(viewport)
    } else {
        scroll
    }
}

/// Screen areas of the fields visible at `scroll`, as `(index, area)`.
///
/// Fields cut off at the top are skipped; a field cut off at the bottom gets
/// whatever rows remain.
pub(crate) fn place(heights: &[u16], scroll: u16, area: Rect) -> Vec<(usize, Rect)> {
    let width = area.width.saturating_sub(2);
    offsets(heights)
        .into_iter()
        .zip(heights)
        .enumerate()
        .filter(|(_, (top, _))| *top >= scroll && *top < scroll + area.height)
        .map(|(index, (top, height))| {
            let y = top - scroll;
            let visible = (*height).min(area.height - y);
            (index, Rect::new(area.x + 1, area.y + y, width, visible))
        })
        .collect()
}

pub(crate) fn draw_scrollbar(frame: &mut Frame, area: Rect, total: u16, scroll: u16) {
    if total <= area.height || area.width == 0 {
        return;
    }
    let scrollbar_area = Rect {
        x: area.x + area.width - 1,
        y: area.y,
        width: 1,
        height: area.height,
    };
    let mut state = ScrollbarState::new(total as usize)
        .position(scroll as usize)
        .viewport_content_length(area.height as usize);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("▲"))
        .end_symbol(Some("▼"))
        .track_symbol(Some("│"))
        .thumb_symbol("█");
    frame.render_stateful_widget(scrollbar, scrollbar_area, &mut state);
}
