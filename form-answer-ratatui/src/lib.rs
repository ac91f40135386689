//! # form-answer-ratatui
//!
//! Terminal screens for form-answer.
//!
//! Two full-screen views share one input renderer (one widget per question
//! kind, editable or locked):
//! - `AnswerEditor` shows every question of a form on a scrollable page and
//!   submits the draft once the validation gate passes. Tab/Shift+Tab or the
//!   arrow keys move between questions.
//! - `ComparisonScreen` lists answers and replays one, or two side by side,
//!   read-only.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use form_answer::{AnswerSession, MemoryApi};
//! use form_answer_ratatui::AnswerEditor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let api = MemoryApi::new().with_answer(answer);
//!     let mut session = AnswerSession::load(&api, form_id, answer_id).await?;
//!     let stored = AnswerEditor::new().run(&mut session, &api).await?;
//!     println!("{stored:#?}");
//!     Ok(())
//! }
//! ```

mod compare;
mod editor;
mod field;
mod terminal;
mod theme;

pub use compare::{CompareAction, ComparisonScreen, ComparisonState, draw_comparison};
pub use editor::{AnswerEditor, EditorAction, EditorState, Status, draw_editor};
pub use field::{FieldView, Mode, draw_field, field_height};
pub use terminal::AnswerTuiError;
pub use theme::Theme;
