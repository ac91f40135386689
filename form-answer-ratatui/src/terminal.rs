use std::io::{self, Stdout};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use form_answer::{AnswerId, EngineError};
use ratatui::{Terminal, prelude::CrosstermBackend};
use thiserror::Error;

pub(crate) type Term = Terminal<CrosstermBackend<Stdout>>;

/// Error type for the terminal screens.
#[derive(Debug, Error)]
pub enum AnswerTuiError {
    /// User left the screen (e.g., pressed Esc) without submitting.
    #[error("Cancelled by user")]
    Cancelled,

    /// User left while a submission was in flight; it may or may not have been stored.
    #[error("Left during submission of answer {0}; outcome unknown")]
    SubmitAbandoned(AnswerId),

    /// The engine refused an action or the backend failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) fn setup_terminal() -> Result<Term, AnswerTuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

pub(crate) fn restore_terminal(terminal: &mut Term) -> Result<(), AnswerTuiError> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
