//! State types for the dashboard.
//!
//! These types are independent of rendering and can be tested in isolation.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use cohortscope::export::ExportFormat;

/// Spinner animation frames shown while a fetch cycle is loading.
pub const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Events that can occur in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    /// User requested quit (Ctrl+C, Esc or 'q').
    Quit,
    /// Switch to the next catalog measurement.
    NextMeasurement,
    /// Re-run the current selection.
    Refresh,
    /// Export the committed box plot.
    Export(ExportFormat),
}

impl DashboardEvent {
    /// Map a key press to a dashboard event.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => Some(DashboardEvent::Quit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(DashboardEvent::Quit),
            KeyCode::Char('m') | KeyCode::Char('M') => Some(DashboardEvent::NextMeasurement),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(DashboardEvent::Refresh),
            KeyCode::Char('p') | KeyCode::Char('P') => {
                Some(DashboardEvent::Export(ExportFormat::Png))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                Some(DashboardEvent::Export(ExportFormat::Pdf))
            }
            _ => None,
        }
    }
}

/// A one-line notice shown in the status bar until replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

/// UI-side state that does not come from the refresh orchestrator.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Logged-in user shown in the header.
    pub user: String,
    /// Latest export result.
    pub notice: Option<Notice>,
    spinner_frame: usize,
}

impl DashboardState {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            notice: None,
            spinner_frame: 0,
        }
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error: true,
        });
    }

    /// Advance and return the spinner frame.
    pub fn tick_spinner(&mut self) -> char {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        SPINNER_FRAMES[self.spinner_frame]
    }
}
