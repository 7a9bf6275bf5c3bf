//! Terminal dashboard for cohort comparison.
//!
//! Displays the latest committed snapshot of the refresh orchestrator:
//! patient counts, the age/sex distribution and summary statistics.
//!
//! # Module Structure
//!
//! - `state` - Events and UI-side state (no rendering dependencies)
//! - `render` - Layout and section rendering

mod render;
pub mod state;

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use cohortscope::refresh::DashboardSnapshot;

pub use state::{DashboardEvent, DashboardState, SPINNER_FRAMES};

/// How long `poll_event` waits for a key before returning.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The main dashboard UI.
pub struct Dashboard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    shutdown: Arc<AtomicBool>,
    state: DashboardState,
}

impl Dashboard {
    /// Take over the terminal.
    pub fn new(state: DashboardState, shutdown: Arc<AtomicBool>) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            shutdown,
            state,
        })
    }

    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    /// Restore terminal to normal state.
    pub fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Draw the dashboard for `snapshot`.
    pub fn draw(&mut self, snapshot: &DashboardSnapshot) -> io::Result<()> {
        let spinner = if snapshot.is_loading() {
            self.state.tick_spinner()
        } else {
            SPINNER_FRAMES[0]
        };

        let state = &self.state;
        self.terminal.draw(|frame| {
            render::render_ui(frame, snapshot, state, spinner);
        })?;

        Ok(())
    }

    /// Wait up to the poll interval for the next event.
    pub fn poll_event(&mut self) -> io::Result<Option<DashboardEvent>> {
        // Check shutdown flag first (e.g., SIGINT from outside the terminal)
        if self.shutdown.load(Ordering::SeqCst) {
            return Ok(Some(DashboardEvent::Quit));
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(DashboardEvent::from_key(key));
                }
            }
        }

        Ok(None)
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
