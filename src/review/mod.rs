//! Interactive review of suggested tags.
//!
//! A full-screen checklist built with ratatui and crossterm. Every suggested
//! tag starts selected; the user toggles tags and confirms or cancels. The
//! dialog only reports the decision; writing the note is left to the caller.

use std::io;
use std::panic;
use std::sync::Once;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

mod app;
pub mod event;
mod ui;

pub use app::{Candidate, ReviewApp, ReviewOutcome};

use crate::service::Suggestion;

type ReviewTerminal = Terminal<CrosstermBackend<io::Stdout>>;

static PANIC_HOOK: Once = Once::new();

/// Shows the review dialog for `suggestion` and waits for a decision.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up, drawn to or read
/// from. Terminal state is restored in every case, including panics.
pub fn run_review(suggestion: &Suggestion) -> Result<ReviewOutcome> {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let _ = leave_screen();
            previous(info);
        }));
    });

    let mut app = ReviewApp::new(suggestion);
    let mut session = ScreenSession::enter()?;
    run_event_loop(&mut app, &mut session.terminal).context("Review dialog failed")?;
    drop(session);

    Ok(app.into_outcome())
}

/// Raw mode plus the alternate screen, left again on drop.
struct ScreenSession {
    terminal: ReviewTerminal,
}

impl ScreenSession {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;

        let terminal = execute!(io::stdout(), EnterAlternateScreen)
            .context("failed to enter alternate screen")
            .and_then(|()| {
                Terminal::new(CrosstermBackend::new(io::stdout()))
                    .context("failed to create terminal")
            });

        match terminal {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = leave_screen();
                Err(e)
            }
        }
    }
}

impl Drop for ScreenSession {
    fn drop(&mut self) {
        if let Err(e) = leave_screen().and_then(|()| self.terminal.show_cursor()) {
            warn!(error = %e, "failed to restore terminal");
        }
    }
}

fn leave_screen() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

fn run_event_loop(app: &mut ReviewApp, terminal: &mut ReviewTerminal) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            ui::draw(frame, app);
        })?;

        if crossterm_event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = crossterm_event::read()?
            && key.kind == KeyEventKind::Press
            && event::handle_key_event(app, key)
        {
            break;
        }
    }

    Ok(())
}
