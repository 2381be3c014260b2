//! Terminal setup and teardown
//!
//! This module handles initializing and restoring the terminal state,
//! including setting up the panic hook to restore the terminal on crash.

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::config::Settings;
use crate::wizard::WizardController;

use super::app::App;
use super::event::{Event, EventHandler};
use super::handler::handle_event;

/// Type alias for our terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal_impl();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    restore_terminal_impl()?;
    Ok(())
}

fn restore_terminal_impl() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the wizard until the user quits
///
/// Extractions run on `runtime` while the screen shows a busy overlay; keys
/// pressed in the meantime are dropped.
pub fn run_tui(
    controller: WizardController,
    settings: &Settings,
    runtime: &Runtime,
    initial_image: Option<PathBuf>,
) -> Result<()> {
    let mut terminal = init_terminal()?;
    let result = event_loop(&mut terminal, controller, settings, runtime, initial_image);
    restore_terminal()?;
    result
}

fn event_loop(
    terminal: &mut Tui,
    controller: WizardController,
    settings: &Settings,
    runtime: &Runtime,
    initial_image: Option<PathBuf>,
) -> Result<()> {
    let mut app = App::new(controller, settings);
    if let Some(path) = initial_image {
        app.image_input.set_value(path.display().to_string());
        app.request_extraction();
    }

    let events = EventHandler::default();

    loop {
        terminal.draw(|frame| super::views::render(frame, &mut app))?;

        if let Some(path) = app.pending_extraction.take() {
            runtime.block_on(app.run_extraction(path));
            let dropped = events.drain();
            debug!(dropped, "input discarded after extraction");
            continue;
        }

        match events.next()? {
            Event::Key(key_event) => handle_event(&mut app, Event::Key(key_event))?,
            Event::Resize(_, _) => {}
            Event::Tick => app.notifications.remove_expired(),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
