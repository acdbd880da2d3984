use anyhow::Result;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::tui::app::{App, UiEvent};
use crate::tui::render::render_ui;
use crate::upload::Uploaded;
use crate::utils::TempfilesError;

/// Run the terminal UI
///
/// Returns the finished upload, if the user got that far.
pub async fn run_ui(
    mut app: App,
    mut events: mpsc::Receiver<UiEvent>,
    tick_rate: Duration,
) -> Result<Option<Uploaded>> {
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("tempfiles requires an interactive terminal for the upload form.");
        eprintln!("   Use `tempfiles upload <PATH>` or `tempfiles paste` in scripts.");
        return Err(
            TempfilesError::UIError("No interactive terminal available".to_string()).into(),
        );
    }

    // Setup terminal; bracketed paste is how dropped files arrive
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let res = run_app(&mut terminal, &mut app, &mut events, tick_rate).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("UI loop failed: {:?}", err);
        return Err(err);
    }

    Ok(app.uploaded().cloned())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut mpsc::Receiver<UiEvent>,
    tick_rate: Duration,
) -> Result<()> {
    info!("upload form opened");

    while app.running {
        terminal.draw(|f| render_ui(f, app))?;

        // Handle input events
        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Paste(pasted) => app.handle_paste(&pasted),
                _ => {}
            }
        }

        // Apply finished previews and uploads
        while let Ok(event) = events.try_recv() {
            app.handle_event(event);
        }
    }

    Ok(())
}
