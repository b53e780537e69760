pub mod app;
pub mod ui;

use std::io;
use std::path::Path;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::error;

use crate::clock::AppClock;
use crate::commands::open;
use crate::error::Result;
use app::{App, InputField, InputMode};
use ui::ui;

/// Runs the interactive UI on the database at `db`, saving on quit.
pub fn run_tui(db: &Path, clock: AppClock) -> Result<()> {
    let session = open(db, clock)?;
    let mut app = App::new(session);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    finish(&app, res)
}

/// Saves the session, then reports how the UI loop ended.
fn finish(app: &App, res: io::Result<()>) -> Result<()> {
    if let Err(err) = &res {
        error!(%err, "ui loop failed");
    }
    let saved = app.session.exit();
    res?;
    saved
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Tab => app.next_view(),
                    KeyCode::BackTab => app.previous_view(),
                    KeyCode::Char(' ') => app.toggle_selected(),
                    KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                    KeyCode::Char('u') => app.undo(),
                    KeyCode::Char('a') => app.start_add(),
                    KeyCode::Char('/') => app.start_search(),
                    KeyCode::Char('n') => app.start_edit(InputField::Name),
                    KeyCode::Char('g') => app.start_edit(InputField::Category),
                    KeyCode::Char('s') => app.start_edit(InputField::Start),
                    KeyCode::Char('t') => app.start_edit(InputField::Due), // 't' for Time/Date
                    KeyCode::Char('f') => app.make_selected_floating(),
                    KeyCode::Esc => app.clear_search(),
                    _ => {}
                },
                InputMode::Editing | InputMode::Adding | InputMode::Searching => match key.code {
                    KeyCode::Enter => app.handle_input(),
                    KeyCode::Esc => app.cancel_input(),
                    KeyCode::Char(c) => {
                        app.input_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        app.input_buffer.pop();
                    }
                    _ => {}
                },
            }
        }
    }
}
