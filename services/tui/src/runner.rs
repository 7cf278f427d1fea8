//! Terminal lifecycle and the draw/event loop.
//!
//! The terminal is restored (raw mode off, main screen back) on normal exit,
//! on error, and on panic.

use std::io::{self, Stdout};
use std::time::Duration;

use careers_intake::error::AppError;
use careers_intake::forms::FormDefinition;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::debug;

use crate::app::FormApp;
use crate::ui;

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub(crate) async fn run_form(
    definition: FormDefinition,
    delay: Duration,
    reset_on_submit: bool,
) -> Result<(), AppError> {
    debug!(form = %definition.name, "opening form");
    install_panic_hook();

    let mut terminal = setup_terminal()?;
    let app = FormApp::new(definition, delay, reset_on_submit);
    let result = event_loop(&mut terminal, app).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: FormApp,
) -> Result<(), AppError> {
    loop {
        app.poll_submission();
        terminal.draw(|frame| ui::draw(frame, &app))?;

        if app.should_quit() {
            return Ok(());
        }

        if event::poll(EVENT_POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
        // Let the submission timer make progress between polls.
        tokio::task::yield_now().await;
    }
}
