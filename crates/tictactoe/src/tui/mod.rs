//! Terminal front end.

mod app;
mod input;
mod ui;

use std::io;
use std::ops::ControlFlow;
use std::pin::pin;

use anyhow::Result;
use crossterm::{
    cursor,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::{Stream, StreamExt};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use tictactoe_engine::{MoveOutcome, MoveSelector, Position, RandomSelector};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Settings;
use crate::session::{Session, SessionEvent};

use app::App;
use input::{Action, action_for, move_cursor};

/// Runs the game until the user quits.
#[instrument(skip_all, fields(mode = %settings.mode()))]
pub async fn run_tui(settings: Settings) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let selector = match settings.seed() {
        Some(seed) => RandomSelector::seeded(*seed),
        None => RandomSelector::from_entropy(),
    };
    let mut session = Session::from_settings(&settings, selector, event_tx);

    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    info!("Terminal ready, entering game loop");
    let res = run_loop(&mut terminal, &mut session, event_rx, EventStream::new()).await;
    drop(guard);

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

/// Raw mode plus alternate screen, restored on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        // Raw mode is on, so every later failure must go through Drop.
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!(error = %e, "Failed to leave raw mode");
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show) {
            warn!(error = %e, "Failed to leave alternate screen");
        }
    }
}

/// Redraws on every key press and every session event, whichever comes first.
async fn run_loop<B, S, I>(
    terminal: &mut Terminal<B>,
    session: &mut Session<S>,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    input: I,
) -> Result<()>
where
    B: Backend,
    B::Error: std::error::Error + Send + Sync + 'static,
    S: MoveSelector + Send + 'static,
    I: Stream<Item = io::Result<Event>>,
{
    let mut input = pin!(input);
    let mut app = App::new(session.snapshot(), session.mode());

    loop {
        app.refresh(session.snapshot(), session.mode());
        terminal.draw(|frame| ui::draw(frame, &app))?;

        tokio::select! {
            Some(event) = events.recv() => app.handle_event(&event),
            next = input.next() => match next {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_key(session, &mut app, key.code).is_break() {
                        info!("User quit");
                        return Ok(());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => {
                    info!("Input closed");
                    return Ok(());
                }
            },
        }
    }
}

fn handle_key<S>(session: &mut Session<S>, app: &mut App, code: KeyCode) -> ControlFlow<()>
where
    S: MoveSelector + Send + 'static,
{
    match action_for(code) {
        Some(Action::Quit) => return ControlFlow::Break(()),
        Some(Action::Place(index)) => {
            if let Some(pos) = Position::from_index(index) {
                app.set_cursor(pos);
            }
            place(session, app, index);
        }
        Some(Action::PlaceAtCursor) => {
            let index = app.cursor().to_index();
            place(session, app, index);
        }
        Some(Action::Cursor(code)) => app.set_cursor(move_cursor(app.cursor(), code)),
        Some(Action::Reset) => session.reset(),
        Some(Action::ToggleMode) => session.set_mode(session.mode().toggle()),
        None => debug!(?code, "Unmapped key"),
    }
    ControlFlow::Continue(())
}

fn place<S>(session: &mut Session<S>, app: &mut App, index: usize)
where
    S: MoveSelector + Send + 'static,
{
    match session.human_move(index) {
        Ok(MoveOutcome::Applied { .. }) => app.clear_notice(),
        Ok(MoveOutcome::Ignored(reason)) => app.set_notice(reason.to_string()),
        Err(e) => {
            warn!(error = %e, "Move rejected");
            app.set_notice(e.to_string());
        }
    }
}
