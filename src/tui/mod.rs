//! Terminal front end: the session state, its rendering, and the loop that
//! feeds key presses to the dashboard.

pub mod app;
mod events;
pub mod headless;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use events::Event;

use crate::app::{Action, Dashboard};
use crate::error::{DashError, Result};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::panic;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

fn terminal_error(action: &'static str) -> impl Fn(io::Error) -> DashError {
    move |e| DashError::internal(format!("Failed to {action}: {e}"))
}

/// Leaves raw mode and the alternate screen, ignoring failures.
fn release_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Runs `release` before the existing panic hook. Dropping the guard puts the
/// existing hook back.
struct PanicGuard {
    restore: Option<Box<dyn FnOnce() + Send>>,
}

impl PanicGuard {
    fn install(release: fn()) -> Self {
        let previous: Arc<dyn Fn(&panic::PanicHookInfo<'_>) + Sync + Send + 'static> =
            Arc::from(panic::take_hook());
        let chained = Arc::clone(&previous);
        panic::set_hook(Box::new(move |info| {
            release();
            chained(info);
        }));
        Self {
            restore: Some(Box::new(move || {
                panic::set_hook(Box::new(move |info| previous(info)));
            })),
        }
    }
}

impl Drop for PanicGuard {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

/// The dashboard's hold on the real terminal. Dropping it hands the terminal back.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Switches the terminal to raw mode on the alternate screen.
    pub fn enter() -> Result<Self> {
        enable_raw_mode().map_err(terminal_error("enable raw mode"))?;
        execute!(io::stdout(), EnterAlternateScreen)
            .map_err(terminal_error("enter the alternate screen"))?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
            .map_err(terminal_error("create the terminal"))?;
        Ok(Self { terminal })
    }

    /// Runs until the user quits. Queries run inline, so input waits on them.
    pub async fn run(&mut self, app: &mut App, dashboard: &Dashboard) -> Result<()> {
        let _guard = PanicGuard::install(release_terminal);
        self.event_loop(app, dashboard).await
    }

    async fn event_loop(&mut self, app: &mut App, dashboard: &Dashboard) -> Result<()> {
        if let Some(action) = app.initial_action() {
            self.perform(app, dashboard, action).await?;
        }

        while app.running {
            self.draw(app)?;
            if let Some(action) = app.handle_event(events::poll(POLL_TIMEOUT)?) {
                self.perform(app, dashboard, action).await?;
            }
        }
        Ok(())
    }

    /// Shows the running indicator while `action` executes, then stores its outcome.
    async fn perform(&mut self, app: &mut App, dashboard: &Dashboard, action: Action) -> Result<()> {
        app.is_processing = true;
        self.draw(app)?;

        app.apply(dashboard.dispatch(action).await);
        app.is_processing = false;
        Ok(())
    }

    fn draw(&mut self, app: &App) -> Result<()> {
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map(|_| ())
            .map_err(terminal_error("draw"))
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        release_terminal();
        let _ = self.terminal.show_cursor();
    }
}

/// Runs the dashboard in the terminal.
pub async fn run(mut app: App, dashboard: Dashboard) -> Result<()> {
    info!("Starting dashboard for {}", dashboard.target());
    let mut tui = Tui::enter()?;
    tui.run(&mut app, &dashboard).await
}
