//! Interactive terminal dashboard.

pub mod app;
pub mod colors;
pub mod search;
pub mod table;
pub mod ui;

pub use app::{App, Focus};

use crate::api::HttpApi;
use crate::AppConfig;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::Arc;

/// Raw mode plus alternate screen, restored on drop even if the loop errors
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the dashboard against the configured API until the user quits
pub fn run(config: &AppConfig) -> crate::Result<()> {
    let api = HttpApi::new(&config.api_url, config.request_timeout)?;
    tracing::info!(
        api = %api.base_url(),
        page_size = config.dashboard.page_size,
        debounce_ms = config.dashboard.debounce.as_millis() as u64,
        stale_policy = ?config.dashboard.stale_policy,
        "starting dashboard"
    );

    let label = api.base_url().to_string();
    let mut app = App::new(Arc::new(api), config.dashboard.clone(), label);

    let mut guard = TerminalGuard::enter()?;
    app.run(&mut guard.terminal)
}
