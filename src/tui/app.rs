use crate::api::IncidentsApi;
use crate::dashboard::{Command, Completion, Dashboard, DetailView};
use crate::tui::search::SearchInput;
use crate::tui::table::TableState;
use crate::tui::ui;
use crate::DashboardConfig;
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Which pane receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Results,
}

pub struct App {
    pub dashboard: Dashboard,

    // Sub-states
    pub search: SearchInput,
    pub table: TableState,
    pub focus: Focus,

    pub status_message: String,
    pub api_label: String,

    api: Arc<dyn IncidentsApi>,

    // Completions from request threads
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: usize,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    pub fn new(
        api: Arc<dyn IncidentsApi>,
        config: DashboardConfig,
        api_label: impl Into<String>,
    ) -> Self {
        let (tx, rx) = unbounded();
        Self {
            dashboard: Dashboard::new(config),
            search: SearchInput::default(),
            table: TableState::default(),
            focus: Focus::Search,
            status_message: "Type an address to search".to_string(),
            api_label: api_label.into(),
            api,
            tx,
            rx,
            in_flight: 0,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> crate::Result<()> {
        let tick_rate = Duration::from_millis(50);

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            // Wake up in time for a pending debounce deadline
            let mut timeout = tick_rate;
            if let Some(due) = self.dashboard.next_deadline() {
                timeout = timeout.min(due.saturating_duration_since(Instant::now()));
            }

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            self.process_messages();
            self.tick(Instant::now());

            if self.should_quit {
                tracing::info!("dashboard closed");
                return Ok(());
            }
        }
    }

    /// Fire the debounced autocomplete request if its quiet period is over
    pub fn tick(&mut self, now: Instant) {
        if let Some(cmd) = self.dashboard.poll_debounce(now) {
            self.execute(cmd);
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Run a command on its own thread; the outcome comes back over the channel
    fn execute(&mut self, cmd: Command) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.in_flight += 1;

        thread::spawn(move || {
            let completion = match cmd {
                Command::FetchSuggestions { query } => {
                    let result = api.suggest_addresses(&query);
                    Completion::Suggestions { query, result }
                }
                Command::FetchIncidents(request) => {
                    let result = api.list_incidents(&request.address, request.skip, request.limit);
                    Completion::Incidents { request, result }
                }
                Command::FetchIncident { id } => {
                    let result = api.get_incident(id);
                    Completion::Incident { id, result }
                }
            };
            let _ = tx.send(completion);
        });
    }

    fn execute_opt(&mut self, cmd: Option<Command>) {
        if let Some(cmd) = cmd {
            self.execute(cmd);
        }
    }

    /// Drain finished requests into the dashboard without blocking
    pub fn process_messages(&mut self) {
        while let Ok(completion) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.apply(completion);
        }
    }

    /// Block up to `timeout` for one finished request
    pub fn wait_for_message(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.apply(completion);
                true
            }
            Err(_) => false,
        }
    }

    fn apply(&mut self, completion: Completion) {
        let is_page = matches!(completion, Completion::Incidents { .. });
        let applied = self.dashboard.apply(completion);
        let state = self.dashboard.state();

        if applied {
            self.table.reset(state.incidents.len());
            self.status_message = format!(
                "Page {} of results for {}",
                state.page_number(self.dashboard.config().page_size),
                state.selected_address
            );
        } else if is_page && !state.loading && state.no_results {
            self.status_message = format!("Could not load incidents for {}", state.selected_address);
        }

        if let DetailView::Failed { message, .. } = &self.dashboard.state().detail {
            self.status_message = message.clone();
        }
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.handle_key_at(key, Instant::now());
    }

    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global keys
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('u') if ctrl => {
                let cmd = self.dashboard.clear_selection();
                self.execute_opt(cmd);
                self.search.cursor_pos = 0;
                self.table.reset(0);
                self.status_message = "Selection cleared".to_string();
                return;
            }
            KeyCode::F(5) => {
                let cmd = self.dashboard.refresh();
                self.execute_opt(cmd);
                return;
            }
            _ => {}
        }

        if self.dashboard.state().detail.is_open() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.dashboard.close_detail();
            }
            return;
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key, now),
            Focus::Results => self.handle_results_key(key, now),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        let has_suggestions = !self.dashboard.state().suggestions.is_empty();

        match key.code {
            KeyCode::Esc => {
                if self.dashboard.state().search_text.is_empty() {
                    self.should_quit = true;
                } else {
                    self.search.cursor_pos = 0;
                    self.dashboard.input_changed(String::new(), now);
                }
            }
            KeyCode::Up if has_suggestions => self.dashboard.move_suggestion_cursor(-1),
            KeyCode::Down if has_suggestions => self.dashboard.move_suggestion_cursor(1),
            KeyCode::Enter if has_suggestions => {
                let cmd = self.dashboard.select_highlighted_suggestion();
                self.search.cursor_to_end(&self.dashboard.state().search_text);
                self.execute_opt(cmd);
            }
            KeyCode::Tab | KeyCode::Down => {
                if !self.dashboard.state().incidents.is_empty() {
                    self.focus = Focus::Results;
                }
            }
            _ => {
                let mut text = self.dashboard.state().search_text.clone();
                if self.search.edit(&mut text, key) {
                    self.dashboard.input_changed(text, now);
                }
            }
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent, now: Instant) {
        let total = self.dashboard.state().incidents.len();

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.table.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.table.select_next(total),
            KeyCode::Home => self.table.select_first(),
            KeyCode::End => self.table.select_last(total),

            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('p') => {
                let cmd = self.dashboard.prev_page();
                self.execute_opt(cmd);
            }
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('n') => {
                let cmd = self.dashboard.next_page();
                self.execute_opt(cmd);
            }

            KeyCode::Enter => {
                let state = self.dashboard.state();
                if let Some(id) = self
                    .table
                    .selected_within(total)
                    .map(|i| state.incidents[i].id)
                {
                    let cmd = self.dashboard.open_detail(id);
                    self.execute(cmd);
                }
            }

            KeyCode::Tab | KeyCode::Esc | KeyCode::Char('/') => {
                self.focus = Focus::Search;
            }

            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.focus = Focus::Search;
                let mut text = self.dashboard.state().search_text.clone();
                text.push(c);
                self.search.cursor_to_end(&text);
                self.dashboard.input_changed(text, now);
            }

            _ => {}
        }
    }
}
