//! Search, results and pagination controllers over one explicit state object.
//!
//! The [`Dashboard`] never touches the network itself. Operations that need
//! data return a [`Command`]; the runtime executes it and hands the outcome
//! back as a [`Completion`]. Every completion maps failures to a defined state
//! transition, so nothing here can fail.

mod state;

pub use state::{DashboardState, DetailView, PageRequest};

use crate::error::Result;
use crate::incident::Incident;
use crate::{Debouncer, DashboardConfig, StalePolicy};
use chrono::Local;
use std::time::Instant;

/// Work the runtime must perform on behalf of the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchSuggestions { query: String },
    FetchIncidents(PageRequest),
    FetchIncident { id: i64 },
}

/// Outcome of a [`Command`], tagged with what it was issued for
#[derive(Debug)]
pub enum Completion {
    Suggestions {
        query: String,
        result: Result<Vec<String>>,
    },
    Incidents {
        request: PageRequest,
        result: Result<Vec<Incident>>,
    },
    Incident {
        id: i64,
        result: Result<Incident>,
    },
}

pub struct Dashboard {
    config: DashboardConfig,
    state: DashboardState,
    debouncer: Debouncer<String>,
    /// Most recent autocomplete query sent out
    latest_query: Option<String>,
    /// Most recent page fetch sent out
    latest_page: Option<PageRequest>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let debouncer = Debouncer::new(config.debounce);
        Self {
            config,
            state: DashboardState::default(),
            debouncer,
            latest_query: None,
            latest_page: None,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Deadline of the pending autocomplete request, for sizing the event poll
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    // --- Search controller ---

    /// Record a new search box value and restart the quiet period
    pub fn input_changed(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.state.search_text = text.clone();
        self.debouncer.schedule(text, now);
    }

    /// Fire the debounced autocomplete request once its quiet period is over
    pub fn poll_debounce(&mut self, now: Instant) -> Option<Command> {
        let query = self.debouncer.poll(now)?;

        if query.chars().count() < self.config.min_query_chars {
            tracing::trace!(%query, "query too short, clearing suggestions");
            self.latest_query = None;
            self.set_suggestions(Vec::new());
            return None;
        }

        self.latest_query = Some(query.clone());
        Some(Command::FetchSuggestions { query })
    }

    pub fn apply_suggestions(&mut self, query: String, result: Result<Vec<String>>) {
        if self.config.stale_policy == StalePolicy::Discard
            && self.latest_query.as_deref() != Some(query.as_str())
        {
            tracing::debug!(%query, "discarding stale suggestions");
            return;
        }

        match result {
            Ok(suggestions) => {
                tracing::debug!(%query, count = suggestions.len(), "suggestions received");
                self.set_suggestions(suggestions);
            }
            Err(e) => {
                tracing::warn!(
                    %query,
                    kind = ?e.kind(),
                    recoverable = e.is_recoverable(),
                    error = %e,
                    "autocomplete failed"
                );
                self.set_suggestions(Vec::new());
            }
        }
    }

    pub fn move_suggestion_cursor(&mut self, delta: isize) {
        let len = self.state.suggestions.len();
        if len == 0 {
            return;
        }
        let cursor = self.state.suggestion_cursor.saturating_add_signed(delta);
        self.state.suggestion_cursor = cursor.min(len - 1);
    }

    /// Commit `address` as the filter. This is what starts a results fetch.
    pub fn select_suggestion(&mut self, address: impl Into<String>) -> Option<Command> {
        let address = address.into();
        tracing::info!(%address, "address selected");

        self.debouncer.cancel();
        self.latest_query = None;
        self.state.search_text = address.clone();
        self.set_suggestions(Vec::new());

        // Same address on the first page: what is shown is already current
        if self.state.selected_address == address && self.state.offset == 0 {
            return None;
        }

        self.state.selected_address = address;
        self.state.offset = 0;
        self.load_results()
    }

    pub fn select_highlighted_suggestion(&mut self) -> Option<Command> {
        let address = self.state.highlighted_suggestion()?.to_string();
        self.select_suggestion(address)
    }

    /// Forget the committed filter, which empties the results without a fetch
    pub fn clear_selection(&mut self) -> Option<Command> {
        self.debouncer.cancel();
        self.latest_query = None;
        self.state.search_text.clear();
        self.set_suggestions(Vec::new());
        self.state.selected_address.clear();
        self.state.offset = 0;
        self.load_results()
    }

    fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.state.suggestions = suggestions;
        self.state.suggestion_cursor = 0;
    }

    // --- Results controller ---

    /// Re-run the results fetch for the current address and offset
    pub fn refresh(&mut self) -> Option<Command> {
        self.load_results()
    }

    fn load_results(&mut self) -> Option<Command> {
        if !self.state.has_selection() {
            self.state.incidents.clear();
            self.state.no_results = false;
            self.state.loading = false;
            self.state.updated_at = None;
            self.latest_page = None;
            return None;
        }

        let request = self.current_request();
        tracing::debug!(address = %request.address, skip = request.skip, "fetching incidents");
        self.state.loading = true;
        self.latest_page = Some(request.clone());
        Some(Command::FetchIncidents(request))
    }

    fn current_request(&self) -> PageRequest {
        PageRequest {
            address: self.state.selected_address.clone(),
            skip: self.state.offset,
            limit: self.config.page_size,
        }
    }

    /// Apply a finished page fetch. Returns whether it changed the page.
    pub fn apply_incidents(&mut self, request: PageRequest, result: Result<Vec<Incident>>) -> bool {
        if self.config.stale_policy == StalePolicy::Discard
            && self.latest_page.as_ref() != Some(&request)
        {
            tracing::debug!(
                address = %request.address,
                skip = request.skip,
                "discarding stale incidents page"
            );
            return false;
        }

        let applied = match result {
            Ok(page) => {
                tracing::debug!(count = page.len(), skip = request.skip, "incidents received");
                self.state.no_results = page.is_empty();
                self.state.incidents = page;
                self.state.updated_at = Some(Local::now());
                true
            }
            Err(e) => {
                tracing::warn!(
                    address = %request.address,
                    skip = request.skip,
                    kind = ?e.kind(),
                    recoverable = e.is_recoverable(),
                    error = %e,
                    "incidents fetch failed"
                );
                self.state.no_results = true;
                false
            }
        };

        self.state.loading = false;
        applied
    }

    // --- Pagination controller ---

    pub fn has_prev(&self) -> bool {
        self.state.offset >= self.config.page_size
    }

    /// A full page is the only hint that more may exist
    pub fn has_next(&self) -> bool {
        self.state.incidents.len() == self.config.page_size
    }

    pub fn prev_page(&mut self) -> Option<Command> {
        if !self.has_prev() {
            return None;
        }
        self.state.offset -= self.config.page_size;
        self.load_results()
    }

    pub fn next_page(&mut self) -> Option<Command> {
        if !self.has_next() {
            return None;
        }
        self.state.offset += self.config.page_size;
        self.load_results()
    }

    // --- Detail panel ---

    pub fn open_detail(&mut self, id: i64) -> Command {
        self.state.detail = DetailView::Loading(id);
        Command::FetchIncident { id }
    }

    pub fn close_detail(&mut self) {
        self.state.detail = DetailView::Closed;
    }

    pub fn apply_detail(&mut self, id: i64, result: Result<Incident>) {
        if self.state.detail != DetailView::Loading(id) {
            tracing::debug!(id, "detail panel moved on, dropping response");
            return;
        }

        self.state.detail = match result {
            Ok(incident) => DetailView::Loaded(Box::new(incident)),
            Err(e) => {
                tracing::warn!(
                    id,
                    kind = ?e.kind(),
                    recoverable = e.is_recoverable(),
                    error = %e,
                    "incident detail fetch failed"
                );
                DetailView::Failed {
                    id,
                    message: e.to_string(),
                }
            }
        };
    }

    /// Route any completion to its handler
    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Suggestions { query, result } => {
                self.apply_suggestions(query, result);
                false
            }
            Completion::Incidents { request, result } => self.apply_incidents(request, result),
            Completion::Incident { id, result } => {
                self.apply_detail(id, result);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashError;
    use std::time::Duration;

    const QUIET: Duration = Duration::from_millis(300);

    fn dashboard() -> Dashboard {
        Dashboard::new(DashboardConfig::default())
    }

    fn incidents(n: usize) -> Vec<Incident> {
        (0..n)
            .map(|i| Incident {
                id: i as i64,
                address: Some("123 Main St".into()),
                ..Default::default()
            })
            .collect()
    }

    fn transport_error() -> DashError {
        DashError::Status {
            url: "http://test/incidents".into(),
            status: 503,
        }
    }

    fn page_request(cmd: Option<Command>) -> PageRequest {
        match cmd {
            Some(Command::FetchIncidents(request)) => request,
            other => panic!("expected incidents fetch, got {other:?}"),
        }
    }

    /// Select an address and answer its first page
    fn selected_with_page(n: usize) -> Dashboard {
        let mut dash = dashboard();
        let request = page_request(dash.select_suggestion("123 Main St"));
        dash.apply_incidents(request, Ok(incidents(n)));
        dash
    }

    #[test]
    fn short_input_clears_suggestions_without_request() {
        let t0 = Instant::now();
        let mut dash = dashboard();
        dash.state.suggestions = vec!["old".into()];

        for text in ["", "1", "é"] {
            dash.input_changed(text, t0);
            assert_eq!(dash.state().search_text, text);
            assert_eq!(dash.poll_debounce(t0 + QUIET), None);
            assert!(dash.state().suggestions.is_empty());
        }
    }

    #[test]
    fn one_request_per_quiet_period_with_latest_text() {
        let t0 = Instant::now();
        let mut dash = dashboard();

        dash.input_changed("1", t0);
        dash.input_changed("12", t0 + Duration::from_millis(100));
        assert_eq!(dash.poll_debounce(t0 + Duration::from_millis(350)), None);
        dash.input_changed("123", t0 + Duration::from_millis(360));

        assert_eq!(dash.poll_debounce(t0 + Duration::from_millis(659)), None);
        assert_eq!(
            dash.poll_debounce(t0 + Duration::from_millis(660)),
            Some(Command::FetchSuggestions { query: "123".into() })
        );
        assert_eq!(dash.poll_debounce(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn suggestions_replace_list_verbatim() {
        let t0 = Instant::now();
        let mut dash = dashboard();
        dash.input_changed("12", t0);
        let Some(Command::FetchSuggestions { query }) = dash.poll_debounce(t0 + QUIET) else {
            panic!("expected autocomplete request");
        };

        dash.apply_suggestions(query, Ok(vec!["123 Main St".into(), "125 Main St".into()]));
        assert_eq!(dash.state().suggestions, vec!["123 Main St", "125 Main St"]);
        assert_eq!(dash.state().highlighted_suggestion(), Some("123 Main St"));
    }

    #[test]
    fn autocomplete_failure_empties_suggestions() {
        let t0 = Instant::now();
        let mut dash = dashboard();
        dash.input_changed("12", t0);
        dash.poll_debounce(t0 + QUIET);
        dash.apply_suggestions("12".into(), Ok(vec!["123 Main St".into()]));

        dash.input_changed("123", t0 + Duration::from_secs(1));
        dash.poll_debounce(t0 + Duration::from_secs(2));
        dash.apply_suggestions("123".into(), Err(transport_error()));

        assert!(dash.state().suggestions.is_empty());
        assert_eq!(dash.state().search_text, "123");
    }

    #[test]
    fn stale_suggestions_are_discarded_by_default() {
        let t0 = Instant::now();
        let mut dash = dashboard();
        dash.input_changed("12", t0);
        dash.poll_debounce(t0 + QUIET);
        dash.input_changed("125", t0 + Duration::from_secs(1));
        dash.poll_debounce(t0 + Duration::from_secs(2));

        dash.apply_suggestions("125".into(), Ok(vec!["125 Main St".into()]));
        dash.apply_suggestions("12".into(), Ok(vec!["123 Main St".into(), "125 Main St".into()]));

        assert_eq!(dash.state().suggestions, vec!["125 Main St"]);
    }

    #[test]
    fn selecting_suggestion_commits_and_resets_offset() {
        let mut dash = selected_with_page(20);
        dash.next_page();
        assert_eq!(dash.state().offset, 20);

        let picked = "125 Main St, Apt #4 / Ünit";
        dash.state.suggestions = vec![picked.into()];
        let request = page_request(dash.select_suggestion(picked));

        let state = dash.state();
        assert_eq!(state.selected_address.as_bytes(), picked.as_bytes());
        assert_eq!(state.search_text, picked);
        assert!(state.suggestions.is_empty());
        assert_eq!(state.offset, 0);
        assert!(state.loading);
        assert_eq!(
            request,
            PageRequest {
                address: picked.into(),
                skip: 0,
                limit: 20
            }
        );
    }

    #[test]
    fn reselecting_current_address_skips_fetch_on_first_page() {
        let mut dash = selected_with_page(20);
        dash.state.suggestions = vec!["123 Main St".into()];
        dash.state.search_text = "123 Ma".into();

        assert_eq!(dash.select_suggestion("123 Main St"), None);
        let state = dash.state();
        assert_eq!(state.search_text, "123 Main St");
        assert!(state.suggestions.is_empty());
        assert!(!state.loading);
        assert_eq!(state.incidents.len(), 20);
    }

    #[test]
    fn reselecting_current_address_from_later_page_refetches() {
        let mut dash = selected_with_page(20);
        let next = page_request(dash.next_page());
        dash.apply_incidents(next, Ok(incidents(20)));

        let request = page_request(dash.select_suggestion("123 Main St"));
        assert_eq!(request.skip, 0);
        assert_eq!(dash.state().offset, 0);
        assert!(dash.state().loading);
    }

    #[test]
    fn selection_cancels_pending_autocomplete() {
        let t0 = Instant::now();
        let mut dash = dashboard();
        dash.input_changed("123", t0);
        dash.select_suggestion("123 Main St");
        assert_eq!(dash.poll_debounce(t0 + QUIET), None);
        assert_eq!(dash.next_deadline(), None);
    }

    #[test]
    fn full_page_enables_next() {
        let dash = selected_with_page(20);
        let state = dash.state();
        assert_eq!(state.incidents.len(), 20);
        assert!(!state.no_results);
        assert!(!state.loading);
        assert!(state.updated_at.is_some());
        assert!(dash.has_next());
        assert!(!dash.has_prev());
    }

    #[test]
    fn next_advances_offset_and_refetches() {
        let mut dash = selected_with_page(20);
        let request = page_request(dash.next_page());
        assert_eq!(dash.state().offset, 20);
        assert_eq!(request.skip, 20);
        assert_eq!(request.limit, 20);

        dash.apply_incidents(request, Ok(incidents(7)));
        assert!(dash.has_prev());
        assert!(!dash.has_next());
        assert_eq!(dash.next_page(), None);
        assert_eq!(dash.state().offset, 20);

        let back = page_request(dash.prev_page());
        assert_eq!(back.skip, 0);
        assert_eq!(dash.state().offset, 0);
    }

    #[test]
    fn prev_disabled_at_first_page() {
        let mut dash = selected_with_page(20);
        assert!(!dash.has_prev());
        assert_eq!(dash.prev_page(), None);
        assert_eq!(dash.state().offset, 0);
    }

    #[test]
    fn empty_page_sets_no_results() {
        let dash = selected_with_page(0);
        assert!(dash.state().incidents.is_empty());
        assert!(dash.state().no_results);
        assert!(!dash.has_next());
    }

    #[test]
    fn failed_fetch_keeps_previous_page() {
        let mut dash = selected_with_page(20);
        let request = page_request(dash.next_page());
        let applied = dash.apply_incidents(request, Err(transport_error()));

        assert!(!applied);
        assert!(dash.state().no_results);
        assert!(!dash.state().loading);
        assert_eq!(dash.state().incidents.len(), 20);
    }

    #[test]
    fn clearing_selection_empties_results_without_fetch() {
        let mut dash = selected_with_page(0);
        assert!(dash.state().no_results);

        assert_eq!(dash.clear_selection(), None);
        let state = dash.state();
        assert!(state.incidents.is_empty());
        assert!(!state.no_results);
        assert!(!state.has_selection());
        assert_eq!(dash.refresh(), None);
    }

    #[test]
    fn empty_suggestion_selection_behaves_like_clear() {
        let mut dash = selected_with_page(20);
        assert_eq!(dash.select_suggestion(""), None);
        assert!(dash.state().incidents.is_empty());
        assert!(!dash.state().no_results);
    }

    #[test]
    fn stale_page_is_discarded_by_default() {
        let mut dash = selected_with_page(20);
        let slow = page_request(dash.next_page());
        let fast = page_request(dash.prev_page());

        assert!(dash.apply_incidents(fast, Ok(incidents(20))));
        assert!(!dash.apply_incidents(slow, Ok(incidents(3))));

        assert_eq!(dash.state().offset, 0);
        assert_eq!(dash.state().incidents.len(), 20);
        assert!(!dash.state().loading);
    }

    #[test]
    fn apply_policy_lets_late_response_win() {
        let mut dash = Dashboard::new(DashboardConfig {
            stale_policy: StalePolicy::Apply,
            ..Default::default()
        });
        let first = page_request(dash.select_suggestion("123 Main St"));
        let second = page_request(dash.select_suggestion("125 Main St"));

        dash.apply_incidents(second, Ok(incidents(2)));
        dash.apply_incidents(first, Ok(incidents(5)));

        assert_eq!(dash.state().selected_address, "125 Main St");
        assert_eq!(dash.state().incidents.len(), 5);
    }

    #[test]
    fn suggestion_cursor_is_clamped() {
        let mut dash = dashboard();
        dash.move_suggestion_cursor(1);
        assert_eq!(dash.state().suggestion_cursor, 0);

        dash.state.suggestions = vec!["a".into(), "b".into(), "c".into()];
        dash.move_suggestion_cursor(5);
        assert_eq!(dash.state().highlighted_suggestion(), Some("c"));
        dash.move_suggestion_cursor(-10);
        assert_eq!(dash.state().highlighted_suggestion(), Some("a"));

        dash.move_suggestion_cursor(1);
        let request = page_request(dash.select_highlighted_suggestion());
        assert_eq!(request.address, "b");
    }

    #[test]
    fn detail_lifecycle() {
        let mut dash = dashboard();
        assert_eq!(dash.open_detail(7), Command::FetchIncident { id: 7 });
        assert_eq!(dash.state().detail, DetailView::Loading(7));

        dash.apply_detail(7, Err(DashError::NotFound(7)));
        assert_eq!(
            dash.state().detail,
            DetailView::Failed {
                id: 7,
                message: "Incident 7 not found".into()
            }
        );

        dash.open_detail(8);
        dash.close_detail();
        dash.apply_detail(8, Ok(Incident { id: 8, ..Default::default() }));
        assert_eq!(dash.state().detail, DetailView::Closed);
    }

    #[test]
    fn apply_routes_completions() {
        let mut dash = dashboard();
        let request = page_request(dash.select_suggestion("123 Main St"));
        let changed = dash.apply(Completion::Incidents {
            request,
            result: Ok(incidents(1)),
        });
        assert!(changed);
        assert_eq!(dash.state().incidents.len(), 1);
    }
}
