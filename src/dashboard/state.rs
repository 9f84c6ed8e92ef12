use crate::incident::Incident;
use chrono::{DateTime, Local};

/// Parameters of one incidents page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub address: String,
    pub skip: usize,
    pub limit: usize,
}

/// Detail panel for a single incident
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailView {
    #[default]
    Closed,
    Loading(i64),
    Loaded(Box<Incident>),
    Failed { id: i64, message: String },
}

impl DetailView {
    pub fn is_open(&self) -> bool {
        !matches!(self, DetailView::Closed)
    }
}

/// Everything the dashboard renders from.
///
/// Only [`super::Dashboard`] mutates this; renderers get a shared reference.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Raw contents of the search box
    pub search_text: String,
    pub suggestions: Vec<String>,
    /// Highlighted suggestion for keyboard selection
    pub suggestion_cursor: usize,
    /// Committed filter; empty means nothing is shown
    pub selected_address: String,
    /// Always a multiple of the page size
    pub offset: usize,
    pub incidents: Vec<Incident>,
    pub loading: bool,
    pub no_results: bool,
    pub detail: DetailView,
    /// When the current page was last applied
    pub updated_at: Option<DateTime<Local>>,
}

impl DashboardState {
    pub fn has_selection(&self) -> bool {
        !self.selected_address.is_empty()
    }

    pub fn highlighted_suggestion(&self) -> Option<&str> {
        self.suggestions
            .get(self.suggestion_cursor)
            .map(String::as_str)
    }

    /// 1-based page number for display
    pub fn page_number(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 1;
        }
        self.offset / page_size + 1
    }
}
