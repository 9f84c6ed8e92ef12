//! incidents-dash - Terminal dashboard for incident records
//!
//! Search incidents by address with debounced autocomplete, then page through
//! the matching records twenty at a time. All data comes from a read-only
//! incidents HTTP API.
//!
//! # Features
//!
//! - **Autocomplete**: address suggestions after a 300ms typing pause
//! - **Paging**: Previous/Next over fixed-size pages, no total count needed
//! - **Detail view**: full record for the highlighted incident
//! - **Fail-soft**: network or decode failures degrade to an empty state
//!
//! # Example
//!
//! ```no_run
//! use incidents_dash::{HttpApi, IncidentsApi};
//! use std::time::Duration;
//!
//! fn main() -> incidents_dash::Result<()> {
//!     let api = HttpApi::new("http://127.0.0.1:8000", Duration::from_secs(10))?;
//!
//!     for address in api.suggest_addresses("Main")? {
//!         println!("{address}");
//!     }
//!
//!     let page = api.list_incidents("123 Main St", 0, 20)?;
//!     println!("{} incidents on the first page", page.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod incident;
pub mod logging;
pub mod tui;

use std::path::PathBuf;
use std::time::Duration;

// Re-export main types
pub use api::{HttpApi, IncidentsApi};
pub use dashboard::{Command, Completion, Dashboard, DashboardState, DetailView, PageRequest};
pub use debounce::Debouncer;
pub use error::{DashError, ErrorKind, Result};
pub use incident::Incident;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Quiet period before an autocomplete request fires
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Shortest query that is sent to the autocomplete endpoint
pub const MIN_QUERY_CHARS: usize = 2;

/// Incidents requested per page
pub const PAGE_SIZE: usize = 20;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// What to do with a response that arrives after the state it was requested
/// for has moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Drop it; only the response for the current request is applied
    #[default]
    Discard,
    /// Apply every response in arrival order, last one wins
    Apply,
}

/// Dashboard behaviour knobs
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub debounce: Duration,
    pub min_query_chars: usize,
    pub page_size: usize,
    pub stale_policy: StalePolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE_DELAY,
            min_query_chars: MIN_QUERY_CHARS,
            page_size: PAGE_SIZE,
            stale_policy: StalePolicy::Discard,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the incidents API
    pub api_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Where the interactive dashboard writes its log
    pub log_file: PathBuf,
    pub dashboard: DashboardConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            log_file: PathBuf::from("incidents-dash.log"),
            dashboard: DashboardConfig::default(),
        }
    }
}
