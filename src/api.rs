//! Client for the incidents HTTP API.
//!
//! The dashboard only ever issues three read-only GETs:
//!
//! - `GET {base}/incidents/addresses?q=<query>` for autocomplete suggestions
//! - `GET {base}/incidents?address=<address>&skip=<n>&limit=<n>` for one page
//! - `GET {base}/incidents/{id}` for a single record
//!
//! [`IncidentsApi`] is the seam the dashboard runtime talks to, so tests can
//! swap the network out for a scripted fake.

use crate::error::{DashError, Result};
use crate::incident::Incident;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Characters left alone by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query value (space becomes `%20`, never `+`)
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Read-only operations against the incidents backend
pub trait IncidentsApi: Send + Sync {
    /// Distinct addresses containing `query`
    fn suggest_addresses(&self, query: &str) -> Result<Vec<String>>;

    /// One page of incidents whose address contains `address`
    fn list_incidents(&self, address: &str, skip: usize, limit: usize) -> Result<Vec<Incident>>;

    /// A single incident by primary key
    fn get_incident(&self, id: i64) -> Result<Incident>;
}

/// Blocking `reqwest` implementation of [`IncidentsApi`]
#[derive(Debug, Clone)]
pub struct HttpApi {
    base: String,
    client: Client,
}

impl HttpApi {
    /// Create a client for `base_url` (scheme and host, optionally a path prefix)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed =
            Url::parse(base_url).map_err(|_| DashError::InvalidUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(DashError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("incidents-dash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DashError::Client)?;

        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn addresses_url(&self, query: &str) -> String {
        format!("{}/incidents/addresses?q={}", self.base, encode_component(query))
    }

    pub fn incidents_url(&self, address: &str, skip: usize, limit: usize) -> String {
        format!(
            "{}/incidents?address={}&skip={}&limit={}",
            self.base,
            encode_component(address),
            skip,
            limit
        )
    }

    pub fn incident_url(&self, id: i64) -> String {
        format!("{}/incidents/{}", self.base, id)
    }

    fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| DashError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .map_err(|source| DashError::Decode { url, source })
    }
}

impl IncidentsApi for HttpApi {
    fn suggest_addresses(&self, query: &str) -> Result<Vec<String>> {
        self.get_json(self.addresses_url(query))
    }

    fn list_incidents(&self, address: &str, skip: usize, limit: usize) -> Result<Vec<Incident>> {
        self.get_json(self.incidents_url(address, skip, limit))
    }

    fn get_incident(&self, id: i64) -> Result<Incident> {
        match self.get_json(self.incident_url(id)) {
            Err(DashError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(DashError::NotFound(id))
            }
            other => other,
        }
    }
}
