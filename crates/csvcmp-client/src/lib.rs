//! HTTP client for the comparison backend.
//!
//! Two endpoints matter here: `GET /files/columns` resolves header columns
//! for server-known CSV paths, and `GET /mapping/guess` asks the backend
//! for per-column mapping suggestions. Both are best-effort lookups that
//! feed optional UI state, so every failure mode (transport error,
//! non-success status, malformed body) degrades to an empty result and is
//! logged at debug rather than surfaced.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use csvcmp_model::{ColumnsPayload, GuessSuggestion};

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while constructing the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Client for the comparison backend API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Creates a client against `base_url` (scheme and host, no trailing
    /// path).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Resolves header columns for server-known paths.
    ///
    /// No request is issued when both paths are absent. Failures degrade to
    /// the empty payload.
    #[must_use]
    pub fn fetch_columns(
        &self,
        left_path: Option<&str>,
        right_path: Option<&str>,
    ) -> ColumnsPayload {
        let params = path_params(left_path, right_path);
        if params.is_empty() {
            return ColumnsPayload::default();
        }
        self.get_json("/files/columns", &params).unwrap_or_default()
    }

    /// Asks the backend for mapping suggestions between the two files.
    ///
    /// Same shape and degrade behavior as [`fetch_columns`](Self::fetch_columns).
    #[must_use]
    pub fn fetch_guesses(
        &self,
        left_path: Option<&str>,
        right_path: Option<&str>,
    ) -> Vec<GuessSuggestion> {
        let params = path_params(left_path, right_path);
        if params.is_empty() {
            return Vec::new();
        }
        self.get_json("/mapping/guess", &params).unwrap_or_default()
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Option<T> {
        let url = self.endpoint_url(path);
        let response = match self.client.get(&url).query(params).send() {
            Ok(response) => response,
            Err(err) => {
                debug!(%url, error = %err, "backend request failed");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(%url, status = %response.status(), "backend returned non-success");
            return None;
        }
        match response.json::<T>() {
            Ok(body) => Some(body),
            Err(err) => {
                debug!(%url, error = %err, "backend body failed to parse");
                None
            }
        }
    }
}

/// Builds the query parameter list, dropping absent or blank paths.
fn path_params(left_path: Option<&str>, right_path: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(left) = left_path.map(str::trim).filter(|p| !p.is_empty()) {
        params.push(("left_path", left.to_string()));
    }
    if let Some(right) = right_path.map(str::trim).filter(|p| !p.is_empty()) {
        params.push(("right_path", right.to_string()));
    }
    params
}
