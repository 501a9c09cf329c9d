//! Typed REST client for the import-progress backend.
//!
//! Four read-only endpoints are consumed:
//! - `GET /system_runs?limit={n}&order={asc|desc}`
//! - `GET /system_runs/{run_id}/logs`
//! - `GET /import_attempts/{attempt_id}`
//! - `GET /import_attempts/{attempt_id}/logs`
//!
//! The backend performs the bounding and ordering of the run listing; the
//! client does not re-sort runs. All responses are JSON in the canonical
//! schema of `importdash-protocol`.

use std::time::Duration;

use importdash_protocol::ImportAttempt;
use importdash_protocol::ProgressLog;
use importdash_protocol::SystemRun;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Default timeout applied to every request issued by [`create_client`].
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from backend client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL is not a valid URL.
    #[error("Invalid server URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Network request failed.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend returned a non-success HTTP status.
    #[error("Server error ({status}) from {endpoint}: {body}")]
    Status {
        status: u16,
        endpoint: String,
        body: String,
    },

    /// The response body was not valid JSON for the expected schema.
    #[error("Malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for backend client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Requested ordering of the run listing, applied server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOrder {
    /// Creation time ascending.
    Ascending,
    /// Creation time descending (most recent first).
    Descending,
}

impl RunOrder {
    fn as_query_value(self) -> &'static str {
        match self {
            RunOrder::Ascending => "asc",
            RunOrder::Descending => "desc",
        }
    }
}

/// Query parameters for the run listing endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunListQuery {
    /// Maximum number of runs to return.
    pub limit: Option<u32>,
    /// Server-side ordering by creation time.
    pub order: Option<RunOrder>,
}

/// Build the shared `reqwest::Client` with a product User-Agent and a
/// request timeout.
pub fn create_client() -> ClientResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("importdash/", env!("CARGO_PKG_VERSION")))
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
        .map_err(ClientError::Build)
}

/// Client for the import-progress dashboard REST API.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: String,
}

impl DashboardClient {
    /// Creates a new client for the backend at `base_url`.
    ///
    /// The URL is validated eagerly so a typo fails at startup rather than
    /// on the first fetch.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let http = create_client()?;
        Self::with_client(http, base_url)
    }

    /// Creates a client with a custom HTTP client.
    ///
    /// Useful for testing or custom configurations.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> ClientResult<Self> {
        url::Url::parse(base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL this client talks to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /system_runs` — the bounded, server-ordered listing of recent runs.
    pub async fn list_system_runs(&self, query: RunListQuery) -> ClientResult<Vec<SystemRun>> {
        let endpoint = format!("{}/system_runs", self.base_url);
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(order) = query.order {
            params.push(("order", order.as_query_value().to_string()));
        }
        self.get_json(&endpoint, &params).await
    }

    /// `GET /system_runs/{run_id}/logs` — the run's own logs, unordered.
    pub async fn system_run_logs(&self, run_id: &str) -> ClientResult<Vec<ProgressLog>> {
        let endpoint = format!("{}/system_runs/{run_id}/logs", self.base_url);
        self.get_json(&endpoint, &[]).await
    }

    /// `GET /import_attempts/{attempt_id}` — a single import attempt.
    pub async fn import_attempt(&self, attempt_id: &str) -> ClientResult<ImportAttempt> {
        let endpoint = format!("{}/import_attempts/{attempt_id}", self.base_url);
        self.get_json(&endpoint, &[]).await
    }

    /// `GET /import_attempts/{attempt_id}/logs` — the attempt's logs, unordered.
    pub async fn import_attempt_logs(&self, attempt_id: &str) -> ClientResult<Vec<ProgressLog>> {
        let endpoint = format!("{}/import_attempts/{attempt_id}/logs", self.base_url);
        self.get_json(&endpoint, &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> ClientResult<T> {
        tracing::debug!(endpoint, "dashboard request");

        let mut request = self.http.get(endpoint);
        if !params.is_empty() {
            request = request.query(params);
        }
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                body: excerpt(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

/// Error bodies can be arbitrarily large; keep only the head for messages.
fn excerpt(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(MAX).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_url_is_normalized() {
        let client = DashboardClient::new("http://localhost:8080/").expect("valid url");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = DashboardClient::new("not a url").expect_err("must reject");
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let long = "x".repeat(500);
        let short = excerpt(&long);
        assert!(short.chars().count() <= 201);
        assert!(short.ends_with('…'));
    }

    #[test]
    fn run_order_query_values() {
        assert_eq!(RunOrder::Ascending.as_query_value(), "asc");
        assert_eq!(RunOrder::Descending.as_query_value(), "desc");
    }
}
