//! Configuration types for the DocumentStoreClient.

use std::time::Duration;

use url::Url;

use crate::errors::DocumentStoreError;

/// Default scheme of the document store endpoint.
pub const DEFAULT_SCHEME: &str = "http";

/// Default host of the document store endpoint.
pub const DEFAULT_HOST: &str = "localhost";

/// Default port of the document store endpoint.
pub const DEFAULT_PORT: u16 = 9200;

/// Address of the remote document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Endpoint {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// Parse and validate the endpoint as a URL.
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - The endpoint URL (e.g., `http://localhost:9200/`)
    /// * `Err(DocumentStoreError::TransportError)` - If the scheme is not http(s) or the host is invalid
    pub fn to_url(&self) -> Result<Url, DocumentStoreError> {
        if self.scheme != "http" && self.scheme != "https" {
            return Err(DocumentStoreError::transport(format!(
                "Unsupported scheme '{}', expected http or https",
                self.scheme
            )));
        }
        Url::parse(&format!("{}://{}:{}", self.scheme, self.host, self.port))
            .map_err(|e| DocumentStoreError::transport(format!("Invalid endpoint: {}", e)))
    }
}

/// Bounded exponential backoff for transport failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, the first one included. Values below 1 act as 1.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_backoff: Duration,
    /// Upper bound for the doubling delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// A policy with the default backoff and a custom attempt budget.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Delay to use after `current`.
    pub fn next_backoff(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_backoff)
    }
}

/// Configuration for the DocumentStoreClient.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentStoreConfig {
    /// Retry policy for transport failures.
    pub retry: RetryPolicy,

    /// Deadline for each call, retries included. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl DocumentStoreConfig {
    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the per-call deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}
