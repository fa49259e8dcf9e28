//! Environment-driven settings for the demonstration.

use std::env;
use std::time::Duration;

use docstore_repository::config::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SCHEME};
use docstore_repository::{DocumentStoreConfig, Endpoint, RetryPolicy};
use tracing::info;

use crate::DemoError;

/// Default index used for the sample item.
const DEFAULT_INDEX: &str = "demoitem";

/// Default id of the sample item.
const DEFAULT_DOCUMENT_ID: &str = "v5KO4XMB_i31VgtFC0s1";

/// Default search terms.
const DEFAULT_SEARCH_TERMS: &str = "아이폰";

/// Default transport attempts per call.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Settings for one run of the demonstration.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Where the document store listens.
    pub endpoint: Endpoint,
    /// Per-call deadline, retries included.
    pub request_timeout: Option<Duration>,
    /// Transport attempts per call.
    pub max_attempts: u32,
    pub index_name: String,
    pub document_id: String,
    pub search_terms: String,
    /// Delete the sample item after reading it back.
    pub delete_document: bool,
    /// Drop the demo index at the end of the run.
    pub delete_index: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            request_timeout: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            index_name: DEFAULT_INDEX.to_string(),
            document_id: DEFAULT_DOCUMENT_ID.to_string(),
            search_terms: DEFAULT_SEARCH_TERMS.to_string(),
            delete_document: false,
            delete_index: false,
        }
    }
}

impl DemoConfig {
    /// Load settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DOCSTORE_SCHEME`: http or https (default: http)
    /// - `DOCSTORE_HOST`: Store host (default: localhost)
    /// - `DOCSTORE_PORT`: Store port (default: 9200)
    /// - `DOCSTORE_REQUEST_TIMEOUT_MS`: Per-call deadline in milliseconds (default: none)
    /// - `DOCSTORE_MAX_ATTEMPTS`: Transport attempts per call (default: 3)
    /// - `DEMO_INDEX`: Index for the sample item (default: demoitem)
    /// - `DEMO_DOCUMENT_ID`: Id of the sample item (default: v5KO4XMB_i31VgtFC0s1)
    /// - `DEMO_SEARCH_TERMS`: Terms to search for (default: 아이폰)
    /// - `DEMO_DELETE_DOCUMENT`: Delete the sample item after reading it (default: false)
    /// - `DEMO_DELETE_INDEX`: Drop the index at the end (default: false)
    ///
    /// # Returns
    ///
    /// * `Ok(DemoConfig)` - The loaded settings
    /// * `Err(DemoError::ConfigError)` - If a variable is set to an invalid value
    pub fn from_env() -> Result<Self, DemoError> {
        let config = Self::from_lookup(|key| env::var(key).ok())?;

        info!(
            scheme = %config.endpoint.scheme,
            host = %config.endpoint.host,
            port = config.endpoint.port,
            index = %config.index_name,
            document_id = %config.document_id,
            max_attempts = config.max_attempts,
            request_timeout_ms = config.request_timeout.map(|t| t.as_millis() as u64),
            delete_document = config.delete_document,
            delete_index = config.delete_index,
            "Loaded demo configuration"
        );

        Ok(config)
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DemoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let endpoint = Endpoint::new(
            var("DOCSTORE_SCHEME", DEFAULT_SCHEME).to_lowercase(),
            var("DOCSTORE_HOST", DEFAULT_HOST),
            parse_number("DOCSTORE_PORT", lookup("DOCSTORE_PORT"), DEFAULT_PORT)?,
        );
        // Reject bad endpoints before any call is made.
        endpoint
            .to_url()
            .map_err(|e| DemoError::config(e.to_string()))?;

        let request_timeout = match lookup("DOCSTORE_REQUEST_TIMEOUT_MS") {
            Some(raw) if !raw.trim().is_empty() => {
                let millis = parse_number("DOCSTORE_REQUEST_TIMEOUT_MS", Some(raw), 0u64)?;
                if millis == 0 {
                    return Err(DemoError::config(
                        "DOCSTORE_REQUEST_TIMEOUT_MS must be greater than zero",
                    ));
                }
                Some(Duration::from_millis(millis))
            }
            _ => None,
        };

        let max_attempts = parse_number(
            "DOCSTORE_MAX_ATTEMPTS",
            lookup("DOCSTORE_MAX_ATTEMPTS"),
            DEFAULT_MAX_ATTEMPTS,
        )?;
        if max_attempts == 0 {
            return Err(DemoError::config(
                "DOCSTORE_MAX_ATTEMPTS must be at least 1",
            ));
        }

        Ok(Self {
            endpoint,
            request_timeout,
            max_attempts,
            index_name: var("DEMO_INDEX", DEFAULT_INDEX),
            document_id: var("DEMO_DOCUMENT_ID", DEFAULT_DOCUMENT_ID),
            search_terms: var("DEMO_SEARCH_TERMS", DEFAULT_SEARCH_TERMS),
            delete_document: parse_flag("DEMO_DELETE_DOCUMENT", lookup("DEMO_DELETE_DOCUMENT"))?,
            delete_index: parse_flag("DEMO_DELETE_INDEX", lookup("DEMO_DELETE_INDEX"))?,
        })
    }

    /// Client settings derived from this configuration.
    pub fn client_config(&self) -> DocumentStoreConfig {
        let config =
            DocumentStoreConfig::default().with_retry(RetryPolicy::with_max_attempts(self.max_attempts));
        match self.request_timeout {
            Some(timeout) => config.with_request_timeout(timeout),
            None => config,
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    key: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, DemoError> {
    match raw {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|_| DemoError::config(format!("{} is not a valid number: '{}'", key, value))),
        _ => Ok(default),
    }
}

/// Parse a boolean flag. Unset means false.
fn parse_flag(key: &str, raw: Option<String>) -> Result<bool, DemoError> {
    let Some(value) = raw else {
        return Ok(false);
    };
    match value.trim().to_lowercase().as_str() {
        "" | "false" | "0" | "no" | "off" => Ok(false),
        "true" | "1" | "yes" | "on" => Ok(true),
        _ => Err(DemoError::config(format!(
            "{} must be true or false, got '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<DemoConfig, DemoError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DemoConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.endpoint.to_url().unwrap().as_str(), "http://localhost:9200/");
        assert_eq!(config.index_name, "demoitem");
        assert_eq!(config.document_id, "v5KO4XMB_i31VgtFC0s1");
        assert_eq!(config.search_terms, "아이폰");
        assert!(!config.delete_document);
        assert!(!config.delete_index);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DOCSTORE_SCHEME", "HTTPS"),
            ("DOCSTORE_HOST", "search.internal"),
            ("DOCSTORE_PORT", "443"),
            ("DOCSTORE_REQUEST_TIMEOUT_MS", "1500"),
            ("DOCSTORE_MAX_ATTEMPTS", "5"),
            ("DEMO_INDEX", "iteminfo"),
            ("DEMO_DELETE_DOCUMENT", "yes"),
            ("DEMO_DELETE_INDEX", "TRUE"),
        ])
        .unwrap();

        assert_eq!(config.endpoint, Endpoint::new("https", "search.internal", 443));
        assert_eq!(config.request_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.index_name, "iteminfo");
        assert!(config.delete_document);
        assert!(config.delete_index);

        let client_config = config.client_config();
        assert_eq!(client_config.retry.max_attempts, 5);
        assert_eq!(client_config.request_timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("DEMO_INDEX", "  "), ("DOCSTORE_PORT", "")]).unwrap();
        assert_eq!(config.index_name, "demoitem");
        assert_eq!(config.endpoint.port, 9200);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("DOCSTORE_PORT", "ninety")]),
            Err(DemoError::ConfigError(_))
        ));
        assert!(load(&[("DOCSTORE_PORT", "70000")]).is_err());
        assert!(load(&[("DOCSTORE_SCHEME", "ftp")]).is_err());
        assert!(load(&[("DOCSTORE_MAX_ATTEMPTS", "0")]).is_err());
        assert!(load(&[("DOCSTORE_REQUEST_TIMEOUT_MS", "0")]).is_err());
        assert!(load(&[("DEMO_DELETE_INDEX", "maybe")]).is_err());
    }
}
