//! Document store client implementation.
//!
//! This module provides the facade application code uses to talk to the
//! document store: index, get, get-source, delete, delete-index and search.
//! It validates input, applies the per-call deadline and the transport retry
//! policy, and logs every failure before handing it back to the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use docstore_shared::{Document, Fields, SearchQuery, SearchResult};
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::config::{DocumentStoreConfig, Endpoint};
use crate::errors::DocumentStoreError;
use crate::index_config::IndexConfig;
use crate::interfaces::DocumentStoreProvider;
use crate::opensearch::OpenSearchProvider;
use crate::types::{DeleteResult, GetResponse, IndexResponse};

/// The main client for interacting with the document store.
///
/// This is the high-level API that application code should use. It delegates
/// to a `DocumentStoreProvider` for the actual remote calls. The client is
/// constructed explicitly and passed to whoever needs it; clones share the
/// same connection.
///
/// Only `DocumentStoreError::TransportError` is retried. The deadline, when
/// configured, covers the whole call including retries and fails with
/// `DocumentStoreError::TimeoutError`.
///
/// # Example
///
/// ```no_run
/// use docstore_repository::{DocumentStoreClient, DocumentStoreConfig, Endpoint};
/// use docstore_shared::Document;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DocumentStoreClient::connect(&Endpoint::default(), DocumentStoreConfig::default())?;
///
/// let doc = Document::new("demoitem", "X")
///     .with_field("title", "Phone")
///     .with_field("description", "Like new");
/// client.index(doc).await?;
///
/// if let Some(found) = client.get("demoitem", "X").await? {
///     println!("{:?}", found.source);
/// }
///
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DocumentStoreClient {
    provider: Arc<dyn DocumentStoreProvider>,
    config: DocumentStoreConfig,
}

impl DocumentStoreClient {
    /// Create a new DocumentStoreClient with default configuration.
    ///
    /// # Arguments
    ///
    /// * `provider` - A boxed implementation of `DocumentStoreProvider` (e.g., `OpenSearchProvider`)
    pub fn new(provider: Box<dyn DocumentStoreProvider>) -> Self {
        Self::with_config(provider, DocumentStoreConfig::default())
    }

    /// Create a new DocumentStoreClient with custom configuration.
    pub fn with_config(
        provider: Box<dyn DocumentStoreProvider>,
        config: DocumentStoreConfig,
    ) -> Self {
        Self {
            provider: Arc::from(provider),
            config,
        }
    }

    /// Connect to an OpenSearch-compatible endpoint.
    ///
    /// # Returns
    ///
    /// * `Ok(DocumentStoreClient)` - A client owning the connection pool
    /// * `Err(DocumentStoreError::TransportError)` - If the endpoint is invalid
    pub fn connect(
        endpoint: &Endpoint,
        config: DocumentStoreConfig,
    ) -> Result<Self, DocumentStoreError> {
        let provider = OpenSearchProvider::from_endpoint(endpoint)?;
        Ok(Self::with_config(Box::new(provider), config))
    }

    /// The active configuration.
    pub fn config(&self) -> &DocumentStoreConfig {
        &self.config
    }

    /// A client sharing this connection whose calls fail with
    /// `TimeoutError` once `deadline` has elapsed.
    pub fn with_deadline(&self, deadline: Duration) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            config: self.config.clone().with_request_timeout(deadline),
        }
    }

    /// Release this handle on the connection.
    ///
    /// The underlying pool is closed once the last clone is closed or dropped.
    pub fn close(self) {
        let remaining = Arc::strong_count(&self.provider) - 1;
        info!(remaining_handles = remaining, "Closing document store client");
    }

    /// Validate that a name or id is present.
    fn validate_required(field_name: &str, value: &str) -> Result<(), DocumentStoreError> {
        if value.trim().is_empty() {
            return Err(DocumentStoreError::validation(format!(
                "{} is required",
                field_name
            )));
        }
        Ok(())
    }

    fn log_failure(operation: &str, index: &str, id: Option<&str>, err: &DocumentStoreError) {
        error!(
            operation,
            index = %index,
            id = id.unwrap_or("-"),
            error = %err,
            "Document store operation failed"
        );
    }

    /// Run one remote call under the retry policy and deadline, logging failures.
    async fn execute<T, F, Fut>(
        &self,
        operation: &'static str,
        index: &str,
        id: Option<&str>,
        mut call: F,
    ) -> Result<T, DocumentStoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DocumentStoreError>>,
    {
        let retry = &self.config.retry;
        let max_attempts = retry.max_attempts.max(1);

        let attempts = async {
            let mut attempt = 1;
            let mut backoff = retry.initial_backoff;
            loop {
                match call().await {
                    Ok(value) => return Ok(value),
                    Err(e) if e.is_retryable() && attempt < max_attempts => {
                        warn!(
                            operation,
                            index = %index,
                            id = id.unwrap_or("-"),
                            attempt,
                            max_attempts,
                            backoff_ms = backoff.as_millis() as u64,
                            error = %e,
                            "Transport failure, retrying"
                        );
                        sleep(backoff).await;
                        backoff = retry.next_backoff(backoff);
                        attempt += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        let result = match self.config.request_timeout {
            Some(deadline) => match timeout(deadline, attempts).await {
                Ok(result) => result,
                Err(_) => Err(DocumentStoreError::timeout(format!(
                    "{} did not complete within {}ms",
                    operation,
                    deadline.as_millis()
                ))),
            },
            None => attempts.await,
        };

        if let Err(ref e) = result {
            Self::log_failure(operation, index, id, e);
        }
        result
    }

    /// Reject invalid input with a logged `RequestError`.
    fn check(
        operation: &str,
        index: &str,
        id: Option<&str>,
        validation: Result<(), DocumentStoreError>,
    ) -> Result<(), DocumentStoreError> {
        validation.inspect_err(|e| Self::log_failure(operation, index, id, e))
    }

    /// Create an index with the given settings unless it already exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index was created
    /// * `Ok(false)` - If it already existed
    /// * `Err(DocumentStoreError)` - If the operation fails
    pub async fn ensure_index(
        &self,
        index_name: &str,
        config: &IndexConfig,
    ) -> Result<bool, DocumentStoreError> {
        Self::check(
            "ensure_index",
            index_name,
            None,
            Self::validate_required("index_name", index_name),
        )?;

        let provider = self.provider.as_ref();
        self.execute("ensure_index", index_name, None, move || {
            provider.ensure_index(index_name, config)
        })
        .await
    }

    /// Index a document, creating it or replacing the stored one entirely.
    ///
    /// # Arguments
    ///
    /// * `document` - The document; `index_name` and `id` must be non-empty
    ///
    /// # Returns
    ///
    /// * `Ok(IndexResponse)` - With `Created` or `Updated`
    /// * `Err(DocumentStoreError::RequestError)` - If the address is missing or the store rejects the fields
    /// * `Err(DocumentStoreError::TransportError)` - If the store cannot be reached
    pub async fn index(&self, document: Document) -> Result<IndexResponse, DocumentStoreError> {
        let index_name = document.index_name.as_str();
        let id = document.id.as_str();
        Self::check(
            "index",
            index_name,
            Some(id),
            Self::validate_required("index_name", index_name)
                .and_then(|_| Self::validate_required("id", id)),
        )?;

        let provider = self.provider.as_ref();
        let doc = &document;
        let response = self
            .execute("index", index_name, Some(id), move || {
                provider.index_document(doc)
            })
            .await?;

        debug!(
            index = %response.index,
            id = %response.id,
            result = ?response.result,
            "Indexed document"
        );
        Ok(response)
    }

    /// Fetch a document with its metadata.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(GetResponse))` - If the document exists
    /// * `Ok(None)` - If the document (or its index) does not exist
    /// * `Err(DocumentStoreError)` - If the operation fails
    pub async fn get(
        &self,
        index_name: &str,
        id: &str,
    ) -> Result<Option<GetResponse>, DocumentStoreError> {
        Self::check(
            "get",
            index_name,
            Some(id),
            Self::validate_required("index_name", index_name)
                .and_then(|_| Self::validate_required("id", id)),
        )?;

        let provider = self.provider.as_ref();
        self.execute("get", index_name, Some(id), move || {
            provider.get_document(index_name, id)
        })
        .await
    }

    /// Fetch only the stored fields of a document.
    ///
    /// Same existence semantics as [`DocumentStoreClient::get`].
    pub async fn get_source(
        &self,
        index_name: &str,
        id: &str,
    ) -> Result<Option<Fields>, DocumentStoreError> {
        Self::check(
            "get_source",
            index_name,
            Some(id),
            Self::validate_required("index_name", index_name)
                .and_then(|_| Self::validate_required("id", id)),
        )?;

        let provider = self.provider.as_ref();
        self.execute("get_source", index_name, Some(id), move || {
            provider.get_source(index_name, id)
        })
        .await
    }

    /// Delete a document.
    ///
    /// Deleting a document that does not exist returns `DeleteResult::NotFound`
    /// rather than an error, so the call can be repeated safely.
    pub async fn delete(&self, index_name: &str, id: &str) -> Result<DeleteResult, DocumentStoreError> {
        Self::check(
            "delete",
            index_name,
            Some(id),
            Self::validate_required("index_name", index_name)
                .and_then(|_| Self::validate_required("id", id)),
        )?;

        let provider = self.provider.as_ref();
        self.execute("delete", index_name, Some(id), move || {
            provider.delete_document(index_name, id)
        })
        .await
    }

    /// Delete an index and every document in it. This cannot be undone.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - Whether the store acknowledged the deletion
    /// * `Err(DocumentStoreError::RequestError)` - If the index does not exist
    /// * `Err(DocumentStoreError)` - If the operation fails
    pub async fn delete_index(&self, index_name: &str) -> Result<bool, DocumentStoreError> {
        Self::check(
            "delete_index",
            index_name,
            None,
            Self::validate_required("index_name", index_name),
        )?;

        let provider = self.provider.as_ref();
        self.execute("delete_index", index_name, None, move || {
            provider.delete_index(index_name)
        })
        .await
    }

    /// Run a multi-field text search.
    ///
    /// Hits come back ordered by the store's relevance score. When
    /// `total_hits.relation` is `LowerBound`, the total is not exact.
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResult)` - At most `query.limit` hits starting at `query.offset`
    /// * `Err(DocumentStoreError::RequestError)` - If the query is invalid or rejected
    /// * `Err(DocumentStoreError)` - If the operation fails
    pub async fn search(&self, query: SearchQuery) -> Result<SearchResult, DocumentStoreError> {
        Self::check(
            "search",
            &query.index_name,
            None,
            query.validate().map_err(DocumentStoreError::validation),
        )?;

        let provider = self.provider.as_ref();
        let q = &query;
        let result = self
            .execute("search", &query.index_name, None, move || provider.search(q))
            .await?;

        debug!(
            index = %query.index_name,
            hits = result.len(),
            total = result.total_hits.value,
            "Search returned"
        );
        Ok(result)
    }
}
