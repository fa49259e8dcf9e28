//! Document store provider trait definition.
//!
//! This module defines the abstract interface for remote document store
//! operations, allowing for different backend implementations (OpenSearch,
//! Elasticsearch, in-memory fakes for tests).

use async_trait::async_trait;
use docstore_shared::{Document, Fields, SearchQuery, SearchResult};

use crate::errors::DocumentStoreError;
use crate::index_config::IndexConfig;
use crate::types::{DeleteResult, GetResponse, IndexResponse};

/// Abstracts the underlying document store (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into `DocumentStoreClient`, which adds input
/// validation, deadlines, retries and failure logging on top. Every method is a
/// single remote call; implementations hold no state besides the connection.
///
/// All methods return `Result<T, DocumentStoreError>` for consistent error
/// handling across backends. Absent documents are reported through the `Ok`
/// value, never as an error.
#[async_trait]
pub trait DocumentStoreProvider: Send + Sync {
    /// Create the index with the given settings and mappings unless it exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index was created by this call
    /// * `Ok(false)` - If the index already existed
    /// * `Err(DocumentStoreError)` - If the check or the creation fails
    async fn ensure_index(
        &self,
        index_name: &str,
        config: &IndexConfig,
    ) -> Result<bool, DocumentStoreError>;

    /// Store a document under its id, replacing any existing document entirely.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexResponse)` - With `Created` for a new id, `Updated` for a replaced one
    /// * `Err(DocumentStoreError::RequestError)` - If the store rejects the field values
    /// * `Err(DocumentStoreError)` - If the operation fails
    async fn index_document(&self, document: &Document)
        -> Result<IndexResponse, DocumentStoreError>;

    /// Fetch a document and its metadata.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(GetResponse))` - If the document exists
    /// * `Ok(None)` - If the document or its index does not exist
    /// * `Err(DocumentStoreError)` - If the operation fails
    async fn get_document(
        &self,
        index_name: &str,
        id: &str,
    ) -> Result<Option<GetResponse>, DocumentStoreError>;

    /// Fetch only the stored fields of a document.
    ///
    /// Same existence semantics as [`DocumentStoreProvider::get_document`].
    async fn get_source(
        &self,
        index_name: &str,
        id: &str,
    ) -> Result<Option<Fields>, DocumentStoreError>;

    /// Delete a document.
    ///
    /// # Returns
    ///
    /// * `Ok(DeleteResult::Deleted)` - If the document existed and was removed
    /// * `Ok(DeleteResult::NotFound)` - If there was nothing to delete
    /// * `Err(DocumentStoreError)` - If the operation fails
    async fn delete_document(
        &self,
        index_name: &str,
        id: &str,
    ) -> Result<DeleteResult, DocumentStoreError>;

    /// Delete an index and every document in it.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - The store's acknowledgement flag
    /// * `Err(DocumentStoreError::RequestError)` - If the index does not exist
    /// * `Err(DocumentStoreError)` - If the operation fails
    async fn delete_index(&self, index_name: &str) -> Result<bool, DocumentStoreError>;

    /// Run a multi-field text match with offset/limit paging.
    ///
    /// Hits are returned in the store's relevance order.
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult, DocumentStoreError>;
}
