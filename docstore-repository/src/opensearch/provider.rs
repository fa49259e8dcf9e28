//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `DocumentStoreProvider`
//! using the OpenSearch Rust crate. The same REST endpoints are served by
//! Elasticsearch 7.x, so the provider works against either engine.

use async_trait::async_trait;
use docstore_shared::{Document, Fields, SearchQuery, SearchResult};
use opensearch::{
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts},
    DeleteParts, GetParts, GetSourceParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use crate::config::Endpoint;
use crate::errors::DocumentStoreError;
use crate::index_config::IndexConfig;
use crate::interfaces::DocumentStoreProvider;
use crate::opensearch::responses;
use crate::types::{DeleteResult, GetResponse, IndexResponse};

/// Status returned for missing documents and missing indices.
const NOT_FOUND: u16 = 404;

/// OpenSearch provider implementation.
///
/// Holds one pooled HTTP connection to a single node. The connection is
/// released when the provider is dropped.
///
/// # Example
///
/// ```ignore
/// use docstore_repository::opensearch::OpenSearchProvider;
/// use docstore_shared::Document;
///
/// let provider = OpenSearchProvider::new("http://localhost:9200")?;
/// let doc = Document::new("demoitem", "X").with_field("title", "Phone");
/// provider.index_document(&doc).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(DocumentStoreError::TransportError)` - If the URL is invalid or the transport cannot be built
    pub fn new(url: &str) -> Result<Self, DocumentStoreError> {
        let parsed_url =
            Url::parse(url).map_err(|e| DocumentStoreError::transport(e.to_string()))?;
        Self::from_url(parsed_url)
    }

    /// Create a provider for a configured endpoint.
    pub fn from_endpoint(endpoint: &Endpoint) -> Result<Self, DocumentStoreError> {
        Self::from_url(endpoint.to_url()?)
    }

    fn from_url(url: Url) -> Result<Self, DocumentStoreError> {
        let display_url = url.to_string();
        let conn_pool = SingleNodeConnectionPool::new(url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| DocumentStoreError::transport(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %display_url, "Created OpenSearch provider");

        Ok(Self { client })
    }

    /// Build the search request body for a multi-field match.
    fn search_body(query: &SearchQuery) -> Value {
        json!({
            "from": query.offset,
            "size": query.limit,
            "query": {
                "multi_match": {
                    "query": query.terms,
                    "fields": query.fields
                }
            }
        })
    }

    /// Read a successful response body as JSON.
    async fn read_json(response: Response, operation: &str) -> Result<Value, DocumentStoreError> {
        response.json::<Value>().await.map_err(|e| {
            DocumentStoreError::parse(format!("Failed to read {} response: {}", operation, e))
        })
    }

    /// Turn an unsuccessful response into an error. The client logs it.
    async fn failure(response: Response, operation: &str) -> DocumentStoreError {
        let status = response.status_code();
        let error_body = response.text().await.unwrap_or_default();
        debug!(status = %status, body = %error_body, operation, "Request failed");
        DocumentStoreError::from_status(operation, status.as_u16(), &error_body)
    }
}

#[async_trait]
impl DocumentStoreProvider for OpenSearchProvider {
    async fn ensure_index(
        &self,
        index_name: &str,
        config: &IndexConfig,
    ) -> Result<bool, DocumentStoreError> {
        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index_name]))
            .send()
            .await?;

        let status = exists.status_code();
        if status.is_success() {
            debug!(index = %index_name, "Index already exists");
            return Ok(false);
        }
        if status.as_u16() != NOT_FOUND {
            return Err(Self::failure(exists, "index_exists").await);
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index_name))
            .body(config.to_body())
            .send()
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Another client created it between the two calls.
            if error_body.contains("resource_already_exists_exception") {
                debug!(index = %index_name, "Index created concurrently");
                return Ok(false);
            }
            debug!(status = %status, body = %error_body, "Index creation failed");
            return Err(DocumentStoreError::from_status(
                "create_index",
                status.as_u16(),
                &error_body,
            ));
        }

        info!(index = %index_name, "Index created");
        Ok(true)
    }

    async fn index_document(
        &self,
        document: &Document,
    ) -> Result<IndexResponse, DocumentStoreError> {
        let response = self
            .client
            .index(IndexParts::IndexId(&document.index_name, &document.id))
            .body(document.source())
            .send()
            .await?;

        if !response.status_code().is_success() {
            return Err(Self::failure(response, "index").await);
        }

        let body = Self::read_json(response, "index").await?;
        let indexed = responses::parse_index_response(body)?;

        debug!(
            index = %indexed.index,
            id = %indexed.id,
            result = ?indexed.result,
            "Document indexed"
        );
        Ok(indexed)
    }

    async fn get_document(
        &self,
        index_name: &str,
        id: &str,
    ) -> Result<Option<GetResponse>, DocumentStoreError> {
        let response = self
            .client
            .get(GetParts::IndexId(index_name, id))
            .send()
            .await?;

        let status = response.status_code();
        // 404 covers both a missing document and a missing index
        if status.as_u16() == NOT_FOUND {
            debug!(index = %index_name, id = %id, "Document not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::failure(response, "get").await);
        }

        let body = Self::read_json(response, "get").await?;
        responses::parse_get_response(body)
    }

    async fn get_source(
        &self,
        index_name: &str,
        id: &str,
    ) -> Result<Option<Fields>, DocumentStoreError> {
        let response = self
            .client
            .get_source(GetSourceParts::IndexId(index_name, id))
            .send()
            .await?;

        let status = response.status_code();
        if status.as_u16() == NOT_FOUND {
            debug!(index = %index_name, id = %id, "Document source not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::failure(response, "get_source").await);
        }

        let body = Self::read_json(response, "get_source").await?;
        responses::parse_source_response(index_name, id, body).map(Some)
    }

    async fn delete_document(
        &self,
        index_name: &str,
        id: &str,
    ) -> Result<DeleteResult, DocumentStoreError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(index_name, id))
            .send()
            .await?;

        let status = response.status_code();

        // 404 is acceptable - document or index may not exist
        if status.as_u16() == NOT_FOUND {
            debug!(index = %index_name, id = %id, "Document to delete not found");
            return Ok(DeleteResult::NotFound);
        }
        if !status.is_success() {
            return Err(Self::failure(response, "delete").await);
        }

        let body = Self::read_json(response, "delete").await?;
        let result = responses::parse_delete_response(body)?;

        debug!(index = %index_name, id = %id, result = ?result, "Document deleted");
        Ok(result)
    }

    async fn delete_index(&self, index_name: &str) -> Result<bool, DocumentStoreError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index_name]))
            .send()
            .await?;

        // Unlike document deletes, a missing index is a request error.
        if !response.status_code().is_success() {
            return Err(Self::failure(response, "delete_index").await);
        }

        let body = Self::read_json(response, "delete_index").await?;
        let acknowledged = responses::parse_acknowledged(body)?;

        info!(index = %index_name, acknowledged, "Index deleted");
        Ok(acknowledged)
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResult, DocumentStoreError> {
        let response = self
            .client
            .search(SearchParts::Index(&[query.index_name.as_str()]))
            .body(Self::search_body(query))
            .send()
            .await?;

        if !response.status_code().is_success() {
            return Err(Self::failure(response, "search").await);
        }

        let body = Self::read_json(response, "search").await?;
        let result = responses::parse_search_response(body)?;

        debug!(
            index = %query.index_name,
            hits = result.len(),
            total = result.total_hits.value,
            took_ms = result.took_millis,
            "Search completed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_body() {
        let query = SearchQuery::multi_match("iteminfo", "아이폰", ["title", "description"]);
        let body = OpenSearchProvider::search_body(&query);

        assert_eq!(
            body,
            json!({
                "from": 0,
                "size": 20,
                "query": {
                    "multi_match": {
                        "query": "아이폰",
                        "fields": ["title", "description"]
                    }
                }
            })
        );
    }

    #[test]
    fn test_search_body_paging() {
        let query = SearchQuery::multi_match("iteminfo", "phone", ["title"])
            .with_offset(40)
            .with_limit(10);
        let body = OpenSearchProvider::search_body(&query);

        assert_eq!(body["from"], 40);
        assert_eq!(body["size"], 10);
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(matches!(
            OpenSearchProvider::new("not a url"),
            Err(DocumentStoreError::TransportError(_))
        ));
    }

    #[test]
    fn test_new_with_default_endpoint() {
        // Building the transport does not open a connection.
        assert!(OpenSearchProvider::from_endpoint(&Endpoint::default()).is_ok());
    }
}
