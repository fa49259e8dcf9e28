//! # Docstore Repository
//!
//! This crate provides the client for a remote document store: a provider
//! trait, a concrete implementation for OpenSearch (and Elasticsearch 7.x),
//! and the `DocumentStoreClient` facade that adds validation, retries,
//! deadlines and failure logging on top of it.

pub mod config;
pub mod errors;
pub mod index_config;
pub mod interfaces;
pub mod opensearch;
pub mod service;
pub mod types;

pub use config::{DocumentStoreConfig, Endpoint, RetryPolicy};
pub use errors::DocumentStoreError;
pub use index_config::IndexConfig;
pub use interfaces::DocumentStoreProvider;
pub use opensearch::OpenSearchProvider;
pub use service::DocumentStoreClient;
pub use types::{DeleteResult, GetResponse, IndexResponse, IndexResult};
