//! OpenSearch implementation of the document store provider.
//!
//! This module provides a concrete implementation of `DocumentStoreProvider`
//! using OpenSearch (or a REST-compatible Elasticsearch) as the backend.

mod provider;
mod responses;

pub use provider::OpenSearchProvider;
