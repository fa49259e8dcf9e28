//! Response types for single-document operations.

use docstore_shared::Fields;
use serde::{Deserialize, Serialize};

/// Outcome of indexing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexResult {
    /// No document existed under the id.
    Created,
    /// A document existed under the id and was replaced.
    Updated,
}

/// Response to an index request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResponse {
    pub index: String,
    pub id: String,
    pub result: IndexResult,
    /// Document version after the write, when the store reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

/// A document fetched by id, with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetResponse {
    pub index: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Stored fields. Empty when the index does not keep sources.
    pub source: Fields,
}

/// Outcome of deleting a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeleteResult {
    Deleted,
    /// Nothing was stored under the id (or the index does not exist).
    NotFound,
}
