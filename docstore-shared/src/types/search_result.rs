//! Search result types.
//!
//! This module defines the response structures returned from search operations.

use serde::{Deserialize, Serialize};

use crate::types::document::Fields;

/// A single search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    /// Index the hit came from.
    pub index: String,

    /// Document id.
    pub id: String,

    /// Relevance score from the search engine.
    /// Higher scores indicate better matches; the formula is engine-defined.
    pub score: f64,

    /// Stored fields of the document.
    pub source: Fields,
}

/// How `TotalHits::value` relates to the real number of matches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TotalHitsRelation {
    /// The count is exact.
    #[default]
    Exact,

    /// The engine stopped counting; the real total is at least `value`.
    LowerBound,
}

/// Total number of matching documents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TotalHits {
    pub value: u64,
    pub relation: TotalHitsRelation,
}

impl TotalHits {
    pub fn exact(value: u64) -> Self {
        Self {
            value,
            relation: TotalHitsRelation::Exact,
        }
    }

    pub fn lower_bound(value: u64) -> Self {
        Self {
            value,
            relation: TotalHitsRelation::LowerBound,
        }
    }

    /// Returns true if `value` is the exact number of matches.
    pub fn is_exact(&self) -> bool {
        self.relation == TotalHitsRelation::Exact
    }
}

/// A failure reported by one shard while executing a search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShardFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard: Option<i64>,
    pub reason: String,
}

/// Shard-level execution summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ShardStats {
    pub total: u32,
    pub successful: u32,
    pub skipped: u32,
    pub failed: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ShardFailure>,
}

/// Complete search response with hits and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchResult {
    /// Hits in the order returned by the engine (non-increasing score).
    pub hits: Vec<SearchHit>,

    /// Total number of matching documents.
    /// May be greater than the number of returned hits due to pagination.
    pub total_hits: TotalHits,

    /// Whether the engine timed out before collecting every shard's hits.
    pub timed_out: bool,

    /// Time taken to execute the search in milliseconds.
    pub took_millis: u64,

    /// Highest score among all matches, when the engine reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,

    pub shards: ShardStats,
}

impl SearchResult {
    /// Create an empty search result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if there are no hits.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Returns the number of hits in this result.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns true if hits are ordered by non-increasing score.
    pub fn is_ordered_by_score(&self) -> bool {
        self.hits.windows(2).all(|pair| pair[0].score >= pair[1].score)
    }
}
