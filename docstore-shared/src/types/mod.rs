//! This module defines the core data structures used by the docstore client:
//! documents and their field values, geohashes, search queries and results.

pub mod document;
pub mod geohash;
pub mod search_query;
pub mod search_result;

pub use document::{Document, FieldValue, FieldValueError, Fields, SourceFields};
pub use geohash::{GeoBounds, GeoPoint, Geohash, GeohashError};
pub use search_query::SearchQuery;
pub use search_result::{
    SearchHit, SearchResult, ShardFailure, ShardStats, TotalHits, TotalHitsRelation,
};
