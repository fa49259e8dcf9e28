//! # Docstore Shared
//!
//! This crate defines the data structures shared by the docstore client and
//! its callers: documents with typed field values, geohash-encoded locations,
//! and the search query and result types.

pub mod types;

pub use types::document::{fields_from_json, fields_to_json};
pub use types::{
    Document, FieldValue, FieldValueError, Fields, GeoBounds, GeoPoint, Geohash, GeohashError,
    SearchHit, SearchQuery, SearchResult, ShardFailure, ShardStats, SourceFields, TotalHits,
    TotalHitsRelation,
};
