//! Index settings and mappings.
//!
//! Indices are created on demand by the store when a document is first
//! written, but dynamic mapping would store a geohash `location` as plain
//! text. Creating the index up front with an explicit mapping keeps geo
//! fields queryable as `geo_point`.

use serde_json::{json, Map, Value};

/// Settings and field mappings used when creating an index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
    /// Field name to mapping definition (e.g. `{"type": "keyword"}`).
    pub properties: Map<String, Value>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            number_of_shards: 1,
            number_of_replicas: 1,
            properties: Map::new(),
        }
    }
}

impl IndexConfig {
    /// Set the number of primary shards.
    pub fn with_shards(mut self, number_of_shards: u32) -> Self {
        self.number_of_shards = number_of_shards;
        self
    }

    /// Set the number of replicas.
    pub fn with_replicas(mut self, number_of_replicas: u32) -> Self {
        self.number_of_replicas = number_of_replicas;
        self
    }

    /// Map a field to a core type (`text`, `keyword`, `integer`, `date`, `geo_point`, ...).
    pub fn with_field(self, name: impl Into<String>, field_type: &str) -> Self {
        self.with_field_mapping(name, json!({ "type": field_type }))
    }

    /// Map a field to a full mapping definition.
    pub fn with_field_mapping(mut self, name: impl Into<String>, mapping: Value) -> Self {
        self.properties.insert(name.into(), mapping);
        self
    }

    /// The request body for index creation.
    pub fn to_body(&self) -> Value {
        json!({
            "settings": {
                "number_of_shards": self.number_of_shards,
                "number_of_replicas": self.number_of_replicas
            },
            "mappings": {
                "properties": self.properties
            }
        })
    }
}
