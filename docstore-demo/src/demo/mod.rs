//! The demonstration sequence.
//!
//! Each step logs what the store returned. A failing step stops the run; the
//! client is closed either way.

mod sample;

pub use sample::{index_config, sample_item, SAMPLE_LATITUDE, SAMPLE_LONGITUDE, SEARCH_FIELDS};

use chrono::Utc;
use docstore_repository::{DeleteResult, DocumentStoreClient};
use docstore_shared::{FieldValue, Fields, SearchQuery, SearchResult};
use tracing::{info, warn};

use crate::{DemoConfig, DemoError};

/// Runs the demonstration against one client.
pub struct Demo {
    client: DocumentStoreClient,
    config: DemoConfig,
}

impl Demo {
    pub fn new(client: DocumentStoreClient, config: DemoConfig) -> Self {
        Self { client, config }
    }

    /// Build the client for `config`. No request is sent yet.
    pub fn connect(config: DemoConfig) -> Result<Self, DemoError> {
        let client = DocumentStoreClient::connect(&config.endpoint, config.client_config())?;
        Ok(Self::new(client, config))
    }

    /// Run every step, then close the client.
    pub async fn run(self) -> Result<(), DemoError> {
        let result = self.run_steps().await;
        self.client.close();
        result
    }

    async fn run_steps(&self) -> Result<(), DemoError> {
        let index_name = self.config.index_name.as_str();
        let id = self.config.document_id.as_str();

        let created = self.client.ensure_index(index_name, &index_config()).await?;
        info!(index = %index_name, created, "Index ready");

        self.index_sample(index_name, id).await?;
        self.show_document(index_name, id).await?;
        self.show_source(index_name, id).await?;

        if self.config.delete_document {
            let result = self.client.delete(index_name, id).await?;
            match result {
                DeleteResult::Deleted => info!(index = %index_name, id = %id, "Deleted document"),
                DeleteResult::NotFound => {
                    info!(index = %index_name, id = %id, "Document to delete was not found")
                }
            }
        }

        let query = SearchQuery::multi_match(
            index_name,
            self.config.search_terms.as_str(),
            SEARCH_FIELDS,
        );
        let result = self.client.search(query).await?;
        log_search_result(&result);

        if self.config.delete_index {
            let acknowledged = self.client.delete_index(index_name).await?;
            info!(index = %index_name, acknowledged, "Deleted index");
        }

        Ok(())
    }

    async fn index_sample(&self, index_name: &str, id: &str) -> Result<(), DemoError> {
        let document = sample_item(index_name, id, Utc::now())?;
        let response = self.client.index(document).await?;
        info!(
            index = %response.index,
            id = %response.id,
            result = ?response.result,
            "Indexed sample item"
        );
        Ok(())
    }

    async fn show_document(&self, index_name: &str, id: &str) -> Result<(), DemoError> {
        match self.client.get(index_name, id).await? {
            Some(found) => {
                info!(index = %found.index, id = %found.id, version = ?found.version, "Found document");
                for (name, value) in &found.source {
                    info!(field = %name, value = %value, "Document field");
                }
                log_location(&found.source);
            }
            None => info!(index = %index_name, id = %id, "Document not found"),
        }
        Ok(())
    }

    async fn show_source(&self, index_name: &str, id: &str) -> Result<(), DemoError> {
        match self.client.get_source(index_name, id).await? {
            Some(source) => {
                info!(
                    category = source.get("category").and_then(FieldValue::as_str).unwrap_or("-"),
                    level = source.get("level").and_then(FieldValue::as_i64),
                    "Document source"
                );
                log_location(&source);
            }
            None => info!(index = %index_name, id = %id, "Document source not found"),
        }
        Ok(())
    }
}

fn log_location(fields: &Fields) {
    let Some(location) = fields.get("location") else {
        return;
    };
    match location.as_geohash() {
        Some(geohash) => {
            let point = geohash.decode();
            info!(
                geohash = %geohash,
                latitude = point.latitude,
                longitude = point.longitude,
                "Decoded location"
            );
        }
        None => warn!(value = %location, "Location is not a geohash"),
    }
}

fn log_search_result(result: &SearchResult) {
    info!(
        took_ms = result.took_millis,
        timed_out = result.timed_out,
        total_hits = result.total_hits.value,
        relation = ?result.total_hits.relation,
        max_score = ?result.max_score,
        "Search completed"
    );

    if result.shards.failed > 0 {
        warn!(
            total = result.shards.total,
            successful = result.shards.successful,
            failed = result.shards.failed,
            "Search ran with shard failures"
        );
    }
    for failure in &result.shards.failures {
        warn!(
            index = ?failure.index,
            shard = ?failure.shard,
            reason = %failure.reason,
            "Shard failure"
        );
    }

    for hit in &result.hits {
        let text = |name: &str| {
            hit.source
                .get(name)
                .and_then(FieldValue::as_str)
                .unwrap_or("")
                .to_string()
        };
        info!(
            index = %hit.index,
            id = %hit.id,
            score = hit.score,
            title = %text("title"),
            description = %text("description"),
            "Search hit"
        );
    }
}
