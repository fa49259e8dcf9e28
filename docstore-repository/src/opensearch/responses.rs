//! Wire formats of OpenSearch responses and their conversion into client types.

use docstore_shared::{
    fields_from_json, Fields, SearchHit, SearchResult, ShardFailure, ShardStats, TotalHits,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::DocumentStoreError;
use crate::types::{DeleteResult, GetResponse, IndexResponse, IndexResult};

#[derive(Debug, Deserialize)]
struct RawIndexResponse {
    #[serde(rename = "_index")]
    index: String,
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_version")]
    version: Option<i64>,
    result: String,
}

#[derive(Debug, Deserialize)]
struct RawGetResponse {
    #[serde(rename = "_index")]
    index: String,
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_version")]
    version: Option<i64>,
    found: bool,
    #[serde(rename = "_source")]
    source: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct RawDeleteResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct RawAcknowledged {
    acknowledged: bool,
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    took: u64,
    timed_out: bool,
    #[serde(rename = "_shards", default)]
    shards: Option<RawShards>,
    hits: RawHits,
}

#[derive(Debug, Deserialize)]
struct RawShards {
    total: u32,
    successful: u32,
    #[serde(default)]
    skipped: u32,
    failed: u32,
    #[serde(default)]
    failures: Vec<RawShardFailure>,
}

#[derive(Debug, Deserialize)]
struct RawShardFailure {
    index: Option<String>,
    shard: Option<i64>,
    #[serde(default)]
    reason: Value,
}

/// `hits.total` is an object since 7.0 and a bare count with `rest_total_hits_as_int`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Object { value: u64, relation: String },
    Count(u64),
}

#[derive(Debug, Deserialize)]
struct RawHits {
    total: Option<RawTotal>,
    max_score: Option<f64>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_index")]
    index: String,
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: Option<Map<String, Value>>,
}

fn decode<T: DeserializeOwned>(operation: &str, body: Value) -> Result<T, DocumentStoreError> {
    serde_json::from_value(body).map_err(|e| {
        DocumentStoreError::parse(format!("Unexpected {} response: {}", operation, e))
    })
}

/// Decode a stored source. Fields with no scalar form are logged and left out.
fn decode_source(index: &str, id: &str, source: Option<Map<String, Value>>) -> Fields {
    let decoded = fields_from_json(source.unwrap_or_default());
    for skipped in &decoded.skipped {
        warn!(index = %index, id = %id, reason = %skipped, "Skipped source field");
    }
    decoded.fields
}

pub(crate) fn parse_index_response(body: Value) -> Result<IndexResponse, DocumentStoreError> {
    let raw: RawIndexResponse = decode("index", body)?;
    let result = match raw.result.as_str() {
        "created" => IndexResult::Created,
        "updated" => IndexResult::Updated,
        other => {
            return Err(DocumentStoreError::parse(format!(
                "Unknown index result '{}'",
                other
            )))
        }
    };
    Ok(IndexResponse {
        index: raw.index,
        id: raw.id,
        result,
        version: raw.version,
    })
}

pub(crate) fn parse_get_response(body: Value) -> Result<Option<GetResponse>, DocumentStoreError> {
    let raw: RawGetResponse = decode("get", body)?;
    if !raw.found {
        return Ok(None);
    }
    let source = decode_source(&raw.index, &raw.id, raw.source);
    Ok(Some(GetResponse {
        index: raw.index,
        id: raw.id,
        version: raw.version,
        source,
    }))
}

pub(crate) fn parse_source_response(
    index: &str,
    id: &str,
    body: Value,
) -> Result<Fields, DocumentStoreError> {
    match body {
        Value::Object(map) => Ok(decode_source(index, id, Some(map))),
        other => Err(DocumentStoreError::parse(format!(
            "Expected a JSON object as document source, got {}",
            other
        ))),
    }
}

pub(crate) fn parse_delete_response(body: Value) -> Result<DeleteResult, DocumentStoreError> {
    let raw: RawDeleteResponse = decode("delete", body)?;
    match raw.result.as_str() {
        "deleted" => Ok(DeleteResult::Deleted),
        "not_found" => Ok(DeleteResult::NotFound),
        other => Err(DocumentStoreError::parse(format!(
            "Unknown delete result '{}'",
            other
        ))),
    }
}

pub(crate) fn parse_acknowledged(body: Value) -> Result<bool, DocumentStoreError> {
    let raw: RawAcknowledged = decode("delete_index", body)?;
    Ok(raw.acknowledged)
}

fn parse_total(total: Option<RawTotal>, returned: usize) -> Result<TotalHits, DocumentStoreError> {
    match total {
        Some(RawTotal::Object { value, relation }) => match relation.as_str() {
            "eq" => Ok(TotalHits::exact(value)),
            "gte" => Ok(TotalHits::lower_bound(value)),
            other => Err(DocumentStoreError::parse(format!(
                "Unknown total hits relation '{}'",
                other
            ))),
        },
        Some(RawTotal::Count(value)) => Ok(TotalHits::exact(value)),
        // Tracking disabled: all we know is what came back.
        None => Ok(TotalHits::lower_bound(returned as u64)),
    }
}

fn failure_reason(reason: &Value) -> String {
    match reason {
        Value::String(s) => s.clone(),
        Value::Object(obj) => obj
            .get("reason")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| reason.to_string()),
        Value::Null => "unknown".to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn parse_search_response(body: Value) -> Result<SearchResult, DocumentStoreError> {
    let raw: RawSearchResponse = decode("search", body)?;

    let hits = raw
        .hits
        .hits
        .into_iter()
        .map(|hit| SearchHit {
            source: decode_source(&hit.index, &hit.id, hit.source),
            index: hit.index,
            id: hit.id,
            score: hit.score.unwrap_or(0.0),
        })
        .collect::<Vec<_>>();

    let total_hits = parse_total(raw.hits.total, hits.len())?;

    let shards = raw
        .shards
        .map(|s| ShardStats {
            total: s.total,
            successful: s.successful,
            skipped: s.skipped,
            failed: s.failed,
            failures: s
                .failures
                .into_iter()
                .map(|f| ShardFailure {
                    index: f.index,
                    shard: f.shard,
                    reason: failure_reason(&f.reason),
                })
                .collect(),
        })
        .unwrap_or_default();

    Ok(SearchResult {
        hits,
        total_hits,
        timed_out: raw.timed_out,
        took_millis: raw.took,
        max_score: raw.hits.max_score,
        shards,
    })
}
