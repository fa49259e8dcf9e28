//! Search query types.
//!
//! A query is a multi-field text match against one index with offset/limit
//! paging. Relevance scoring is left entirely to the remote engine.

use serde::{Deserialize, Serialize};

/// Largest `offset + limit` the engine serves by default (`index.max_result_window`).
pub const MAX_RESULT_WINDOW: usize = 10_000;

/// Search query parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    /// Index to search.
    pub index_name: String,

    /// Text matched against every field in `fields`.
    pub terms: String,

    /// Fields to match, in order.
    pub fields: Vec<String>,

    /// Offset for pagination.
    /// Default is 0.
    #[serde(default)]
    pub offset: usize,

    /// Maximum number of hits to return.
    /// Default is 20.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

impl SearchQuery {
    /// Create a multi-field query with the default paging (offset 0, limit 20).
    ///
    /// # Example
    ///
    /// ```
    /// use docstore_shared::SearchQuery;
    ///
    /// let query = SearchQuery::multi_match("iteminfo", "phone", ["title", "description"])
    ///     .with_offset(20)
    ///     .with_limit(10);
    ///
    /// assert_eq!(query.fields, vec!["title", "description"]);
    /// assert_eq!(query.offset, 20);
    /// ```
    pub fn multi_match<I, F>(index_name: impl Into<String>, terms: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            index_name: index_name.into(),
            terms: terms.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            offset: 0,
            limit: default_limit(),
        }
    }

    /// Set the maximum number of hits.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the offset for pagination.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Validate the query parameters.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.index_name.trim().is_empty() {
            return Err("index_name cannot be empty".to_string());
        }

        if self.terms.trim().is_empty() {
            return Err("Search terms cannot be empty".to_string());
        }

        if self.fields.is_empty() {
            return Err("At least one search field must be provided".to_string());
        }

        if self.fields.iter().any(|f| f.trim().is_empty()) {
            return Err("Search fields cannot be empty".to_string());
        }

        let window = self.offset.saturating_add(self.limit);
        if window > MAX_RESULT_WINDOW {
            return Err(format!(
                "offset + limit ({}) exceeds the result window of {}",
                window, MAX_RESULT_WINDOW
            ));
        }

        Ok(())
    }
}
