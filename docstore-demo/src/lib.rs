//! # Docstore Demo
//!
//! Runs a fixed sequence against a document store: create the demo index,
//! index a sample item, read it back two ways, search for it, and optionally
//! clean up.
//!
//! ## Modules
//!
//! - [`config`]: Environment-driven settings
//! - [`demo`]: The demonstration sequence and its sample data

pub mod config;
pub mod demo;

pub use config::DemoConfig;
pub use demo::Demo;

use docstore_repository::DocumentStoreError;
use docstore_shared::GeohashError;
use thiserror::Error;

/// Errors that can stop the demonstration.
#[derive(Error, Debug)]
pub enum DemoError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A document store call failed.
    #[error("Document store error: {0}")]
    DocumentStoreError(#[from] DocumentStoreError),

    /// The sample location could not be encoded.
    #[error("Geohash error: {0}")]
    GeohashError(#[from] GeohashError),
}

impl DemoError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
