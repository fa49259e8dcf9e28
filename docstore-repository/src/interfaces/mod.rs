//! Interface definitions for the document store provider.
//!
//! This module defines the abstract `DocumentStoreProvider` trait that allows
//! for dependency injection and swappable document store backends.

mod document_store_provider;

pub use document_store_provider::DocumentStoreProvider;
