//! Document vector store and indexer.
//!
//! This crate provides:
//! - [`VectorStore`]: the upsert/query seam the rest of the service talks to
//! - [`QdrantFacade`]: the Qdrant-backed implementation
//! - [`Indexer`]: reads a documents directory, embeds each file and upserts it
//! - [`nearest`]: top-1 retrieval used by the answer pipeline

mod config;
mod errors;
mod ingest;
mod qdrant_facade;
mod record;
mod retrieve;
mod store;

#[cfg(any(test, feature = "test-util"))]
pub mod memory;

pub use config::{DistanceKind, RagConfig, VectorSpace};
pub use errors::RagError;
pub use ingest::Indexer;
pub use qdrant_facade::QdrantFacade;
pub use record::{DocumentEntry, IndexReport, StoredDocument};
pub use retrieve::nearest;
pub use store::VectorStore;
