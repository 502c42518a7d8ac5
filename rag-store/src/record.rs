//! Core data models used by the library.

use serde::Serialize;

/// One document as written to the store. `id` is the source file name;
/// writing an existing id replaces the previous entry.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentEntry {
    pub id: String,
    pub embedding: Vec<f32>,
    pub text: String,
}

/// A single retrieval hit.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub text: String,
    pub score: f32,
}

/// Outcome of a successful indexing run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndexReport {
    /// Number of documents upserted.
    pub indexed: usize,
    /// Identifiers of the indexed documents, in processing order.
    pub files: Vec<String>,
}
