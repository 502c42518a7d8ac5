//! Unified error types for the crate.

use std::path::PathBuf;

use ai_llm_service::AiLlmError;
use document_loader::LoaderError;
use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// A vector does not have the collection's dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// The model runtime failed its liveness probe before indexing.
    #[error(transparent)]
    Gateway(AiLlmError),

    /// The documents directory holds no supported file.
    #[error("no document files found in {}", .dir.display())]
    NoDocuments { dir: PathBuf },

    /// The documents directory could not be listed.
    #[error(transparent)]
    Loader(LoaderError),

    /// Reading one document failed; the run was aborted.
    #[error("failed to read document `{file}`: {source}")]
    Document {
        file: String,
        #[source]
        source: LoaderError,
    },

    /// Embedding one document failed; the run was aborted.
    #[error("failed to embed document `{file}`: {source}")]
    Embedding {
        file: String,
        #[source]
        source: AiLlmError,
    },

    /// A blocking task panicked or was cancelled.
    #[error("internal: {0}")]
    Internal(String),
}

impl From<qdrant_client::QdrantError> for RagError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        RagError::Qdrant(err.to_string())
    }
}
