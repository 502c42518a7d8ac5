//! Typed error for the contextor crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// The requested generation model failed its trial call. The source
    /// message lists the installed models when the model was not found.
    #[error("model `{model}` cannot be used: {source}")]
    ModelUnavailable {
        model: String,
        #[source]
        source: AiLlmError,
    },

    /// The store holds no document to ground the answer on.
    #[error("no relevant document found in the collection; index documents first")]
    NoRelevantDocument,

    /// Embedding or generation failures.
    #[error(transparent)]
    Gateway(#[from] AiLlmError),

    /// Errors from the underlying rag-store crate.
    #[error("RAG error: {0}")]
    Rag(#[from] rag_store::RagError),
}
