//! Contract of the external model runtime.
//!
//! The gateway only talks to the runtime through [`ModelRuntime`], which keeps
//! it testable without a live Ollama process (see `testing::FakeRuntime`).

use async_trait::async_trait;
use serde::Deserialize;

use crate::embedding::EmbeddingShape;
use crate::error_handler::Result;

/// Raw reply of an embedding call. A missing field is reported by the
/// gateway as an invalid response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbedReply {
    #[serde(default, alias = "embedding")]
    pub embeddings: Option<EmbeddingShape>,
}

/// Raw reply of a non-streaming generation call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateReply {
    #[serde(default)]
    pub response: Option<String>,
}

/// Embedding, generation and model listing capabilities of a model runtime.
#[async_trait]
pub trait ModelRuntime: Send + Sync {
    /// Embeds `input` with `model`.
    async fn embed(&self, model: &str, input: &str) -> Result<EmbedReply>;

    /// Generates a completion for a fully assembled `prompt`.
    async fn generate(&self, model: &str, prompt: &str) -> Result<GenerateReply>;

    /// Returns the raw output of the model-listing command.
    async fn list_models(&self) -> Result<String>;
}
