//! Model gateway: the single entry point to the model runtime.
//!
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Holds the fixed embedding model; generation models are chosen per call.
//! - Normalizes embedding shapes and turns missing reply fields into
//!   [`AiLlmError::InvalidResponse`].
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::config::runtime_config::RuntimeConfig;
//! use ai_llm_service::model_gateway::ModelGateway;
//! use ai_llm_service::services::ollama_service::OllamaService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let runtime = Arc::new(OllamaService::new(RuntimeConfig::default())?);
//! let gateway = ModelGateway::new(runtime, "mxbai-embed-large");
//!
//! gateway.check_service_health().await?;
//! let v = gateway.embed(gateway.embedding_model(), "Ferris").await?;
//! println!("Embedding dim = {}", v.len());
//! # Ok(()) }
//! ```

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::catalog::ModelCatalog;
use crate::embedding::flatten_embedding;
use crate::error_handler::{AiLlmError, Result};
use crate::listing::{ModelEntry, model_names, parse_model_listing};
use crate::runtime::ModelRuntime;

/// Input of the embedding liveness probe.
const HEALTH_PROBE_INPUT: &str = "health check";

/// Prompt of the trial generation used to check a model.
const AVAILABILITY_PROBE_PROMPT: &str = "Test";

/// Gateway over a [`ModelRuntime`].
pub struct ModelGateway {
    runtime: Arc<dyn ModelRuntime>,
    embedding_model: String,
}

impl ModelGateway {
    /// Creates a gateway with a fixed embedding model.
    pub fn new(runtime: Arc<dyn ModelRuntime>, embedding_model: impl Into<String>) -> Self {
        Self {
            runtime,
            embedding_model: embedding_model.into(),
        }
    }

    /// Identifier used for every document and prompt embedding.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Embeds `text` and flattens the returned shape to one vector.
    ///
    /// # Errors
    /// - [`AiLlmError::ServiceUnavailable`] if the runtime cannot be reached
    /// - [`AiLlmError::InvalidResponse`] if the reply lacks `embeddings` or is not a flat vector
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>> {
        let reply = self.runtime.embed(model, text).await?;
        let shape = reply.embeddings.ok_or_else(|| {
            AiLlmError::InvalidResponse(format!("embedding reply from `{model}` has no embeddings"))
        })?;
        let vector = flatten_embedding(shape).into_vector()?;
        debug!(dim = vector.len(), "embedding received");
        Ok(vector)
    }

    /// Generates text for a fully assembled prompt.
    ///
    /// # Errors
    /// - [`AiLlmError::InvalidResponse`] if the reply has no `response`
    /// - any transport/HTTP error of the runtime, unchanged
    #[instrument(skip(self, prompt), fields(chars = prompt.len()))]
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        let reply = self.runtime.generate(model, prompt).await?;
        reply.response.ok_or_else(|| {
            AiLlmError::InvalidResponse(format!("generation reply from `{model}` has no response"))
        })
    }

    /// Liveness probe: a cheap embedding call with the embedding model.
    ///
    /// # Errors
    /// Returns [`AiLlmError::ServiceUnavailable`] describing why the probe failed.
    #[instrument(skip(self), fields(model = %self.embedding_model))]
    pub async fn check_service_health(&self) -> Result<()> {
        let reply = match self
            .runtime
            .embed(&self.embedding_model, HEALTH_PROBE_INPUT)
            .await
        {
            Ok(reply) => reply,
            Err(err @ AiLlmError::ServiceUnavailable(_)) => return Err(err),
            Err(err) => {
                return Err(AiLlmError::ServiceUnavailable(format!(
                    "health probe failed: {err}"
                )));
            }
        };

        if reply.embeddings.is_none() {
            return Err(AiLlmError::ServiceUnavailable(
                "health probe failed: unexpected response format (no embeddings)".into(),
            ));
        }

        debug!("runtime is healthy");
        Ok(())
    }

    /// Checks a generation model with a trial generation call.
    ///
    /// When the failure text mentions both "model" and "not found", the error
    /// is turned into [`AiLlmError::ModelUnavailable`] whose reason lists the
    /// installed models (comma-joined). Any other failure is returned
    /// unchanged. Listing happens only on that error path.
    ///
    /// The trial call costs a real generation; Ollama's `/api/show` would be a
    /// cheaper existence check but does not prove the model can be loaded.
    #[instrument(skip(self))]
    pub async fn check_model_availability(&self, model: &str) -> Result<()> {
        let err = match self.runtime.generate(model, AVAILABILITY_PROBE_PROMPT).await {
            Ok(reply) if reply.response.is_some() => {
                debug!("model is available");
                return Ok(());
            }
            Ok(_) => {
                return Err(AiLlmError::InvalidResponse(format!(
                    "model {model} did not return a valid response"
                )));
            }
            Err(err) => err,
        };

        let message = err.to_string();
        if !mentions_missing_model(&message) {
            return Err(err);
        }

        let available = match self.list_available_models().await {
            Ok(models) => model_names(&models).join(", "),
            Err(list_err) => format!("error retrieving available models: {list_err}"),
        };
        warn!(%available, "requested model is not installed");

        Err(AiLlmError::ModelUnavailable {
            model: model.to_string(),
            reason: format!("{message}. Available models: {available}"),
        })
    }

    /// Lists installed models as header → cell mappings.
    ///
    /// # Errors
    /// Returns [`AiLlmError::ListingFailed`] if the listing command fails or
    /// prints nothing.
    #[instrument(skip(self))]
    pub async fn list_available_models(&self) -> Result<Vec<ModelEntry>> {
        let output = self.runtime.list_models().await.map_err(|err| match err {
            AiLlmError::ListingFailed(_) => err,
            other => AiLlmError::ListingFailed(other.to_string()),
        })?;
        let models = parse_model_listing(&output)?;
        debug!(count = models.len(), "models listed");
        Ok(models)
    }

    /// Snapshot of installed models; a listing failure yields a degraded
    /// catalog instead of an error.
    pub async fn catalog(&self) -> ModelCatalog {
        match self.list_available_models().await {
            Ok(models) => {
                info!(count = models.len(), "model catalog loaded");
                ModelCatalog::Ready(models)
            }
            Err(err) => {
                warn!(error = %err, "model listing failed; catalog degraded");
                ModelCatalog::Degraded {
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// Case-insensitive check for "model" and "not found" in an error text.
fn mentions_missing_model(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("model") && lower.contains("not found")
}
