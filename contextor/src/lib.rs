//! Retrieval-augmented answering.
//!
//! Public API: [`Contextor::answer`]. It checks the requested model, embeds the
//! prompt with the fixed embedding model, retrieves the single nearest
//! document, wraps both in an instructional prompt, and returns the model's
//! reply verbatim. Nothing is retried; the first failing step ends the request.

mod error;
pub mod prompt;

use std::sync::Arc;

use ai_llm_service::ModelGateway;
use rag_store::{VectorStore, nearest};
use tracing::{debug, info, instrument};

pub use error::ContextorError;

/// Answer pipeline over a model gateway and a document store.
#[derive(Clone)]
pub struct Contextor {
    gateway: Arc<ModelGateway>,
    store: Arc<dyn VectorStore>,
}

impl Contextor {
    pub fn new(gateway: Arc<ModelGateway>, store: Arc<dyn VectorStore>) -> Self {
        Self { gateway, store }
    }

    /// Answers `prompt` with `model`, grounded on the nearest indexed document.
    ///
    /// # Errors
    /// - [`ContextorError::ModelUnavailable`] if the model fails its trial call
    /// - [`ContextorError::NoRelevantDocument`] if the store is empty; no
    ///   augmented generation is attempted
    /// - [`ContextorError::Gateway`] / [`ContextorError::Rag`] for embedding,
    ///   retrieval or generation failures
    ///
    /// # Example
    /// ```no_run
    /// # use contextor::Contextor;
    /// # async fn run(ctx: Contextor) -> Result<(), contextor::ContextorError> {
    /// let answer = ctx.answer("What color is the sky?", "llama3").await?;
    /// println!("{answer}");
    /// # Ok(()) }
    /// ```
    #[instrument(skip(self, prompt), fields(chars = prompt.len()))]
    pub async fn answer(&self, prompt: &str, model: &str) -> Result<String, ContextorError> {
        self.gateway
            .check_model_availability(model)
            .await
            .map_err(|source| ContextorError::ModelUnavailable {
                model: model.to_string(),
                source,
            })?;

        let query = self
            .gateway
            .embed(self.gateway.embedding_model(), prompt)
            .await?;

        let Some(doc) = nearest(self.store.as_ref(), &query).await? else {
            return Err(ContextorError::NoRelevantDocument);
        };
        debug!(document = %doc.id, score = doc.score, "nearest document");

        let augmented = prompt::build_augmented_prompt(&doc.text, prompt);
        let response = self.gateway.generate(model, &augmented).await?;

        info!(document = %doc.id, chars = response.len(), "answer generated");
        Ok(response)
    }
}
