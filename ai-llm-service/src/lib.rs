//! Model gateway over a local Ollama runtime.
//!
//! - [`model_gateway::ModelGateway`]: embeddings (flattened), generation,
//!   health probe, model availability check, model listing
//! - [`services::ollama_service::OllamaService`]: HTTP + CLI implementation of
//!   [`runtime::ModelRuntime`]
//! - [`catalog`]: installed-model snapshot and validated model names

pub mod catalog;
pub mod config;
pub mod embedding;
pub mod error_handler;
pub mod health_service;
pub mod listing;
pub mod model_gateway;
pub mod runtime;
pub mod services;
pub mod telemetry;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use catalog::{ModelCatalog, ModelName, ModelSelectionError};
pub use error_handler::AiLlmError;
pub use listing::ModelEntry;
pub use model_gateway::ModelGateway;
