//! Lightweight Ollama client for generation, embeddings and model listing.
//!
//! This module implements a thin client for the local Ollama runtime:
//! - `POST {endpoint}/api/generate`: synchronous text generation (`stream=false`)
//! - `POST {endpoint}/api/embed`: embeddings retrieval
//! - `{cli_bin} list`: installed models (tabular output)
//!
//! Replies are returned raw ([`EmbedReply`], [`GenerateReply`]); shape checks
//! and flattening live in [`crate::model_gateway::ModelGateway`].
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::config::runtime_config::RuntimeConfig;
//! use ai_llm_service::runtime::ModelRuntime;
//! use ai_llm_service::services::ollama_service::OllamaService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = OllamaService::new(RuntimeConfig::default())?;
//!
//! let reply = svc.generate("llama3", "Write a haiku about Rust.").await?;
//! println!("Generated:\n{:?}", reply.response);
//!
//! let listing = svc.list_models().await?;
//! println!("{listing}");
//! # Ok(()) }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::config::runtime_config::RuntimeConfig;
use crate::error_handler::{AiLlmError, ConfigError, Result, make_snippet};
use crate::runtime::{EmbedReply, GenerateReply, ModelRuntime};

/// Thin client for Ollama.
///
/// Initialized with a [`RuntimeConfig`]. Reuses one HTTP client with a
/// configurable timeout for all calls.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: RuntimeConfig,
    url_generate: String,
    url_embed: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFormat`] if `cfg.endpoint` is invalid
    /// - [`AiLlmError::ServiceUnavailable`] if the HTTP client cannot be built
    pub fn new(cfg: RuntimeConfig) -> Result<Self> {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ConfigError::InvalidFormat {
                var: "OLLAMA_URL",
                reason: "must start with http:// or https://",
            }
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(600));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_generate = format!("{}/api/generate", base);
        let url_embed = format!("{}/api/embed", base);

        Ok(Self {
            client,
            cfg,
            url_generate,
            url_embed,
        })
    }

    /// Endpoint the client talks to.
    pub fn endpoint(&self) -> &str {
        self.cfg.endpoint.trim_end_matches('/')
    }

    /// POSTs `body` as JSON and decodes a 2xx reply.
    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        debug!("POST {}", url);
        let resp = self.client.post(url).json(body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AiLlmError::HttpStatus {
                status,
                url: url.to_string(),
                snippet: make_snippet(&text),
            });
        }

        resp.json::<R>()
            .await
            .map_err(|e| AiLlmError::InvalidResponse(format!("failed to decode reply: {e}")))
    }
}

#[async_trait]
impl ModelRuntime for OllamaService {
    /// Retrieves embeddings via `/api/embed`.
    ///
    /// # Errors
    /// - [`AiLlmError::ServiceUnavailable`] if the runtime cannot be reached
    /// - [`AiLlmError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::InvalidResponse`] if the body is not JSON
    #[instrument(skip_all, fields(model = %model, chars = input.len()))]
    async fn embed(&self, model: &str, input: &str) -> Result<EmbedReply> {
        let body = EmbedRequest { model, input };
        self.post_json(&self.url_embed, &body).await
    }

    /// Performs a **non-streaming** generation request via `/api/generate`.
    ///
    /// Mapped options:
    /// - `num_predict`  ← `cfg.max_tokens`
    /// - `temperature`  ← `cfg.temperature`
    /// - `top_p`        ← `cfg.top_p`
    #[instrument(skip_all, fields(model = %model, chars = prompt.len()))]
    async fn generate(&self, model: &str, prompt: &str) -> Result<GenerateReply> {
        let body = GenerateRequest::from_cfg(&self.cfg, model, prompt);
        self.post_json(&self.url_generate, &body).await
    }

    /// Runs `<cli_bin> list` against the configured endpoint.
    ///
    /// # Errors
    /// Returns [`AiLlmError::ListingFailed`] if the command cannot be spawned
    /// or exits unsuccessfully; the message echoes the command's stderr.
    #[instrument(skip_all, fields(bin = %self.cfg.cli_bin))]
    async fn list_models(&self) -> Result<String> {
        debug!("running `{} list`", self.cfg.cli_bin);
        let output = Command::new(&self.cfg.cli_bin)
            .arg("list")
            .env("OLLAMA_HOST", self.endpoint())
            .output()
            .await
            .map_err(|e| {
                AiLlmError::ListingFailed(format!("cannot run `{} list`: {e}", self.cfg.cli_bin))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = %output.status, %stderr, "model listing command failed");
            return Err(AiLlmError::ListingFailed(if stderr.is_empty() {
                format!("`{} list` exited with {}", self.cfg.cli_bin, output.status)
            } else {
                stderr
            }));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/generate` (non-streaming).
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

impl<'a> GenerateRequest<'a> {
    /// Builds a request from config, model and prompt.
    fn from_cfg(cfg: &RuntimeConfig, model: &'a str, prompt: &'a str) -> Self {
        let options = GenerateOptions {
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            num_predict: cfg.max_tokens,
        };

        Self {
            model,
            prompt,
            stream: false,
            options: (!options.is_empty()).then_some(options),
        }
    }
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl GenerateOptions {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_p.is_none() && self.num_predict.is_none()
    }
}

/// Request body for `/api/embed`.
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}
