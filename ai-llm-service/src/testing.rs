//! In-process stand-in for the model runtime, for test suites.
//!
//! [`FakeRuntime`] embeds text deterministically (letter histogram, returned
//! wrapped in an extra list like Ollama's `/api/embed`), answers generation
//! calls for "installed" models, replies to unknown models the way Ollama
//! does, and records every call.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::embedding::EmbeddingShape;
use crate::error_handler::{AiLlmError, Result};
use crate::runtime::{EmbedReply, GenerateReply, ModelRuntime};

/// Dimensionality of [`FakeRuntime`] embeddings.
pub const FAKE_EMBEDDING_DIM: usize = 8;

/// One recorded runtime call.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeCall {
    Embed { model: String, input: String },
    Generate { model: String, prompt: String },
    List,
}

#[derive(Debug)]
struct FakeState {
    installed: Vec<String>,
    reply: String,
    offline: bool,
    omit_embeddings: bool,
    omit_response: bool,
    failing_inputs: Vec<String>,
    listing_failure: Option<String>,
    calls: Vec<RuntimeCall>,
}

/// Scriptable [`ModelRuntime`].
#[derive(Debug)]
pub struct FakeRuntime {
    state: Mutex<FakeState>,
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRuntime {
    /// Online runtime with `llama3` installed.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                installed: vec!["llama3".to_string()],
                reply: "fake answer".to_string(),
                offline: false,
                omit_embeddings: false,
                omit_response: false,
                failing_inputs: Vec::new(),
                listing_failure: None,
                calls: Vec::new(),
            }),
        }
    }

    fn update(self, f: impl FnOnce(&mut FakeState)) -> Self {
        f(&mut self.lock());
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replaces the set of installed generation models.
    pub fn with_models(self, names: &[&str]) -> Self {
        self.update(|s| s.installed = names.iter().map(|n| n.to_string()).collect())
    }

    /// Text returned by every successful generation.
    pub fn with_reply(self, reply: &str) -> Self {
        self.update(|s| s.reply = reply.to_string())
    }

    /// Every embed/generate call fails as if the runtime were unreachable.
    pub fn offline(self) -> Self {
        self.update(|s| s.offline = true)
    }

    /// Embedding replies lack the `embeddings` field.
    pub fn without_embeddings_field(self) -> Self {
        self.update(|s| s.omit_embeddings = true)
    }

    /// Generation replies lack the `response` field.
    pub fn without_response_field(self) -> Self {
        self.update(|s| s.omit_response = true)
    }

    /// Embedding inputs containing `needle` fail with an HTTP 500.
    pub fn failing_embed_for(self, needle: &str) -> Self {
        self.update(|s| s.failing_inputs.push(needle.to_string()))
    }

    /// The listing command fails with `stderr`.
    pub fn with_listing_failure(self, stderr: &str) -> Self {
        self.update(|s| s.listing_failure = Some(stderr.to_string()))
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.lock().calls.clone()
    }

    /// Prompts of all generation calls.
    pub fn generate_prompts(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                RuntimeCall::Generate { prompt, .. } => Some(prompt.clone()),
                _ => None,
            })
            .collect()
    }

    /// Inputs of all embedding calls.
    pub fn embed_inputs(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                RuntimeCall::Embed { input, .. } => Some(input.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of listing calls.
    pub fn list_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, RuntimeCall::List))
            .count()
    }

    /// Deterministic embedding of `text`: letter buckets plus a bias term.
    pub fn vector_for(text: &str) -> Vec<f32> {
        let mut v = vec![0.0_f32; FAKE_EMBEDDING_DIM];
        for c in text.chars().filter(char::is_ascii_alphabetic) {
            let idx = (c.to_ascii_lowercase() as u8 - b'a') as usize % (FAKE_EMBEDDING_DIM - 1);
            v[idx] += 1.0;
        }
        v[FAKE_EMBEDDING_DIM - 1] = 1.0;
        v
    }

    fn unreachable() -> AiLlmError {
        AiLlmError::ServiceUnavailable("error sending request: connection refused".into())
    }
}

#[async_trait]
impl ModelRuntime for FakeRuntime {
    async fn embed(&self, model: &str, input: &str) -> Result<EmbedReply> {
        let mut s = self.lock();
        s.calls.push(RuntimeCall::Embed {
            model: model.to_string(),
            input: input.to_string(),
        });
        if s.offline {
            return Err(Self::unreachable());
        }
        if s.failing_inputs.iter().any(|n| input.contains(n.as_str())) {
            return Err(AiLlmError::HttpStatus {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                url: "fake://api/embed".into(),
                snippet: r#"{"error":"embedding failed"}"#.into(),
            });
        }
        if s.omit_embeddings {
            return Ok(EmbedReply::default());
        }
        Ok(EmbedReply {
            embeddings: Some(EmbeddingShape::flat(Self::vector_for(input)).wrapped(1)),
        })
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<GenerateReply> {
        let mut s = self.lock();
        s.calls.push(RuntimeCall::Generate {
            model: model.to_string(),
            prompt: prompt.to_string(),
        });
        if s.offline {
            return Err(Self::unreachable());
        }
        if !s.installed.iter().any(|m| m == model) {
            return Err(AiLlmError::HttpStatus {
                status: StatusCode::NOT_FOUND,
                url: "fake://api/generate".into(),
                snippet: format!(r#"{{"error":"model \"{model}\" not found, try pulling it first"}}"#),
            });
        }
        if s.omit_response {
            return Ok(GenerateReply::default());
        }
        Ok(GenerateReply {
            response: Some(s.reply.clone()),
        })
    }

    async fn list_models(&self) -> Result<String> {
        let mut s = self.lock();
        s.calls.push(RuntimeCall::List);
        if let Some(stderr) = &s.listing_failure {
            return Err(AiLlmError::ListingFailed(stderr.clone()));
        }
        let mut out = String::from("NAME                ID              SIZE      MODIFIED\n");
        for name in &s.installed {
            out.push_str(&format!("{name}    a80c4f17acd5    4.7 GB    2 days ago\n"));
        }
        Ok(out)
    }
}
