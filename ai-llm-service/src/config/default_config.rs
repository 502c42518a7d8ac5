//! Runtime and gateway configs loaded from environment variables.
//!
//! Every constructor takes a `lookup` closure (`|key| std::env::var(key).ok()`
//! in production) so configuration can be exercised without touching the
//! process environment.
//!
//! # Environment variables
//!
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (default `http://localhost:11434`)
//! - `OLLAMA_BIN`                  = listing executable (default `ollama`)
//! - `OLLAMA_TIMEOUT_SECS`         = request timeout (default 600)
//! - `LLM_MAX_TOKENS`              = optional max tokens (u32)
//! - `LLM_TEMPERATURE`             = optional temperature (`0.0..=2.0`)
//! - `EMBEDDING_MODEL`             = fixed embedding model (default `mxbai-embed-large`)

use crate::{
    config::runtime_config::RuntimeConfig,
    error_handler::{
        AiLlmError, ConfigError, parse_opt_f32, parse_opt_u32, validate_http_endpoint,
        validate_range_f32,
    },
};

/// Embedding model used for every document and prompt embedding.
pub const DEFAULT_EMBEDDING_MODEL: &str = "mxbai-embed-large";

const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Reads a variable and discards blank values.
fn non_blank(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. `http://localhost:11434`
///
/// # Errors
///
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
/// - [`ConfigError::InvalidFormat`] if `OLLAMA_URL` lacks an http(s) scheme
fn ollama_endpoint(lookup: &impl Fn(&str) -> Option<String>) -> Result<String, AiLlmError> {
    if let Some(url) = non_blank(lookup, "OLLAMA_URL") {
        let url = url.trim().trim_end_matches('/').to_string();
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = non_blank(lookup, "OLLAMA_PORT") {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Ok(DEFAULT_ENDPOINT.to_string())
}

/// Constructs the runtime config.
///
/// # Defaults
/// - `cli_bin = "ollama"`
/// - `timeout_secs = Some(600)` (generation on local hardware is slow)
pub fn config_ollama_runtime(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<RuntimeConfig, AiLlmError> {
    let endpoint = ollama_endpoint(&lookup)?;
    let cli_bin = non_blank(&lookup, "OLLAMA_BIN").unwrap_or_else(|| "ollama".to_string());
    let max_tokens = parse_opt_u32("LLM_MAX_TOKENS", lookup("LLM_MAX_TOKENS"))?;
    let temperature = parse_opt_f32("LLM_TEMPERATURE", lookup("LLM_TEMPERATURE"))?;
    if let Some(t) = temperature {
        validate_range_f32("temperature", t, 0.0, 2.0)?;
    }
    let timeout_secs = parse_opt_u32("OLLAMA_TIMEOUT_SECS", lookup("OLLAMA_TIMEOUT_SECS"))?
        .map(u64::from)
        .or(Some(600));

    Ok(RuntimeConfig {
        endpoint,
        cli_bin,
        max_tokens,
        temperature,
        top_p: None,
        timeout_secs,
    })
}

/// Resolves the fixed embedding model identifier.
///
/// # Errors
/// Returns [`ConfigError::EmptyModel`] if `EMBEDDING_MODEL` is set to whitespace.
pub fn embedding_model(lookup: impl Fn(&str) -> Option<String>) -> Result<String, AiLlmError> {
    match lookup("EMBEDDING_MODEL") {
        None => Ok(DEFAULT_EMBEDDING_MODEL.to_string()),
        Some(v) if v.trim().is_empty() => Err(ConfigError::EmptyModel("EMBEDDING_MODEL").into()),
        Some(v) => Ok(v.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = config_ollama_runtime(env(&[])).unwrap();
        assert_eq!(cfg, RuntimeConfig::default());
        assert_eq!(embedding_model(env(&[])).unwrap(), "mxbai-embed-large");
    }

    #[test]
    fn url_wins_over_port() {
        let cfg = config_ollama_runtime(env(&[
            ("OLLAMA_URL", "http://gpu-box:11434/"),
            ("OLLAMA_PORT", "9999"),
        ]))
        .unwrap();
        assert_eq!(cfg.endpoint, "http://gpu-box:11434");

        let cfg = config_ollama_runtime(env(&[("OLLAMA_PORT", "9999")])).unwrap();
        assert_eq!(cfg.endpoint, "http://localhost:9999");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config_ollama_runtime(env(&[("OLLAMA_PORT", "abc")])).is_err());
        assert!(config_ollama_runtime(env(&[("OLLAMA_URL", "gpu-box:11434")])).is_err());
        assert!(config_ollama_runtime(env(&[("LLM_TEMPERATURE", "3.5")])).is_err());
        assert!(matches!(
            embedding_model(env(&[("EMBEDDING_MODEL", "  ")])),
            Err(AiLlmError::Config(ConfigError::EmptyModel("EMBEDDING_MODEL")))
        ));
    }

    #[test]
    fn optional_knobs_are_parsed() {
        let cfg = config_ollama_runtime(env(&[
            ("OLLAMA_BIN", "/usr/local/bin/ollama"),
            ("LLM_MAX_TOKENS", "256"),
            ("LLM_TEMPERATURE", "0.2"),
            ("OLLAMA_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(cfg.cli_bin, "/usr/local/bin/ollama");
        assert_eq!(cfg.max_tokens, Some(256));
        assert_eq!(cfg.temperature, Some(0.2));
        assert_eq!(cfg.timeout_secs, Some(30));
    }
}
