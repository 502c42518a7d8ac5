//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library and groups configuration problems in [`ConfigError`]. Small helpers for
//! reading/validating configuration values are provided and return the unified
//! [`Result<T>`] alias.
//!
//! All messages include the prefix `[AI LLM Service]` to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup only).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The runtime could not be reached or failed its liveness probe.
    #[error("[AI LLM Service] model runtime unavailable: {0}")]
    ServiceUnavailable(String),

    /// Upstream returned a non-successful HTTP status.
    #[error("[AI LLM Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// The runtime answered, but the reply lacks the expected field or shape.
    #[error("[AI LLM Service] invalid response: {0}")]
    InvalidResponse(String),

    /// A requested generation model failed its trial call.
    #[error("[AI LLM Service] model `{model}` is unavailable: {reason}")]
    ModelUnavailable {
        /// Model identifier as requested.
        model: String,
        /// Original failure text, enriched with installed models when known.
        reason: String,
    },

    /// The model-listing command failed or produced nothing usable.
    #[error("[AI LLM Service] failed to list models: {0}")]
    ListingFailed(String),
}

impl From<reqwest::Error> for AiLlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AiLlmError::InvalidResponse(err.to_string())
        } else {
            AiLlmError::ServiceUnavailable(err.to_string())
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_MAX_TOKENS`, `OLLAMA_PORT`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `OLLAMA_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `temperature`).
        field: &'static str,
        /// Description of the expected range.
        detail: &'static str,
    },

    /// Model name was empty.
    #[error("[AI LLM Service] model name in {0} must not be empty")]
    EmptyModel(&'static str),
}

/* ------------------------------------------------------------------------- */
/* Helpers                                                                   */
/* ------------------------------------------------------------------------- */

/// Keeps at most 240 characters of an upstream body for error messages.
pub fn make_snippet(body: &str) -> String {
    body.trim().chars().take(240).collect()
}

/// Parses an optional `u32` (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a valid `u32`.
pub fn parse_opt_u32(var: &'static str, raw: Option<String>) -> Result<Option<u32>> {
    match raw {
        Some(v) if !v.trim().is_empty() => v.trim().parse::<u32>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var,
                reason: "expected u32",
            })
        }),
        _ => Ok(None),
    }
}

/// Parses an optional `f32` (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a valid `f32`.
pub fn parse_opt_f32(var: &'static str, raw: Option<String>) -> Result<Option<f32>> {
    match raw {
        Some(v) if !v.trim().is_empty() => v.trim().parse::<f32>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var,
                reason: "expected floating point number",
            })
        }),
        _ => Ok(None),
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start with
/// a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]`.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_trimmed_and_bounded() {
        let body = format!("  {}  ", "x".repeat(500));
        let s = make_snippet(&body);
        assert_eq!(s.len(), 240);
        assert!(s.chars().all(|c| c == 'x'));
    }

    #[test]
    fn optional_numbers() {
        assert_eq!(parse_opt_u32("N", None).unwrap(), None);
        assert_eq!(parse_opt_u32("N", Some("  ".into())).unwrap(), None);
        assert_eq!(parse_opt_u32("N", Some("42".into())).unwrap(), Some(42));
        assert!(matches!(
            parse_opt_u32("N", Some("-1".into())),
            Err(AiLlmError::Config(ConfigError::InvalidNumber { var: "N", .. }))
        ));
        assert_eq!(parse_opt_f32("T", Some("0.5".into())).unwrap(), Some(0.5));
    }

    #[test]
    fn endpoint_and_range_validation() {
        assert!(validate_http_endpoint("OLLAMA_URL", "http://localhost:11434").is_ok());
        assert!(validate_http_endpoint("OLLAMA_URL", "localhost:11434").is_err());
        assert!(validate_range_f32("temperature", 0.7, 0.0, 2.0).is_ok());
        assert!(validate_range_f32("temperature", f32::NAN, 0.0, 2.0).is_err());
        assert!(validate_range_f32("temperature", 2.5, 0.0, 2.0).is_err());
    }
}
