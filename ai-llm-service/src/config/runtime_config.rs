/// Connection and sampling settings for the local model runtime.
///
/// Model identifiers are deliberately absent: the embedding model is fixed at
/// the gateway level and the generation model is chosen per request.
///
/// # Fields
///
/// - `endpoint`: Base URL of the Ollama HTTP API (e.g., `http://localhost:11434`).
/// - `cli_bin`: Path or name of the `ollama` executable used for model listing.
/// - `max_tokens`: Maximum number of tokens to generate (`num_predict`).
/// - `temperature`: Controls randomness (0.0 = deterministic).
/// - `top_p`: Nucleus sampling cutoff.
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::runtime_config::RuntimeConfig;
///
/// let cfg = RuntimeConfig {
///     endpoint: "http://localhost:11434".to_string(),
///     max_tokens: Some(512),
///     ..RuntimeConfig::default()
/// };
/// assert_eq!(cfg.cli_bin, "ollama");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Ollama HTTP endpoint.
    pub endpoint: String,

    /// Executable used for `<bin> list`.
    pub cli_bin: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            cli_bin: "ollama".to_string(),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(600),
        }
    }
}
