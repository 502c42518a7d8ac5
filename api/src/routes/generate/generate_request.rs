use serde::{Deserialize, Serialize};

/// Query string of /api/generate-response.
#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    /// User prompt, forwarded verbatim.
    pub prompt: String,
    /// Generation model; must be one of /api/list-models.
    pub model: String,
}

/// Response payload of /api/generate-response.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub response: String,
}
