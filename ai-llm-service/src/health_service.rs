//! Health reporting for the `/health` endpoint.
//!
//! [`probe`] wraps [`ModelGateway::check_service_health`] into a
//! JSON-serializable [`HealthStatus`]. It is resilient and never fails: errors
//! are mapped to `ok = false` with the error text as message.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::model_gateway::ModelGateway;

/// A serializable health snapshot of the model runtime.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Overall health flag.
    pub ok: bool,
    /// Model used by the liveness probe.
    pub embedding_model: String,
    /// Measured probe latency in milliseconds.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

/// Runs the embedding liveness probe and reports the outcome.
pub async fn probe(gateway: &ModelGateway) -> HealthStatus {
    let start = Instant::now();
    let result = gateway.check_service_health().await;
    let latency_ms = start.elapsed().as_millis();

    match result {
        Ok(()) => {
            info!(latency_ms, "health probe completed");
            HealthStatus {
                ok: true,
                embedding_model: gateway.embedding_model().to_string(),
                latency_ms,
                message: "model runtime is healthy".into(),
            }
        }
        Err(err) => {
            warn!(latency_ms, error = %err, "health probe failed");
            HealthStatus {
                ok: false,
                embedding_model: gateway.embedding_model().to_string(),
                latency_ms,
                message: err.to_string(),
            }
        }
    }
}
