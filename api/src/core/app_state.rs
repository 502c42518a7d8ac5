use std::path::PathBuf;
use std::sync::Arc;

use ai_llm_service::config::default_config::{config_ollama_runtime, embedding_model};
use ai_llm_service::services::ollama_service::OllamaService;
use ai_llm_service::{ModelCatalog, ModelGateway};
use contextor::Contextor;
use rag_store::{Indexer, QdrantFacade, RagConfig, VectorStore};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error_handler::AppError;

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_DOCUMENTS_DIR: &str = "documents";

/// Listener address and documents directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub address: String,
    pub documents_dir: PathBuf,
}

impl ApiConfig {
    /// Reads `API_ADDRESS` and `DOCUMENTS_DIR` through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            address: non_blank("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.into()),
            documents_dir: non_blank("DOCUMENTS_DIR")
                .unwrap_or_else(|| DEFAULT_DOCUMENTS_DIR.into())
                .into(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub gateway: Arc<ModelGateway>,
    pub indexer: Indexer,
    pub contextor: Contextor,
    /// Last known installed-model snapshot.
    pub catalog: RwLock<ModelCatalog>,
    pub documents_dir: PathBuf,
}

impl AppState {
    /// Wires the pipeline around an existing gateway and store.
    pub fn new(
        gateway: Arc<ModelGateway>,
        store: Arc<dyn VectorStore>,
        catalog: ModelCatalog,
        documents_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            indexer: Indexer::new(gateway.clone(), store.clone()),
            contextor: Contextor::new(gateway.clone(), store),
            gateway,
            catalog: RwLock::new(catalog),
            documents_dir: documents_dir.into(),
        }
    }

    /// Builds the Ollama gateway and the Qdrant store from environment
    /// variables and loads the initial model catalog. A failed model listing
    /// degrades the catalog; it does not prevent startup.
    ///
    /// # Errors
    /// [`AppError::Config`] for invalid runtime or store settings.
    pub async fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        config: &ApiConfig,
    ) -> Result<Self, AppError> {
        let runtime_cfg =
            config_ollama_runtime(&lookup).map_err(|e| AppError::Config(e.to_string()))?;
        let embed_model = embedding_model(&lookup).map_err(|e| AppError::Config(e.to_string()))?;
        let rag_cfg = RagConfig::from_lookup(&lookup).map_err(|e| AppError::Config(e.to_string()))?;

        info!(
            endpoint = %runtime_cfg.endpoint,
            embedding_model = %embed_model,
            collection = %rag_cfg.collection,
            "wiring model gateway and vector store"
        );

        let runtime =
            OllamaService::new(runtime_cfg).map_err(|e| AppError::Config(e.to_string()))?;
        let gateway = Arc::new(ModelGateway::new(Arc::new(runtime), embed_model));
        let store = QdrantFacade::new(&rag_cfg).map_err(|e| AppError::Config(e.to_string()))?;

        let catalog = gateway.catalog().await;
        if let ModelCatalog::Degraded { reason } = &catalog {
            warn!(%reason, "starting without a verified model list");
        }

        Ok(Self::new(
            gateway,
            Arc::new(store),
            catalog,
            config.documents_dir.clone(),
        ))
    }

    pub async fn from_env(config: &ApiConfig) -> Result<Self, AppError> {
        Self::from_lookup(|k| std::env::var(k).ok(), config).await
    }

    /// Re-lists installed models. A failed refresh keeps the last ready
    /// snapshot instead of degrading it.
    pub async fn refresh_catalog(&self) -> ModelCatalog {
        let fresh = self.gateway.catalog().await;
        let mut cached = self.catalog.write().await;
        match fresh {
            ModelCatalog::Degraded { reason } if !cached.is_degraded() => {
                warn!(%reason, "model refresh failed; using cached catalog");
                cached.clone()
            }
            fresh => {
                *cached = fresh.clone();
                fresh
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ai_llm_service::testing::{FAKE_EMBEDDING_DIM, FakeRuntime};
    use rag_store::memory::MemoryStore;

    use super::*;

    #[test]
    fn api_config_defaults() {
        let cfg = ApiConfig::from_lookup(|_| None);
        assert_eq!(cfg.address, "0.0.0.0:8000");
        assert_eq!(cfg.documents_dir, PathBuf::from("documents"));

        let cfg = ApiConfig::from_lookup(|k| (k == "DOCUMENTS_DIR").then(|| "/srv/docs".into()));
        assert_eq!(cfg.documents_dir, PathBuf::from("/srv/docs"));
    }

    #[tokio::test]
    async fn invalid_runtime_url_fails_startup() {
        let config = ApiConfig::from_lookup(|_| None);
        let lookup = |k: &str| (k == "OLLAMA_URL").then(|| "localhost:11434".to_string());
        let err = AppState::from_lookup(lookup, &config).await.err().unwrap();
        assert!(matches!(err, AppError::Config(_)), "{err}");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_ready_catalog() {
        let runtime = Arc::new(FakeRuntime::new().with_listing_failure("ollama: connection refused"));
        let gateway = Arc::new(ModelGateway::new(runtime, "mxbai-embed-large"));
        let ready = ModelCatalog::Ready(vec![[("NAME", "llama3")].into_iter().collect()]);
        let state = AppState::new(
            gateway,
            Arc::new(MemoryStore::new(FAKE_EMBEDDING_DIM)),
            ready.clone(),
            "documents",
        );

        assert_eq!(state.refresh_catalog().await, ready);
        assert_eq!(*state.catalog.read().await, ready);
    }

    #[tokio::test]
    async fn refresh_picks_up_new_models() {
        let runtime = Arc::new(FakeRuntime::new().with_models(&["llama3", "phi4"]));
        let gateway = Arc::new(ModelGateway::new(runtime, "mxbai-embed-large"));
        let state = AppState::new(
            gateway,
            Arc::new(MemoryStore::new(FAKE_EMBEDDING_DIM)),
            ModelCatalog::Degraded {
                reason: "startup listing failed".into(),
            },
            "documents",
        );

        let catalog = state.refresh_catalog().await;
        assert_eq!(catalog.names(), Some(vec!["llama3", "phi4"]));
    }
}
