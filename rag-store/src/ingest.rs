//! Indexing pipeline: health probe → list documents → read → embed → upsert.
//!
//! Documents are processed one at a time. The first failing document aborts
//! the run and its file name is attached to the error; entries written before
//! the failure stay in place. Upserts are keyed by file name, so re-running
//! after a failure is safe.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ai_llm_service::ModelGateway;
use document_loader::{document_id, list_documents, read_file};
use tracing::{debug, info, instrument};

use crate::errors::RagError;
use crate::record::{DocumentEntry, IndexReport};
use crate::store::VectorStore;

/// Indexes a documents directory into a [`VectorStore`].
#[derive(Clone)]
pub struct Indexer {
    gateway: Arc<ModelGateway>,
    store: Arc<dyn VectorStore>,
}

impl Indexer {
    pub fn new(gateway: Arc<ModelGateway>, store: Arc<dyn VectorStore>) -> Self {
        Self { gateway, store }
    }

    /// Indexes every supported document directly inside `dir`.
    ///
    /// # Errors
    /// - [`RagError::Gateway`] if the runtime health probe fails (nothing is touched)
    /// - [`RagError::Loader`] if `dir` cannot be listed
    /// - [`RagError::NoDocuments`] if `dir` has no supported file (nothing is touched)
    /// - [`RagError::Document`] / [`RagError::Embedding`] for the first failing file
    /// - store errors from the collection bootstrap or an upsert
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub async fn index_all(&self, dir: &Path) -> Result<IndexReport, RagError> {
        self.gateway
            .check_service_health()
            .await
            .map_err(RagError::Gateway)?;

        let files = list_blocking(dir.to_path_buf()).await?;
        if files.is_empty() {
            return Err(RagError::NoDocuments {
                dir: dir.to_path_buf(),
            });
        }
        info!("Indexing {} documents", files.len());

        self.store.ensure_ready().await?;

        let mut indexed = Vec::with_capacity(files.len());
        for path in files {
            let id = document_id(&path);
            self.index_one(&id, path).await?;
            indexed.push(id);
        }

        info!("Indexed {} documents successfully", indexed.len());
        Ok(IndexReport {
            indexed: indexed.len(),
            files: indexed,
        })
    }

    async fn index_one(&self, id: &str, path: PathBuf) -> Result<(), RagError> {
        let text = tokio::task::spawn_blocking(move || read_file(&path))
            .await
            .map_err(|e| RagError::Internal(format!("document reader task failed: {e}")))?
            .map_err(|source| RagError::Document {
                file: id.to_string(),
                source,
            })?;

        let embedding = self
            .gateway
            .embed(self.gateway.embedding_model(), &text)
            .await
            .map_err(|source| RagError::Embedding {
                file: id.to_string(),
                source,
            })?;

        debug!(file = id, dim = embedding.len(), "upserting document");
        self.store
            .upsert(DocumentEntry {
                id: id.to_string(),
                embedding,
                text,
            })
            .await
    }
}

async fn list_blocking(dir: PathBuf) -> Result<Vec<PathBuf>, RagError> {
    tokio::task::spawn_blocking(move || list_documents(&dir))
        .await
        .map_err(|e| RagError::Internal(format!("document listing task failed: {e}")))?
        .map_err(RagError::Loader)
}
