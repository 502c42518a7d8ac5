use async_trait::async_trait;

use crate::errors::RagError;
use crate::record::{DocumentEntry, StoredDocument};

/// Nearest-neighbour document store.
///
/// Implementations are shared across request handlers and the background
/// indexer; concurrent calls are safe at the backend's own consistency level.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Prepares the backend for writes (creates the collection if missing).
    async fn ensure_ready(&self) -> Result<(), RagError> {
        Ok(())
    }

    /// Inserts `entry`, replacing any entry with the same id.
    async fn upsert(&self, entry: DocumentEntry) -> Result<(), RagError>;

    /// Returns up to `top_k` documents ranked by similarity to `vector`,
    /// best first. An empty store yields an empty list.
    async fn query(&self, vector: &[f32], top_k: u64) -> Result<Vec<StoredDocument>, RagError>;
}

/// Fails with [`RagError::VectorSizeMismatch`] unless `vector` has `want` components.
pub(crate) fn check_dim(vector: &[f32], want: usize) -> Result<(), RagError> {
    if vector.len() != want {
        return Err(RagError::VectorSizeMismatch {
            got: vector.len(),
            want,
        });
    }
    Ok(())
}
