//! Retrieval helpers.

use tracing::trace;

use crate::errors::RagError;
use crate::record::StoredDocument;
use crate::store::VectorStore;

/// Returns the single most similar document, or `None` for an empty store.
///
/// # Errors
/// Propagates store failures.
pub async fn nearest(
    store: &dyn VectorStore,
    vector: &[f32],
) -> Result<Option<StoredDocument>, RagError> {
    let mut hits = store.query(vector, 1).await?;
    trace!("retrieve::nearest hits={}", hits.len());
    Ok(if hits.is_empty() {
        None
    } else {
        Some(hits.swap_remove(0))
    })
}
