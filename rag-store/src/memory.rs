//! In-memory [`VectorStore`] with exact cosine ranking, for test suites.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::errors::RagError;
use crate::record::{DocumentEntry, StoredDocument};
use crate::store::{VectorStore, check_dim};

#[derive(Debug)]
pub struct MemoryStore {
    dim: usize,
    entries: Mutex<BTreeMap<String, DocumentEntry>>,
    upserts: Mutex<usize>,
}

impl MemoryStore {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            entries: Mutex::new(BTreeMap::new()),
            upserts: Mutex::new(0),
        }
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, DocumentEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<DocumentEntry> {
        self.entries().get(id).cloned()
    }

    /// Total number of upsert calls, including replacements.
    pub fn upsert_count(&self) -> usize {
        *self.upserts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn upsert(&self, entry: DocumentEntry) -> Result<(), RagError> {
        check_dim(&entry.embedding, self.dim)?;
        *self.upserts.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        self.entries().insert(entry.id.clone(), entry);
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: u64) -> Result<Vec<StoredDocument>, RagError> {
        check_dim(vector, self.dim)?;

        let mut hits: Vec<StoredDocument> = self
            .entries()
            .values()
            .map(|e| StoredDocument {
                id: e.id.clone(),
                text: e.text.clone(),
                score: cosine(vector, &e.embedding),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(usize::try_from(top_k).unwrap_or(usize::MAX));
        Ok(hits)
    }
}

/// Cosine similarity; zero vectors score 0.
fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, v: [f32; 3], text: &str) -> DocumentEntry {
        DocumentEntry {
            id: id.into(),
            embedding: v.to_vec(),
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn upsert_replaces_same_id() {
        let store = MemoryStore::new(3);
        store.upsert(entry("a.txt", [1.0, 0.0, 0.0], "old")).await.unwrap();
        store.upsert(entry("a.txt", [0.0, 1.0, 0.0], "new")).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.upsert_count(), 2);
        let got = store.get("a.txt").unwrap();
        assert_eq!(got.text, "new");
        assert_eq!(got.embedding, vec![0.0, 1.0, 0.0]);
    }

    #[tokio::test]
    async fn query_ranks_by_cosine() {
        let store = MemoryStore::new(3);
        store.upsert(entry("x", [1.0, 0.0, 0.0], "x")).await.unwrap();
        store.upsert(entry("y", [0.0, 1.0, 0.0], "y")).await.unwrap();
        store.upsert(entry("xy", [1.0, 1.0, 0.0], "xy")).await.unwrap();

        let hits = store.query(&[0.9, 0.1, 0.0], 2).await.unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "xy"]);
    }

    #[tokio::test]
    async fn empty_store_returns_nothing() {
        let store = MemoryStore::new(3);
        assert!(store.query(&[1.0, 0.0, 0.0], 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn wrong_dimension_is_rejected() {
        let store = MemoryStore::new(3);
        let err = store.query(&[1.0, 0.0], 1).await.unwrap_err();
        assert!(matches!(err, RagError::VectorSizeMismatch { got: 2, want: 3 }));
        assert!(store.upsert(entry("a", [1.0, 0.0, 0.0], "a")).await.is_ok());
    }
}
