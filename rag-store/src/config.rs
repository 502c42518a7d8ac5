//! Vector store and collection configuration.

use crate::errors::RagError;

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "documents";
/// Output size of `mxbai-embed-large`.
pub const DEFAULT_EMBEDDING_DIM: usize = 1024;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

impl DistanceKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cosine" => Some(Self::Cosine),
            "dot" => Some(Self::Dot),
            "euclid" | "euclidean" | "l2" => Some(Self::Euclid),
            _ => None,
        }
    }
}

/// Describes the vector space of the collection.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Configuration of the document collection.
#[derive(Clone, Debug, PartialEq)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Dimensionality every stored and queried vector must have.
    pub embedding_dim: usize,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
}

impl RagConfig {
    /// Creates a default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            exact_search: false,
        }
    }

    /// Reads `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION`,
    /// `EMBEDDING_DIM` and `QDRANT_DISTANCE` through `lookup`.
    ///
    /// # Errors
    /// [`RagError::Config`] naming the offending variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RagError> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut cfg = Self::new_default(
            non_blank("QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.to_string()),
            non_blank("QDRANT_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        );
        cfg.qdrant_api_key = non_blank("QDRANT_API_KEY");

        if let Some(raw) = non_blank("EMBEDDING_DIM") {
            cfg.embedding_dim = raw.trim().parse().map_err(|e| {
                RagError::Config(format!("EMBEDDING_DIM must be a positive integer: {e}"))
            })?;
        }
        if let Some(raw) = non_blank("QDRANT_DISTANCE") {
            cfg.distance = DistanceKind::parse(&raw).ok_or_else(|| {
                RagError::Config(format!(
                    "QDRANT_DISTANCE must be cosine, dot or euclid (got `{raw}`)"
                ))
            })?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Vector space the collection is created with.
    pub fn vector_space(&self) -> VectorSpace {
        VectorSpace {
            size: self.embedding_dim,
            distance: self.distance,
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        let url = self.qdrant_url.trim();
        if url.is_empty() {
            return Err(RagError::Config("QDRANT_URL is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RagError::Config(
                "QDRANT_URL must start with http:// or https://".into(),
            ));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("QDRANT_COLLECTION is empty".into()));
        }
        if self.embedding_dim == 0 {
            return Err(RagError::Config("EMBEDDING_DIM must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = RagConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(cfg.qdrant_url, DEFAULT_QDRANT_URL);
        assert_eq!(cfg.collection, "documents");
        assert_eq!(cfg.embedding_dim, 1024);
        assert_eq!(cfg.distance, DistanceKind::Cosine);
        assert!(cfg.qdrant_api_key.is_none());
    }

    #[test]
    fn reads_overrides() {
        let cfg = RagConfig::from_lookup(env(&[
            ("QDRANT_URL", "https://qdrant.internal:6334"),
            ("QDRANT_COLLECTION", "kb"),
            ("EMBEDDING_DIM", "768"),
            ("QDRANT_DISTANCE", "Dot"),
            ("QDRANT_API_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(cfg.collection, "kb");
        assert_eq!(cfg.vector_space().size, 768);
        assert_eq!(cfg.distance, DistanceKind::Dot);
        assert_eq!(cfg.qdrant_api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn rejects_bad_values() {
        for pairs in [
            [("EMBEDDING_DIM", "abc")],
            [("EMBEDDING_DIM", "0")],
            [("QDRANT_DISTANCE", "manhattan")],
            [("QDRANT_URL", "localhost:6334")],
        ] {
            let err = RagConfig::from_lookup(env(&pairs)).unwrap_err();
            assert!(matches!(err, RagError::Config(_)), "{pairs:?}: {err}");
        }
    }
}
