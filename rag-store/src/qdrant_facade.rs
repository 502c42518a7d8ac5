//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind [`VectorStore`],
//! hiding away the verbose builder pattern and keeping the rest of the
//! application decoupled from `qdrant-client`.
//!
//! Points are keyed by a UUIDv5 of the document id (Qdrant only accepts
//! integer or UUID ids); the original id travels in the payload.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchParamsBuilder, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QValue, VectorParamsBuilder, value, vectors_config,
};
use services::point_id::document_point_id;
use tracing::{debug, info, warn};

use crate::config::{DistanceKind, RagConfig, VectorSpace};
use crate::errors::RagError;
use crate::record::{DocumentEntry, StoredDocument};
use crate::store::{VectorStore, check_dim};

const PAYLOAD_ID: &str = "id";
const PAYLOAD_TEXT: &str = "text";

/// A facade over the Qdrant client bound to one collection.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    space: VectorSpace,
    exact: bool,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration. No network I/O
    /// happens until the first call.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            space: cfg.vector_space(),
            exact: cfg.exact_search,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Ensures that the collection exists in Qdrant.
    ///
    /// - If the collection exists, its vector size must match the configured one.
    /// - If missing, creates it with the configured vector space.
    pub async fn ensure_collection(&self) -> Result<(), RagError> {
        info!(
            "Ensuring collection '{}' with size={} distance={:?}",
            self.collection, self.space.size, self.space.distance
        );

        if self.client.collection_exists(&self.collection).await? {
            match self.existing_vector_size().await? {
                Some(size) if size as usize != self.space.size => {
                    return Err(RagError::VectorSizeMismatch {
                        got: size as usize,
                        want: self.space.size,
                    });
                }
                Some(_) => debug!("Collection '{}' already exists", self.collection),
                None => warn!(
                    "Collection '{}' exists with named vectors; size not verified",
                    self.collection
                ),
            }
            return Ok(());
        }

        let distance = match self.space.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(self.space.size as u64, distance)),
            )
            .await?;

        info!("Collection '{}' created successfully", self.collection);
        Ok(())
    }

    /// Size of the collection's unnamed vector, if it has one.
    async fn existing_vector_size(&self) -> Result<Option<u64>, RagError> {
        let info = self.client.collection_info(&self.collection).await?;
        let size = info
            .result
            .and_then(|i| i.config)
            .and_then(|c| c.params)
            .and_then(|p| p.vectors_config)
            .and_then(|v| v.config)
            .and_then(|c| match c {
                vectors_config::Config::Params(p) => Some(p.size),
                _ => None,
            });
        Ok(size)
    }
}

#[async_trait]
impl VectorStore for QdrantFacade {
    async fn ensure_ready(&self) -> Result<(), RagError> {
        self.ensure_collection().await
    }

    async fn upsert(&self, entry: DocumentEntry) -> Result<(), RagError> {
        check_dim(&entry.embedding, self.space.size)?;

        let mut payload: HashMap<String, QValue> = HashMap::new();
        payload.insert(PAYLOAD_ID.into(), qstring(&entry.id));
        payload.insert(PAYLOAD_TEXT.into(), qstring(&entry.text));

        let pid = document_point_id(&entry.id).to_string();
        let point = PointStruct::new(pid, entry.embedding, payload);

        debug!("Upserting '{}' into collection '{}'", entry.id, self.collection);
        let res = self
            .client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await?;
        debug!("Upsert operation result={:?}", res.result);
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: u64) -> Result<Vec<StoredDocument>, RagError> {
        check_dim(vector, self.space.size)?;

        if !self.client.collection_exists(&self.collection).await? {
            warn!(
                "Collection '{}' does not exist; treating it as empty",
                self.collection
            );
            return Ok(Vec::new());
        }

        let mut builder = SearchPointsBuilder::new(&self.collection, vector.to_vec(), top_k)
            .with_payload(true);
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self.client.search_points(builder).await?;

        let out = res
            .result
            .into_iter()
            .map(|point| stored_document(point.payload, point.score))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Search completed: {} hits returned", out.len());
        Ok(out)
    }
}

/// Builds a search hit from its payload. A hit without a `text` payload is
/// a store error, not a miss.
fn stored_document(payload: HashMap<String, QValue>, score: f32) -> Result<StoredDocument, RagError> {
    let payload = qpayload_to_json(payload);
    let id = payload
        .get(PAYLOAD_ID)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let Some(text) = payload.get(PAYLOAD_TEXT).and_then(|v| v.as_str()) else {
        return Err(RagError::Qdrant(format!("point '{id}' has no text payload")));
    };

    Ok(StoredDocument {
        id,
        text: text.to_string(),
        score,
    })
}

/// Wraps a string into Qdrant `Value`.
fn qstring(s: &str) -> QValue {
    QValue {
        kind: Some(value::Kind::StringValue(s.to_string())),
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into JSON.
///
/// Nested objects/arrays are mapped to `Null`.
fn qpayload_to_json(mut p: HashMap<String, QValue>) -> serde_json::Value {
    use value::Kind as K;
    let mut m = serde_json::Map::new();
    for (k, v) in p.drain() {
        let j = match v.kind {
            Some(K::StringValue(s)) => serde_json::Value::String(s),
            Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
            Some(K::DoubleValue(f)) => serde_json::json!(f),
            Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
            _ => serde_json::Value::Null,
        };
        m.insert(k, j);
    }
    serde_json::Value::Object(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_roundtrips_strings() {
        let mut p = HashMap::new();
        p.insert(PAYLOAD_ID.to_string(), qstring("a.txt"));
        p.insert(PAYLOAD_TEXT.to_string(), qstring("The sky is blue."));
        p.insert("n".to_string(), QValue { kind: None });

        let json = qpayload_to_json(p);
        assert_eq!(json["id"], "a.txt");
        assert_eq!(json["text"], "The sky is blue.");
        assert!(json["n"].is_null());
    }

    #[test]
    fn hit_carries_id_text_and_score() {
        let mut p = HashMap::new();
        p.insert(PAYLOAD_ID.to_string(), qstring("a.txt"));
        p.insert(PAYLOAD_TEXT.to_string(), qstring("The sky is blue."));

        let doc = stored_document(p, 0.9).unwrap();
        assert_eq!(doc.id, "a.txt");
        assert_eq!(doc.text, "The sky is blue.");
        assert_eq!(doc.score, 0.9);
    }

    #[test]
    fn hit_without_text_is_an_error() {
        let mut p = HashMap::new();
        p.insert(PAYLOAD_ID.to_string(), qstring("a.txt"));

        let err = stored_document(p, 0.9).unwrap_err();
        assert!(matches!(err, RagError::Qdrant(ref m) if m.contains("a.txt")), "{err}");
    }

    #[test]
    fn rejects_bad_config_before_connecting() {
        let cfg = RagConfig::new_default("", "documents");
        assert!(matches!(QdrantFacade::new(&cfg), Err(RagError::Config(_))));
    }
}
