use uuid::Uuid;

/// Deterministic UUIDv5 for a document identifier.
///
/// Vector stores that only accept numeric or UUID point ids key documents by
/// this value, so re-indexing `sky.txt` always targets the same point.
pub fn document_point_id(document_id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, document_id.as_bytes())
}
