//! Embedding shapes returned by the runtime and their normalization.
//!
//! Depending on the endpoint and version, Ollama answers with `[f32; N]`,
//! `[[f32; N]]` or deeper singleton wrappers. [`flatten_embedding`] peels the
//! singleton layers so that storage and comparison always see one flat vector.

use serde::{Deserialize, Serialize};

use crate::error_handler::{AiLlmError, Result};

/// A numeric value or an arbitrarily nested list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingShape {
    Scalar(f32),
    List(Vec<EmbeddingShape>),
}

impl EmbeddingShape {
    /// Builds a flat list shape from plain numbers.
    pub fn flat(values: impl IntoIterator<Item = f32>) -> Self {
        Self::List(values.into_iter().map(Self::Scalar).collect())
    }

    /// Wraps `self` in `depth` single-element lists.
    pub fn wrapped(self, depth: usize) -> Self {
        (0..depth).fold(self, |inner, _| Self::List(vec![inner]))
    }

    /// Converts a flat list of scalars into a vector.
    ///
    /// # Errors
    /// Returns [`AiLlmError::InvalidResponse`] for a bare scalar, an empty list
    /// or a list that still contains nested lists.
    pub fn into_vector(self) -> Result<Vec<f32>> {
        let items = match self {
            Self::List(items) if !items.is_empty() => items,
            Self::List(_) => {
                return Err(AiLlmError::InvalidResponse("embedding is empty".into()));
            }
            Self::Scalar(_) => {
                return Err(AiLlmError::InvalidResponse(
                    "embedding is a bare number, expected a vector".into(),
                ));
            }
        };

        items
            .into_iter()
            .map(|item| match item {
                Self::Scalar(v) => Ok(v),
                Self::List(inner) => Err(AiLlmError::InvalidResponse(format!(
                    "embedding is not flat: found a nested list of {} elements",
                    inner.len()
                ))),
            })
            .collect()
    }
}

/// Unwraps single-element lists until the outer list has more (or fewer)
/// than one element.
///
/// `[[[0.1, 0.2]]]` becomes `[0.1, 0.2]`; `[[0.1], [0.2]]` is returned as is.
/// A singleton list holding a scalar (`[0.5]`, `[[0.5]]`) unwraps to the scalar
/// itself, so a one-dimensional embedding is rejected by
/// [`EmbeddingShape::into_vector`]. No embedding model produces one.
pub fn flatten_embedding(mut shape: EmbeddingShape) -> EmbeddingShape {
    loop {
        match shape {
            EmbeddingShape::List(mut items) if items.len() == 1 => {
                shape = items.remove(0);
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_vector_is_untouched() {
        let v = EmbeddingShape::flat([0.1, 0.2, 0.3]);
        assert_eq!(flatten_embedding(v.clone()), v);
    }

    #[test]
    fn singleton_wrappers_are_removed_at_any_depth() {
        let flat = EmbeddingShape::flat([0.1, 0.2, 0.3]);
        for depth in 1..6 {
            let nested = flat.clone().wrapped(depth);
            assert_eq!(flatten_embedding(nested), flat, "depth {depth}");
        }
    }

    #[test]
    fn flattening_is_idempotent() {
        let nested = EmbeddingShape::flat([1.0, 2.0]).wrapped(3);
        let once = flatten_embedding(nested);
        let twice = flatten_embedding(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn unwrapping_stops_at_first_multi_element_level() {
        let pair = EmbeddingShape::List(vec![
            EmbeddingShape::flat([1.0]),
            EmbeddingShape::flat([2.0]),
        ]);
        let nested = pair.clone().wrapped(2);
        let out = flatten_embedding(nested);
        assert_eq!(out, pair);
        assert!(matches!(
            out.into_vector(),
            Err(AiLlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn deserializes_both_conventions() {
        let nested: EmbeddingShape = serde_json::from_str("[[0.5, -0.25]]").unwrap();
        let flat: EmbeddingShape = serde_json::from_str("[0.5, -0.25]").unwrap();
        assert_eq!(
            flatten_embedding(nested).into_vector().unwrap(),
            vec![0.5, -0.25]
        );
        assert_eq!(flatten_embedding(flat).into_vector().unwrap(), vec![0.5, -0.25]);
    }

    #[test]
    fn one_dimensional_embedding_unwraps_to_a_scalar() {
        let shape: EmbeddingShape = serde_json::from_str("[[0.5]]").unwrap();
        let flat = flatten_embedding(shape);
        assert_eq!(flat, EmbeddingShape::Scalar(0.5));
        assert!(matches!(flat.into_vector(), Err(AiLlmError::InvalidResponse(_))));
    }

    #[test]
    fn degenerate_shapes_are_rejected() {
        assert!(EmbeddingShape::List(vec![]).into_vector().is_err());
        assert!(
            flatten_embedding(EmbeddingShape::Scalar(1.0).wrapped(2))
                .into_vector()
                .is_err()
        );
    }
}
