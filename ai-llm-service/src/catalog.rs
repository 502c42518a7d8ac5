//! Installed-model catalog and validated model names.
//!
//! The set of generation models changes with the runtime's installed state,
//! so names are validated at request time against a [`ModelCatalog`] instead of
//! a closed enum. A catalog built from a failed listing is [`ModelCatalog::Degraded`],
//! which keeps "no models installed" distinguishable from "listing failed".

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::listing::{ModelEntry, model_names};

/// Snapshot of the runtime's installed models.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelCatalog {
    /// Listing succeeded (possibly with zero models).
    Ready(Vec<ModelEntry>),
    /// Listing failed; names cannot be verified.
    Degraded { reason: String },
}

impl ModelCatalog {
    /// Installed model names, or `None` when degraded.
    pub fn names(&self) -> Option<Vec<&str>> {
        match self {
            Self::Ready(models) => Some(models.iter().filter_map(ModelEntry::name).collect()),
            Self::Degraded { .. } => None,
        }
    }

    /// `true` if the listing failed.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Why a requested model name was rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ModelSelectionError {
    #[error("model name must not be empty")]
    Empty,

    #[error("model `{requested}` is not installed; choose one of: {}", .available.join(", "))]
    NotInstalled {
        requested: String,
        available: Vec<String>,
    },
}

/// A generation model name accepted against a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ModelName(String);

impl ModelName {
    /// Validates `raw` against `catalog`.
    ///
    /// A degraded catalog accepts any non-empty name; the trial generation
    /// done by the availability check is then the only gate.
    ///
    /// # Errors
    /// - [`ModelSelectionError::Empty`] for blank input
    /// - [`ModelSelectionError::NotInstalled`] if a ready catalog lacks the name
    pub fn validate(raw: &str, catalog: &ModelCatalog) -> Result<Self, ModelSelectionError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ModelSelectionError::Empty);
        }

        match catalog {
            ModelCatalog::Degraded { .. } => Ok(Self(name.to_string())),
            ModelCatalog::Ready(models) => {
                if models.iter().any(|m| m.name() == Some(name)) {
                    Ok(Self(name.to_string()))
                } else {
                    Err(ModelSelectionError::NotInstalled {
                        requested: name.to_string(),
                        available: model_names(models),
                    })
                }
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(names: &[&str]) -> ModelCatalog {
        ModelCatalog::Ready(
            names
                .iter()
                .map(|n| [("NAME", *n), ("SIZE", "1 GB")].into_iter().collect())
                .collect(),
        )
    }

    #[test]
    fn accepts_installed_model() {
        let name = ModelName::validate(" llama3 ", &ready(&["llama3", "phi4"])).unwrap();
        assert_eq!(name.as_str(), "llama3");
    }

    #[test]
    fn rejects_unknown_model_with_choices() {
        let err = ModelName::validate("mistral", &ready(&["llama3", "phi4"])).unwrap_err();
        assert_eq!(
            err,
            ModelSelectionError::NotInstalled {
                requested: "mistral".into(),
                available: vec!["llama3".into(), "phi4".into()],
            }
        );
        assert!(err.to_string().ends_with("llama3, phi4"));
    }

    #[test]
    fn empty_catalog_rejects_everything() {
        let catalog = ready(&[]);
        assert!(!catalog.is_degraded());
        assert!(ModelName::validate("llama3", &catalog).is_err());
    }

    #[test]
    fn degraded_catalog_defers_to_runtime() {
        let catalog = ModelCatalog::Degraded {
            reason: "ollama: not found".into(),
        };
        assert!(catalog.names().is_none());
        assert!(ModelName::validate("anything", &catalog).is_ok());
        assert_eq!(
            ModelName::validate("  ", &catalog),
            Err(ModelSelectionError::Empty)
        );
    }
}
