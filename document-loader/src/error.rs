use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors raised while listing or reading documents.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The file extension is not one of [`crate::SUPPORTED_EXTENSIONS`].
    #[error("[Document Loader] unsupported file extension `{extension}`: {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The file exists but its content could not be decoded.
    #[error("[Document Loader] failed to read {}: {reason}", .path.display())]
    DocumentRead { path: PathBuf, reason: String },

    /// Filesystem failure (missing file, permissions, unreadable directory).
    #[error("[Document Loader] I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoaderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
