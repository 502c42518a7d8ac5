//! Flat-directory document loading.
//!
//! Supported formats are decided by extension (case-insensitive):
//! - `.txt`, `.md`: UTF-8 text, trimmed
//! - `.pdf`: text of every page that yields any, one page per line, trimmed
//!
//! Directories are scanned one level deep; subdirectories are not entered.

mod error;
mod pdf;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

pub use error::{LoaderError, Result};

/// Extensions accepted by [`read_file`] and [`list_documents`], lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "pdf"];

/// Document format derived from a path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Markdown,
    Pdf,
}

impl DocumentKind {
    /// Classifies `path`, or returns `None` for unsupported extensions.
    pub fn of(path: &Path) -> Option<Self> {
        match lowercase_extension(path)?.as_str() {
            "txt" => Some(Self::PlainText),
            "md" => Some(Self::Markdown),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Extracts the textual content of one document.
///
/// # Errors
/// - [`LoaderError::UnsupportedFormat`] for any extension outside [`SUPPORTED_EXTENSIONS`]
/// - [`LoaderError::Io`] if the file cannot be read
/// - [`LoaderError::DocumentRead`] for non-UTF-8 text or a PDF that fails to parse
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn read_file(path: &Path) -> Result<String> {
    let Some(kind) = DocumentKind::of(path) else {
        return Err(LoaderError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: lowercase_extension(path).unwrap_or_default(),
        });
    };

    let text = match kind {
        DocumentKind::PlainText | DocumentKind::Markdown => {
            let bytes = fs::read(path).map_err(|e| LoaderError::io(path, e))?;
            String::from_utf8(bytes).map_err(|e| LoaderError::DocumentRead {
                path: path.to_path_buf(),
                reason: format!("not valid UTF-8: {e}"),
            })?
        }
        DocumentKind::Pdf => pdf::extract_text(path)?,
    };

    let text = text.trim().to_string();
    debug!(chars = text.len(), ?kind, "document read");
    Ok(text)
}

/// Lists the supported documents directly inside `dir`, sorted by path.
///
/// Subdirectories and files with other extensions are skipped.
///
/// # Errors
/// [`LoaderError::Io`] if `dir` cannot be read.
#[instrument(level = "debug", fields(dir = %dir.display()))]
pub fn list_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| LoaderError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LoaderError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if DocumentKind::of(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();

    debug!(count = files.len(), "documents listed");
    Ok(files)
}

/// File name used as the document identifier (`notes.md` for `docs/notes.md`).
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
