use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::error::{LoaderError, Result};

/// Concatenates the text of every page, each followed by one newline.
/// Pages without extractable text are skipped; a page that cannot be
/// decoded fails the whole document.
pub(crate) fn extract_text(path: &Path) -> Result<String> {
    let doc = Document::load(path).map_err(|e| LoaderError::DocumentRead {
        path: path.to_path_buf(),
        reason: format!("failed to parse PDF: {e}"),
    })?;

    let mut content = String::new();
    for page in doc.get_pages().keys() {
        let text = doc
            .extract_text(&[*page])
            .map_err(|e| LoaderError::DocumentRead {
                path: path.to_path_buf(),
                reason: format!("failed to extract text from page {page}: {e}"),
            })?;

        // lopdf already ends every text block with a newline.
        let text = text.trim_end();
        if text.is_empty() {
            debug!(page, "PDF page has no text");
            continue;
        }
        content.push_str(text);
        content.push('\n');
    }

    Ok(content)
}
