//! Parsing of the runtime's model listing (`ollama list`).
//!
//! The CLI prints a whitespace-aligned table:
//!
//! ```text
//! NAME                       ID              SIZE      MODIFIED
//! llama3:latest              365c0bd3c000    4.7 GB    2 days ago
//! ```
//!
//! Columns are separated by runs of two or more whitespace characters, which
//! keeps values like `4.7 GB` intact. A JSON document `{"models": [...]}` is
//! accepted as well; its items may be table lines or objects.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error_handler::{AiLlmError, Result};

/// Column holding the model identifier.
pub const NAME_COLUMN: &str = "NAME";

static COLUMN_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\s{2,}").unwrap()
});

/// One installed model: header → cell mapping of its listing row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModelEntry(BTreeMap<String, String>);

impl ModelEntry {
    /// Model identifier, if the listing had a `NAME` column.
    pub fn name(&self) -> Option<&str> {
        self.0.get(NAME_COLUMN).map(String::as_str)
    }

    /// Any other column, e.g. `SIZE` or `MODIFIED`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    /// All columns of the row.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl<K, V> FromIterator<(K, V)> for ModelEntry
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Collects the `NAME` of every entry, skipping rows without one.
pub fn model_names(models: &[ModelEntry]) -> Vec<String> {
    models
        .iter()
        .filter_map(|m| m.name().map(str::to_string))
        .collect()
}

/// Parses raw listing output into per-model entries.
///
/// # Errors
/// - [`AiLlmError::ListingFailed`] if the output is empty
/// - [`AiLlmError::ListingFailed`] if it is JSON without a `models` array
pub fn parse_model_listing(output: &str) -> Result<Vec<ModelEntry>> {
    let output = output.trim();
    if output.is_empty() {
        return Err(AiLlmError::ListingFailed(
            "no output from model listing command".into(),
        ));
    }

    match serde_json::from_str::<Value>(output) {
        Ok(json) => parse_json_listing(&json),
        Err(_) => Ok(parse_table(output.lines())),
    }
}

fn split_columns(line: &str) -> Vec<&str> {
    COLUMN_SPLIT.split(line.trim()).collect()
}

/// First line is the header; every other non-blank line is one model.
/// Extra cells without a header (or headers without a cell) are dropped.
fn parse_table<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<ModelEntry> {
    let mut lines = lines.into_iter();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let headers = split_columns(header);

    lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            headers
                .iter()
                .copied()
                .zip(split_columns(line))
                .collect::<ModelEntry>()
        })
        .collect()
}

fn parse_json_listing(json: &Value) -> Result<Vec<ModelEntry>> {
    let Some(items) = json.get("models").and_then(Value::as_array) else {
        return Err(AiLlmError::ListingFailed(
            "JSON listing without a `models` array".into(),
        ));
    };

    if items.iter().all(Value::is_string) {
        return Ok(parse_table(items.iter().filter_map(Value::as_str)));
    }

    Ok(items
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| {
            obj.iter()
                .map(|(k, v)| {
                    let cell = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.to_uppercase(), cell)
                })
                .collect::<ModelEntry>()
        })
        .collect())
}
