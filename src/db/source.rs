use std::path::PathBuf;

use rusqlite::types::Value;
use thiserror::Error;

/// Storage-layer failures. Any of these aborts the requery that hit it.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("database file {path} does not exist")]
    Missing { path: PathBuf },
    #[error("failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("query `{query}` failed: {source}")]
    Query {
        query: String,
        #[source]
        source: rusqlite::Error,
    },
    /// For `RecordSource` implementations that are not backed by rusqlite,
    /// or that fail before any statement reaches the store.
    #[error("record source unavailable: {reason}")]
    Unavailable { reason: String },
}

/// One result row in positional form: display value first, row id second.
///
/// `value` is the display column exactly as stored; `display` is its rendered
/// text. Lookups bind `value` so rows whose text rendering is lossy (NULL,
/// numbers, blobs) still match themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub display: String,
    pub value: Value,
    pub row_id: i64,
}

impl SourceRow {
    /// Row whose display column is plain text.
    pub fn text(display: impl Into<String>, row_id: i64) -> Self {
        let display = display.into();
        Self {
            value: Value::Text(display.clone()),
            display,
            row_id,
        }
    }
}

/// The only thing the bound lists need from persistence: run a statement with
/// positional parameters and hand back `(display, id)` pairs in result order.
pub trait RecordSource {
    fn execute(&self, query: &str, params: &[Value]) -> Result<Vec<SourceRow>, SourceError>;
}
