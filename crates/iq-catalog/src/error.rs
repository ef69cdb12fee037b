//! Catalog and index error types.

use std::path::PathBuf;

/// Errors from loading or querying the workspace catalog and similarity index.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A JSONL source could not be read or written, or a line failed to deserialize.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two catalog entries share an id.
    #[error("duplicate workspace id: {0}")]
    DuplicateId(String),

    /// A catalog entry has an empty id.
    #[error("workspace entry at position {0} has an empty id")]
    EmptyId(usize),

    /// Index rows (or a query vector) disagree on vector width.
    #[error("dimension mismatch for {subject}: expected {expected}, found {found}")]
    DimensionMismatch {
        subject: String,
        expected: usize,
        found: usize,
    },

    /// An index row carries no vector.
    #[error("index row for {0} has an empty vector")]
    EmptyVector(String),

    /// Embedding catalog entries while building the index failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] iq_embeddings::EmbeddingError),
}
