//! Brute-force cosine similarity index over workspace embeddings.
//!
//! The index is a flat list of `(workspace_id, vector)` rows, either read from
//! a precomputed JSONL file or built by embedding each catalog entry. Rows may
//! reference workspaces that have since been removed from the catalog; the
//! index does not filter them, callers do.

use std::cmp::Ordering;
use std::path::Path;

use iq_core::responses::RetrievedWorkspace;
use iq_embeddings::EmbeddingProvider;
use serde::{Deserialize, Serialize};

use crate::catalog::WorkspaceCatalog;
use crate::error::CatalogError;

/// One precomputed vector for a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRow {
    pub workspace_id: String,
    pub vector: Vec<f32>,
}

/// Options for a nearest-neighbor lookup.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Maximum number of neighbors to return.
    pub top_k: usize,
    /// Minimum cosine similarity (results below are excluded).
    pub min_score: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_score: -1.0,
        }
    }
}

/// Read-only nearest-neighbor structure.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    rows: Vec<IndexRow>,
    dimension: Option<usize>,
}

impl SimilarityIndex {
    /// Build an index from rows that all share one vector width.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyVector`] or [`CatalogError::DimensionMismatch`].
    pub fn from_rows(rows: Vec<IndexRow>) -> Result<Self, CatalogError> {
        let mut dimension = None;
        for row in &rows {
            if row.vector.is_empty() {
                return Err(CatalogError::EmptyVector(row.workspace_id.clone()));
            }
            match dimension {
                None => dimension = Some(row.vector.len()),
                Some(expected) if expected != row.vector.len() => {
                    return Err(CatalogError::DimensionMismatch {
                        subject: row.workspace_id.clone(),
                        expected,
                        found: row.vector.len(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(Self { rows, dimension })
    }

    /// Read a JSONL file of [`IndexRow`]s.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] for I/O or parse failures and the errors
    /// of [`Self::from_rows`] for inconsistent vectors.
    pub fn from_jsonl(path: &Path) -> Result<Self, CatalogError> {
        let io_err = |source: std::io::Error| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        };
        let rows = serde_jsonlines::json_lines::<IndexRow, _>(path)
            .map_err(io_err)?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(io_err)?;
        let index = Self::from_rows(rows)?;
        tracing::debug!(
            path = %path.display(),
            rows = index.len(),
            dimension = ?index.dimension(),
            "loaded similarity index"
        );
        Ok(index)
    }

    /// Write the index as JSONL so it can be loaded without re-embedding.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] wrapping the I/O failure.
    pub fn write_jsonl(&self, path: &Path) -> Result<(), CatalogError> {
        serde_jsonlines::write_json_lines(path, &self.rows).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Embed every catalog entry's [`embedding_text`] and index the result.
    ///
    /// [`embedding_text`]: iq_core::workspace::WorkspaceEntry::embedding_text
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Embedding`] when the provider fails, or the
    /// errors of [`Self::from_rows`] when it returns inconsistent vectors.
    pub async fn build(
        catalog: &WorkspaceCatalog,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self, CatalogError> {
        let texts: Vec<String> = catalog.iter().map(|e| e.embedding_text()).collect();
        let vectors = embedder.embed_batch(&texts).await?;
        let rows = catalog
            .ids()
            .zip(vectors)
            .map(|(id, vector)| IndexRow {
                workspace_id: id.to_string(),
                vector,
            })
            .collect();
        let index = Self::from_rows(rows)?;
        tracing::info!(
            provider = embedder.name(),
            rows = index.len(),
            "built similarity index from catalog"
        );
        Ok(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub const fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn rows(&self) -> impl Iterator<Item = &IndexRow> {
        self.rows.iter()
    }

    /// Top-k rows by cosine similarity to `query`.
    ///
    /// Ordering is score descending, then catalog insertion order, then row
    /// order for rows whose workspace is not in `catalog`. The result is
    /// deterministic for a fixed index, catalog, and query vector.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DimensionMismatch`] when `query` has a different
    /// width than the indexed vectors.
    pub fn nearest(
        &self,
        query: &[f32],
        catalog: &WorkspaceCatalog,
        options: SearchOptions,
    ) -> Result<Vec<RetrievedWorkspace>, CatalogError> {
        let Some(expected) = self.dimension else {
            return Ok(Vec::new());
        };
        if query.len() != expected {
            return Err(CatalogError::DimensionMismatch {
                subject: "query".to_string(),
                expected,
                found: query.len(),
            });
        }

        let mut scored: Vec<(f64, usize, usize)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let position = catalog.position(&row.workspace_id).unwrap_or(usize::MAX);
                (cosine_similarity(query, &row.vector), position, row_idx)
            })
            .filter(|(score, _, _)| *score >= options.min_score)
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
                .then(a.2.cmp(&b.2))
        });
        scored.truncate(options.top_k);

        Ok(scored
            .into_iter()
            .map(|(score, _, row_idx)| RetrievedWorkspace {
                workspace_id: self.rows[row_idx].workspace_id.clone(),
                score,
            })
            .collect())
    }
}

/// Cosine similarity between two equal-length vectors. Zero vectors score 0.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
