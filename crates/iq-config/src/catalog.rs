//! Workspace catalog and similarity index source configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default number of nearest neighbors retrieved per query.
const fn default_top_k() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// JSONL file of workspace entries. The built-in sample catalog is used
    /// when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// JSONL file of precomputed `{ workspace_id, vector }` rows. When unset
    /// the index is built at startup by embedding each catalog entry.
    #[serde(default)]
    pub index_path: Option<PathBuf>,

    /// Nearest neighbors retrieved per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            index_path: None,
            top_k: default_top_k(),
        }
    }
}

impl CatalogConfig {
    /// Whether the built-in sample catalog will be used.
    #[must_use]
    pub const fn uses_sample_catalog(&self) -> bool {
        self.catalog_path.is_none()
    }
}
