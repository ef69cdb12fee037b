//! Immutable catalog/index snapshots and the atomic swap point for reloads.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use iq_embeddings::EmbeddingProvider;

use crate::catalog::WorkspaceCatalog;
use crate::error::CatalogError;
use crate::index::SimilarityIndex;
use crate::sample::sample_catalog;

/// A catalog and the index built over it, frozen together.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub catalog: WorkspaceCatalog,
    pub index: SimilarityIndex,
}

impl CatalogSnapshot {
    #[must_use]
    pub const fn new(catalog: WorkspaceCatalog, index: SimilarityIndex) -> Self {
        Self { catalog, index }
    }

    /// Load a snapshot from its sources.
    ///
    /// - `catalog_path`: JSONL catalog; the built-in sample catalog when `None`.
    /// - `index_path`: JSONL index; built with `embedder` from the catalog when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when either source fails to load or the index
    /// cannot be built.
    pub async fn load(
        catalog_path: Option<&Path>,
        index_path: Option<&Path>,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self, CatalogError> {
        let catalog = match catalog_path {
            Some(path) => WorkspaceCatalog::from_jsonl(path)?,
            None => {
                tracing::info!("no catalog source configured, using sample catalog");
                sample_catalog()
            }
        };

        let index = match index_path {
            Some(path) => SimilarityIndex::from_jsonl(path)?,
            None => SimilarityIndex::build(&catalog, embedder).await?,
        };

        let stale = index
            .rows()
            .filter(|row| !catalog.contains(&row.workspace_id))
            .count();
        if stale > 0 {
            tracing::warn!(stale, "similarity index references workspaces missing from the catalog");
        }

        Ok(Self { catalog, index })
    }
}

/// Shared holder of the current snapshot.
///
/// Readers clone the inner `Arc` and keep using it for the whole request, so
/// a concurrent [`CatalogStore::replace`] never exposes a half-updated view.
#[derive(Debug, Default)]
pub struct CatalogStore {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    #[must_use]
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot in effect right now.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Atomically install `snapshot`, returning the previous one.
    pub fn replace(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let next = Arc::new(snapshot);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        tracing::info!(
            catalog_size = next.catalog.len(),
            index_size = next.index.len(),
            "catalog snapshot replaced"
        );
        std::mem::replace(&mut *guard, next)
    }
}
