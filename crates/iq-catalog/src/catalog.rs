//! Read-only workspace catalog.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use iq_core::workspace::WorkspaceEntry;

use crate::error::CatalogError;

/// Known workspaces in insertion order.
///
/// Insertion order is meaningful: the similarity index breaks score ties by
/// catalog position.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceCatalog {
    entries: Vec<WorkspaceEntry>,
    positions: HashMap<String, usize>,
}

impl WorkspaceCatalog {
    /// Build a catalog, rejecting empty and duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyId`] or [`CatalogError::DuplicateId`].
    pub fn new(entries: Vec<WorkspaceEntry>) -> Result<Self, CatalogError> {
        let mut positions = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(position));
            }
            if positions.insert(entry.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries, positions })
    }

    /// Read a JSONL file with one [`WorkspaceEntry`] per line.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] for I/O or per-line parse failures, and
    /// the errors of [`Self::new`] for invalid content.
    pub fn from_jsonl(path: &Path) -> Result<Self, CatalogError> {
        let read_err = |source: std::io::Error| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        };
        let entries = serde_jsonlines::json_lines::<WorkspaceEntry, _>(path)
            .map_err(read_err)?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(read_err)?;
        let catalog = Self::new(entries)?;
        tracing::debug!(path = %path.display(), entries = catalog.len(), "loaded workspace catalog");
        Ok(catalog)
    }

    /// Write the catalog as JSONL, one entry per line.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] wrapping the I/O failure.
    pub fn write_jsonl(&self, path: &Path) -> Result<(), CatalogError> {
        serde_jsonlines::write_json_lines(path, &self.entries).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&WorkspaceEntry> {
        self.positions.get(id).map(|&p| &self.entries[p])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Insertion position of `id`, used as a deterministic tie-breaker.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkspaceEntry> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    /// Lowercase words drawn from ids, names, descriptions, keywords, and
    /// schema hint fields. Feeds the coherence lexicon.
    #[must_use]
    pub fn vocabulary(&self) -> BTreeSet<String> {
        let mut words = BTreeSet::new();
        for entry in &self.entries {
            let sources = [
                entry.id.as_str(),
                entry.display_name.as_str(),
                entry.description.as_str(),
            ]
            .into_iter()
            .chain(entry.keywords.iter().map(String::as_str))
            .chain(entry.schema_hints.keys().map(String::as_str));

            for source in sources {
                words.extend(
                    source
                        .split(|c: char| !c.is_alphanumeric())
                        .filter(|w| w.len() > 1)
                        .map(str::to_lowercase),
                );
            }
        }
        words
    }
}
