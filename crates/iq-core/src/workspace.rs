use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A known workspace: a named domain or dataset a query may target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WorkspaceEntry {
    /// Unique within the catalog.
    pub id: String,
    pub display_name: String,
    /// Free-text description, embedded to build index vectors.
    #[serde(default)]
    pub description: String,
    /// Extra vocabulary that identifies the workspace in queries.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Field name to expected type (e.g. `"region": "string"`).
    #[serde(default)]
    pub schema_hints: BTreeMap<String, String>,
}

impl WorkspaceEntry {
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            keywords: Vec::new(),
            schema_hints: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_hint(mut self, field: impl Into<String>, ty: impl Into<String>) -> Self {
        self.schema_hints.insert(field.into(), ty.into());
        self
    }

    /// Text that represents the entry in embedding space.
    #[must_use]
    pub fn embedding_text(&self) -> String {
        let mut parts = vec![self.display_name.clone()];
        if !self.description.is_empty() {
            parts.push(self.description.clone());
        }
        if !self.keywords.is_empty() {
            parts.push(self.keywords.join(" "));
        }
        if !self.schema_hints.is_empty() {
            parts.push(self.schema_hints.keys().cloned().collect::<Vec<_>>().join(" "));
        }
        parts.join(". ")
    }
}
