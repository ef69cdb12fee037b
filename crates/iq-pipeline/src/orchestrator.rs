//! Resolves a validated query into a schema-checked intent.
//!
//! ```text
//! query ─▶ embed ─▶ nearest(top_k) ─▶ drop stale ─▶ model draft
//!       ─▶ normalize ─▶ enforce schema ─▶ IntentCandidate
//! ```
//!
//! Every external call runs under its own `tokio::time::timeout`. Nothing is
//! retried here.

use std::sync::Arc;
use std::time::{Duration, Instant};

use iq_catalog::{CatalogStore, SearchOptions};
use iq_config::DEFAULT_SERVICE_TIMEOUT;
use iq_core::intent::IntentCandidate;
use iq_core::query::Query;
use iq_core::responses::{Normalization, RetrievedWorkspace};
use iq_embeddings::EmbeddingProvider;
use iq_llm::{CandidateWorkspace, LanguageModel, PromptContext};

use crate::error::{PipelineError, Service};
use crate::millis;
use crate::normalize::normalize_draft;

/// Neighbors requested from the index when none is configured.
pub const DEFAULT_TOP_K: usize = 5;

/// Retrieval and normalization details of one extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionDetails {
    pub model: String,
    pub top_k: usize,
    /// Live neighbors, best first. Stale ones are not included.
    pub retrieved: Vec<RetrievedWorkspace>,
    pub stale_index_entries: Vec<String>,
    pub dropped_workspaces: Vec<String>,
    pub normalization: Normalization,
    pub elapsed: Duration,
}

/// An intent together with how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub intent: IntentCandidate,
    pub details: ExtractionDetails,
}

/// Composes retrieval and the language model into an [`IntentCandidate`].
#[derive(Clone)]
pub struct IntentOrchestrator {
    store: Arc<CatalogStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn LanguageModel>,
    top_k: usize,
    timeout: Duration,
}

impl IntentOrchestrator {
    #[must_use]
    pub fn new(
        store: Arc<CatalogStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            store,
            embedder,
            model,
            top_k: DEFAULT_TOP_K,
            timeout: DEFAULT_SERVICE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Deadline applied to each embedding and model call.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Resolve `query` into an intent. Call only after the gate accepted it.
    ///
    /// # Errors
    ///
    /// See [`Self::extract_with_metadata`].
    pub async fn extract(&self, query: &Query) -> Result<IntentCandidate, PipelineError> {
        self.extract_with_metadata(query).await.map(|e| e.intent)
    }

    /// Resolve `query` and report retrieval and normalization details.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::ExternalService`] when the embedder or the model
    ///   fails or misses its deadline
    /// - [`PipelineError::SchemaViolation`] when the normalized draft breaks
    ///   the intent shape contract
    /// - [`PipelineError::Configuration`] when the query vector does not fit
    ///   the index
    pub async fn extract_with_metadata(&self, query: &Query) -> Result<Extraction, PipelineError> {
        let started = Instant::now();
        // One snapshot for the whole request; a concurrent reload is not seen.
        let snapshot = self.store.snapshot();

        let vector = tokio::time::timeout(self.timeout, self.embedder.embed(query.as_str()))
            .await
            .map_err(|_| PipelineError::timeout(Service::Embedding, self.timeout))?
            .map_err(|e| {
                tracing::warn!(provider = self.embedder.name(), error = %e, "query embedding failed");
                PipelineError::from_embedding(&e)
            })?;

        let options = SearchOptions {
            top_k: self.top_k,
            ..SearchOptions::default()
        };
        let neighbors = snapshot
            .index
            .nearest(&vector, &snapshot.catalog, options)
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;

        let (retrieved, stale): (Vec<RetrievedWorkspace>, Vec<RetrievedWorkspace>) = neighbors
            .into_iter()
            .partition(|n| snapshot.catalog.contains(&n.workspace_id));
        let stale_index_entries: Vec<String> = stale.into_iter().map(|n| n.workspace_id).collect();
        if !stale_index_entries.is_empty() {
            tracing::warn!(stale = ?stale_index_entries, "dropping index entries missing from the catalog");
        }
        tracing::debug!(
            retrieved = ?retrieved.iter().map(|r| r.workspace_id.as_str()).collect::<Vec<_>>(),
            top_k = self.top_k,
            "retrieved candidate workspaces"
        );

        let candidates = retrieved
            .iter()
            .filter_map(|r| {
                snapshot
                    .catalog
                    .get(&r.workspace_id)
                    .map(|entry| CandidateWorkspace::from_entry(entry, r.score))
            })
            .collect();
        let context = PromptContext::new(query.as_str(), candidates);

        let draft = tokio::time::timeout(self.timeout, self.model.complete(&context))
            .await
            .map_err(|_| {
                tracing::warn!(model = self.model.model_name(), "language model timed out");
                PipelineError::timeout(Service::LanguageModel, self.timeout)
            })?
            .map_err(|e| {
                tracing::warn!(model = self.model.model_name(), error = %e, "language model call failed");
                PipelineError::from_llm(&e)
            })?;

        let normalized = normalize_draft(draft, |id| snapshot.catalog.contains(id));
        if !normalized.dropped_workspaces.is_empty() {
            tracing::warn!(
                dropped = ?normalized.dropped_workspaces,
                "model proposed workspaces missing from the catalog"
            );
        }

        let intent = iq_schema::enforce(&normalized.draft).inspect_err(|e| {
            tracing::warn!(error = %e, "model draft failed schema enforcement");
        })?;

        let elapsed = started.elapsed();
        tracing::info!(
            intent_type = %intent.intent_type,
            workspaces = intent.workspaces.len(),
            confidence = intent.confidence,
            elapsed_ms = millis(elapsed),
            "intent extracted"
        );

        Ok(Extraction {
            intent,
            details: ExtractionDetails {
                model: self.model.model_name().to_string(),
                top_k: self.top_k,
                retrieved,
                stale_index_entries,
                dropped_workspaces: normalized.dropped_workspaces,
                normalization: normalized.normalization,
                elapsed,
            },
        })
    }
}
