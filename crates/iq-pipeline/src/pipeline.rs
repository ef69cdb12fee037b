//! The pipeline facade: gate, orchestrator, status and reload.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use chrono::Utc;
use iq_catalog::{CatalogSnapshot, CatalogStore};
use iq_core::intent::IntentCandidate;
use iq_core::query::Query;
use iq_core::responses::{Normalization, PipelineMetadata, PipelineResult, PipelineStatus};
use iq_core::verdict::ValidationVerdict;
use iq_embeddings::EmbeddingProvider;
use iq_gate::ValidationGate;

use crate::error::PipelineError;
use crate::millis;
use crate::orchestrator::{Extraction, IntentOrchestrator};

/// Where catalog and index are read from on [`Pipeline::reload`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSources {
    /// JSONL catalog; the sample catalog when `None`.
    pub catalog_path: Option<PathBuf>,
    /// JSONL index; built from the catalog when `None`.
    pub index_path: Option<PathBuf>,
}

/// Validation gate plus intent orchestrator over a shared catalog snapshot.
///
/// Built through [`PipelineBuilder`](crate::PipelineBuilder). Share it behind
/// an `Arc`; every method takes `&self`.
pub struct Pipeline {
    pub(crate) gate: ValidationGate,
    pub(crate) store: Arc<CatalogStore>,
    pub(crate) embedder: Option<Arc<dyn EmbeddingProvider>>,
    pub(crate) orchestrator: Option<IntentOrchestrator>,
    pub(crate) sources: CatalogSources,
    /// Collaborators that failed to initialize. Fixed after build.
    pub(crate) init_errors: Vec<String>,
    /// Last catalog load failure; cleared by a successful reload.
    pub(crate) catalog_error: RwLock<Option<String>>,
}

impl Pipeline {
    /// Run the gate and, when it accepts, the orchestrator.
    ///
    /// A rejection is returned as a result with no intent, never as an error.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when a checker cannot decide or extraction
    /// fails.
    pub async fn process(&self, query: &Query) -> Result<PipelineResult, PipelineError> {
        let started = Instant::now();
        tracing::info!(query_len = query.char_len(), "processing query");
        tracing::debug!(preview = query.preview(40), "query text");

        let validation = self.gate.validate(query).await?;
        let validation_ms = millis(started.elapsed());

        if !validation.is_accepted() {
            tracing::info!(
                outcome = %validation.outcome(),
                validation_ms,
                "query needs clarification"
            );
            let metadata = PipelineMetadata {
                validation_ms,
                extraction_ms: None,
                total_ms: millis(started.elapsed()),
                model: None,
                top_k: self.orchestrator.as_ref().map_or(0, IntentOrchestrator::top_k),
                retrieved: Vec::new(),
                stale_index_entries: Vec::new(),
                dropped_workspaces: Vec::new(),
                normalization: Normalization::default(),
                completed_at: Utc::now(),
            };
            return Ok(PipelineResult {
                query: query.clone(),
                validation,
                intent: None,
                metadata,
            });
        }

        let Extraction { intent, details } = self.extract_with_metadata(query).await?;
        let metadata = PipelineMetadata {
            validation_ms,
            extraction_ms: Some(millis(details.elapsed)),
            total_ms: millis(started.elapsed()),
            model: Some(details.model),
            top_k: details.top_k,
            retrieved: details.retrieved,
            stale_index_entries: details.stale_index_entries,
            dropped_workspaces: details.dropped_workspaces,
            normalization: details.normalization,
            completed_at: Utc::now(),
        };
        tracing::info!(
            outcome = %validation.outcome(),
            total_ms = metadata.total_ms,
            "query processed"
        );

        Ok(PipelineResult {
            query: query.clone(),
            validation,
            intent: Some(intent),
            metadata,
        })
    }

    /// Run only the validation gate.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Gate`] when a checker cannot decide.
    pub async fn validate(&self, query: &Query) -> Result<ValidationVerdict, PipelineError> {
        Ok(self.gate.validate(query).await?)
    }

    /// Run only the orchestrator. The caller is responsible for having
    /// validated `query` first.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] when the pipeline is not
    /// operational, otherwise the orchestrator's errors.
    pub async fn extract(&self, query: &Query) -> Result<IntentCandidate, PipelineError> {
        self.extract_with_metadata(query).await.map(|e| e.intent)
    }

    /// [`Self::extract`] with retrieval and normalization details.
    ///
    /// # Errors
    ///
    /// Same as [`Self::extract`].
    pub async fn extract_with_metadata(&self, query: &Query) -> Result<Extraction, PipelineError> {
        if let Some(reason) = self.not_operational_reason() {
            return Err(PipelineError::Configuration(reason));
        }
        let Some(orchestrator) = &self.orchestrator else {
            return Err(PipelineError::Configuration(
                "language model is not configured".to_string(),
            ));
        };
        orchestrator.extract_with_metadata(query).await
    }

    /// Sizes of the current catalog and index, and whether extraction can run.
    #[must_use]
    pub fn status(&self) -> PipelineStatus {
        let snapshot = self.store.snapshot();
        let last_error = self.not_operational_reason();
        PipelineStatus {
            catalog_size: snapshot.catalog.len(),
            index_size: snapshot.index.len(),
            index_dimension: snapshot.index.dimension(),
            operational: last_error.is_none(),
            last_error,
        }
    }

    /// The snapshot new requests will use.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.store.snapshot()
    }

    /// Reload catalog and index from the configured sources.
    ///
    /// In-flight requests finish on the snapshot they started with. On
    /// failure the current snapshot stays in place.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] without an embedder, or
    /// [`PipelineError::Catalog`] when a source fails to load.
    pub async fn reload(&self) -> Result<Arc<CatalogSnapshot>, PipelineError> {
        let Some(embedder) = &self.embedder else {
            return Err(PipelineError::Configuration(
                "cannot reload without an embedding provider".to_string(),
            ));
        };
        let snapshot = CatalogSnapshot::load(
            self.sources.catalog_path.as_deref(),
            self.sources.index_path.as_deref(),
            embedder.as_ref(),
        )
        .await
        .inspect_err(|e| tracing::error!(error = %e, "catalog reload failed"))?;
        Ok(self.install(snapshot))
    }

    /// Install an already loaded snapshot for subsequent requests.
    pub fn replace_snapshot(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        self.install(snapshot)
    }

    fn install(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let previous = self.store.replace(snapshot);
        *self
            .catalog_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
        previous
    }

    fn not_operational_reason(&self) -> Option<String> {
        if let Some(error) = self
            .catalog_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Some(error);
        }
        if !self.init_errors.is_empty() {
            return Some(self.init_errors.join("; "));
        }
        if self.orchestrator.is_none() {
            return Some("language model is not configured".to_string());
        }
        None
    }
}
