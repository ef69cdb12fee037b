//! Explicit pipeline construction.
//!
//! Collaborators are injected; anything left out gets an offline default
//! (lexical/heuristic checkers, sample catalog, index built with the
//! embedder). A missing language model or a catalog that fails to load does
//! not fail the build: the pipeline comes up degraded and says so in
//! [`Pipeline::status`].

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use iq_catalog::{CatalogSnapshot, CatalogStore};
use iq_config::{CheckerKind, DEFAULT_SERVICE_TIMEOUT, EmbeddingProviderKind, IqConfig};
use iq_embeddings::{EmbeddingProvider, HashingEmbedder};
use iq_gate::{
    CoherenceCheck, CompletenessCheck, DEFAULT_MIN_RECOGNIZED_RATIO, HeuristicCompleteness,
    LexicalCoherence, ModelCoherence, ModelCompleteness, ValidationGate,
};
use iq_llm::{GeminiClient, LanguageModel};

use crate::orchestrator::{DEFAULT_TOP_K, IntentOrchestrator};
use crate::pipeline::{CatalogSources, Pipeline};

/// Step-by-step [`Pipeline`] construction.
pub struct PipelineBuilder {
    coherence: Option<Arc<dyn CoherenceCheck>>,
    completeness: Option<Arc<dyn CompletenessCheck>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    model: Option<Arc<dyn LanguageModel>>,
    snapshot: Option<CatalogSnapshot>,
    sources: CatalogSources,
    top_k: usize,
    timeout: Duration,
    min_recognized_ratio: f64,
    init_errors: Vec<String>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            coherence: None,
            completeness: None,
            embedder: None,
            model: None,
            snapshot: None,
            sources: CatalogSources::default(),
            top_k: DEFAULT_TOP_K,
            timeout: DEFAULT_SERVICE_TIMEOUT,
            min_recognized_ratio: DEFAULT_MIN_RECOGNIZED_RATIO,
            init_errors: Vec::new(),
        }
    }

    /// Wire collaborators from configuration.
    ///
    /// Gemini is used for whichever roles the config assigns to it. A role
    /// that cannot be filled is recorded and leaves the pipeline degraded
    /// instead of failing here.
    #[must_use]
    pub fn from_config(config: &IqConfig) -> Self {
        let mut builder = Self::new()
            .top_k(config.catalog.top_k)
            .timeout(config.gemini.timeout())
            .min_recognized_ratio(config.validation.min_recognized_ratio)
            .catalog_sources(
                config.catalog.catalog_path.clone(),
                config.catalog.index_path.clone(),
            );

        let gemini: Option<Arc<GeminiClient>> = if config.gemini.is_configured() {
            match GeminiClient::new(&config.gemini) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    builder.init_errors.push(format!("gemini client: {e}"));
                    None
                }
            }
        } else {
            None
        };
        builder.model = gemini
            .clone()
            .map(|client| client as Arc<dyn LanguageModel>);

        builder.embedder = match config.embeddings.provider {
            EmbeddingProviderKind::Hashing => Some(Arc::new(HashingEmbedder::new(
                config.embeddings.dimension.max(1),
            )) as Arc<dyn EmbeddingProvider>),
            EmbeddingProviderKind::Gemini => {
                if gemini.is_none() {
                    builder
                        .init_errors
                        .push("embeddings.provider = gemini needs gemini.api_key".to_string());
                }
                gemini
                    .clone()
                    .map(|client| client as Arc<dyn EmbeddingProvider>)
            }
            EmbeddingProviderKind::Local => local_embedder(&mut builder.init_errors),
        };

        let timeout = config.gemini.timeout();
        for (stage, kind) in [
            ("coherence", config.validation.coherence),
            ("completeness", config.validation.completeness),
        ] {
            if kind != CheckerKind::Model {
                continue;
            }
            let Some(client) = &gemini else {
                builder.init_errors.push(format!(
                    "validation.{stage} = model needs gemini.api_key; using the heuristic checker"
                ));
                continue;
            };
            let model: Arc<dyn LanguageModel> = Arc::clone(client) as Arc<dyn LanguageModel>;
            if stage == "coherence" {
                builder.coherence = Some(Arc::new(ModelCoherence::new(model, timeout)));
            } else {
                builder.completeness = Some(Arc::new(ModelCompleteness::new(model, timeout)));
            }
        }

        builder
    }

    #[must_use]
    pub fn coherence(mut self, check: Arc<dyn CoherenceCheck>) -> Self {
        self.coherence = Some(check);
        self
    }

    #[must_use]
    pub fn completeness(mut self, check: Arc<dyn CompletenessCheck>) -> Self {
        self.completeness = Some(check);
        self
    }

    #[must_use]
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    #[must_use]
    pub fn language_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Use this snapshot instead of loading from sources at build time.
    #[must_use]
    pub fn snapshot(mut self, snapshot: CatalogSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    #[must_use]
    pub fn catalog_sources(
        mut self,
        catalog_path: Option<PathBuf>,
        index_path: Option<PathBuf>,
    ) -> Self {
        self.sources = CatalogSources {
            catalog_path,
            index_path,
        };
        self
    }

    #[must_use]
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Deadline for each external call.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn min_recognized_ratio(mut self, ratio: f64) -> Self {
        self.min_recognized_ratio = ratio;
        self
    }

    /// Assemble the pipeline, loading catalog and index if no snapshot was
    /// given.
    pub async fn build(self) -> Pipeline {
        let mut catalog_error = None;
        let snapshot = match (self.snapshot, &self.embedder) {
            (Some(snapshot), _) => snapshot,
            (None, Some(embedder)) => match CatalogSnapshot::load(
                self.sources.catalog_path.as_deref(),
                self.sources.index_path.as_deref(),
                embedder.as_ref(),
            )
            .await
            {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::error!(error = %e, "catalog failed to load, pipeline is degraded");
                    catalog_error = Some(format!("catalog failed to load: {e}"));
                    CatalogSnapshot::default()
                }
            },
            (None, None) => {
                catalog_error =
                    Some("no embedding provider to build the similarity index".to_string());
                CatalogSnapshot::default()
            }
        };

        let coherence = self.coherence.unwrap_or_else(|| {
            Arc::new(LexicalCoherence::new(
                snapshot.catalog.vocabulary(),
                self.min_recognized_ratio,
            ))
        });
        let completeness = self
            .completeness
            .unwrap_or_else(|| Arc::new(HeuristicCompleteness));
        let gate = ValidationGate::new(coherence, completeness);

        let store = Arc::new(CatalogStore::new(snapshot));
        let orchestrator = match (&self.embedder, self.model) {
            (Some(embedder), Some(model)) => Some(
                IntentOrchestrator::new(Arc::clone(&store), Arc::clone(embedder), model)
                    .with_top_k(self.top_k)
                    .with_timeout(self.timeout),
            ),
            _ => None,
        };

        for error in &self.init_errors {
            tracing::warn!(%error, "pipeline collaborator unavailable");
        }
        let (coherence_name, completeness_name) = gate.checker_names();
        tracing::info!(
            coherence = coherence_name,
            completeness = completeness_name,
            extraction = orchestrator.is_some(),
            "pipeline built"
        );

        Pipeline {
            gate,
            store,
            embedder: self.embedder,
            orchestrator,
            sources: self.sources,
            init_errors: self.init_errors,
            catalog_error: RwLock::new(catalog_error),
        }
    }
}

#[cfg(feature = "local")]
fn local_embedder(errors: &mut Vec<String>) -> Option<Arc<dyn EmbeddingProvider>> {
    match iq_embeddings::LocalEmbeddingEngine::new() {
        Ok(engine) => Some(Arc::new(engine)),
        Err(e) => {
            errors.push(format!("local embedder: {e}"));
            None
        }
    }
}

#[cfg(not(feature = "local"))]
fn local_embedder(errors: &mut Vec<String>) -> Option<Arc<dyn EmbeddingProvider>> {
    errors.push("embeddings.provider = local needs the `local` feature".to_string());
    None
}
