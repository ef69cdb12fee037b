//! End-to-end behavior with an offline embedder and a scripted model.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use iq_catalog::{CatalogSnapshot, IndexRow, SimilarityIndex, WorkspaceCatalog, sample_catalog};
use iq_core::enums::{ErrorKind, IntentType, VerdictOutcome};
use iq_core::query::Query;
use iq_core::workspace::WorkspaceEntry;
use iq_embeddings::{EmbeddingError, EmbeddingProvider, HashingEmbedder};
use iq_llm::{IntentDraft, Judgment, JudgmentKind, LanguageModel, LlmError, PromptContext};
use iq_pipeline::{Pipeline, PipelineBuilder, PipelineError, Service, ServiceFailure};
use iq_schema::ViolationCategory;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const GOOD_QUERY: &str = "Show me sales in Mumbai for last month";

enum Reply {
    Draft(Value),
    Hang,
    Fail(fn() -> LlmError),
}

/// Language model double that records the candidates it was shown.
struct ScriptedModel {
    reply: Reply,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<String>>>,
}

impl ScriptedModel {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, context: &PromptContext) -> Result<IntentDraft, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push(context.candidates.iter().map(|c| c.id.clone()).collect());
        match &self.reply {
            Reply::Draft(draft) => Ok(draft.clone()),
            Reply::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            Reply::Fail(make) => Err(make()),
        }
    }

    async fn judge(&self, _kind: JudgmentKind, _query: &str) -> Result<Judgment, LlmError> {
        Err(LlmError::Unavailable("not used".into()))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Embedding provider that never produces a vector.
enum Stalled {
    Hang,
    RateLimited(u64),
}

#[async_trait]
impl EmbeddingProvider for Stalled {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match self {
            Self::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            Self::RateLimited(retry_after_secs) => Err(EmbeddingError::RateLimited {
                retry_after_secs: *retry_after_secs,
            }),
        }
    }

    fn name(&self) -> &str {
        "stalled"
    }
}

/// The sample catalog with a prebuilt index, so building never calls `embedder`.
async fn pipeline_with_embedder(embedder: Stalled, model: Arc<ScriptedModel>) -> Pipeline {
    let catalog = sample_catalog();
    let index = SimilarityIndex::build(&catalog, &HashingEmbedder::default())
        .await
        .unwrap();
    PipelineBuilder::new()
        .embedder(Arc::new(embedder))
        .language_model(model)
        .snapshot(CatalogSnapshot::new(catalog, index))
        .timeout(Duration::from_millis(50))
        .build()
        .await
}

fn read_sales() -> Value {
    json!({
        "intent_type": "read",
        "workspaces": ["sales"],
        "entities": {"city": "Mumbai", "period": "last month"},
        "confidence": 0.86
    })
}

async fn pipeline_with(model: Arc<ScriptedModel>) -> Pipeline {
    PipelineBuilder::new()
        .embedder(Arc::new(HashingEmbedder::default()))
        .language_model(model)
        .build()
        .await
}

fn query(text: &str) -> Query {
    Query::parse(text).unwrap()
}

#[tokio::test]
async fn valid_query_resolves_to_intent() {
    let model = ScriptedModel::new(Reply::Draft(read_sales()));
    let pipeline = pipeline_with(Arc::clone(&model)).await;

    let result = pipeline.process(&query(GOOD_QUERY)).await.unwrap();

    assert_eq!(result.validation.outcome(), VerdictOutcome::Accepted);
    let intent = result.intent.as_ref().expect("accepted query has an intent");
    assert_eq!(intent.intent_type, IntentType::Read);
    assert!(intent.workspaces.contains("sales"));
    assert!(intent.workspaces_within(|id| pipeline.snapshot().catalog.contains(id)));
    assert_eq!(intent.entities["city"], json!("Mumbai"));

    assert_eq!(model.calls(), 1);
    assert_eq!(result.metadata.model.as_deref(), Some("scripted"));
    assert_eq!(result.metadata.top_k, 5);
    assert_eq!(result.metadata.retrieved.len(), 5);
    assert!(result.metadata.extraction_ms.is_some());
    assert!(!result.needs_clarification());
}

#[tokio::test]
async fn incoherent_query_never_reaches_the_model() {
    let model = ScriptedModel::new(Reply::Draft(read_sales()));
    let pipeline = pipeline_with(Arc::clone(&model)).await;

    let result = pipeline.process(&query("asdkj qwoeiru")).await.unwrap();

    assert_eq!(
        result.validation.outcome(),
        VerdictOutcome::RejectedIncoherent
    );
    assert!(!result.validation.reasons().is_empty());
    assert_eq!(result.intent, None);
    assert!(result.needs_clarification());
    assert_eq!(result.metadata.extraction_ms, None);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn incomplete_query_asks_for_clarification() {
    let model = ScriptedModel::new(Reply::Draft(read_sales()));
    let pipeline = pipeline_with(Arc::clone(&model)).await;

    let result = pipeline.process(&query("Update status")).await.unwrap();

    assert_eq!(
        result.validation.outcome(),
        VerdictOutcome::RejectedIncomplete
    );
    assert!(result.validation.is_coherent());
    assert_eq!(result.intent, None);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn hanging_model_times_out() {
    let model = ScriptedModel::new(Reply::Hang);
    let pipeline = PipelineBuilder::new()
        .embedder(Arc::new(HashingEmbedder::default()))
        .language_model(model)
        .timeout(Duration::from_millis(50))
        .build()
        .await;

    let err = pipeline.process(&query(GOOD_QUERY)).await.unwrap_err();

    match &err {
        PipelineError::ExternalService {
            service, failure, ..
        } => {
            assert_eq!(*service, Service::LanguageModel);
            assert_eq!(*failure, ServiceFailure::Timeout);
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::ExternalService);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn hanging_embedder_times_out_before_the_model() {
    let model = ScriptedModel::new(Reply::Draft(read_sales()));
    let pipeline = pipeline_with_embedder(Stalled::Hang, Arc::clone(&model)).await;

    let err = pipeline.process(&query(GOOD_QUERY)).await.unwrap_err();

    match &err {
        PipelineError::ExternalService {
            service, failure, ..
        } => {
            assert_eq!(*service, Service::Embedding);
            assert_eq!(*failure, ServiceFailure::Timeout);
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
    assert!(err.is_retryable());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn rate_limited_embedder_carries_retry_after() {
    let model = ScriptedModel::new(Reply::Draft(read_sales()));
    let pipeline = pipeline_with_embedder(Stalled::RateLimited(42), Arc::clone(&model)).await;

    let err = pipeline.extract(&query(GOOD_QUERY)).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::ExternalService {
            service: Service::Embedding,
            failure: ServiceFailure::RateLimited {
                retry_after_secs: 42
            },
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::ExternalService);
    assert_eq!(err.retry_after_secs(), Some(42));
    assert!(err.is_retryable());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn malformed_model_output_is_external_failure() {
    let model = ScriptedModel::new(Reply::Fail(|| {
        LlmError::Malformed("no JSON object in reply".into())
    }));
    let pipeline = pipeline_with(model).await;

    let err = pipeline.extract(&query(GOOD_QUERY)).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::ExternalService {
            failure: ServiceFailure::Malformed,
            ..
        }
    ));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn missing_key_is_schema_violation() {
    let model = ScriptedModel::new(Reply::Draft(json!({
        "intent_type": "read",
        "workspaces": ["sales"],
        "entities": {}
    })));
    let pipeline = pipeline_with(model).await;

    let err = pipeline.extract(&query(GOOD_QUERY)).await.unwrap_err();

    let PipelineError::SchemaViolation(violations) = &err else {
        panic!("expected a schema violation, got {err:?}");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].category, ViolationCategory::RequiredKeys);
    assert_eq!(violations[0].field, "confidence");
    assert_eq!(err.kind(), ErrorKind::SchemaViolation);
}

#[tokio::test]
async fn draft_is_normalized_before_enforcement() {
    let model = ScriptedModel::new(Reply::Draft(json!({
        "intent_type": "summon",
        "workspaces": ["sales", "legacy_crm"],
        "entities": {},
        "confidence": 1.7
    })));
    let pipeline = pipeline_with(model).await;

    let extraction = pipeline
        .extract_with_metadata(&query(GOOD_QUERY))
        .await
        .unwrap();

    assert_eq!(extraction.intent.intent_type, IntentType::Unknown);
    assert!((extraction.intent.confidence - 1.0).abs() < f64::EPSILON);
    assert_eq!(
        extraction.intent.workspaces.iter().collect::<Vec<_>>(),
        vec!["sales"]
    );
    assert_eq!(extraction.details.dropped_workspaces, vec!["legacy_crm"]);
    assert!(extraction.details.normalization.confidence_clamped);
    assert!(extraction.details.normalization.intent_coerced_to_unknown);
}

#[tokio::test]
async fn stale_index_entries_are_dropped() {
    let embedder = HashingEmbedder::default();
    let catalog = sample_catalog();
    let built = SimilarityIndex::build(&catalog, &embedder).await.unwrap();
    let mut rows: Vec<IndexRow> = built.rows().cloned().collect();
    // Identical to the query vector, so it would rank first.
    rows.push(IndexRow {
        workspace_id: "legacy_crm".into(),
        vector: embedder.embed(GOOD_QUERY).await.unwrap(),
    });
    let index = SimilarityIndex::from_rows(rows).unwrap();

    let model = ScriptedModel::new(Reply::Draft(read_sales()));
    let pipeline = PipelineBuilder::new()
        .embedder(Arc::new(embedder))
        .language_model(Arc::clone(&model) as Arc<dyn LanguageModel>)
        .snapshot(CatalogSnapshot::new(catalog, index))
        .build()
        .await;

    let result = pipeline.process(&query(GOOD_QUERY)).await.unwrap();

    assert_eq!(result.metadata.stale_index_entries, vec!["legacy_crm"]);
    assert!(
        result
            .metadata
            .retrieved
            .iter()
            .all(|r| r.workspace_id != "legacy_crm")
    );
    let seen = model.seen.lock().unwrap();
    assert!(seen[0].iter().all(|id| id != "legacy_crm"));
}

#[tokio::test]
async fn equal_scores_follow_catalog_order() {
    let catalog = sample_catalog();
    // Rows deliberately listed opposite to catalog order.
    let index = SimilarityIndex::from_rows(vec![
        IndexRow {
            workspace_id: "finance".into(),
            vector: vec![1.0, 0.0],
        },
        IndexRow {
            workspace_id: "sales".into(),
            vector: vec![1.0, 0.0],
        },
    ])
    .unwrap();

    let model = ScriptedModel::new(Reply::Draft(read_sales()));
    let pipeline = PipelineBuilder::new()
        .embedder(Arc::new(HashingEmbedder::new(2)))
        .language_model(Arc::clone(&model) as Arc<dyn LanguageModel>)
        .snapshot(CatalogSnapshot::new(catalog, index))
        .build()
        .await;

    for _ in 0..3 {
        pipeline.extract(&query(GOOD_QUERY)).await.unwrap();
    }

    let seen = model.seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    for candidates in seen.iter() {
        assert_eq!(candidates, &vec!["sales".to_string(), "finance".to_string()]);
    }
}

#[tokio::test]
async fn top_k_bounds_the_candidates() {
    let model = ScriptedModel::new(Reply::Draft(read_sales()));
    let pipeline = PipelineBuilder::new()
        .embedder(Arc::new(HashingEmbedder::default()))
        .language_model(Arc::clone(&model) as Arc<dyn LanguageModel>)
        .top_k(2)
        .build()
        .await;

    let extraction = pipeline
        .extract_with_metadata(&query(GOOD_QUERY))
        .await
        .unwrap();

    assert_eq!(extraction.details.top_k, 2);
    assert_eq!(extraction.details.retrieved.len(), 2);
    assert_eq!(model.seen.lock().unwrap()[0].len(), 2);
}

#[tokio::test]
async fn replaced_snapshot_applies_to_later_requests() {
    let model = ScriptedModel::new(Reply::Draft(read_sales()));
    let pipeline = pipeline_with(model).await;

    let before = pipeline.snapshot();
    assert_eq!(before.catalog.len(), 6);

    let catalog = WorkspaceCatalog::new(vec![WorkspaceEntry::new("sales", "Sales")]).unwrap();
    let embedder = HashingEmbedder::default();
    let index = SimilarityIndex::build(&catalog, &embedder).await.unwrap();
    let previous = pipeline.replace_snapshot(CatalogSnapshot::new(catalog, index));

    assert!(Arc::ptr_eq(&previous, &before));
    assert_eq!(before.catalog.len(), 6);
    assert_eq!(pipeline.status().catalog_size, 1);

    let extraction = pipeline
        .extract_with_metadata(&query(GOOD_QUERY))
        .await
        .unwrap();
    assert_eq!(extraction.details.retrieved.len(), 1);
}

#[tokio::test]
async fn reload_reads_sources_again() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.jsonl");
    WorkspaceCatalog::new(vec![
        WorkspaceEntry::new("sales", "Sales"),
        WorkspaceEntry::new("hr", "Human Resources"),
    ])
    .unwrap()
    .write_jsonl(&path)
    .unwrap();

    let model = ScriptedModel::new(Reply::Draft(read_sales()));
    let pipeline = PipelineBuilder::new()
        .embedder(Arc::new(HashingEmbedder::default()))
        .language_model(model)
        .catalog_sources(Some(path.clone()), None)
        .build()
        .await;
    assert_eq!(pipeline.status().catalog_size, 2);

    sample_catalog().write_jsonl(&path).unwrap();
    let reloaded = pipeline.reload().await.unwrap();
    assert_eq!(reloaded.catalog.len(), 6);

    let status = pipeline.status();
    assert_eq!(status.catalog_size, 6);
    assert_eq!(status.index_size, 6);
    assert!(status.operational);

    // A failed reload keeps the current snapshot.
    std::fs::remove_file(&path).unwrap();
    let err = pipeline.reload().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(pipeline.status().catalog_size, 6);
}

#[tokio::test]
async fn failed_catalog_load_degrades_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let model = ScriptedModel::new(Reply::Draft(read_sales()));
    let pipeline = PipelineBuilder::new()
        .embedder(Arc::new(HashingEmbedder::default()))
        .language_model(Arc::clone(&model) as Arc<dyn LanguageModel>)
        .catalog_sources(Some(dir.path().join("missing.jsonl")), None)
        .build()
        .await;

    let status = pipeline.status();
    assert!(!status.operational);
    assert_eq!(status.catalog_size, 0);
    assert!(
        status
            .last_error
            .as_deref()
            .is_some_and(|e| e.contains("catalog failed to load"))
    );

    let err = pipeline.extract(&query(GOOD_QUERY)).await.unwrap_err();
    assert!(matches!(err, PipelineError::Configuration(_)));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn missing_model_is_reported_not_fatal() {
    let pipeline = PipelineBuilder::new()
        .embedder(Arc::new(HashingEmbedder::default()))
        .build()
        .await;

    let status = pipeline.status();
    assert!(!status.operational);
    assert_eq!(status.catalog_size, 6);
    assert_eq!(
        status.last_error.as_deref(),
        Some("language model is not configured")
    );

    let verdict = pipeline.validate(&query(GOOD_QUERY)).await.unwrap();
    assert!(verdict.is_accepted());
    assert!(matches!(
        pipeline.extract(&query(GOOD_QUERY)).await,
        Err(PipelineError::Configuration(_))
    ));
}

#[tokio::test]
async fn offline_config_builds_degraded_pipeline() {
    let config = iq_config::IqConfig::default();
    let pipeline = PipelineBuilder::from_config(&config).build().await;

    let status = pipeline.status();
    assert_eq!(status.catalog_size, 6);
    assert!(status.index_dimension.is_some());
    assert!(!status.operational);

    let result = pipeline.process(&query("asdkj qwoeiru")).await.unwrap();
    assert_eq!(result.intent, None);
    assert_eq!(result.metadata.top_k, 0);
}
