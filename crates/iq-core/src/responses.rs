//! Response types returned to transport shells by the pipeline.
//!
//! These structs define the JSON shape of `process` and `status` results as
//! consumed by `iq intent` and `iq status`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::intent::IntentCandidate;
use crate::query::Query;
use crate::verdict::ValidationVerdict;

/// One nearest-neighbor hit from the similarity index.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RetrievedWorkspace {
    pub workspace_id: String,
    /// Cosine similarity in `[-1.0, 1.0]`.
    pub score: f64,
}

/// Corrections applied to the model draft before schema enforcement.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Normalization {
    /// Confidence fell outside `[0.0, 1.0]` and was clamped.
    pub confidence_clamped: bool,
    /// The model's intent label was outside the enumerated set.
    pub intent_coerced_to_unknown: bool,
}

impl Normalization {
    #[must_use]
    pub const fn any(self) -> bool {
        self.confidence_clamped || self.intent_coerced_to_unknown
    }
}

/// Timing and retrieval details attached to a pipeline result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PipelineMetadata {
    pub validation_ms: u64,
    pub extraction_ms: Option<u64>,
    pub total_ms: u64,
    /// Language model identifier, when extraction ran.
    pub model: Option<String>,
    pub top_k: usize,
    pub retrieved: Vec<RetrievedWorkspace>,
    /// Index hits whose workspace is no longer in the catalog.
    pub stale_index_entries: Vec<String>,
    /// Workspaces proposed by the model that the catalog does not know.
    pub dropped_workspaces: Vec<String>,
    pub normalization: Normalization,
    pub completed_at: DateTime<Utc>,
}

/// Result of running a query through the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PipelineResult {
    pub query: Query,
    pub validation: ValidationVerdict,
    /// Absent when the validation gate rejected the query.
    pub intent: Option<IntentCandidate>,
    pub metadata: PipelineMetadata,
}

impl PipelineResult {
    /// Whether the query needs rephrasing before it can be actioned.
    #[must_use]
    pub const fn needs_clarification(&self) -> bool {
        self.intent.is_none()
    }
}

/// Snapshot of local pipeline resources, recomputed on every call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PipelineStatus {
    pub catalog_size: usize,
    pub index_size: usize,
    /// Vector width of the loaded index, `None` when the index is empty.
    pub index_dimension: Option<usize>,
    /// True iff every required collaborator is initialized.
    pub operational: bool,
    /// Why the pipeline is not operational, if it is not.
    pub last_error: Option<String>,
}
