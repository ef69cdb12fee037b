//! Serde and JsonSchema agreement tests for the pipeline response types.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use iq_core::enums::IntentType;
use iq_core::intent::IntentCandidate;
use iq_core::query::Query;
use iq_core::responses::*;
use iq_core::verdict::{Diagnostics, ValidationVerdict};
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_intent() -> IntentCandidate {
    let mut entities = BTreeMap::new();
    entities.insert("city".to_string(), serde_json::json!("Mumbai"));
    entities.insert("period".to_string(), serde_json::json!({"relative": "last_month"}));
    IntentCandidate {
        intent_type: IntentType::Read,
        workspaces: BTreeSet::from(["sales".to_string()]),
        entities,
        confidence: 0.92,
    }
}

fn sample_metadata() -> PipelineMetadata {
    PipelineMetadata {
        validation_ms: 3,
        extraction_ms: Some(410),
        total_ms: 413,
        model: Some("gemini-1.5-flash".into()),
        top_k: 5,
        retrieved: vec![RetrievedWorkspace {
            workspace_id: "sales".into(),
            score: 0.81,
        }],
        stale_index_entries: vec!["legacy_crm".into()],
        dropped_workspaces: Vec::new(),
        normalization: Normalization::default(),
        completed_at: Utc::now(),
    }
}

roundtrip_and_validate!(intent_candidate_roundtrip, IntentCandidate, sample_intent());

roundtrip_and_validate!(
    accepted_result_roundtrip,
    PipelineResult,
    PipelineResult {
        query: Query::parse("Show me sales in Mumbai for last month").unwrap(),
        validation: ValidationVerdict::accepted(Vec::new(), Diagnostics::new()),
        intent: Some(sample_intent()),
        metadata: sample_metadata(),
    }
);

roundtrip_and_validate!(
    rejected_result_roundtrip,
    PipelineResult,
    PipelineResult {
        query: Query::parse("asdkj qwoeiru").unwrap(),
        validation: ValidationVerdict::incoherent(
            vec!["no recognizable words".into()],
            Diagnostics::new()
        ),
        intent: None,
        metadata: PipelineMetadata {
            extraction_ms: None,
            model: None,
            retrieved: Vec::new(),
            stale_index_entries: Vec::new(),
            ..sample_metadata()
        },
    }
);

roundtrip_and_validate!(
    status_roundtrip,
    PipelineStatus,
    PipelineStatus {
        catalog_size: 6,
        index_size: 6,
        index_dimension: Some(256),
        operational: true,
        last_error: None,
    }
);

#[test]
fn confidence_above_one_fails_schema() {
    let schema = serde_json::to_value(schema_for!(IntentCandidate)).unwrap();
    let instance = serde_json::json!({
        "intent_type": "read",
        "workspaces": ["sales"],
        "entities": {},
        "confidence": 1.5
    });
    assert!(!validate_against_schema(&schema, &instance).is_empty());
}

#[test]
fn rejected_result_needs_clarification() {
    let result = PipelineResult {
        query: Query::parse("Update status").unwrap(),
        validation: ValidationVerdict::incomplete(vec!["ambiguous".into()], Diagnostics::new()),
        intent: None,
        metadata: sample_metadata(),
    };
    assert!(result.needs_clarification());
}
