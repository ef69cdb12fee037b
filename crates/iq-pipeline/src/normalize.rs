//! Corrections applied to a model draft before schema enforcement.
//!
//! Only values whose kind is right but whose content is out of bounds are
//! corrected. Wrong kinds and missing keys are left for the schema check.

use iq_core::enums::IntentType;
use iq_core::responses::Normalization;
use serde_json::Value;

/// A draft after correction, with a record of what changed.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDraft {
    pub draft: Value,
    pub normalization: Normalization,
    /// Workspace ids the catalog does not know, in draft order.
    pub dropped_workspaces: Vec<String>,
}

/// Clamp confidence, coerce unknown intent labels, and drop unknown
/// workspaces.
///
/// - `confidence`: a number outside `[0, 1]` is clamped
/// - `intent_type`: a string outside the enumerated set becomes `"unknown"`
/// - `workspaces`: string entries are trimmed; those `known` rejects are removed
pub fn normalize_draft<F>(mut draft: Value, known: F) -> NormalizedDraft
where
    F: Fn(&str) -> bool,
{
    let mut normalization = Normalization::default();
    let mut dropped_workspaces = Vec::new();

    let Some(object) = draft.as_object_mut() else {
        return NormalizedDraft {
            draft,
            normalization,
            dropped_workspaces,
        };
    };

    if let Some(confidence) = object.get("confidence").and_then(Value::as_f64) {
        let clamped = confidence.clamp(0.0, 1.0);
        if (clamped - confidence).abs() > f64::EPSILON {
            normalization.confidence_clamped = true;
            object.insert("confidence".into(), Value::from(clamped));
        }
    }

    let intent = match object.get("intent_type") {
        Some(Value::String(label)) => Some((
            IntentType::coerce(label),
            label.trim().eq_ignore_ascii_case("unknown"),
        )),
        _ => None,
    };
    if let Some((coerced, said_unknown)) = intent {
        if coerced == IntentType::Unknown && !said_unknown {
            normalization.intent_coerced_to_unknown = true;
        }
        object.insert("intent_type".into(), Value::from(coerced.as_str()));
    }

    if let Some(Value::Array(items)) = object.get_mut("workspaces") {
        items.retain_mut(|item| {
            let Value::String(id) = item else {
                return true;
            };
            let trimmed = id.trim();
            if known(trimmed) {
                *id = trimmed.to_string();
                true
            } else {
                dropped_workspaces.push(trimmed.to_string());
                false
            }
        });
    }

    NormalizedDraft {
        draft,
        normalization,
        dropped_workspaces,
    }
}
