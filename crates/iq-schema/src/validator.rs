//! The intent shape contract.
//!
//! Rules run in a fixed category order. Within a category every violation is
//! collected; the first category that produces any violation ends the check.
//!
//! ```text
//! required_keys → intent_type → workspaces → confidence → entities
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use iq_core::enums::IntentType;
use iq_core::intent::IntentCandidate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// Keys every candidate must carry.
pub const REQUIRED_KEYS: [&str; 4] = ["intent_type", "workspaces", "entities", "confidence"];

/// Rule family a violation belongs to, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    RequiredKeys,
    IntentType,
    Workspaces,
    Confidence,
    Entities,
}

impl ViolationCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequiredKeys => "required_keys",
            Self::IntentType => "intent_type",
            Self::Workspaces => "workspaces",
            Self::Confidence => "confidence",
            Self::Entities => "entities",
        }
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One broken rule, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub category: ViolationCategory,
    /// JSON path-ish field name, e.g. `confidence` or `workspaces[1]`.
    pub field: String,
    pub message: String,
}

impl Violation {
    fn new(category: ViolationCategory, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category,
            field: field.into(),
            message: message.into(),
        }
    }

    /// `field: message; field: message` for log lines and error messages.
    #[must_use]
    pub fn summarize(violations: &[Self]) -> String {
        violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Detailed outcome of a schema check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaReport {
    pub violations: Vec<Violation>,
}

impl SchemaReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Category that failed, if any. All violations share it.
    #[must_use]
    pub fn failed_category(&self) -> Option<ViolationCategory> {
        self.violations.first().map(|v| v.category)
    }

    /// Offending field names, deduplicated, in report order.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.violations
            .iter()
            .map(|v| v.field.as_str())
            .filter(|f| seen.insert(*f))
            .collect()
    }
}

/// Boolean form of the contract. Use [`validate_candidate`] for the details.
#[must_use]
pub fn check(candidate: &Value) -> bool {
    validate_candidate(candidate).is_valid()
}

/// Run every rule category in order and report the first failing one.
#[must_use]
pub fn validate_candidate(candidate: &Value) -> SchemaReport {
    let Some(object) = candidate.as_object() else {
        return SchemaReport {
            violations: vec![Violation::new(
                ViolationCategory::RequiredKeys,
                "$",
                format!("candidate must be a JSON object, found {}", kind_of(candidate)),
            )],
        };
    };

    let rules: [fn(&serde_json::Map<String, Value>) -> Vec<Violation>; 5] = [
        required_keys,
        intent_type,
        workspaces,
        confidence,
        entities,
    ];

    for rule in rules {
        let violations = rule(object);
        if !violations.is_empty() {
            return SchemaReport { violations };
        }
    }
    SchemaReport::default()
}

/// Validate and convert in one step.
///
/// # Errors
///
/// Returns [`SchemaError::Violations`] with every violation of the first
/// failing category.
pub fn enforce(candidate: &Value) -> Result<IntentCandidate, SchemaError> {
    let report = validate_candidate(candidate);
    if !report.is_valid() {
        return Err(SchemaError::Violations(report.violations));
    }

    // Every field was checked above, so these reads cannot miss.
    let intent_type = candidate["intent_type"]
        .as_str()
        .and_then(|s| s.parse::<IntentType>().ok())
        .unwrap_or(IntentType::Unknown);
    let workspaces: BTreeSet<String> = candidate["workspaces"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .collect()
        })
        .unwrap_or_default();
    let entities: BTreeMap<String, Value> = candidate["entities"]
        .as_object()
        .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();
    let confidence = candidate["confidence"].as_f64().unwrap_or_default();

    Ok(IntentCandidate {
        intent_type,
        workspaces,
        entities,
        confidence,
    })
}

fn required_keys(object: &serde_json::Map<String, Value>) -> Vec<Violation> {
    REQUIRED_KEYS
        .iter()
        .filter(|key| !object.contains_key(**key))
        .map(|key| Violation::new(ViolationCategory::RequiredKeys, *key, "required key is missing"))
        .collect()
}

fn intent_type(object: &serde_json::Map<String, Value>) -> Vec<Violation> {
    let value = &object["intent_type"];
    let ok = value
        .as_str()
        .is_some_and(|label| label.parse::<IntentType>().is_ok());
    if ok {
        return Vec::new();
    }
    vec![Violation::new(
        ViolationCategory::IntentType,
        "intent_type",
        format!(
            "must be one of [{}], found {}",
            IntentType::labels().join(", "),
            value
        ),
    )]
}

fn workspaces(object: &serde_json::Map<String, Value>) -> Vec<Violation> {
    let value = &object["workspaces"];
    let Some(items) = value.as_array() else {
        return vec![Violation::new(
            ViolationCategory::Workspaces,
            "workspaces",
            format!("must be an array of strings, found {}", kind_of(value)),
        )];
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let message = match item.as_str() {
                None => format!("must be a string, found {}", kind_of(item)),
                Some(s) if s.trim().is_empty() => "must be a non-empty string".to_string(),
                Some(_) => return None,
            };
            Some(Violation::new(
                ViolationCategory::Workspaces,
                format!("workspaces[{i}]"),
                message,
            ))
        })
        .collect()
}

fn confidence(object: &serde_json::Map<String, Value>) -> Vec<Violation> {
    let value = &object["confidence"];
    let message = match value.as_f64() {
        None => format!("must be a number, found {}", kind_of(value)),
        Some(c) if !(0.0..=1.0).contains(&c) => format!("must be within [0.0, 1.0], found {c}"),
        Some(_) => return Vec::new(),
    };
    vec![Violation::new(ViolationCategory::Confidence, "confidence", message)]
}

fn entities(object: &serde_json::Map<String, Value>) -> Vec<Violation> {
    let value = &object["entities"];
    if value.is_object() {
        return Vec::new();
    }
    vec![Violation::new(
        ViolationCategory::Entities,
        "entities",
        format!("must be an object, found {}", kind_of(value)),
    )]
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "intent_type": "read",
            "workspaces": ["sales"],
            "entities": {},
            "confidence": 0.0
        })
    }

    #[test]
    fn accepts_minimal_valid_shape() {
        assert!(check(&minimal()));
        assert!(validate_candidate(&minimal()).is_valid());
    }

    #[rstest]
    #[case("intent_type")]
    #[case("workspaces")]
    #[case("entities")]
    #[case("confidence")]
    fn rejects_each_missing_key(#[case] key: &str) {
        let mut candidate = minimal();
        candidate.as_object_mut().unwrap().remove(key);

        let report = validate_candidate(&candidate);
        assert!(!check(&candidate));
        assert_eq!(report.failed_category(), Some(ViolationCategory::RequiredKeys));
        assert_eq!(report.fields(), vec![key]);
    }

    #[test]
    fn collects_all_missing_keys() {
        let report = validate_candidate(&json!({"intent_type": "read"}));
        assert_eq!(report.fields(), vec!["workspaces", "entities", "confidence"]);
    }

    #[test]
    fn non_object_is_rejected() {
        let report = validate_candidate(&json!(["read"]));
        assert_eq!(report.failed_category(), Some(ViolationCategory::RequiredKeys));
        assert_eq!(report.fields(), vec!["$"]);
    }

    #[rstest]
    #[case(json!("summon"))]
    #[case(json!(3))]
    #[case(json!(null))]
    fn rejects_intent_outside_set(#[case] value: Value) {
        let mut candidate = minimal();
        candidate["intent_type"] = value;
        let report = validate_candidate(&candidate);
        assert_eq!(report.failed_category(), Some(ViolationCategory::IntentType));
    }

    #[test]
    fn unknown_is_in_the_set() {
        let mut candidate = minimal();
        candidate["intent_type"] = json!("unknown");
        assert!(check(&candidate));
    }

    #[test]
    fn collects_every_bad_workspace() {
        let mut candidate = minimal();
        candidate["workspaces"] = json!(["sales", "", 7, "  "]);
        let report = validate_candidate(&candidate);
        assert_eq!(report.failed_category(), Some(ViolationCategory::Workspaces));
        assert_eq!(
            report.fields(),
            vec!["workspaces[1]", "workspaces[2]", "workspaces[3]"]
        );
    }

    #[test]
    fn workspaces_must_be_array() {
        let mut candidate = minimal();
        candidate["workspaces"] = json!("sales");
        assert_eq!(
            validate_candidate(&candidate).failed_category(),
            Some(ViolationCategory::Workspaces)
        );
    }

    #[test]
    fn duplicate_workspaces_collapse() {
        let mut candidate = minimal();
        candidate["workspaces"] = json!(["sales", "sales", "finance"]);
        let intent = enforce(&candidate).unwrap();
        assert_eq!(intent.workspaces.len(), 2);
    }

    #[test]
    fn empty_workspace_set_is_allowed() {
        let mut candidate = minimal();
        candidate["workspaces"] = json!([]);
        assert!(check(&candidate));
    }

    #[rstest]
    #[case(json!(0.0), true)]
    #[case(json!(1.0), true)]
    #[case(json!(1), true)]
    #[case(json!(0.5), true)]
    #[case(json!(-0.01), false)]
    #[case(json!(1.0001), false)]
    #[case(json!("0.9"), false)]
    #[case(json!(true), false)]
    fn confidence_bounds(#[case] value: Value, #[case] valid: bool) {
        let mut candidate = minimal();
        candidate["confidence"] = value;
        assert_eq!(check(&candidate), valid);
    }

    #[test]
    fn entities_must_be_object() {
        let mut candidate = minimal();
        candidate["entities"] = json!(["Mumbai"]);
        let report = validate_candidate(&candidate);
        assert_eq!(report.failed_category(), Some(ViolationCategory::Entities));
    }

    #[test]
    fn entity_values_are_unconstrained() {
        let mut candidate = minimal();
        candidate["entities"] = json!({"city": "Mumbai", "top": 5, "filters": [{"a": null}]});
        assert!(check(&candidate));
    }

    #[test]
    fn earlier_category_short_circuits() {
        let candidate = json!({
            "intent_type": "bogus",
            "workspaces": [""],
            "entities": [],
            "confidence": 9
        });
        let report = validate_candidate(&candidate);
        assert_eq!(report.failed_category(), Some(ViolationCategory::IntentType));
        assert_eq!(report.violations.len(), 1);
    }

    #[test]
    fn enforce_builds_candidate() {
        let candidate = json!({
            "intent_type": "Compare",
            "workspaces": ["sales", " finance "],
            "entities": {"period": "Q1"},
            "confidence": 0.75
        });
        let intent = enforce(&candidate).unwrap();
        assert_eq!(intent.intent_type, IntentType::Compare);
        assert_eq!(
            intent.workspaces,
            BTreeSet::from(["finance".to_string(), "sales".to_string()])
        );
        assert_eq!(intent.entities["period"], json!("Q1"));
        assert!((intent.confidence - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn enforce_reports_violations() {
        let err = enforce(&json!({"intent_type": "read"})).unwrap_err();
        let SchemaError::Violations(violations) = err else {
            panic!("expected Violations");
        };
        assert_eq!(violations.len(), 3);
        assert!(violations.iter().all(|v| v.category == ViolationCategory::RequiredKeys));
    }
}
