//! Parsing model output that should be JSON but may arrive wrapped in prose
//! or markdown fences.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LlmError;

/// Raw intent draft as the model produced it. Shape is not checked here.
pub type IntentDraft = Value;

/// Answer of a model-backed coherence or completeness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub ok: bool,
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// Strip markdown code fences and surrounding whitespace.
fn strip_fences(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```JSON")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parse model text into JSON, falling back to the outermost `{...}` span.
///
/// # Errors
///
/// Returns [`LlmError::Malformed`] when no JSON can be recovered.
pub fn parse_json(text: &str) -> Result<Value, LlmError> {
    let body = strip_fences(text);
    match serde_json::from_str::<Value>(body) {
        Ok(value) => Ok(value),
        Err(e) => {
            if let (Some(start), Some(end)) = (body.find('{'), body.rfind('}'))
                && start < end
                && let Ok(value) = serde_json::from_str(&body[start..=end])
            {
                return Ok(value);
            }
            let preview: String = body.chars().take(200).collect();
            Err(LlmError::Malformed(format!("{e}; output: {preview}")))
        }
    }
}

/// Parse an intent draft.
///
/// # Errors
///
/// Returns [`LlmError::Malformed`] when the output is not JSON at all.
pub fn parse_draft(text: &str) -> Result<IntentDraft, LlmError> {
    parse_json(text)
}

/// Parse a `{ "ok": bool, "reasons": [...] }` judgment.
///
/// # Errors
///
/// Returns [`LlmError::Malformed`] when the output is not JSON or lacks `ok`.
pub fn parse_judgment(text: &str) -> Result<Judgment, LlmError> {
    let value = parse_json(text)?;
    serde_json::from_value(value).map_err(|e| LlmError::Malformed(format!("judgment: {e}")))
}
