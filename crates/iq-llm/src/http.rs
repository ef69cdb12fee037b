//! Status handling for Gemini responses.
//!
//! Gemini reports failures as `{"error": {"code", "message", "status",
//! "details"}}`. Rate limits carry the back-off either in a `Retry-After`
//! header or in a `RetryInfo` detail (`"retryDelay": "30s"`).

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::error::LlmError;

/// Back-off used when a 429 names none.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<Value>,
}

impl ErrorBody {
    fn retry_delay_secs(&self) -> Option<u64> {
        self.details
            .iter()
            .filter_map(|d| d.get("retryDelay").and_then(Value::as_str))
            .find_map(parse_delay)
    }

    fn describe(self) -> String {
        if self.status.is_empty() {
            self.message
        } else {
            format!("{}: {}", self.status, self.message)
        }
    }
}

/// Pass successful responses through; map everything else to [`LlmError`].
///
/// - 429 → [`LlmError::RateLimited`]
/// - other non-success → [`LlmError::Api`] with the envelope's message, or
///   the raw body when it is not an envelope
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let header_delay = retry_after_header(&resp);
    let body = resp.text().await.unwrap_or_default();
    let envelope = serde_json::from_str::<ErrorEnvelope>(&body)
        .ok()
        .map(|e| e.error);

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = header_delay
            .or_else(|| envelope.as_ref().and_then(ErrorBody::retry_delay_secs))
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        tracing::warn!(retry_after_secs, "gemini rate limited");
        return Err(LlmError::RateLimited { retry_after_secs });
    }

    let message = match envelope {
        Some(error) if !error.message.is_empty() => error.describe(),
        _ => body,
    };
    Err(LlmError::Api {
        status: status.as_u16(),
        message,
    })
}

fn retry_after_header(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// `"30s"` → 30, `"12.4s"` → 13.
fn parse_delay(raw: &str) -> Option<u64> {
    let number = raw.trim().strip_suffix('s')?;
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    let secs = whole.parse::<u64>().ok()?;
    let rounds_up = fraction.bytes().any(|b| b != b'0');
    Some(if rounds_up { secs + 1 } else { secs })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn response(status: u16, retry_after: Option<&str>, body: &'static str) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        if let Some(value) = retry_after {
            builder = builder.header("Retry-After", value);
        }
        reqwest::Response::from(builder.body(body).unwrap())
    }

    const QUOTA_BODY: &str = r#"{"error": {
        "code": 429,
        "message": "Resource has been exhausted",
        "status": "RESOURCE_EXHAUSTED",
        "details": [
            {"@type": "type.googleapis.com/google.rpc.QuotaFailure"},
            {"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "17.2s"}
        ]
    }}"#;

    #[rstest]
    #[case("30s", Some(30))]
    #[case("12.4s", Some(13))]
    #[case("5.0s", Some(5))]
    #[case("soon", None)]
    #[case("30", None)]
    fn delay_parsing(#[case] raw: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_delay(raw), expected);
    }

    #[tokio::test]
    async fn header_wins_over_body_delay() {
        let err = check_response(response(429, Some("30"), QUOTA_BODY))
            .await
            .unwrap_err();
        assert_eq!(err.retry_after_secs(), Some(30));
    }

    #[tokio::test]
    async fn body_delay_used_without_header() {
        let err = check_response(response(429, None, QUOTA_BODY))
            .await
            .unwrap_err();
        assert_eq!(err.retry_after_secs(), Some(18));
    }

    #[tokio::test]
    async fn bare_429_falls_back_to_default() {
        let err = check_response(response(429, None, "")).await.unwrap_err();
        assert_eq!(err.retry_after_secs(), Some(DEFAULT_RETRY_AFTER_SECS));
    }

    #[tokio::test]
    async fn envelope_message_is_extracted() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        let err = check_response(response(400, None, body)).await.unwrap_err();
        let LlmError::Api { status, message } = err else {
            panic!("expected Api");
        };
        assert_eq!(status, 400);
        assert_eq!(message, "INVALID_ARGUMENT: API key not valid");
    }

    #[tokio::test]
    async fn plain_body_is_kept() {
        let err = check_response(response(503, None, "upstream overloaded"))
            .await
            .unwrap_err();
        let LlmError::Api { status, message } = err else {
            panic!("expected Api");
        };
        assert_eq!(status, 503);
        assert_eq!(message, "upstream overloaded");
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert!(check_response(response(200, None, "{}")).await.is_ok());
    }
}
