//! Gemini `generateContent` and `embedContent` client.

use std::time::Duration;

use async_trait::async_trait;
use iq_config::GeminiConfig;
use iq_embeddings::{EmbeddingError, EmbeddingProvider};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::LanguageModel;
use crate::error::LlmError;
use crate::http::check_response;
use crate::parse::{IntentDraft, Judgment, parse_draft, parse_judgment};
use crate::prompt::{JudgmentKind, Prompt, PromptContext, intent_prompt, judgment_prompt};

/// Upper bound for a single HTTP exchange. Callers apply their own, shorter
/// deadline on top.
const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Gemini API, usable both as the language model and as
/// the embedding provider.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    embedding_model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Build a client from the `gemini` config section.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Unavailable`] when no API key is configured, or
    /// [`LlmError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn new(config: &GeminiConfig) -> Result<Self, LlmError> {
        if !config.is_configured() {
            return Err(LlmError::Unavailable(
                "gemini.api_key is not set".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .user_agent("intelliquery/0.1")
            .timeout(TRANSPORT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            embedding_model: config.embedding_model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.endpoint)
    }

    async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, LlmError> {
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| LlmError::Malformed(e.to_string()))
    }

    /// Send a prompt and return the first candidate's text.
    async fn generate(&self, prompt: Prompt) -> Result<String, LlmError> {
        let body = GenerateRequest::from_prompt(prompt);
        let url = self.url(&self.model, "generateContent");
        tracing::debug!(model = %self.model, "gemini generateContent");
        let response: GenerateResponse = self.post(&url, &body).await?;
        response.into_text()
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn complete(&self, context: &PromptContext) -> Result<IntentDraft, LlmError> {
        let text = self.generate(intent_prompt(context)).await?;
        parse_draft(&text)
    }

    async fn judge(&self, kind: JudgmentKind, query: &str) -> Result<Judgment, LlmError> {
        let text = self.generate(judgment_prompt(kind, query)).await?;
        parse_judgment(&text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = EmbedRequest::new(&self.embedding_model, text);
        let url = self.url(&self.embedding_model, "embedContent");
        let response: EmbedResponse = self.post(&url, &body).await?;
        non_empty(response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let body = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedRequest::new(&self.embedding_model, text))
                .collect(),
        };
        let url = self.url(&self.embedding_model, "batchEmbedContents");
        let response: BatchEmbedResponse = self.post(&url, &body).await?;
        if response.embeddings.len() != texts.len() {
            return Err(EmbeddingError::Malformed(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }
        response
            .embeddings
            .into_iter()
            .map(|e| non_empty(e.values))
            .collect()
    }

    fn name(&self) -> &str {
        &self.embedding_model
    }
}

fn non_empty(values: Vec<f32>) -> Result<Vec<f32>, EmbeddingError> {
    if values.is_empty() {
        Err(EmbeddingError::EmptyResult)
    } else {
        Ok(values)
    }
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

impl GenerateRequest {
    fn from_prompt(prompt: Prompt) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: prompt.user }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: prompt.system,
                }],
            },
            generation_config: GenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json",
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, LlmError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Unavailable(format!("prompt blocked: {reason}")));
        }
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Malformed("no candidates in response".to_string()))?;
        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
            return Err(LlmError::Malformed(format!(
                "empty candidate (finish reason: {reason})"
            )));
        }
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    content: Content,
}

impl EmbedRequest {
    fn new(model: &str, text: &str) -> Self {
        Self {
            model: format!("models/{model}"),
            content: Content {
                role: None,
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedRequest>,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Embedding,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<Embedding>,
}

#[derive(Debug, Deserialize)]
struct Embedding {
    #[serde(default)]
    values: Vec<f32>,
}
