//! Gemini Provider - Implementation of AIProvider for Google's Gemini API.
//!
//! System turns are sent as `systemInstruction`; assistant turns use the
//! `model` role. Errors arrive as `{"error": {"code", "message", "status"}}`
//! and are classified on `status`.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::{with_retry, RetryPolicy};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, TokenUsage,
};

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_RETRY_AFTER_SECS: u32 = 30;

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-1.5-flash").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Per-attempt HTTP timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-1.5-flash".to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            timeout: Duration::from_secs(20),
            max_retries: 1,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
    retry: RetryPolicy,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the HTTP client cannot be built
    pub fn new(config: GeminiConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::invalid_request(format!("failed to build HTTP client: {e}")))?;
        let retry = RetryPolicy::with_max_retries(config.max_retries);

        Ok(Self {
            config,
            client,
            retry,
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The API key is sent as a header, not a query parameter.
    fn api_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    fn to_gemini_request(request: &CompletionRequest) -> GenerateContentRequest {
        let system_instruction = request.system_text().map(|text| Content {
            role: None,
            parts: vec![ContentPart { text }],
        });

        let contents = request
            .messages
            .iter()
            .filter_map(|msg| {
                let role = match msg.role {
                    MessageRole::System => return None,
                    MessageRole::User => "user",
                    MessageRole::Assistant => "model",
                };
                Some(Content {
                    role: Some(role.to_string()),
                    parts: vec![ContentPart {
                        text: msg.content.clone(),
                    }],
                })
            })
            .collect();

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            }),
        }
    }

    async fn attempt(&self, body: &GenerateContentRequest) -> Result<CompletionResponse, AIError> {
        tracing::debug!(
            model = %self.config.model,
            turns = body.contents.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url())
            .header("x-goog-api-key", self.config.api_key())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else {
                    AIError::network(e.to_string())
                }
            })?;

        let response = Self::handle_response_status(response).await?;
        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        self.into_completion(api_response)
    }

    async fn handle_response_status(response: Response) -> Result<Response, AIError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(Self::classify_error(status, &error_body))
    }

    fn classify_error(status: StatusCode, body: &str) -> AIError {
        let detail = serde_json::from_str::<GeminiErrorEnvelope>(body)
            .map(|envelope| envelope.error)
            .ok();
        let google_status = detail
            .as_ref()
            .and_then(|d| d.status.clone())
            .unwrap_or_default();
        let message = detail
            .and_then(|d| d.message)
            .unwrap_or_else(|| body.to_string());
        let lower = message.to_lowercase();

        match google_status.as_str() {
            "RESOURCE_EXHAUSTED" if lower.contains("quota") => AIError::QuotaExceeded,
            "RESOURCE_EXHAUSTED" => AIError::rate_limited(DEFAULT_RETRY_AFTER_SECS),
            "UNAVAILABLE" | "INTERNAL" => AIError::overloaded(message),
            "DEADLINE_EXCEEDED" => AIError::Timeout { timeout_secs: 0 },
            "PERMISSION_DENIED" | "UNAUTHENTICATED" => AIError::InvalidCredential,
            "INVALID_ARGUMENT" if lower.contains("api key") => AIError::InvalidCredential,
            "INVALID_ARGUMENT" if lower.contains("token") && lower.contains("exceed") => {
                AIError::ContextTooLong
            }
            "INVALID_ARGUMENT" | "FAILED_PRECONDITION" | "NOT_FOUND" => {
                AIError::InvalidRequest(message)
            }
            _ => match status.as_u16() {
                401 | 403 => AIError::InvalidCredential,
                429 => AIError::rate_limited(DEFAULT_RETRY_AFTER_SECS),
                400 | 404 => AIError::InvalidRequest(message),
                500..=599 => AIError::overloaded(format!("Server error {}: {}", status, message)),
                _ => AIError::network(format!("Unexpected status {}: {}", status, message)),
            },
        }
    }

    fn into_completion(
        &self,
        api_response: GenerateContentResponse,
    ) -> Result<CompletionResponse, AIError> {
        if let Some(reason) = api_response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(AIError::content_filtered(format!("prompt blocked: {reason}")));
        }

        let candidate = api_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No candidates in response"))?;

        let finish_reason = match candidate.finish_reason.as_deref() {
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") => {
                FinishReason::ContentFilter
            }
            _ => FinishReason::Stop,
        };
        if finish_reason == FinishReason::ContentFilter {
            return Err(AIError::content_filtered("response blocked by safety filter"));
        }

        let content = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let usage = api_response
            .usage_metadata
            .map(|u| {
                TokenUsage::new(
                    u.prompt_token_count.unwrap_or(0),
                    u.candidates_token_count.unwrap_or(0),
                )
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            usage,
            model: self.config.model.clone(),
            finish_reason,
        })
    }
}

#[async_trait]
impl AIProvider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let body = Self::to_gemini_request(&request);
        let response = with_retry(&self.retry, "gemini", || self.attempt(&body)).await?;

        tracing::debug!(
            session_id = %request.metadata.session_id,
            trace_id = %request.metadata.trace_id,
            total_tokens = response.usage.total_tokens,
            "Gemini completion finished"
        );
        Ok(response)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", &self.config.model)
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
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
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: Option<String>,
    status: Option<String>,
}
