//! OpenAI Provider - Implementation of AIProvider for OpenAI's chat API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-3.5-turbo")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```
//!
//! # Error mapping
//!
//! OpenAI reports failures as `{"error": {"message", "type", "code"}}`. The
//! `code` (falling back to `type`) decides the `AIError` variant; the HTTP
//! status is only used when neither is recognized.

use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::{with_retry, RetryPolicy};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, TokenUsage,
};

const DEFAULT_RETRY_AFTER_SECS: u32 = 30;

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-3.5-turbo", "gpt-4o").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Per-attempt HTTP timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(20),
            max_retries: 1,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI API provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
    retry: RetryPolicy,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider with the given configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the HTTP client cannot be built
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
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

    /// Overrides the retry policy (tests use a near-zero backoff).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Converts our request to OpenAI's format.
    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| OpenAIMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: Some(msg.content.clone()),
            })
            .collect();

        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    /// Sends one attempt and parses the result.
    async fn attempt(&self, body: &OpenAIRequest) -> Result<CompletionResponse, AIError> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let response = Self::handle_response_status(response).await?;
        Self::parse_response(response).await
    }

    fn map_transport_error(&self, err: reqwest::Error) -> AIError {
        if err.is_timeout() {
            AIError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if err.is_connect() {
            AIError::network(format!("Connection failed: {}", err))
        } else {
            AIError::network(err.to_string())
        }
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let retry_after_header = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok());
        let error_body = response.text().await.unwrap_or_default();

        Err(Self::classify_error(status, &error_body, retry_after_header))
    }

    /// Maps an error response to an `AIError`.
    fn classify_error(status: StatusCode, body: &str, retry_after: Option<u32>) -> AIError {
        let detail = serde_json::from_str::<OpenAIErrorEnvelope>(body)
            .map(|envelope| envelope.error)
            .ok();
        let code = detail
            .as_ref()
            .and_then(|d| d.code.clone().or_else(|| d.error_type.clone()))
            .unwrap_or_default();
        let message = detail
            .as_ref()
            .and_then(|d| d.message.clone())
            .unwrap_or_else(|| body.to_string());

        match code.as_str() {
            "insufficient_quota" => return AIError::QuotaExceeded,
            "rate_limit_exceeded" => {
                return AIError::rate_limited(
                    retry_after.unwrap_or_else(|| Self::parse_retry_after(&message)),
                )
            }
            "invalid_api_key" => return AIError::InvalidCredential,
            "context_length_exceeded" => return AIError::ContextTooLong,
            _ => {}
        }

        match status.as_u16() {
            401 | 403 => AIError::InvalidCredential,
            429 => AIError::rate_limited(
                retry_after.unwrap_or_else(|| Self::parse_retry_after(&message)),
            ),
            400 if message.contains("maximum context length") => AIError::ContextTooLong,
            400 | 404 | 422 => AIError::InvalidRequest(message),
            500..=599 => AIError::overloaded(format!("Server error {}: {}", status, message)),
            _ => AIError::network(format!("Unexpected status {}: {}", status, message)),
        }
    }

    /// Extracts "try again in Ns" from an error message.
    fn parse_retry_after(message: &str) -> u32 {
        message
            .find("try again in ")
            .map(|idx| &message[idx + "try again in ".len()..])
            .and_then(|rest| {
                let end = rest
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(rest.len());
                rest[..end].parse::<u32>().ok()
            })
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
    }

    /// Parses a successful response body.
    async fn parse_response(response: Response) -> Result<CompletionResponse, AIError> {
        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        Self::into_completion(openai_response)
    }

    fn into_completion(openai_response: OpenAIResponse) -> Result<CompletionResponse, AIError> {
        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        };
        let content = choice.message.content.unwrap_or_default();

        if finish_reason == FinishReason::ContentFilter && content.trim().is_empty() {
            return Err(AIError::content_filtered("response blocked by content filter"));
        }

        let usage = openai_response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            usage,
            model: openai_response.model,
            finish_reason,
        })
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let body = self.to_openai_request(&request);
        let response = with_retry(&self.retry, "openai", || self.attempt(&body)).await?;

        tracing::debug!(
            session_id = %request.metadata.session_id,
            trace_id = %request.metadata.trace_id,
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "OpenAI completion finished"
        );
        Ok(response)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model)
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorEnvelope {
    error: OpenAIErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::ports::{Message, RequestMetadata};

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("gpt-4o")
            .with_base_url("https://custom.api.com/")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn request_maps_roles_and_parameters() {
        let provider = OpenAIProvider::new(OpenAIConfig::new("k")).unwrap();
        let request = CompletionRequest::new(RequestMetadata::new(SessionId::new(), "t"))
            .with_messages(vec![Message::system("sys"), Message::user("hi")])
            .with_max_tokens(500)
            .with_temperature(0.7);

        let body = serde_json::to_value(provider.to_openai_request(&request)).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["max_tokens"], 500);
    }

    #[test]
    fn provider_info_reports_model() {
        let provider =
            OpenAIProvider::new(OpenAIConfig::new("test").with_model("gpt-4o-mini")).unwrap();
        let info = provider.provider_info();
        assert_eq!(info.name, "openai");
        assert_eq!(info.model, "gpt-4o-mini");
    }

    #[test]
    fn insufficient_quota_maps_to_quota_exceeded() {
        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":"insufficient_quota"}}"#;
        let err = OpenAIProvider::classify_error(StatusCode::TOO_MANY_REQUESTS, body, None);
        assert!(matches!(err, AIError::QuotaExceeded));
    }

    #[test]
    fn rate_limit_uses_header_then_message() {
        let body = r#"{"error":{"message":"Rate limit reached. Please try again in 7s.","code":"rate_limit_exceeded"}}"#;
        let err = OpenAIProvider::classify_error(StatusCode::TOO_MANY_REQUESTS, body, Some(3));
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 3 }));

        let err = OpenAIProvider::classify_error(StatusCode::TOO_MANY_REQUESTS, body, None);
        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 7 }));
    }

    #[test]
    fn invalid_key_maps_to_invalid_credential() {
        let body = r#"{"error":{"message":"Incorrect API key","code":"invalid_api_key"}}"#;
        let err = OpenAIProvider::classify_error(StatusCode::UNAUTHORIZED, body, None);
        assert!(matches!(err, AIError::InvalidCredential));
    }

    #[test]
    fn context_length_maps_to_context_too_long() {
        let body = r#"{"error":{"message":"This model's maximum context length is 4097 tokens","code":"context_length_exceeded"}}"#;
        let err = OpenAIProvider::classify_error(StatusCode::BAD_REQUEST, body, None);
        assert!(matches!(err, AIError::ContextTooLong));
    }

    #[test]
    fn server_errors_are_overloaded() {
        let err = OpenAIProvider::classify_error(StatusCode::SERVICE_UNAVAILABLE, "down", None);
        assert!(matches!(err, AIError::Overloaded { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn unparseable_400_is_invalid_request() {
        let err = OpenAIProvider::classify_error(StatusCode::BAD_REQUEST, "nope", None);
        assert!(matches!(err, AIError::InvalidRequest(ref m) if m == "nope"));
    }

    #[test]
    fn parse_retry_after_default() {
        assert_eq!(OpenAIProvider::parse_retry_after("Something went wrong"), 30);
        assert_eq!(OpenAIProvider::parse_retry_after("try again in 12 seconds"), 12);
    }

    #[test]
    fn response_is_converted() {
        let raw = r#"{"model":"gpt-3.5-turbo","choices":[{"message":{"role":"assistant","content":"I hear you."},"finish_reason":"stop"}],"usage":{"prompt_tokens":12,"completion_tokens":4}}"#;
        let parsed: OpenAIResponse = serde_json::from_str(raw).unwrap();
        let completion = OpenAIProvider::into_completion(parsed).unwrap();

        assert_eq!(completion.content, "I hear you.");
        assert_eq!(completion.finish_reason, FinishReason::Stop);
        assert_eq!(completion.usage.total_tokens, 16);
    }

    #[test]
    fn filtered_empty_response_is_an_error() {
        let raw = r#"{"model":"m","choices":[{"message":{"role":"assistant","content":null},"finish_reason":"content_filter"}]}"#;
        let parsed: OpenAIResponse = serde_json::from_str(raw).unwrap();
        let err = OpenAIProvider::into_completion(parsed).unwrap_err();
        assert!(matches!(err, AIError::ContentFiltered { .. }));
    }

    #[test]
    fn empty_choices_is_parse_error() {
        let parsed: OpenAIResponse =
            serde_json::from_str(r#"{"model":"m","choices":[]}"#).unwrap();
        assert!(matches!(
            OpenAIProvider::into_completion(parsed),
            Err(AIError::Parse(_))
        ));
    }
}
