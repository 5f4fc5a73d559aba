// Google Gemini API provider implementation
//
// Gemini uses a different message format than the Anthropic-style API:
// "model" instead of "assistant", and the system prompt travels as a
// separate systemInstruction block.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::{with_retry, ApiStatusError, RetryPolicy};
use super::types::{ProviderRequest, ProviderResponse};
use super::LlmProvider;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Google Gemini API provider
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    retry: RetryPolicy,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    /// Set the retry policy (from the `[retry]` config section)
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Create with custom default model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Override the API base URL (used by tests against a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Convert ProviderRequest to Gemini API format
    fn to_gemini_request(&self, request: &ProviderRequest) -> GeminiRequest {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model.clone()
        };

        let contents: Vec<GeminiContent> = request
            .messages
            .iter()
            .map(|msg| {
                // Gemini uses "model" instead of "assistant"
                let role = if msg.role == "assistant" {
                    "model"
                } else {
                    &msg.role
                };

                GeminiContent {
                    role: role.to_string(),
                    parts: vec![GeminiPart {
                        text: msg.content.clone(),
                    }],
                }
            })
            .collect();

        let system_instruction = request.system.as_ref().map(|text| GeminiSystemInstruction {
            parts: vec![GeminiPart { text: text.clone() }],
        });

        let generation_config = GeminiGenerationConfig {
            temperature: request.temperature,
            max_output_tokens: Some(request.max_tokens as i32),
        };

        GeminiRequest {
            model,
            contents,
            system_instruction,
            generation_config: Some(generation_config),
        }
    }

    /// Convert Gemini response to ProviderResponse
    fn from_gemini_response(
        &self,
        response: GeminiResponse,
        model: String,
    ) -> Result<ProviderResponse> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .context("Gemini returned no candidates in response")?;

        let content = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        Ok(ProviderResponse {
            model,
            content,
            stop_reason: candidate.finish_reason,
            provider: "gemini".to_string(),
        })
    }

    /// Send a single message request (no retry)
    async fn send_message_once(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let gemini_request = self.to_gemini_request(request);
        let model = gemini_request.model.clone();

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        tracing::debug!("Sending request to Gemini API for model {}", model);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&gemini_request)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ApiStatusError::new("Gemini", status.as_u16(), error_body).into());
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        self.from_gemini_response(gemini_response, model)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        with_retry(&self.retry, || self.send_message_once(request)).await
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

// Gemini API types

#[derive(Debug, Clone, Serialize)]
struct GeminiRequest {
    #[serde(skip)]
    model: String, // Used in URL, not in body
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "systemInstruction")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "generationConfig")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    role: String, // "user" or "model"
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::types::ChatMessage;

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new("test-key".to_string());
        assert!(provider.is_ok());
    }

    #[test]
    fn test_provider_name() {
        let provider = GeminiProvider::new("test-key".to_string()).unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_default_model() {
        let provider = GeminiProvider::new("test-key".to_string()).unwrap();
        assert_eq!(provider.default_model(), "gemini-1.5-pro");
    }

    #[test]
    fn test_custom_model() {
        let provider = GeminiProvider::new("test-key".to_string())
            .unwrap()
            .with_model("gemini-1.5-flash");
        assert_eq!(provider.default_model(), "gemini-1.5-flash");
    }

    #[test]
    fn test_assistant_role_mapped_to_model() {
        let provider = GeminiProvider::new("test-key".to_string()).unwrap();
        let request = ProviderRequest::new(vec![
            ChatMessage::user("What does X do?"),
            ChatMessage::assistant("X parses input."),
        ]);
        let gemini = provider.to_gemini_request(&request);
        assert_eq!(gemini.contents[0].role, "user");
        assert_eq!(gemini.contents[1].role, "model");
    }

    #[test]
    fn test_system_prompt_becomes_system_instruction() {
        let provider = GeminiProvider::new("test-key".to_string()).unwrap();
        let request =
            ProviderRequest::new(vec![ChatMessage::user("hi")]).with_system("You review code.");
        let gemini = provider.to_gemini_request(&request);
        let instruction = gemini.system_instruction.expect("system instruction set");
        assert_eq!(instruction.parts[0].text, "You review code.");
    }

    #[test]
    fn test_response_parts_joined() {
        let provider = GeminiProvider::new("test-key".to_string()).unwrap();
        let response = GeminiResponse {
            candidates: vec![GeminiCandidate {
                content: GeminiContent {
                    role: "model".to_string(),
                    parts: vec![
                        GeminiPart {
                            text: "Hello ".to_string(),
                        },
                        GeminiPart {
                            text: "world".to_string(),
                        },
                    ],
                },
                finish_reason: Some("STOP".to_string()),
            }],
        };
        let parsed = provider
            .from_gemini_response(response, "gemini-1.5-pro".to_string())
            .unwrap();
        assert_eq!(parsed.content, "Hello world");
        assert_eq!(parsed.provider, "gemini");
    }

    #[tokio::test]
    async fn test_send_message_wire_format() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/models/gemini-1.5-pro:generateContent?key=test-key",
            )
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "What does X do?"}]}],
                "systemInstruction": {"parts": [{"text": "You answer questions."}]}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "X parses input."}]}, "finishReason": "STOP"}]}"#,
            )
            .create_async()
            .await;

        let provider = GeminiProvider::new("test-key".to_string())
            .unwrap()
            .with_base_url(server.url());
        let request = ProviderRequest::new(vec![ChatMessage::user("What does X do?")])
            .with_system("You answer questions.");

        let response = provider.send_message(&request).await.unwrap();
        assert_eq!(response.content, "X parses input.");
        assert_eq!(response.stop_reason.as_deref(), Some("STOP"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_key_fails_without_retry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/models/gemini-1.5-pro:generateContent?key=bad-key",
            )
            .with_status(401)
            .with_body(r#"{"error": {"message": "API key not valid"}}"#)
            .expect(1)
            .create_async()
            .await;

        let provider = GeminiProvider::new("bad-key".to_string())
            .unwrap()
            .with_base_url(server.url());
        let request = ProviderRequest::new(vec![ChatMessage::user("q")]);

        let err = provider.send_message(&request).await.unwrap_err();
        assert!(err.to_string().contains("401"));
        mock.assert_async().await;
    }

    #[test]
    fn test_empty_candidates_is_error() {
        let provider = GeminiProvider::new("test-key".to_string()).unwrap();
        let response = GeminiResponse { candidates: vec![] };
        let result = provider.from_gemini_response(response, "gemini-1.5-pro".to_string());
        assert!(result.is_err());
    }
}
