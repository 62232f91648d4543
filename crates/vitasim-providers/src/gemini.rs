//! HTTP provider for the Gemini `generateContent` endpoint.
//!
//! Maps a [`GenerateRequest`] onto the wire format:
//! - history turns → `contents` (roles `user` / `model`), new message last
//! - instruction → `systemInstruction`
//! - output hint + sampling → `generationConfig`
//! - safety thresholds → `safetySettings`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use vitasim_core::config::ProviderConfig;
use vitasim_core::error::ConfigError;
use vitasim_core::types::{Role, SafetySetting, Turn};

use crate::error::ProviderError;
use crate::traits::{GenerateRequest, LlmProvider};

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig<'a>,
    safety_settings: &'a [SafetySetting],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

impl<'a> Content<'a> {
    fn turn(role: Role, text: &'a str) -> Self {
        Content {
            role: Some(wire_role(role)),
            parts: [Part { text }],
        }
    }

    fn instruction(text: &'a str) -> Self {
        Content {
            role: None,
            parts: [Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    /// Set on thinking-model summary parts, which are not part of the answer.
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

fn build_request_body<'a>(request: &GenerateRequest<'a>) -> GenerateContentRequest<'a> {
    let config = request.configuration;

    let mut contents: Vec<Content<'a>> = request
        .history
        .iter()
        .map(|turn: &'a Turn| Content::turn(turn.role(), turn.text()))
        .collect();
    contents.push(Content::turn(Role::User, request.message));

    GenerateContentRequest {
        contents,
        system_instruction: Content::instruction(config.instruction()),
        generation_config: GenerationConfig {
            response_mime_type: config.response_mime_type(),
            temperature: config.temperature(),
            max_output_tokens: config.max_output_tokens(),
        },
        safety_settings: config.safety_settings(),
    }
}

/// Pull the answer text out of a decoded response.
fn extract_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    let block_reason = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(match block_reason {
            Some(reason) => ProviderError::Blocked(reason),
            None => ProviderError::Parse("no candidates in response".to_string()),
        });
    };

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text)
        .collect();

    if !text.is_empty() {
        return Ok(text);
    }

    let finish_reason = candidate
        .finish_reason
        .unwrap_or_else(|| "unknown".to_string());
    if finish_reason == "SAFETY" {
        Err(ProviderError::Blocked(finish_reason))
    } else {
        Err(ProviderError::EmptyResponse(finish_reason))
    }
}

// ─────────────────────────────────────────────
// GeminiProvider
// ─────────────────────────────────────────────

/// Talks to `{api_base}/models/{model}:generateContent`.
///
/// The model comes from the request's configuration id. No overall request
/// timeout is set; callers wanting a deadline wrap the call themselves.
pub struct GeminiProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://generativelanguage.googleapis.com/v1beta"`).
    api_base: String,
    /// Sent in the `x-goog-api-key` header.
    api_key: String,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiProvider {
    /// Build a provider from the user's config.
    ///
    /// Fails with [`ConfigError::MissingApiKey`] when no key is configured.
    pub fn new(config: &ProviderConfig) -> Result<Self, ConfigError> {
        if !config.is_configured() {
            return Err(ConfigError::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(GeminiProvider {
            client,
            api_base: config.api_base_or_default().to_string(),
            api_key: config.api_key.trim().to_string(),
        })
    }

    /// Full `generateContent` URL for `model`.
    fn generate_url(&self, model: &str) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/models/{}:generateContent", base, model)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ProviderError> {
        let model = request.configuration.id();
        let body = build_request_body(request);
        let url = self.generate_url(model);

        debug!(
            model = %model,
            history = request.history.len(),
            "Calling Gemini"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!(model = %model, "Gemini rate limit hit");
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            warn!(model = %model, status = %status, body = %body, "Gemini API error");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if let Some(usage) = &decoded.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                completion_tokens = usage.candidates_token_count,
                "Gemini response received"
            );
        }

        extract_text(decoded)
    }

    fn display_name(&self) -> &str {
        "Gemini"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use vitasim_core::types::{HarmBlockThreshold, HarmCategory, SessionConfiguration};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

    fn make_provider(api_base: &str) -> GeminiProvider {
        let config = ProviderConfig {
            api_key: "test-key-123".to_string(),
            api_base: Some(api_base.to_string()),
        };
        GeminiProvider::new(&config).unwrap()
    }

    fn make_configuration() -> SessionConfiguration {
        SessionConfiguration::new("gemini-2.5-flash", "You are a patient.").unwrap()
    }

    fn text_response(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 4 }
        })
    }

    // ── Unit tests ──

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = GeminiProvider::new(&ProviderConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_generate_url_trailing_slash() {
        let provider = make_provider("https://example.com/v1beta/");
        assert_eq!(
            provider.generate_url("gemini-2.5-flash"),
            "https://example.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = make_provider("https://example.com");
        let debug = format!("{provider:?}");
        assert!(!debug.contains("test-key-123"));
    }

    #[test]
    fn test_request_body_shape() {
        let configuration = make_configuration()
            .with_temperature(Some(0.4))
            .with_safety_settings(vec![SafetySetting::new(
                HarmCategory::DangerousContent,
                HarmBlockThreshold::BlockMediumAndAbove,
            )]);
        let history = vec![Turn::user("example q"), Turn::assistant("example a")];
        let request = GenerateRequest {
            configuration: &configuration,
            history: &history,
            message: "Start case 1",
        };

        let body = serde_json::to_value(build_request_body(&request)).unwrap();

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "example a");
        assert_eq!(contents[2]["parts"][0]["text"], "Start case 1");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are a patient.");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["temperature"], 0.4);
        assert!(body["generationConfig"].get("maxOutputTokens").is_none());
        assert_eq!(
            body["safetySettings"][0]["category"],
            "HARM_CATEGORY_DANGEROUS_CONTENT"
        );
    }

    #[test]
    fn test_extract_text_skips_thoughts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "{\"a\":" },
                    { "text": "1}" }
                ]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_text_prompt_blocked() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        assert!(matches!(
            extract_text(response),
            Err(ProviderError::Blocked(reason)) if reason == "SAFETY"
        ));
    }

    #[test]
    fn test_extract_text_empty_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "finishReason": "MAX_TOKENS" }]
        }))
        .unwrap();
        assert!(matches!(
            extract_text(response),
            Err(ProviderError::EmptyResponse(reason)) if reason == "MAX_TOKENS"
        ));
    }

    // ── Integration tests with mock server ──

    #[tokio::test]
    async fn test_generate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("{\"a\":1}")))
            .mount(&mock_server)
            .await;

        let provider = make_provider(&mock_server.uri());
        let configuration = make_configuration();
        let request = GenerateRequest {
            configuration: &configuration,
            history: &[],
            message: "Hello",
        };

        let text = provider.generate(&request).await.unwrap();
        assert_eq!(text, "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_generate_sends_history_and_config() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(body_partial_json(serde_json::json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "q1" }] },
                    { "role": "model", "parts": [{ "text": "a1" }] },
                    { "role": "user", "parts": [{ "text": "next" }] }
                ],
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("ok")))
            .mount(&mock_server)
            .await;

        let provider = make_provider(&mock_server.uri());
        let configuration = make_configuration();
        let history = vec![Turn::user("q1"), Turn::assistant("a1")];
        let request = GenerateRequest {
            configuration: &configuration,
            history: &history,
            message: "next",
        };

        // If the body matcher fails, wiremock returns 404 → we'd get an error
        assert_eq!(provider.generate(&request).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "code": 400, "message": "API key not valid" }
            })))
            .mount(&mock_server)
            .await;

        let provider = make_provider(&mock_server.uri());
        let configuration = make_configuration();
        let request = GenerateRequest {
            configuration: &configuration,
            history: &[],
            message: "Hello",
        };

        let err = provider.generate(&request).await.unwrap_err();
        match err {
            ProviderError::Api { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("API key not valid"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let provider = make_provider(&mock_server.uri());
        let configuration = make_configuration();
        let request = GenerateRequest {
            configuration: &configuration,
            history: &[],
            message: "Hello",
        };

        assert!(matches!(
            provider.generate(&request).await,
            Err(ProviderError::RateLimited)
        ));
    }

    #[tokio::test]
    async fn test_generate_network_error() {
        // Point to a port that's not listening
        let provider = make_provider("http://127.0.0.1:1");
        let configuration = make_configuration();
        let request = GenerateRequest {
            configuration: &configuration,
            history: &[],
            message: "Hello",
        };

        assert!(matches!(
            provider.generate(&request).await,
            Err(ProviderError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let provider = make_provider(&mock_server.uri());
        let configuration = make_configuration();
        let request = GenerateRequest {
            configuration: &configuration,
            history: &[],
            message: "Hello",
        };

        assert!(matches!(
            provider.generate(&request).await,
            Err(ProviderError::Parse(_))
        ));
    }
}
