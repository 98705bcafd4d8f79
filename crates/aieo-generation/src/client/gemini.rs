//! REST client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use aieo_core::config::GenerationConfig;
use aieo_entity::result::Source;

use super::{Generation, GenerationError, TextGenerator};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("aieo-audit/", env!("CARGO_PKG_VERSION"));

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    grounding: bool,
    json_response: bool,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("grounding", &self.grounding)
            .field("json_response", &self.json_response)
            .finish()
    }
}

impl GeminiClient {
    /// Creates a client from the `generation` config section.
    ///
    /// A missing API key is not an error here; every call then fails with
    /// [`GenerationError::MissingApiKey`].
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if config.request_timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_seconds));
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
            grounding: config.grounding,
            json_response: config.json_response,
        })
    }

    fn request_body<'a>(&self, prompt: &'a str) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            tools: self
                .grounding
                .then(|| vec![Tool { google_search: GoogleSearch {} }]),
            generation_config: self.json_response.then_some(GenerationSettings {
                response_mime_type: "application/json",
            }),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, model: &str) -> Result<Generation, GenerationError> {
        if self.api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!(model, prompt_len = prompt.len(), "Calling generative API");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(model, status.as_u16(), &body));
        }

        let body: GenerateContentResponse = response.json().await?;
        into_generation(model, body)
    }
}

/// Map a non-success response to a [`GenerationError`].
pub fn classify_failure(model: &str, status: u16, body: &str) -> GenerationError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error);
    let provider_status = envelope
        .as_ref()
        .and_then(|e| e.status.clone())
        .unwrap_or_default();
    let message = envelope
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.chars().take(300).collect());

    let lowered = message.to_lowercase();
    let model = model.to_string();

    if status == 429
        || provider_status == "RESOURCE_EXHAUSTED"
        || lowered.contains("exhausted")
        || lowered.contains("rate limit")
    {
        GenerationError::RateLimited { model, message }
    } else if status == 503
        || provider_status == "UNAVAILABLE"
        || provider_status == "SERVICE_UNAVAILABLE"
    {
        GenerationError::Unavailable { model, message }
    } else {
        GenerationError::Api {
            model,
            status,
            message,
        }
    }
}

/// Collect the first candidate's text and web citations.
fn into_generation(
    model: &str,
    body: GenerateContentResponse,
) -> Result<Generation, GenerationError> {
    let Some(candidate) = body.candidates.into_iter().next() else {
        return Err(GenerationError::EmptyResponse {
            model: model.to_string(),
        });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse {
            model: model.to_string(),
        });
    }

    let citations = candidate
        .grounding_metadata
        .map(|m| {
            m.grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .map(|web| Source {
                    title: web.title.unwrap_or_default(),
                    uri: web.uri.unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Generation { text, citations })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationSettings>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSettings {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    title: Option<String>,
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<Generation, GenerationError> {
        into_generation("gemini-test", serde_json::from_value(value).expect("response"))
    }

    #[test]
    fn test_classify_http_429() {
        let err = classify_failure("m", 429, "");
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_classify_resource_exhausted_status() {
        let body = json!({
            "error": { "code": 400, "message": "Quota hit", "status": "RESOURCE_EXHAUSTED" }
        })
        .to_string();
        assert!(classify_failure("m", 400, &body).is_rate_limited());
    }

    #[test]
    fn test_classify_rate_limit_message() {
        let body = json!({ "error": { "message": "Rate limit reached for requests" } }).to_string();
        assert!(classify_failure("m", 400, &body).is_rate_limited());
    }

    #[test]
    fn test_classify_unavailable() {
        let body = json!({
            "error": { "code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE" }
        })
        .to_string();
        let err = classify_failure("m", 503, &body);
        assert!(err.should_fall_back());
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_classify_other_status() {
        let err = classify_failure("m", 404, "not json");
        match err {
            GenerationError::Api {
                status, message, ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "not json");
            }
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn test_text_parts_are_joined_and_citations_filtered() {
        let generation = parse(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "title": "Acme", "uri": "https://acme.com" } },
                        { "retrievedContext": { "uri": "gs://x" } },
                        { "web": { "uri": "https://news.example" } }
                    ]
                }
            }]
        }))
        .expect("generation");

        assert_eq!(generation.text, "{\"a\":1}");
        assert_eq!(generation.citations.len(), 2);
        assert_eq!(generation.citations[0].title, "Acme");
        assert_eq!(generation.citations[1].title, "");
        assert_eq!(generation.citations[1].uri, "https://news.example");
    }

    #[test]
    fn test_missing_grounding_gives_no_citations() {
        let generation = parse(json!({
            "candidates": [{ "content": { "parts": [{ "text": "{}" }] } }]
        }))
        .expect("generation");
        assert!(generation.citations.is_empty());
    }

    #[test]
    fn test_no_candidates_is_empty_response() {
        let err = parse(json!({ "promptFeedback": { "blockReason": "SAFETY" } }))
            .expect_err("empty");
        assert!(matches!(err, GenerationError::EmptyResponse { .. }));
    }

    #[test]
    fn test_request_body_shape() {
        let config = GenerationConfig {
            api_key: "key".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::new(&config).expect("client");
        let body = serde_json::to_value(client.request_body("hello")).expect("body");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert!(body["tools"][0]["google_search"].is_object());
        assert!(body.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = GeminiClient::new(&GenerationConfig::default()).expect("client");
        let err = client.generate("hello", "m").await.expect_err("no key");
        assert!(matches!(err, GenerationError::MissingApiKey));
    }
}
