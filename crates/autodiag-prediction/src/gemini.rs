//! HTTP client for the hosted `generateContent` endpoint.

use async_trait::async_trait;
use autodiag_errors::PredictionError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::capability::InferenceCapability;
use crate::credential::ApiKey;
use crate::request::InferenceRequest;

/// Header carrying the credential.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest slice of an error body quoted in a transport error.
const ERROR_BODY_LIMIT: usize = 200;

/// Capability backed by the `generateContent` REST endpoint.
///
/// No request timeout is set: a call that never answers keeps its prediction
/// running.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    endpoint: String,
}

impl GeminiClient {
    /// Client for `endpoint`, e.g. `https://generativelanguage.googleapis.com`.
    ///
    /// # Errors
    ///
    /// [`PredictionError::Configuration`] when the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, PredictionError> {
        let http = Client::builder()
            .user_agent(concat!("autodiag/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PredictionError::configuration(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for `model`.
    pub fn url_for(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.endpoint)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [TextPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
    temperature: f64,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> Result<String, PredictionError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| PredictionError::malformed("response contained no candidates"))?;
        let text: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            return Err(PredictionError::malformed("candidate contained no text"));
        }
        Ok(text)
    }
}

#[async_trait]
impl InferenceCapability for GeminiClient {
    async fn generate(
        &self,
        key: &ApiKey,
        request: &InferenceRequest,
    ) -> Result<String, PredictionError> {
        let url = self.url_for(&request.model);
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [TextPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.response_schema,
                temperature: request.temperature,
            },
        };

        debug!(model = %request.model, "Requesting prediction");
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| PredictionError::transport(format!("request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PredictionError::transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Inference capability returned an error status");
            let snippet: String = text.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(PredictionError::transport(format!(
                "capability returned {} {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
                snippet.trim()
            )));
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| PredictionError::malformed(format!("invalid response envelope: {e}")))?;
        envelope.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_strips_trailing_slash() -> Result<(), PredictionError> {
        let client = GeminiClient::new("http://localhost:8080/")?;
        assert_eq!(
            client.url_for("gemini-2.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
        Ok(())
    }

    #[test]
    fn test_text_parts_are_joined() -> Result<(), Box<dyn std::error::Error>> {
        let envelope: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#,
        )?;
        assert_eq!(envelope.into_text()?, r#"{"a":1}"#);
        Ok(())
    }

    #[test]
    fn test_empty_envelope_is_schema_error() {
        let err = GenerateContentResponse::default().into_text().err();
        assert!(matches!(err, Some(PredictionError::SchemaValidation(_))));

        let blank = GenerateContentResponse {
            candidates: vec![Candidate::default()],
        };
        assert!(matches!(
            blank.into_text(),
            Err(PredictionError::SchemaValidation(_))
        ));
    }

    #[test]
    fn test_request_body_shape() -> Result<(), serde_json::Error> {
        let schema = serde_json::json!({"type": "OBJECT"});
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [TextPart { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &schema,
                temperature: 0.2,
            },
        };
        let json = serde_json::to_value(&body)?;
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "OBJECT");
        Ok(())
    }
}
