//! AI Gateway client — the single point of entry for all generative calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to the Generative Language
//! API directly. Bindings build a neutral [`GatewayRequest`] and go through
//! [`AiGateway`]; only this module knows the wire format.
//!
//! Models are intentionally hardcoded to prevent accidental drift: the
//! flash tier handles fetch/extraction, the pro tier handles parsing,
//! generation, and scanning.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod decode;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Flash tier — JD fetch and keyword extraction.
pub const FLASH_MODEL: &str = "gemini-3-flash-preview";
/// Pro tier — resume parsing, generation, and ATS scanning.
pub const PRO_MODEL: &str = "gemini-3-pro-preview";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Gateway returned empty content")]
    EmptyContent,
}

/// One part of a gateway request.
#[derive(Debug, Clone)]
pub enum RequestPart {
    Text(String),
    /// Raw binary payload; base64-encoded at the wire boundary.
    InlineData { mime_type: String, data: Bytes },
}

/// A neutral, provider-agnostic request: model id, ordered content parts,
/// optional structured-output schema, optional web-search tool flag.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub model: &'static str,
    pub parts: Vec<RequestPart>,
    pub response_schema: Option<Value>,
    pub web_search: bool,
}

impl GatewayRequest {
    pub fn text(model: &'static str, prompt: String) -> Self {
        Self {
            model,
            parts: vec![RequestPart::Text(prompt)],
            response_schema: None,
            web_search: false,
        }
    }

    /// Prepends an inline binary part (binary-first part order, then the
    /// instruction text).
    pub fn with_inline_data(mut self, mime_type: String, data: Bytes) -> Self {
        self.parts.insert(0, RequestPart::InlineData { mime_type, data });
        self
    }

    /// Requests schema-constrained JSON output.
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Enables the gateway's web-browsing tool for this call.
    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }
}

/// The gateway's reply: generated text plus optional grounding source.
#[derive(Debug, Clone)]
pub struct GatewayReply {
    pub text: String,
    /// First grounding citation URI, when the gateway browsed the web.
    pub grounding_uri: Option<String>,
}

/// Gateway collaborator seam. Bindings depend on this trait so tests can
/// substitute a stub without any network access.
#[async_trait]
pub trait AiGateway: Send + Sync {
    async fn generate(&self, request: GatewayRequest) -> Result<GatewayReply, GatewayError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire format (Generative Language generateContent REST API)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool>>,
}

#[derive(Debug, Serialize)]
struct WireContent {
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<WireInlineData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    mime_type: String,
    /// Base64-encoded payload.
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireTool {
    google_search: Value,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    content: Option<WireCandidateContent>,
    grounding_metadata: Option<WireGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct WireCandidateContent {
    #[serde(default)]
    parts: Vec<WireResponsePart>,
}

#[derive(Debug, Deserialize)]
struct WireResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<WireGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct WireGroundingChunk {
    web: Option<WireWebSource>,
}

#[derive(Debug, Deserialize)]
struct WireWebSource {
    uri: Option<String>,
}

impl WireResponse {
    /// Concatenated text of the first candidate's text parts.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    /// First grounding citation URI, if the model browsed.
    fn grounding_uri(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .and_then(|m| m.grounding_chunks.first())
            .and_then(|chunk| chunk.web.as_ref())
            .and_then(|web| web.uri.clone())
    }
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: WireErrorBody,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The production gateway client. Wraps the generateContent REST API with
/// retry/backoff — the gateway side owns retry policy, callers never loop.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    fn wire_request(request: &GatewayRequest) -> WireRequest {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                RequestPart::Text(text) => WirePart {
                    text: Some(text.clone()),
                    inline_data: None,
                },
                RequestPart::InlineData { mime_type, data } => WirePart {
                    text: None,
                    inline_data: Some(WireInlineData {
                        mime_type: mime_type.clone(),
                        data: BASE64.encode(data),
                    }),
                },
            })
            .collect();

        WireRequest {
            contents: vec![WireContent { parts }],
            generation_config: request.response_schema.clone().map(|schema| {
                WireGenerationConfig {
                    response_mime_type: "application/json",
                    response_schema: schema,
                }
            }),
            tools: request.web_search.then(|| {
                vec![WireTool {
                    google_search: Value::Object(Default::default()),
                }]
            }),
        }
    }
}

#[async_trait]
impl AiGateway for GeminiClient {
    /// Makes one generateContent call. Retries on 429 and 5xx with
    /// exponential backoff; other failures return immediately.
    async fn generate(&self, request: GatewayRequest) -> Result<GatewayReply, GatewayError> {
        let url = format!("{GEMINI_API_BASE}/{}:generateContent", request.model);
        let body = Self::wire_request(&request);

        let mut last_error: Option<GatewayError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Gateway call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(GatewayError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Gateway API returned {}: {}", status, body);
                last_error = Some(GatewayError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<WireError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(GatewayError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let wire: WireResponse = response.json().await.map_err(GatewayError::Http)?;

            let text = wire.text();
            // "Success but semantically empty" is a failure the caller must
            // see, not a blank entity to advance the wizard with.
            if text.trim().is_empty() {
                return Err(GatewayError::EmptyContent);
            }

            debug!(
                model = request.model,
                chars = text.len(),
                grounded = wire.grounding_uri().is_some(),
                "Gateway call succeeded"
            );

            return Ok(GatewayReply {
                grounding_uri: wire.grounding_uri(),
                text,
            });
        }

        Err(last_error.unwrap_or(GatewayError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_request_serializes_inline_data_base64() {
        let request = GatewayRequest::text(PRO_MODEL, "Parse this resume.".to_string())
            .with_inline_data(
                "application/pdf".to_string(),
                Bytes::from_static(&[0x25, 0x50, 0x44, 0x46]),
            );
        let wire = GeminiClient::wire_request(&request);
        let json = serde_json::to_value(&wire).unwrap();

        // Inline data comes first, base64-encoded, followed by the text part.
        assert_eq!(
            json["contents"][0]["parts"][0]["inlineData"]["data"],
            BASE64.encode([0x25, 0x50, 0x44, 0x46])
        );
        assert_eq!(
            json["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "application/pdf"
        );
        assert_eq!(json["contents"][0]["parts"][1]["text"], "Parse this resume.");
    }

    #[test]
    fn test_wire_request_omits_unused_config() {
        let request = GatewayRequest::text(FLASH_MODEL, "hello".to_string());
        let json = serde_json::to_value(GeminiClient::wire_request(&request)).unwrap();
        assert!(json.get("generationConfig").is_none());
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_wire_request_web_search_tool() {
        let request = GatewayRequest::text(FLASH_MODEL, "fetch".to_string()).with_web_search();
        let json = serde_json::to_value(GeminiClient::wire_request(&request)).unwrap();
        assert!(json["tools"][0]["googleSearch"].is_object());
    }

    #[test]
    fn test_wire_response_text_and_grounding() {
        let raw = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "Senior PM role"}, {"text": " at Acme"}]},
                "groundingMetadata": {
                    "groundingChunks": [{"web": {"uri": "https://jobs.acme.com/pm"}}]
                }
            }]
        }"#;
        let wire: WireResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(wire.text(), "Senior PM role at Acme");
        assert_eq!(wire.grounding_uri().unwrap(), "https://jobs.acme.com/pm");
    }

    #[test]
    fn test_wire_response_without_candidates_is_empty() {
        let wire: WireResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(wire.text(), "");
        assert!(wire.grounding_uri().is_none());
    }
}
