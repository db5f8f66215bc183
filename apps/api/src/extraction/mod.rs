//! Stage 1–2 bindings: fetch a job description through the gateway's
//! web-search tool, and extract categorized ATS keywords from JD text.

use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::prompts::{EXTRACT_KEYWORDS_PROMPT_TEMPLATE, FETCH_JD_PROMPT_TEMPLATE};
use crate::llm_client::decode::decode_json;
use crate::llm_client::{AiGateway, GatewayRequest, FLASH_MODEL};
use crate::models::{JobDescription, KeywordSet};

pub mod prompts;

/// Browses a job-posting URL through the gateway and returns the extracted
/// description.
///
/// Empty generated text is a gateway failure, never a blank entity — the
/// wizard must not advance on missing content. When no grounding citation
/// comes back, the requested URL is kept as `source_url` with
/// `source_verified = false` so the fallback stays observable.
pub async fn fetch_jd_from_url(
    gateway: &dyn AiGateway,
    url: &str,
) -> Result<JobDescription, AppError> {
    let prompt = FETCH_JD_PROMPT_TEMPLATE.replace("{url}", url);
    let request = GatewayRequest::text(FLASH_MODEL, prompt).with_web_search();

    let reply = gateway
        .generate(request)
        .await
        .map_err(|e| AppError::Gateway(format!("JD fetch failed: {e}")))?;

    if reply.text.trim().is_empty() {
        return Err(AppError::Gateway(
            "JD fetch returned no content for that URL".to_string(),
        ));
    }

    let source_verified = reply.grounding_uri.is_some();
    let source_url = reply.grounding_uri.unwrap_or_else(|| url.to_string());
    info!(source_verified, "Fetched JD from {source_url}");

    Ok(JobDescription::fetched(reply.text, source_url, source_verified))
}

/// Extracts the six ATS keyword categories from raw JD text.
pub async fn extract_keywords(
    gateway: &dyn AiGateway,
    jd_text: &str,
) -> Result<KeywordSet, AppError> {
    let prompt = EXTRACT_KEYWORDS_PROMPT_TEMPLATE.replace("{jd_text}", jd_text);
    let request = GatewayRequest::text(FLASH_MODEL, prompt).with_schema(keyword_schema());

    let reply = gateway
        .generate(request)
        .await
        .map_err(|e| AppError::Gateway(format!("Keyword extraction failed: {e}")))?;

    let keywords: KeywordSet = decode_json(&reply.text)?;
    info!("Extracted {} keywords", keywords.len());
    Ok(keywords)
}

/// Structured-output schema for keyword extraction: six required string
/// lists, nothing else.
fn keyword_schema() -> Value {
    let string_list = json!({"type": "ARRAY", "items": {"type": "STRING"}});
    json!({
        "type": "OBJECT",
        "properties": {
            "hard_skills": string_list,
            "strategic_skills": string_list,
            "soft_skills": string_list,
            "qualifications": string_list,
            "action_verbs": string_list,
            "jd_phrases": string_list,
        },
        "required": [
            "hard_skills",
            "strategic_skills",
            "soft_skills",
            "qualifications",
            "action_verbs",
            "jd_phrases"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{GatewayError, GatewayReply};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Stub gateway that returns a canned reply and records requests.
    struct StubGateway {
        reply: Result<GatewayReply, &'static str>,
        requests: Mutex<Vec<GatewayRequest>>,
    }

    impl StubGateway {
        fn returning(text: &str, grounding_uri: Option<&str>) -> Self {
            Self {
                reply: Ok(GatewayReply {
                    text: text.to_string(),
                    grounding_uri: grounding_uri.map(String::from),
                }),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                reply: Err(message),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AiGateway for StubGateway {
        async fn generate(&self, request: GatewayRequest) -> Result<GatewayReply, GatewayError> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(message) => Err(GatewayError::Api {
                    status: 503,
                    message: message.to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_jd_marks_grounded_source_verified() {
        let gateway = StubGateway::returning(
            "Senior PM. Requirements: SQL, stakeholder management.",
            Some("https://jobs.acme.com/pm"),
        );
        let jd = fetch_jd_from_url(&gateway, "https://short.link/x").await.unwrap();

        assert!(jd.source_verified);
        assert_eq!(jd.source_url.as_deref(), Some("https://jobs.acme.com/pm"));

        let requests = gateway.requests.lock().unwrap();
        assert!(requests[0].web_search);
        assert_eq!(requests[0].model, FLASH_MODEL);
    }

    #[tokio::test]
    async fn test_fetch_jd_fallback_url_is_unverified() {
        let gateway = StubGateway::returning("Some JD text", None);
        let jd = fetch_jd_from_url(&gateway, "https://jobs.acme.com/pm").await.unwrap();

        assert!(!jd.source_verified);
        assert_eq!(jd.source_url.as_deref(), Some("https://jobs.acme.com/pm"));
    }

    #[tokio::test]
    async fn test_fetch_jd_gateway_failure_is_gateway_error() {
        let gateway = StubGateway::failing("upstream unavailable");
        let result = fetch_jd_from_url(&gateway, "https://jobs.acme.com/pm").await;
        assert!(matches!(result, Err(AppError::Gateway(_))));
    }

    #[tokio::test]
    async fn test_fetch_jd_empty_text_is_retryable_gateway_error() {
        // Structurally successful reply with blank content must not become a
        // blank JobDescription.
        let gateway = StubGateway::returning("   \n", None);
        let result = fetch_jd_from_url(&gateway, "https://jobs.acme.com/pm").await;
        assert!(matches!(result, Err(AppError::Gateway(_))));
    }

    #[tokio::test]
    async fn test_extract_keywords_decodes_six_lists() {
        let gateway = StubGateway::returning(
            r#"```json
            {
                "hard_skills": ["SQL"],
                "strategic_skills": ["stakeholder management"],
                "soft_skills": [],
                "qualifications": [],
                "action_verbs": [],
                "jd_phrases": ["Senior PM"]
            }
            ```"#,
            None,
        );

        let keywords =
            extract_keywords(&gateway, "Senior PM, SQL, stakeholder management").await.unwrap();

        assert_eq!(keywords.hard_skills, vec!["SQL"]);
        assert_eq!(keywords.strategic_skills, vec!["stakeholder management"]);
        assert_eq!(keywords.jd_phrases, vec!["Senior PM"]);

        let requests = gateway.requests.lock().unwrap();
        assert!(requests[0].response_schema.is_some());
        assert!(!requests[0].web_search);
    }

    #[tokio::test]
    async fn test_extract_keywords_malformed_reply_is_schema_violation() {
        let gateway = StubGateway::returning("not json at all", None);
        let result = extract_keywords(&gateway, "Senior PM").await;
        assert!(matches!(result, Err(AppError::Schema(_))));
    }

    #[test]
    fn test_keyword_schema_requires_all_six_categories() {
        let schema = keyword_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 6);
        assert_eq!(schema["properties"]["jd_phrases"]["type"], "ARRAY");
    }
}
