//! ATS scan — the stage 5 binding.
//!
//! The job description is truncated before prompt assembly to respect the
//! gateway's payload limits; the resume and keywords always travel whole.

use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::decode::decode_json;
use crate::llm_client::{AiGateway, GatewayRequest, PRO_MODEL};
use crate::models::{AtsScanResult, JobDescription, KeywordSet, TailoredResume};
use crate::scan::prompts::ATS_SCAN_PROMPT_TEMPLATE;

pub mod prompts;

/// Max JD characters submitted to the scan call.
const JD_CHAR_LIMIT: usize = 3000;

/// Scores the tailored resume against the job description and keywords.
pub async fn perform_ats_scan(
    gateway: &dyn AiGateway,
    job: &JobDescription,
    resume: &TailoredResume,
    keywords: &KeywordSet,
) -> Result<AtsScanResult, AppError> {
    let prompt = ATS_SCAN_PROMPT_TEMPLATE
        .replace("{jd_text}", truncate_chars(&job.text, JD_CHAR_LIMIT))
        .replace("{keywords}", &serde_json::to_string(keywords).unwrap_or_default())
        .replace("{resume}", &serde_json::to_string(resume).unwrap_or_default());
    let request = GatewayRequest::text(PRO_MODEL, prompt).with_schema(scan_schema());

    let reply = gateway
        .generate(request)
        .await
        .map_err(|e| AppError::Gateway(format!("ATS scan failed: {e}")))?;

    let result: AtsScanResult = decode_json(&reply.text)?;
    info!(
        overall = result.overall_score,
        matched = result.keyword_match.matched.len(),
        missing = result.keyword_match.missing.len(),
        "ATS scan complete"
    );
    Ok(result)
}

/// Truncates to at most `limit` characters, never splitting a code point.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Structured-output schema for the scan result. Scores are integers 0–100.
fn scan_schema() -> Value {
    let string = json!({"type": "STRING"});
    let score = json!({"type": "INTEGER"});
    json!({
        "type": "OBJECT",
        "properties": {
            "overall_score": score,
            "keyword_match": {
                "type": "OBJECT",
                "properties": {
                    "score": score,
                    "matched": {"type": "ARRAY", "items": string},
                    "missing": {"type": "ARRAY", "items": string},
                },
                "required": ["score", "matched", "missing"]
            },
            "structure": {
                "type": "OBJECT",
                "properties": {
                    "score": score,
                    "checks": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "name": string,
                                "passed": {"type": "BOOLEAN"},
                            },
                            "required": ["name", "passed"]
                        }
                    },
                },
                "required": ["score", "checks"]
            },
            "recommendations": {"type": "ARRAY", "items": string},
        },
        "required": ["overall_score", "keyword_match", "structure", "recommendations"]
    })
}
