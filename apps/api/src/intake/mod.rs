//! Resume intake — upload validation and the parse-resume binding.
//!
//! Validation is strictly local: an unsupported file never generates a
//! gateway call. The parse result is best-effort partial data that the
//! wizard merges into the profile without clobbering user entries.

use bytes::Bytes;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::intake::prompts::PARSE_RESUME_PROMPT;
use crate::llm_client::decode::decode_json;
use crate::llm_client::{AiGateway, GatewayRequest, PRO_MODEL};
use crate::models::ParsedProfile;

pub mod prompts;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TXT: &str = "text/plain";

/// A validated upload ready for the gateway.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub data: Bytes,
}

impl ResumeUpload {
    /// Validates the file extension and resolves the MIME type the gateway
    /// will receive. Anything but PDF/DOCX/TXT is rejected here, before any
    /// network call.
    pub fn new(file_name: String, data: Bytes) -> Result<Self, AppError> {
        let extension = file_name
            .rsplit('.')
            .next()
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let mime_type = match extension.as_str() {
            "pdf" => MIME_PDF,
            "docx" => MIME_DOCX,
            "txt" => MIME_TXT,
            _ => {
                return Err(AppError::Validation(
                    "Upload PDF, DOCX, or TXT.".to_string(),
                ))
            }
        };

        if data.is_empty() {
            return Err(AppError::FileRead(format!("{file_name} is empty")));
        }

        Ok(Self {
            file_name,
            mime_type,
            data,
        })
    }
}

/// Sends the uploaded document to the gateway as an inline binary part and
/// decodes the structured parse. Every field of the result is optional.
pub async fn parse_resume(
    gateway: &dyn AiGateway,
    upload: ResumeUpload,
) -> Result<ParsedProfile, AppError> {
    info!(
        file = %upload.file_name,
        mime = upload.mime_type,
        bytes = upload.data.len(),
        "Parsing uploaded resume"
    );

    let request = GatewayRequest::text(PRO_MODEL, PARSE_RESUME_PROMPT.to_string())
        .with_inline_data(upload.mime_type.to_string(), upload.data)
        .with_schema(parse_schema());

    let reply = gateway
        .generate(request)
        .await
        .map_err(|e| AppError::Gateway(format!("Resume parsing failed: {e}")))?;

    decode_json(&reply.text)
}

/// Structured-output schema mirroring `ParsedProfile` — nothing is required,
/// so the gateway may omit any field it could not extract.
fn parse_schema() -> Value {
    let string = json!({"type": "STRING"});
    json!({
        "type": "OBJECT",
        "properties": {
            "contact": {
                "type": "OBJECT",
                "properties": {
                    "name": string,
                    "email": string,
                    "phone": string,
                    "location": string,
                    "linkedin": string,
                    "portfolio": string,
                }
            },
            "experiences": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "company": string,
                        "title": string,
                        "start_date": string,
                        "end_date": string,
                        "bullets": {"type": "ARRAY", "items": string},
                    }
                }
            },
            "skills": string,
            "education": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "school": string,
                        "degree": string,
                        "start_date": string,
                        "end_date": string,
                    }
                }
            }
        }
    })
}
