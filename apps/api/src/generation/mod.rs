//! Resume generation — the stage 4 binding.
//!
//! The bullet conventions (past-tense action verbs, `**`-wrapped metrics,
//! ~120-char cap, 3–5 bullets per role) are enforced through the output
//! contract: the prompt states them and the response schema pins the shape.
//! Nothing is re-validated locally — the tailored resume is rendered as
//! received.

use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::GENERATION_PROMPT_TEMPLATE;
use crate::llm_client::decode::decode_json;
use crate::llm_client::{AiGateway, GatewayRequest, PRO_MODEL};
use crate::models::{CandidateProfile, KeywordSet, TailoredResume};

pub mod prompts;

/// Rewrites the candidate's resume against the extracted keywords.
pub async fn generate_tailored_resume(
    gateway: &dyn AiGateway,
    profile: &CandidateProfile,
    keywords: &KeywordSet,
) -> Result<TailoredResume, AppError> {
    let data = json!({
        "contact": profile.contact,
        "experiences": profile.experiences,
        "skills": profile.skills,
        "education": profile.education,
        "keywords": keywords,
    });
    let prompt = GENERATION_PROMPT_TEMPLATE.replace("{data}", &data.to_string());
    let request = GatewayRequest::text(PRO_MODEL, prompt).with_schema(tailored_schema());

    let reply = gateway
        .generate(request)
        .await
        .map_err(|e| AppError::Gateway(format!("Resume generation failed: {e}")))?;

    let resume: TailoredResume = decode_json(&reply.text)?;
    info!(
        roles = resume.experiences.len(),
        tips = resume.ats_tips.len(),
        "Generated tailored resume"
    );
    Ok(resume)
}

/// Structured-output schema for the tailored resume.
fn tailored_schema() -> Value {
    let string = json!({"type": "STRING"});
    json!({
        "type": "OBJECT",
        "properties": {
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
                    },
                    "required": ["company", "title", "start_date", "end_date", "bullets"]
                }
            },
            "suggested_skills": string,
            "ats_tips": {"type": "ARRAY", "items": string},
        },
        "required": ["experiences", "suggested_skills", "ats_tips"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{GatewayError, GatewayReply, RequestPart};
    use crate::models::profile::ExperienceEntry;
    use async_trait::async_trait;

    struct StubGateway {
        reply_text: &'static str,
    }

    #[async_trait]
    impl AiGateway for StubGateway {
        async fn generate(&self, request: GatewayRequest) -> Result<GatewayReply, GatewayError> {
            assert_eq!(request.model, PRO_MODEL);
            // The serialized profile and keywords must both reach the prompt.
            match &request.parts[0] {
                RequestPart::Text(prompt) => {
                    assert!(prompt.contains("Acme"));
                    assert!(prompt.contains("SQL"));
                }
                other => panic!("expected text part, got {other:?}"),
            }
            Ok(GatewayReply {
                text: self.reply_text.to_string(),
                grounding_uri: None,
            })
        }
    }

    fn profile() -> CandidateProfile {
        CandidateProfile {
            experiences: vec![ExperienceEntry {
                company: "Acme".to_string(),
                title: "Product Manager".to_string(),
                start_date: "Jan 2020".to_string(),
                end_date: "Present".to_string(),
                bullets: vec!["managed roadmap and metrics reporting".to_string()],
            }],
            skills: "Roadmapping".to_string(),
            ..Default::default()
        }
    }

    fn keywords() -> KeywordSet {
        KeywordSet {
            hard_skills: vec!["SQL".to_string()],
            strategic_skills: vec!["stakeholder management".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_generated_bullets_follow_contract_shape() {
        let gateway = StubGateway {
            reply_text: r#"{
                "experiences": [{
                    "company": "Acme",
                    "title": "Product Manager",
                    "start_date": "Jan 2020",
                    "end_date": "Present",
                    "bullets": [
                        "Boosted adoption **35%** via a SQL-backed experiment pipeline",
                        "Led stakeholder management across **4** product teams",
                        "Shipped quarterly roadmap hitting **100%** of delivery targets"
                    ]
                }],
                "suggested_skills": "SQL, Stakeholder Management, Roadmapping",
                "ats_tips": ["Mirror the job title exactly"]
            }"#,
        };

        let resume = generate_tailored_resume(&gateway, &profile(), &keywords())
            .await
            .unwrap();

        let bullets = &resume.experiences[0].bullets;
        assert!((3..=5).contains(&bullets.len()));
        for bullet in bullets {
            // Past-tense opener and demarcated metrics, per the contract.
            let first_word = bullet.split_whitespace().next().unwrap();
            assert!(first_word.ends_with("ed"));
            assert!(bullet.len() <= 120);
        }
        assert!(bullets.iter().any(|b| b.contains("**")));
    }

    #[tokio::test]
    async fn test_missing_required_field_is_schema_violation() {
        let gateway = StubGateway {
            reply_text: r#"{"experiences": []}"#,
        };
        let result = generate_tailored_resume(&gateway, &profile(), &keywords()).await;
        assert!(matches!(result, Err(AppError::Schema(_))));
    }

    #[test]
    fn test_tailored_schema_requires_top_level_fields() {
        let schema = tailored_schema();
        let required: Vec<_> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, vec!["experiences", "suggested_skills", "ats_tips"]);
    }
}
