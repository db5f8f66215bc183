use serde::{Deserialize, Serialize};

use crate::models::profile::ExperienceEntry;

/// The AI-rewritten resume produced by the generation contract.
///
/// Bullet conventions are enforced by the output contract, not re-validated
/// locally: each bullet opens with a past-tense action verb, numeric metrics
/// are wrapped in `**`, and roles carry 3–5 bullets of at most ~120 chars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredResume {
    pub experiences: Vec<ExperienceEntry>,
    pub suggested_skills: String,
    pub ats_tips: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tailored_resume_deserializes() {
        let json = r#"{
            "experiences": [{
                "company": "Acme",
                "title": "Senior PM",
                "start_date": "Jan 2020",
                "end_date": "Present",
                "bullets": ["Drove **$62M** revenue growth through SQL-backed experimentation"]
            }],
            "suggested_skills": "SQL, Stakeholder Management",
            "ats_tips": ["Mirror the exact job title in your summary"]
        }"#;
        let resume: TailoredResume = serde_json::from_str(json).unwrap();
        assert_eq!(resume.experiences.len(), 1);
        assert!(resume.experiences[0].bullets[0].contains("**$62M**"));
        assert_eq!(resume.ats_tips.len(), 1);
    }

    #[test]
    fn test_required_fields_are_enforced() {
        // suggested_skills and ats_tips are required by the response schema.
        let json = r#"{"experiences": []}"#;
        assert!(serde_json::from_str::<TailoredResume>(json).is_err());
    }
}
