use serde::{Deserialize, Serialize};

/// Categorized ATS keywords extracted from a job description.
///
/// All six lists are always present — the extraction response schema marks
/// every category required, so an individual list may be empty but never
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordSet {
    pub hard_skills: Vec<String>,
    pub strategic_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub qualifications: Vec<String>,
    pub action_verbs: Vec<String>,
    pub jd_phrases: Vec<String>,
}

impl KeywordSet {
    /// Total keyword count across all six categories.
    pub fn len(&self) -> usize {
        self.hard_skills.len()
            + self.strategic_skills.len()
            + self.soft_skills.len()
            + self.qualifications.len()
            + self.action_verbs.len()
            + self.jd_phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_set_deserializes_all_six_lists() {
        let json = r#"{
            "hard_skills": ["SQL"],
            "strategic_skills": ["stakeholder management"],
            "soft_skills": ["communication"],
            "qualifications": ["5+ years product management"],
            "action_verbs": ["led"],
            "jd_phrases": ["senior product manager"]
        }"#;
        let set: KeywordSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.hard_skills, vec!["SQL"]);
        assert_eq!(set.strategic_skills, vec!["stakeholder management"]);
        assert_eq!(set.len(), 6);
    }

    #[test]
    fn test_missing_category_is_rejected() {
        // Five lists only — the response schema requires all six.
        let json = r#"{
            "hard_skills": [],
            "strategic_skills": [],
            "soft_skills": [],
            "qualifications": [],
            "action_verbs": []
        }"#;
        assert!(serde_json::from_str::<KeywordSet>(json).is_err());
    }
}
