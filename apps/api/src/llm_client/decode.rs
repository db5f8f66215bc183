//! The trust boundary between free-text model output and typed domain data.
//!
//! Every binding decodes through [`decode_json`]: trim, strip markdown code
//! fences, parse. Anything that fails here is a schema violation — the root
//! cause (usually an oversized input that truncated the response) is not
//! observable from the outside, so callers surface one generic message.

use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
/// Repeats until a fixpoint so nested fences unwrap fully, which makes the
/// strip idempotent: applying it to already-clean text is a no-op.
pub fn strip_json_fences(text: &str) -> &str {
    let mut text = text.trim();
    loop {
        let stripped = strip_one_fence(text);
        if stripped == text {
            return text;
        }
        text = stripped;
    }
}

fn strip_one_fence(text: &str) -> &str {
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or_else(|| stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or_else(|| stripped.trim_start())
    } else {
        text
    }
}

/// Decodes fence-stripped model output into a typed value.
pub fn decode_json<T: DeserializeOwned>(text: &str) -> Result<T, AppError> {
    let cleaned = strip_json_fences(text);
    serde_json::from_str(cleaned).map_err(|e| AppError::Schema(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeywordSet;

    const KEYWORDS_JSON: &str = r#"{
        "hard_skills": ["SQL"],
        "strategic_skills": ["stakeholder management"],
        "soft_skills": [],
        "qualifications": [],
        "action_verbs": [],
        "jd_phrases": []
    }"#;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        let once = strip_json_fences(input);
        assert_eq!(strip_json_fences(once), once);
    }

    #[test]
    fn test_nested_fences_unwrap_fully() {
        let input = "```\n```json\n{\"key\": \"value\"}\n```\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_fenced_and_unfenced_decode_to_same_object() {
        let fenced = format!("```json\n{KEYWORDS_JSON}\n```");
        let from_fenced: KeywordSet = decode_json(&fenced).unwrap();
        let from_plain: KeywordSet = decode_json(KEYWORDS_JSON).unwrap();
        assert_eq!(from_fenced, from_plain);
    }

    #[test]
    fn test_malformed_json_is_schema_violation() {
        let result = decode_json::<KeywordSet>("```json\n{\"hard_skills\": [\n```");
        match result {
            Err(AppError::Schema(_)) => {}
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_json_prose_is_schema_violation() {
        let result = decode_json::<KeywordSet>("I'm sorry, I can't help with that.");
        assert!(matches!(result, Err(AppError::Schema(_))));
    }

    #[test]
    fn test_unterminated_fence_still_parses_body() {
        // Truncated trailing fence: strip the prefix and try the body as-is.
        let input = format!("```json\n{KEYWORDS_JSON}");
        let parsed: KeywordSet = decode_json(&input).unwrap();
        assert_eq!(parsed.hard_skills, vec!["SQL"]);
    }
}
