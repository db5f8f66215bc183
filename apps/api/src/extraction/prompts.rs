// Prompt constants for the extraction bindings.
// Each binding module keeps its prompts in a prompts.rs beside it.

/// JD fetch prompt. Replace `{url}` before sending. Sent with the
/// web-search tool enabled and no response schema — the reply is plain text.
pub const FETCH_JD_PROMPT_TEMPLATE: &str = "Extract the full job description details \
    (responsibilities, requirements, benefits) from this URL: {url}. \
    Provide the output as clean, concise plain text.";

/// Keyword extraction prompt. Replace `{jd_text}` before sending. The six
/// category lists are enforced by the response schema, not by prose alone.
pub const EXTRACT_KEYWORDS_PROMPT_TEMPLATE: &str = r#"Extract ATS keywords from this job description. Return ONLY JSON.

Categories:
- hard_skills: tools, technologies, and concrete competencies
- strategic_skills: higher-level capabilities the role depends on
- soft_skills: interpersonal and communication traits
- qualifications: credentials, degrees, years of experience
- action_verbs: verbs the posting itself uses for the work
- jd_phrases: exact multi-word phrases worth mirroring verbatim

JD: {jd_text}"#;
