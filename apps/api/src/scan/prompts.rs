// Prompt constants for the ATS scan binding.

/// ATS simulation prompt. Replace `{jd_text}` (pre-truncated), `{keywords}`,
/// and `{resume}` before sending.
pub const ATS_SCAN_PROMPT_TEMPLATE: &str = r#"Act as an ATS scanner. Compare the tailored resume against the JD and keywords.
Score keyword coverage and resume structure (standard headings, single column, parseable dates), each 0-100, plus an overall 0-100 score and concrete recommendations.
JD: {jd_text}
Keywords: {keywords}
Resume: {resume}"#;
