// Prompt constants for the generation binding.

/// Resume tailoring prompt. Replace `{data}` with the serialized profile +
/// keyword payload before sending.
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"You are an expert ATS resume writer. Tailor the following resume data to match the provided keywords.
Rules:
1. Each bullet MUST start with a strong past-tense action verb.
2. Numeric metrics MUST be wrapped in ** for bold (e.g. "**$62M**").
3. Each bullet max 120 chars. Keep bullet lists to roughly 3-5 per role for brevity.
4. Weave keywords naturally.

Data: {data}"#;
