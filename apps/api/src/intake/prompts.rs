// Prompt constants for the resume intake binding.

/// Instruction sent alongside the inline document part. The output shape is
/// carried by the response schema; the prompt only sets expectations.
pub const PARSE_RESUME_PROMPT: &str = "Parse this resume into structured JSON. \
    Extract ALL experiences with verbatim bullets. Be precise and concise. \
    Omit any field you cannot find rather than guessing.";
