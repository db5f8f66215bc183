use serde::{Deserialize, Serialize};

/// A job posting — the stage 1 input, immutable once later stages consume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub text: String,
    pub source_url: Option<String>,
    /// True only when the gateway returned grounding metadata confirming the
    /// source. False means `source_url` is the requested URL echoed back —
    /// an unverified fallback, not a confirmed citation.
    pub source_verified: bool,
}

impl JobDescription {
    /// A description pasted directly by the user.
    pub fn pasted(text: String) -> Self {
        Self {
            text,
            source_url: None,
            source_verified: false,
        }
    }

    /// A description fetched through the gateway's web-search tool.
    pub fn fetched(text: String, source_url: String, source_verified: bool) -> Self {
        Self {
            text,
            source_url: Some(source_url),
            source_verified,
        }
    }
}
