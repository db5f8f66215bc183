use serde::{Deserialize, Serialize};

/// Keyword coverage sub-report: which extracted keywords the tailored resume
/// actually carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatchReport {
    pub score: u8,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// A single named structural check (e.g. "Standard section headings").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureCheck {
    pub name: String,
    pub passed: bool,
}

/// Structural sub-report of the ATS simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureReport {
    pub score: u8,
    pub checks: Vec<StructureCheck>,
}

/// Full output of the ATS-simulation contract. Scores are 0–100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsScanResult {
    pub overall_score: u8,
    pub keyword_match: KeywordMatchReport,
    pub structure: StructureReport,
    pub recommendations: Vec<String>,
}
