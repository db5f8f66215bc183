//! Wizard state machine — the finite-state object behind every session.
//!
//! Five strictly ordered stages, linear, no branching. The only cycles are
//! explicit backward navigation (which re-enters a prior stage without
//! clearing its data) and regeneration (re-running a stage's call,
//! overwriting its output entity on completion).
//!
//! Route handlers drive the machine exclusively through named operations —
//! no raw field setters cross this boundary. Network calls follow a
//! begin/complete/abort protocol: `begin_call` runs the stage guard and the
//! per-action busy check, a `complete_*` operation commits the entity and
//! advances, and `abort_call` is the single failure path, which never
//! mutates a stored entity.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    AtsScanResult, CandidateProfile, JobDescription, KeywordSet, ParsedProfile, TailoredResume,
};

pub mod store;

/// The five ordered wizard stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PasteJd,
    ExtractKeywords,
    EnterExperience,
    GenerateResume,
    AtsScan,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::PasteJd => "paste_jd",
            Stage::ExtractKeywords => "extract_keywords",
            Stage::EnterExperience => "enter_experience",
            Stage::GenerateResume => "generate_resume",
            Stage::AtsScan => "ats_scan",
        }
    }
}

/// Long-running actions. Each may have at most one call in flight per
/// session; a pending call refuses re-entrant triggering of the same action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingCall {
    FetchJd,
    ExtractKeywords,
    ParseResume,
    GenerateResume,
    AtsScan,
}

impl PendingCall {
    fn describe(&self) -> &'static str {
        match self {
            PendingCall::FetchJd => "JD fetch",
            PendingCall::ExtractKeywords => "keyword extraction",
            PendingCall::ParseResume => "resume parsing",
            PendingCall::GenerateResume => "resume generation",
            PendingCall::AtsScan => "ATS scan",
        }
    }
}

/// One wizard session: pipeline position plus accumulated entities.
/// Lives only in memory; discarded on delete or process exit.
#[derive(Debug)]
pub struct WizardSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    stage: Stage,
    job: Option<JobDescription>,
    keywords: Option<KeywordSet>,
    profile: CandidateProfile,
    tailored: Option<TailoredResume>,
    scan: Option<AtsScanResult>,
    last_error: Option<String>,
    in_flight: HashSet<PendingCall>,
}

impl WizardSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            stage: Stage::PasteJd,
            job: None,
            keywords: None,
            profile: CandidateProfile::default(),
            tailored: None,
            scan: None,
            last_error: None,
            in_flight: HashSet::new(),
        }
    }

    // ── Read access ─────────────────────────────────────────────────────────

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn job(&self) -> Option<&JobDescription> {
        self.job.as_ref()
    }

    pub fn keywords(&self) -> Option<&KeywordSet> {
        self.keywords.as_ref()
    }

    pub fn profile(&self) -> &CandidateProfile {
        &self.profile
    }

    pub fn tailored(&self) -> Option<&TailoredResume> {
        self.tailored.as_ref()
    }

    pub fn scan(&self) -> Option<&AtsScanResult> {
        self.scan.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn in_flight(&self) -> impl Iterator<Item = PendingCall> + '_ {
        self.in_flight.iter().copied()
    }

    // ── Local (non-network) operations ──────────────────────────────────────

    /// Stores pasted JD text. Editing the JD does not clear downstream
    /// entities; they survive until explicitly regenerated.
    pub fn set_job_text(&mut self, text: String) -> Result<(), AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(
                "Paste a job description first.".to_string(),
            ));
        }
        self.job = Some(JobDescription::pasted(text));
        self.last_error = None;
        Ok(())
    }

    /// Replaces the candidate profile wholesale (the named edit operation
    /// the presentation layer uses instead of field setters).
    pub fn update_profile(&mut self, profile: CandidateProfile) {
        self.profile = profile;
    }

    /// The "Clear" action: resets the profile to empty, keeping everything
    /// else (JD, keywords, generated entities) intact.
    pub fn reset_profile(&mut self) {
        self.profile = CandidateProfile::default();
    }

    /// Explicit navigation. Backward is unconditional and never clears
    /// downstream entities; forward is allowed only into stages whose
    /// entities already exist, so returning forward skips recomputation.
    pub fn navigate(&mut self, target: Stage) -> Result<(), AppError> {
        if target > self.stage && !self.stage_reached(target) {
            return Err(AppError::Validation(format!(
                "Stage '{}' is not reachable yet; complete the earlier stages first.",
                target.name()
            )));
        }
        self.stage = target;
        Ok(())
    }

    fn stage_reached(&self, stage: Stage) -> bool {
        match stage {
            Stage::PasteJd => true,
            Stage::ExtractKeywords | Stage::EnterExperience => self.keywords.is_some(),
            Stage::GenerateResume => self.tailored.is_some(),
            Stage::AtsScan => self.scan.is_some(),
        }
    }

    // ── Network call protocol ───────────────────────────────────────────────

    /// Guard + busy check. Marks the action in flight on success; the caller
    /// must then finish with exactly one of `complete_*` or `abort_call`.
    pub fn begin_call(&mut self, call: PendingCall) -> Result<(), AppError> {
        if self.in_flight.contains(&call) {
            return Err(AppError::Conflict(format!(
                "A {} call is already in flight for this session",
                call.describe()
            )));
        }

        match call {
            PendingCall::FetchJd | PendingCall::ParseResume => {}
            PendingCall::ExtractKeywords => {
                if self.job.as_ref().map_or(true, |j| j.text.trim().is_empty()) {
                    return Err(AppError::Validation(
                        "Paste a job description first.".to_string(),
                    ));
                }
            }
            PendingCall::GenerateResume => {
                if self.keywords.is_none() {
                    return Err(AppError::Validation(
                        "Extract keywords before generating a resume.".to_string(),
                    ));
                }
            }
            PendingCall::AtsScan => {
                if self.tailored.is_none() || self.keywords.is_none() || self.job.is_none() {
                    return Err(AppError::Validation(
                        "Generate a tailored resume before running the ATS scan.".to_string(),
                    ));
                }
            }
        }

        self.in_flight.insert(call);
        Ok(())
    }

    /// The single failure path: clears the in-flight flag and records a
    /// user-visible message. The stage and every stored entity are untouched,
    /// so the caller can retry idempotently.
    pub fn abort_call(&mut self, call: PendingCall, message: String) {
        self.in_flight.remove(&call);
        self.last_error = Some(message);
    }

    /// Stores a fetched JD. Fetching populates stage 1 input and does not
    /// advance the wizard.
    pub fn complete_fetch_jd(&mut self, job: JobDescription) {
        self.in_flight.remove(&PendingCall::FetchJd);
        self.job = Some(job);
        self.last_error = None;
    }

    /// Stores the keyword set and advances to the keyword review stage.
    /// Re-running from stage 1 overwrites the previous set (regeneration).
    pub fn complete_extract_keywords(&mut self, keywords: KeywordSet) {
        self.in_flight.remove(&PendingCall::ExtractKeywords);
        self.keywords = Some(keywords);
        self.stage = Stage::ExtractKeywords;
        self.last_error = None;
    }

    /// Merges a parsed resume into the profile (merge-don't-clobber). Stays
    /// in the current stage.
    pub fn complete_parse_resume(&mut self, parsed: ParsedProfile) {
        self.in_flight.remove(&PendingCall::ParseResume);
        self.profile.merge_parsed(parsed);
        self.last_error = None;
    }

    /// Stores the tailored resume and advances to the preview stage.
    pub fn complete_generate(&mut self, resume: TailoredResume) {
        self.in_flight.remove(&PendingCall::GenerateResume);
        self.tailored = Some(resume);
        self.stage = Stage::GenerateResume;
        self.last_error = None;
    }

    /// Stores the scan result and advances to the final stage.
    pub fn complete_scan(&mut self, result: AtsScanResult) {
        self.in_flight.remove(&PendingCall::AtsScan);
        self.scan = Some(result);
        self.stage = Stage::AtsScan;
        self.last_error = None;
    }
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}
