//! Candidate profile — user-entered or AI-parsed resume content.
//!
//! The profile is the only entity the user edits directly (stages 3–4). An
//! uploaded resume is parsed by the gateway into a `ParsedProfile` where
//! every field is optional, then merged in with a merge-don't-clobber
//! policy: absent or empty parsed fields never overwrite user-entered data.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub portfolio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

/// The full candidate profile, mutable throughout stages 3–4.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default)]
    pub experiences: Vec<ExperienceEntry>,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
}

/// Best-effort partial contact data from resume parsing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
}

/// Best-effort partial parse of an uploaded resume. Any field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedProfile {
    pub contact: Option<ParsedContact>,
    pub experiences: Option<Vec<ExperienceEntry>>,
    pub skills: Option<String>,
    pub education: Option<Vec<EducationEntry>>,
}

impl CandidateProfile {
    /// Merges a parsed resume into the profile without clobbering.
    ///
    /// A parsed value wins only when it is present and non-empty; everything
    /// the parser did not return keeps its current (possibly user-entered)
    /// value.
    pub fn merge_parsed(&mut self, parsed: ParsedProfile) {
        if let Some(contact) = parsed.contact {
            merge_field(&mut self.contact.name, contact.name);
            merge_field(&mut self.contact.email, contact.email);
            merge_field(&mut self.contact.phone, contact.phone);
            merge_field(&mut self.contact.location, contact.location);
            merge_field(&mut self.contact.linkedin, contact.linkedin);
            merge_field(&mut self.contact.portfolio, contact.portfolio);
        }
        if let Some(experiences) = parsed.experiences {
            if !experiences.is_empty() {
                self.experiences = experiences;
            }
        }
        if let Some(skills) = parsed.skills {
            merge_field(&mut self.skills, Some(skills));
        }
        if let Some(education) = parsed.education {
            if !education.is_empty() {
                self.education = education;
            }
        }
    }
}

fn merge_field(target: &mut String, parsed: Option<String>) {
    if let Some(value) = parsed {
        if !value.trim().is_empty() {
            *target = value;
        }
    }
}
