//! Domain entities accumulated by the wizard pipeline.
//!
//! Everything here is strongly typed at the gateway trust boundary: raw model
//! text is decoded into these shapes by `llm_client::decode` and never used
//! as free-form JSON afterwards.

pub mod job;
pub mod keywords;
pub mod profile;
pub mod resume;
pub mod scan;

pub use job::JobDescription;
pub use keywords::KeywordSet;
pub use profile::{CandidateProfile, ContactInfo, EducationEntry, ExperienceEntry, ParsedProfile};
pub use resume::TailoredResume;
pub use scan::AtsScanResult;
