//! Axum route handlers for the wizard API.
//!
//! Handlers are the presentation seam: they validate local input, drive the
//! session's named transitions, and render snapshots. Every gateway call
//! follows the begin/complete/abort protocol so a failure leaves the session
//! in its pre-call stage with a user-visible message.

use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{flatten_resume, render_pdf, EXPORT_FILE_NAME};
use crate::extraction::{extract_keywords, fetch_jd_from_url};
use crate::generation::generate_tailored_resume;
use crate::intake::{parse_resume, ResumeUpload};
use crate::models::{
    AtsScanResult, CandidateProfile, JobDescription, KeywordSet, TailoredResume,
};
use crate::scan::perform_ats_scan;
use crate::state::AppState;
use crate::wizard::{PendingCall, Stage, WizardSession};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Full session snapshot returned by every handler, so the client can
/// re-render the wizard from one response.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub stage: Stage,
    pub job: Option<JobDescription>,
    pub keywords: Option<KeywordSet>,
    pub profile: CandidateProfile,
    pub tailored_resume: Option<TailoredResume>,
    pub ats_scan: Option<AtsScanResult>,
    pub pending_calls: Vec<PendingCall>,
    pub last_error: Option<String>,
}

fn view(session: &WizardSession) -> SessionView {
    SessionView {
        session_id: session.id,
        created_at: session.created_at,
        stage: session.stage(),
        job: session.job().cloned(),
        keywords: session.keywords().cloned(),
        profile: session.profile().clone(),
        tailored_resume: session.tailored().cloned(),
        ats_scan: session.scan().cloned(),
        pending_calls: session.in_flight().collect(),
        last_error: session.last_error().map(String::from),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetJobRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct FetchJdRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub stage: Stage,
}

// ────────────────────────────────────────────────────────────────────────────
// Session lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<Json<SessionView>, AppError> {
    let id = state.sessions.create().await;
    info!("Created wizard session {id}");
    snapshot(&state, id).await
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    snapshot(&state, session_id).await
}

/// DELETE /api/v1/sessions/:id
///
/// Discards the session and every entity it accumulated.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.sessions.remove(session_id).await?;
    info!("Deleted wizard session {session_id}");
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 1: job description
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/sessions/:id/job
///
/// Stores pasted JD text. Local validation only; no gateway call.
pub async fn handle_set_job(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SetJobRequest>,
) -> Result<Json<SessionView>, AppError> {
    state
        .sessions
        .update(session_id, |s| s.set_job_text(request.text))
        .await?;
    snapshot(&state, session_id).await
}

/// POST /api/v1/sessions/:id/job/fetch
///
/// Browses the URL through the gateway's web-search tool and stores the
/// extracted description. Does not advance the wizard.
pub async fn handle_fetch_jd(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<FetchJdRequest>,
) -> Result<Json<SessionView>, AppError> {
    let url = request.url.trim().to_string();
    if url.is_empty() || !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(AppError::Validation("Please enter a valid URL.".to_string()));
    }

    state
        .sessions
        .update(session_id, |s| s.begin_call(PendingCall::FetchJd))
        .await?;

    match fetch_jd_from_url(state.gateway.as_ref(), &url).await {
        Ok(job) => {
            state
                .sessions
                .update(session_id, |s| {
                    s.complete_fetch_jd(job);
                    Ok(())
                })
                .await?;
            snapshot(&state, session_id).await
        }
        Err(e) => abort(&state, session_id, PendingCall::FetchJd, e).await,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 2: keyword extraction
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/keywords
///
/// The paste_jd → extract_keywords transition. Guarded by non-empty JD text.
pub async fn handle_extract_keywords(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let jd_text = state
        .sessions
        .update(session_id, |s| {
            let text = s.job().map(|j| j.text.clone()).unwrap_or_default();
            s.begin_call(PendingCall::ExtractKeywords)?;
            Ok(text)
        })
        .await?;

    match extract_keywords(state.gateway.as_ref(), &jd_text).await {
        Ok(keywords) => {
            state
                .sessions
                .update(session_id, |s| {
                    s.complete_extract_keywords(keywords);
                    Ok(())
                })
                .await?;
            snapshot(&state, session_id).await
        }
        Err(e) => abort(&state, session_id, PendingCall::ExtractKeywords, e).await,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 3: experience entry
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/navigate
///
/// Explicit navigation. Backward is unconditional and keeps downstream
/// entities; forward only re-enters stages whose entities already exist.
pub async fn handle_navigate(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<SessionView>, AppError> {
    state
        .sessions
        .update(session_id, |s| s.navigate(request.stage))
        .await?;
    snapshot(&state, session_id).await
}

/// PUT /api/v1/sessions/:id/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(profile): Json<CandidateProfile>,
) -> Result<Json<SessionView>, AppError> {
    state
        .sessions
        .update(session_id, |s| {
            s.update_profile(profile);
            Ok(())
        })
        .await?;
    snapshot(&state, session_id).await
}

/// POST /api/v1/sessions/:id/profile/reset
pub async fn handle_reset_profile(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    state
        .sessions
        .update(session_id, |s| {
            s.reset_profile();
            Ok(())
        })
        .await?;
    snapshot(&state, session_id).await
}

/// POST /api/v1/sessions/:id/resume/upload
///
/// Multipart resume upload. The file is validated locally (PDF/DOCX/TXT)
/// before any gateway call; the parse result merges into the profile without
/// clobbering user-entered fields.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let mut upload: Option<ResumeUpload> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::FileRead(e.to_string()))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::FileRead(e.to_string()))?;
        upload = Some(ResumeUpload::new(file_name, data)?);
        break;
    }
    let upload =
        upload.ok_or_else(|| AppError::Validation("No resume file in upload".to_string()))?;

    state
        .sessions
        .update(session_id, |s| s.begin_call(PendingCall::ParseResume))
        .await?;

    match parse_resume(state.gateway.as_ref(), upload).await {
        Ok(parsed) => {
            state
                .sessions
                .update(session_id, |s| {
                    s.complete_parse_resume(parsed);
                    Ok(())
                })
                .await?;
            snapshot(&state, session_id).await
        }
        Err(e) => abort(&state, session_id, PendingCall::ParseResume, e).await,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 4: generation
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/resume/generate
///
/// The enter_experience → generate_resume transition. Guarded by an existing
/// KeywordSet; re-running overwrites the previous tailored resume.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let (profile, keywords) = state
        .sessions
        .update(session_id, |s| {
            let keywords = s.keywords().cloned().ok_or_else(|| {
                AppError::Validation("Extract keywords before generating a resume.".to_string())
            })?;
            s.begin_call(PendingCall::GenerateResume)?;
            Ok((s.profile().clone(), keywords))
        })
        .await?;

    match generate_tailored_resume(state.gateway.as_ref(), &profile, &keywords).await {
        Ok(resume) => {
            state
                .sessions
                .update(session_id, |s| {
                    s.complete_generate(resume);
                    Ok(())
                })
                .await?;
            snapshot(&state, session_id).await
        }
        Err(e) => abort(&state, session_id, PendingCall::GenerateResume, e).await,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 5: ATS scan
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/scan
///
/// The generate_resume → ats_scan transition. Guarded by an existing
/// TailoredResume (plus the JD and keywords it was built from).
pub async fn handle_ats_scan(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let (job, resume, keywords) = state
        .sessions
        .update(session_id, |s| {
            let missing = || {
                AppError::Validation(
                    "Generate a tailored resume before running the ATS scan.".to_string(),
                )
            };
            let job = s.job().cloned().ok_or_else(missing)?;
            let resume = s.tailored().cloned().ok_or_else(missing)?;
            let keywords = s.keywords().cloned().ok_or_else(missing)?;
            s.begin_call(PendingCall::AtsScan)?;
            Ok((job, resume, keywords))
        })
        .await?;

    match perform_ats_scan(state.gateway.as_ref(), &job, &resume, &keywords).await {
        Ok(result) => {
            state
                .sessions
                .update(session_id, |s| {
                    s.complete_scan(result);
                    Ok(())
                })
                .await?;
            snapshot(&state, session_id).await
        }
        Err(e) => abort(&state, session_id, PendingCall::AtsScan, e).await,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Export
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions/:id/export
///
/// Flattens the tailored resume and streams it back as a PDF download.
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let content = state
        .sessions
        .read(session_id, |s| {
            s.tailored().map(|resume| {
                flatten_resume(&s.profile().contact, &s.profile().education, resume)
            })
        })
        .await?
        .ok_or_else(|| {
            AppError::Validation("Generate a tailored resume before exporting.".to_string())
        })?;

    let bytes = render_pdf(&content)?;
    info!(bytes = bytes.len(), "Exported {EXPORT_FILE_NAME}");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        bytes,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn snapshot(state: &AppState, session_id: Uuid) -> Result<Json<SessionView>, AppError> {
    state.sessions.read(session_id, view).await.map(Json)
}

/// Failure path for every gateway-backed transition: clear the in-flight
/// flag, record the user-visible message, propagate the original error. The
/// session may have been deleted mid-call, in which case there is nothing
/// left to abort.
async fn abort(
    state: &AppState,
    session_id: Uuid,
    call: PendingCall,
    error: AppError,
) -> Result<Json<SessionView>, AppError> {
    let message = error.to_string();
    let _ = state
        .sessions
        .update(session_id, |s| {
            s.abort_call(call, message.clone());
            Ok(())
        })
        .await;
    Err(error)
}
