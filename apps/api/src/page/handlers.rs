use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::page::{parse_mode_selection, PageEvent, PageOutcome, PageSnapshot};
use crate::state::AppState;

/// Multipart field carrying the resume.
const RESUME_FIELD: &str = "resume";

#[derive(Debug, Deserialize)]
pub struct JobDescriptionRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub answer: String,
    pub page: PageSnapshot,
}

/// GET /api/v1/page
pub async fn handle_get_page(State(state): State<AppState>) -> Json<PageSnapshot> {
    Json(state.page.lock().await.snapshot())
}

/// PUT /api/v1/page/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Json(req): Json<JobDescriptionRequest>,
) -> Result<Json<PageSnapshot>, AppError> {
    apply(&state, PageEvent::JobDescriptionChanged(req.text)).await
}

/// POST /api/v1/page/resume
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PageSnapshot>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        return apply(&state, PageEvent::ResumeUploaded(data)).await;
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{RESUME_FIELD}'"
    )))
}

/// PUT /api/v1/page/mode
pub async fn handle_set_mode(
    State(state): State<AppState>,
    Json(req): Json<ModeRequest>,
) -> Result<Json<PageSnapshot>, AppError> {
    let mode = parse_mode_selection(&req.mode)?;
    apply(&state, PageEvent::ModeChanged(mode)).await
}

/// POST /api/v1/page/submit
pub async fn handle_submit(State(state): State<AppState>) -> Result<Json<PageSnapshot>, AppError> {
    apply(&state, PageEvent::Submit).await
}

/// POST /api/v1/page/messages
pub async fn handle_send_message(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut page = state.page.lock().await;
    let answer = match page.handle(PageEvent::MessageSent(req.content)).await? {
        PageOutcome::Reply(answer) => answer,
        PageOutcome::Updated => String::new(),
    };
    Ok(Json(MessageResponse {
        answer,
        page: page.snapshot(),
    }))
}

async fn apply(state: &AppState, event: PageEvent) -> Result<Json<PageSnapshot>, AppError> {
    let mut page = state.page.lock().await;
    page.handle(event).await?;
    Ok(Json(page.snapshot()))
}
