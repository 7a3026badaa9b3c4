//! Recording-session endpoints.
//!
//! The browser-side recognition collaborator drives a session through these
//! routes: start it, push transcript-update events while speaking, stop it,
//! and poll status for the live transcript and the finished note.

use crate::session::{SessionPhase, SessionStatusHandle};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Commands flowing from the HTTP surface to the service loop. A single
/// consumer applies them, so update events hit the transcript buffer in
/// strict delivery order.
#[derive(Clone)]
pub enum ApiCommand {
    StartSession,
    TranscriptUpdate(String),
    StopSession,
}

#[derive(Clone)]
pub struct SessionState {
    pub tx: mpsc::Sender<ApiCommand>,
    pub status: SessionStatusHandle,
}

/// Request body for transcript-update events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub text: String,
}

/// Creates the session router with all recording-session endpoints.
pub fn router(state: SessionState) -> Router {
    Router::new()
        .route("/start", post(start_session))
        .route("/update", post(push_update))
        .route("/stop", post(stop_session))
        .route("/status", get(session_status))
        .with_state(state)
}

/// POST /session/start - Begin a new recording session.
async fn start_session(State(state): State<SessionState>) -> Result<Json<Value>, StatusCode> {
    info!("Session start requested via API");

    send_command(&state, ApiCommand::StartSession).await?;

    // Small delay to allow the status to be updated.
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    let status = state.status.get().await;
    Ok(Json(json!({
        "success": true,
        "phase": status.phase.as_str(),
    })))
}

/// POST /session/update - Push one transcript-update event.
async fn push_update(
    State(state): State<SessionState>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<Value>, StatusCode> {
    debug!("Transcript update received: {} chars", req.text.len());

    send_command(&state, ApiCommand::TranscriptUpdate(req.text)).await?;

    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    let status = state.status.get().await;
    Ok(Json(json!({
        "success": true,
        "phase": status.phase.as_str(),
        "transcript_chars": status.transcript.chars().count(),
    })))
}

/// POST /session/stop - Stop the session and process the transcript.
async fn stop_session(State(state): State<SessionState>) -> Result<Json<Value>, StatusCode> {
    info!("Session stop requested via API");

    send_command(&state, ApiCommand::StopSession).await?;

    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    let status = state.status.get().await;
    Ok(Json(json!({
        "success": true,
        "phase": status.phase.as_str(),
        "message": format!("Session {}", status.phase.as_str()),
    })))
}

/// GET /session/status - Current phase, live transcript and last note.
async fn session_status(State(state): State<SessionState>) -> Json<Value> {
    let status = state.status.get().await;

    Json(json!({
        "recording": status.phase == SessionPhase::Recording,
        "phase": status.phase.as_str(),
        "transcript": status.transcript,
        "last_error": status.last_error,
        "last_note": status.last_note,
    }))
}

async fn send_command(state: &SessionState, command: ApiCommand) -> Result<(), StatusCode> {
    state.tx.send(command).await.map_err(|e| {
        error!("Failed to send session command: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
