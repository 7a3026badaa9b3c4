//! Saved-note API routes.

use crate::api::error::{ApiError, ApiResult};
use crate::notes::{Note, NoteStore, SearchParams};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters for note search.
#[derive(Debug, Deserialize, Default)]
pub struct NotesQueryParams {
    /// Search query
    pub q: Option<String>,
    /// Start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// End date (YYYY-MM-DD)
    pub to: Option<String>,
    /// Maximum results (default 20)
    pub limit: Option<usize>,
}

/// Create the notes router.
pub fn router(store: Arc<NoteStore>) -> Router {
    Router::new()
        .route("/", get(list_notes))
        .route("/:id", get(get_note_by_id))
        .route("/:id/text", get(get_note_text))
        .with_state(store)
}

/// GET /notes - List saved notes, newest first.
async fn list_notes(
    State(store): State<Arc<NoteStore>>,
    Query(params): Query<NotesQueryParams>,
) -> ApiResult<Json<Vec<Note>>> {
    let search_params = SearchParams {
        query: params.q,
        from: params.from,
        to: params.to,
        limit: params.limit.unwrap_or(20),
    };

    let notes = store.search(&search_params).map_err(ApiError::from)?;
    Ok(Json(notes))
}

/// GET /notes/:id - Get a single note.
async fn get_note_by_id(
    State(store): State<Arc<NoteStore>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Note>> {
    let note = store
        .get_by_id(&id)
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Note {} not found", id)))?;

    Ok(Json(note))
}

/// GET /notes/:id/text - Formatted note text as plain text, for clipboard
/// copy or file download by the caller.
async fn get_note_text(
    State(store): State<Arc<NoteStore>>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    let note = store
        .get_by_id(&id)
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Note {} not found", id)))?;

    Ok(note.formatted_text)
}
