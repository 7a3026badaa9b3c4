//! REST API server for Voxnote.
//!
//! Provides HTTP endpoints for:
//! - Recording-session control (start, update, stop, status)
//! - Saved notes (list, search, fetch, plain-text export)
//! - Provider configuration

pub mod error;
pub mod routes;

use crate::notes::NoteStore;
use crate::session::SessionStatusHandle;
use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;

pub use routes::session::{ApiCommand, SessionState, UpdateRequest};

pub struct ApiServer {
    port: u16,
    session_state: SessionState,
    store: Arc<NoteStore>,
}

impl ApiServer {
    pub fn new(
        tx: tokio::sync::mpsc::Sender<ApiCommand>,
        status: SessionStatusHandle,
        store: Arc<NoteStore>,
        port: u16,
    ) -> Self {
        Self {
            port,
            session_state: SessionState { tx, status },
            store,
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = Router::new()
            // Root and version endpoints
            .route("/", get(status))
            .route("/version", get(version))
            // Session and note routes
            .nest("/session", routes::session::router(self.session_state))
            .nest("/notes", routes::notes::router(self.store))
            .nest("/provider", routes::provider::router())
            .layer(ServiceBuilder::new());

        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!("API server listening on http://127.0.0.1:{}", self.port);
        info!("Endpoints:");
        info!("  GET  /                 - Service info");
        info!("  GET  /version          - Get version info");
        info!("  POST /session/start    - Start a recording session");
        info!("  POST /session/update   - Push a transcript update");
        info!("  POST /session/stop     - Stop and structure the session");
        info!("  GET  /session/status   - Get session status");
        info!("  GET  /notes            - List saved notes");
        info!("  GET  /notes/:id        - Get a single note");
        info!("  GET  /notes/:id/text   - Get a note as plain text");
        info!("  GET  /provider         - Get provider config");
        info!("  GET  /provider/status  - Get provider status");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "voxnote",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "voxnote"
    }))
}
