use crate::api::{ApiCommand, ApiServer};
use crate::config::Config;
use crate::notes::NoteStore;
use crate::session::{BehaviorOptions, SessionMachine, SessionStatusHandle};
use crate::structurer::Structurer;
use crate::text_io::TextIoService;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

pub async fn run_service() -> Result<()> {
    info!("Starting Voxnote service");

    let config = Config::load()?;

    let (tx, mut rx) = mpsc::channel::<ApiCommand>(32);

    let structurer = Arc::new(build_structurer(&config)?);
    let store = Arc::new(NoteStore::open_default()?);
    let text_io = TextIoService::new();

    let status_handle = SessionStatusHandle::default();
    let machine = SessionMachine::new(
        Arc::clone(&structurer),
        Arc::clone(&store),
        text_io,
        BehaviorOptions {
            auto_copy: config.behavior.auto_copy,
        },
        status_handle.clone(),
    );

    let api_server = ApiServer::new(tx, status_handle, Arc::clone(&store), config.server.port);
    tokio::spawn(async move {
        if let Err(e) = api_server.start().await {
            error!("API server failed: {}", e);
        }
    });

    info!("Voxnote is ready!");
    info!(
        "Point the recorder page at http://127.0.0.1:{} and POST transcript updates to /session/update",
        config.server.port
    );

    while let Some(command) = rx.recv().await {
        match command {
            ApiCommand::StartSession => {
                if let Err(e) = machine.start().await {
                    error!("Failed to start session: {}", e);
                }
            }
            ApiCommand::TranscriptUpdate(text) => {
                if let Err(e) = machine.push_update(&text).await {
                    error!("Failed to apply transcript update: {}", e);
                }
            }
            ApiCommand::StopSession => {
                if let Err(e) = machine.stop().await {
                    error!("Failed to stop session: {}", e);
                }
            }
        }
    }

    Ok(())
}

fn build_structurer(config: &Config) -> Result<Structurer> {
    Structurer::from_config(&config.ai)
}
