use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::notes::{Note, NoteStore};
use crate::structurer::Structurer;
use crate::text_io::TextIoService;
use crate::transcript::TranscriptSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Recording,
    Processing,
    Error,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Recording => "recording",
            SessionPhase::Processing => "processing",
            SessionPhase::Error => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub phase: SessionPhase,
    /// Live view of the reconciled transcript for the current session.
    pub transcript: String,
    pub last_error: Option<String>,
    /// The note produced by the most recently completed session.
    pub last_note: Option<Note>,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            transcript: String::new(),
            last_error: None,
            last_note: None,
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionStatusHandle {
    inner: Arc<Mutex<SessionStatus>>,
}

impl SessionStatusHandle {
    pub async fn get(&self) -> SessionStatus {
        self.inner.lock().await.clone()
    }

    pub async fn set(&self, phase: SessionPhase, last_error: Option<String>) {
        let mut status = self.inner.lock().await;
        status.phase = phase;
        status.last_error = last_error;
    }

    pub async fn begin_recording(&self) {
        let mut status = self.inner.lock().await;
        status.phase = SessionPhase::Recording;
        status.transcript.clear();
        status.last_error = None;
    }

    pub async fn update_transcript(&self, transcript: &str) {
        let mut status = self.inner.lock().await;
        status.transcript = transcript.to_string();
    }

    pub async fn record_completion(&self, note: Note) {
        let mut status = self.inner.lock().await;
        status.phase = SessionPhase::Idle;
        status.transcript.clear();
        status.last_error = None;
        status.last_note = Some(note);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BehaviorOptions {
    pub auto_copy: bool,
}

/// Owns one recording session at a time: applies transcript updates in
/// arrival order, and on stop hands the finished transcript to the
/// structurer in a background task, publishing progress through the status
/// handle.
pub struct SessionMachine {
    session: Mutex<TranscriptSession>,
    structurer: Arc<Structurer>,
    store: Arc<NoteStore>,
    text_io: TextIoService,
    behavior: BehaviorOptions,
    status: SessionStatusHandle,
}

impl SessionMachine {
    pub fn new(
        structurer: Arc<Structurer>,
        store: Arc<NoteStore>,
        text_io: TextIoService,
        behavior: BehaviorOptions,
        status: SessionStatusHandle,
    ) -> Self {
        Self {
            session: Mutex::new(TranscriptSession::new()),
            structurer,
            store,
            text_io,
            behavior,
            status,
        }
    }

    /// Begin a new recording session, discarding any buffered transcript
    /// from the previous one. Refused while a finished session is still
    /// being processed.
    pub async fn start(&self) -> Result<SessionPhase> {
        let current = self.status.get().await;
        if current.phase == SessionPhase::Processing {
            warn!("Session start requested while processing previous session");
            return Ok(SessionPhase::Processing);
        }

        self.session.lock().await.reset();
        self.status.begin_recording().await;
        info!("Recording session started");
        Ok(SessionPhase::Recording)
    }

    /// Fold one transcript-update event into the session buffer. Events
    /// outside an active session are noise and are dropped.
    pub async fn push_update(&self, text: &str) -> Result<()> {
        let current = self.status.get().await;
        if current.phase != SessionPhase::Recording {
            warn!(
                "Ignoring transcript update while {}",
                current.phase.as_str()
            );
            return Ok(());
        }

        let mut session = self.session.lock().await;
        let merged = session.apply(text);
        self.status.update_transcript(merged).await;
        Ok(())
    }

    /// Stop the session and process the final transcript in the background.
    pub async fn stop(&self) -> Result<SessionPhase> {
        let current = self.status.get().await;
        if current.phase != SessionPhase::Recording {
            warn!("Session stop requested while {}", current.phase.as_str());
            return Ok(current.phase);
        }

        let raw = self.session.lock().await.finish();
        if raw.trim().is_empty() {
            warn!("Session stopped with an empty transcript, nothing to save");
            self.status.set(SessionPhase::Idle, None).await;
            return Ok(SessionPhase::Idle);
        }

        info!("Session stopped, structuring {} chars", raw.len());
        self.status.set(SessionPhase::Processing, None).await;

        let structurer = Arc::clone(&self.structurer);
        let store = Arc::clone(&self.store);
        let text_io = self.text_io.clone();
        let behavior = self.behavior;
        let status = self.status.clone();

        tokio::spawn(async move {
            let formatted = structurer.format_note(&raw).await;
            let note = Note::from_formatted(formatted);

            match store.append(note) {
                Ok(note) => {
                    if behavior.auto_copy {
                        if let Err(e) = text_io.copy_to_clipboard(&note.formatted_text).await {
                            error!("Failed to copy note to clipboard: {}", e);
                        }
                    }
                    info!("Note saved: \"{}\"", note.title);
                    status.record_completion(note).await;
                }
                Err(e) => {
                    error!("Failed to save note: {}", e);
                    status.set(SessionPhase::Error, Some(e.to_string())).await;
                }
            }
        });

        Ok(SessionPhase::Processing)
    }

    pub fn status_handle(&self) -> SessionStatusHandle {
        self.status.clone()
    }
}
