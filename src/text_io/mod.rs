//! Clipboard output for finished notes. Uses the native clipboard backend
//! where available and falls back to the common Wayland/X11 command-line
//! tools otherwise.

use anyhow::{anyhow, Result};
use arboard::Clipboard;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use which::which;

#[derive(Clone)]
pub struct TextIoService {
    inner: Arc<TextIoInner>,
}

struct TextIoInner {
    clipboard: Mutex<Option<Clipboard>>,
}

impl TextIoService {
    pub fn new() -> Self {
        let clipboard = match Clipboard::new() {
            Ok(cb) => Some(cb),
            Err(err) => {
                warn!(
                    "System clipboard backend unavailable ({}); falling back to CLI tools",
                    err
                );
                None
            }
        };

        Self {
            inner: Arc::new(TextIoInner {
                clipboard: Mutex::new(clipboard),
            }),
        }
    }

    pub async fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        info!("Copying {} chars to clipboard", text.len());

        let mut used_native = false;
        {
            let mut clipboard_guard = self.inner.clipboard.lock().await;
            if let Some(clipboard) = clipboard_guard.as_mut() {
                match clipboard.set_text(text) {
                    Ok(_) => {
                        used_native = true;
                    }
                    Err(err) => {
                        warn!(
                            "Primary clipboard backend failed ({}), disabling until restart",
                            err
                        );
                        *clipboard_guard = None;
                    }
                }
            } else {
                debug!("Native clipboard backend unavailable; using system clipboard tools");
            }
        }

        if !used_native {
            self.copy_with_system_backends(text)?;
        }

        Ok(())
    }

    fn copy_with_system_backends(&self, text: &str) -> Result<()> {
        for backend in CLIPBOARD_BACKENDS {
            if which(backend.copy_cmd).is_err() {
                continue;
            }

            let mut cmd = Command::new(backend.copy_cmd);
            cmd.args(backend.copy_args);
            cmd.stdin(Stdio::piped());

            if let Ok(mut child) = cmd.spawn() {
                if let Some(stdin) = child.stdin.as_mut() {
                    if stdin.write_all(text.as_bytes()).is_err() {
                        continue;
                    }
                }

                if let Ok(status) = child.wait() {
                    if status.success() {
                        debug!("Text copied to clipboard with {}", backend.name);
                        return Ok(());
                    }
                }
            }
        }

        Err(anyhow!(
            "No clipboard tool (wl-copy/xclip/xsel) available for fallback"
        ))
    }
}

impl Default for TextIoService {
    fn default() -> Self {
        Self::new()
    }
}

struct ClipboardBackend {
    name: &'static str,
    copy_cmd: &'static str,
    copy_args: &'static [&'static str],
}

const CLIPBOARD_BACKENDS: &[ClipboardBackend] = &[
    ClipboardBackend {
        name: "wl-copy",
        copy_cmd: "wl-copy",
        copy_args: &[],
    },
    ClipboardBackend {
        name: "xclip",
        copy_cmd: "xclip",
        copy_args: &["-selection", "clipboard"],
    },
    ClipboardBackend {
        name: "xsel",
        copy_cmd: "xsel",
        copy_args: &["--clipboard", "--input"],
    },
];
