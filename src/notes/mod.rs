//! Saved-note history: an append-only list of formatted notes, newest
//! first, backed by a JSON file. This module is the persistence boundary;
//! callers hand it plain strings and get `Note` records back.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

use crate::structurer::FormattedNote;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub raw_text: String,
    pub formatted_text: String,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn from_formatted(formatted: FormattedNote) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: formatted.title,
            raw_text: formatted.raw_text,
            formatted_text: formatted.formatted_text,
            created_at: Utc::now(),
        }
    }

    /// Single-line preview for list displays.
    pub fn preview(&self) -> String {
        let flat = self
            .formatted_text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if flat.chars().count() > 80 {
            let cut: String = flat.chars().take(80).collect();
            format!("{}...", cut)
        } else {
            flat
        }
    }
}

/// Parameters for searching the note history.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Text query matched against title, raw and formatted text
    pub query: Option<String>,
    /// Filter by start date (YYYY-MM-DD format)
    pub from: Option<String>,
    /// Filter by end date (YYYY-MM-DD format)
    pub to: Option<String>,
    /// Maximum number of results
    pub limit: usize,
}

impl SearchParams {
    pub fn new() -> Self {
        Self {
            limit: 20,
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_date_range(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.from = from;
        self.to = to;
        self
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct NoteFile {
    notes: Vec<Note>,
}

/// JSON-file-backed note history. Notes are prepended, so the file is
/// always ordered newest first.
pub struct NoteStore {
    path: PathBuf,
}

impl NoteStore {
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::global::notes_file()?))
    }

    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Prepend a note to the history and persist it.
    pub fn append(&self, note: Note) -> Result<Note> {
        let mut file = self.load()?;
        file.notes.insert(0, note.clone());
        self.save(&file)?;
        info!("Saved note {} ({} chars)", note.id, note.formatted_text.len());
        Ok(note)
    }

    /// Most recent notes, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<Note>> {
        let file = self.load()?;
        Ok(file.notes.into_iter().take(limit).collect())
    }

    /// Search the history with optional text query and date range.
    pub fn search(&self, params: &SearchParams) -> Result<Vec<Note>> {
        let file = self.load()?;
        let query = params.query.as_deref().map(str::to_lowercase);

        let matches = file
            .notes
            .into_iter()
            .filter(|note| {
                if let Some(q) = &query {
                    let haystack = format!(
                        "{} {} {}",
                        note.title.to_lowercase(),
                        note.raw_text.to_lowercase(),
                        note.formatted_text.to_lowercase()
                    );
                    if !haystack.contains(q.as_str()) {
                        return false;
                    }
                }
                let date = note.created_at.format("%Y-%m-%d").to_string();
                if let Some(from) = &params.from {
                    if date.as_str() < from.as_str() {
                        return false;
                    }
                }
                if let Some(to) = &params.to {
                    if date.as_str() > to.as_str() {
                        return false;
                    }
                }
                true
            })
            .take(params.limit)
            .collect();

        Ok(matches)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Note>> {
        let file = self.load()?;
        Ok(file.notes.into_iter().find(|note| note.id == id))
    }

    /// Formatted text of a note, suitable for clipboard or export.
    pub fn get_text_by_id(&self, id: &str) -> Result<String> {
        self.get_by_id(id)?
            .map(|note| note.formatted_text)
            .ok_or_else(|| anyhow!("Note with ID {} not found", id))
    }

    fn load(&self) -> Result<NoteFile> {
        if !self.path.exists() {
            debug!("Note file {:?} does not exist yet", self.path);
            return Ok(NoteFile::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read note file {:?}", self.path))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse note file {:?}", self.path))
    }

    fn save(&self, file: &NoteFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let content =
            serde_json::to_string_pretty(file).context("Failed to serialize note history")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write note file {:?}", self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_note(title: &str) -> Note {
        Note::from_formatted(FormattedNote {
            raw_text: format!("raw text of {title}"),
            formatted_text: format!("formatted text of {title}"),
            title: title.to_string(),
        })
    }

    #[test]
    fn test_append_orders_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("notes.json"));

        store.append(sample_note("older")).unwrap();
        store.append(sample_note("newer")).unwrap();

        let notes = store.recent(10).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].title, "newer");
        assert_eq!(notes[1].title, "older");
    }

    #[test]
    fn test_search_by_query() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("notes.json"));

        store.append(sample_note("groceries")).unwrap();
        store.append(sample_note("standup recap")).unwrap();

        let params = SearchParams::new().with_query("grocer");
        let found = store.search(&params).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "groceries");
    }

    #[test]
    fn test_get_text_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("notes.json"));

        let saved = store.append(sample_note("memo")).unwrap();
        let text = store.get_text_by_id(&saved.id).unwrap();
        assert_eq!(text, "formatted text of memo");

        assert!(store.get_text_by_id("missing-id").is_err());
    }

    #[test]
    fn test_recent_respects_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("notes.json"));

        for i in 0..5 {
            store.append(sample_note(&format!("note {i}"))).unwrap();
        }

        assert_eq!(store.recent(3).unwrap().len(), 3);
    }

    #[test]
    fn test_preview_is_single_line_and_bounded() {
        let mut note = sample_note("long");
        note.formatted_text = "line one\nline two\n".to_string() + &"word ".repeat(50);
        let preview = note.preview();
        assert!(!preview.contains('\n'));
        assert!(preview.chars().count() <= 83);
    }
}
