use anyhow::{anyhow, Result};
use arboard::Clipboard;
use std::fs;
use std::path::PathBuf;

use super::args::NotesCliArgs;
use crate::notes::{Note, NoteStore, SearchParams};

pub fn handle_notes_command(args: NotesCliArgs) -> Result<()> {
    let store = NoteStore::open_default()?;

    // If copy flag is provided, copy that specific note to clipboard
    if let Some(id) = args.copy {
        let text = store.get_text_by_id(&id)?;

        let mut clipboard =
            Clipboard::new().map_err(|e| anyhow!("Failed to initialize clipboard: {}", e))?;
        clipboard
            .set_text(&text)
            .map_err(|e| anyhow!("Failed to copy to clipboard: {}", e))?;

        println!("Copied note {} to clipboard ({} chars)", id, text.len());
        return Ok(());
    }

    // Export a note as a plain-text file
    if let Some(id) = args.export {
        let note = store
            .get_by_id(&id)?
            .ok_or_else(|| anyhow!("Note with ID {} not found", id))?;

        let path = args.output.unwrap_or_else(|| export_path_for(&note));
        fs::write(&path, &note.formatted_text)?;

        println!("Exported note {} to {}", id, path.display());
        return Ok(());
    }

    // Otherwise, search and display results
    let params = SearchParams {
        query: args.query,
        from: args.from,
        to: args.to,
        limit: args.limit,
    };
    let notes = store.search(&params)?;

    if notes.is_empty() {
        println!("No notes found matching your criteria.");
        return Ok(());
    }

    println!("Found {} note(s):\n", notes.len());

    for note in notes {
        println!("ID: {}", note.id);
        println!("Date: {}", note.created_at.format("%Y-%m-%d %H:%M"));
        println!("Title: {}", note.title);
        println!("Text: {}", note.preview());
        println!("---");
    }

    println!("\nTo copy a note to clipboard, use: voxnote notes --copy <ID>");

    Ok(())
}

fn export_path_for(note: &Note) -> PathBuf {
    let slug: String = note
        .title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        PathBuf::from(format!("{}.txt", note.id))
    } else {
        PathBuf::from(format!("{}.txt", slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structurer::FormattedNote;

    #[test]
    fn test_export_path_slugifies_the_title() {
        let note = Note::from_formatted(FormattedNote {
            raw_text: String::new(),
            formatted_text: String::new(),
            title: "Groceries & Errands!".to_string(),
        });
        assert_eq!(export_path_for(&note), PathBuf::from("groceries-errands.txt"));
    }

    #[test]
    fn test_export_path_falls_back_to_id_for_empty_title() {
        let note = Note::from_formatted(FormattedNote {
            raw_text: String::new(),
            formatted_text: String::new(),
            title: "!!!".to_string(),
        });
        assert_eq!(
            export_path_for(&note),
            PathBuf::from(format!("{}.txt", note.id))
        );
    }
}
