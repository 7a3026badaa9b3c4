//! System instructions for the remote structuring and title calls, plus the
//! code-fence stripping some models wrap their completions in.

pub const STRUCTURE_SYSTEM_PROMPT: &str = "\
You clean up raw voice-note transcripts into readable notes. Rules:
- Preserve ALL content from the source. Never summarize away or drop information.
- Remove filler words only (um, uh, like, you know, so basically).
- Fix grammar, punctuation and capitalization.
- Break the text into paragraphs every 3-4 sentences.
- Format enumerations as bullet lists using the \u{2022} marker.
- If the content is about a meeting, organize it into Discussion Points, \
Action Items and Questions sections.
- Keep the source language of the transcript; do not translate.
Return only the cleaned note text, with no commentary.";

pub const TITLE_SYSTEM_PROMPT: &str = "\
Generate a short title of 4-10 words for the note the user sends. \
Reply with the title as plain text only: no quotes, no punctuation at the \
end, no commentary.";

pub fn structure_user_message(raw_text: &str) -> String {
    format!("Clean up and structure this voice note transcript:\n\n{raw_text}")
}

pub fn title_user_message(text: &str) -> String {
    format!("Write a title for this note:\n\n{text}")
}

/// Strip a wrapping Markdown code fence from a completion, if present.
/// Models sometimes return ```...``` around the requested plain text even
/// when told not to.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut lines = trimmed.lines();
    // Opening fence, possibly with a language tag.
    lines.next();

    let mut inner: Vec<&str> = lines.collect();
    if inner.last().map(|line| line.trim() == "```").unwrap_or(false) {
        inner.pop();
    }

    inner.join("\n").trim().to_string()
}
