use tracing::debug;

use super::merge;

/// The single authoritative transcript for one recording session.
///
/// Created empty at session start, fed one update at a time while the
/// recognizer is running, drained once at session stop. Confirmed content is
/// never dropped except by `reset`.
#[derive(Debug, Default)]
pub struct TranscriptSession {
    text: String,
}

impl TranscriptSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one incremental update into the buffer and return the current
    /// text. Updates must be applied in arrival order.
    pub fn apply(&mut self, incoming: &str) -> &str {
        let merged = merge(&self.text, incoming);
        if merged.len() != self.text.len() {
            debug!(
                "Transcript grew from {} to {} chars",
                self.text.len(),
                merged.len()
            );
        }
        self.text = merged;
        &self.text
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Take the final transcript out of the session, leaving it empty and
    /// ready for the next recording.
    pub fn finish(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn reset(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_accumulates_in_order() {
        let mut session = TranscriptSession::new();
        session.apply("hello");
        session.apply("hello there");
        session.apply("there friend");
        assert_eq!(session.text(), "hello there friend");
    }

    #[test]
    fn test_finish_drains_the_buffer() {
        let mut session = TranscriptSession::new();
        session.apply("note to self");
        assert_eq!(session.finish(), "note to self");
        assert!(session.is_empty());
    }

    #[test]
    fn test_reset_discards_content() {
        let mut session = TranscriptSession::new();
        session.apply("old recording");
        session.reset();
        assert!(session.is_empty());
        session.apply("new recording");
        assert_eq!(session.text(), "new recording");
    }
}
