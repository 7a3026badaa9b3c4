//! End-to-end structuring behavior with the remote tier unavailable: the
//! structurer must always return usable text, degrading through the
//! heuristic formatter without ever surfacing an error.

use async_trait::async_trait;
use voxnote::structurer::{CompletionError, CompletionProvider, Structurer};

/// Provider that always fails, as if the endpoint were unreachable.
struct UnreachableProvider;

#[async_trait]
impl CompletionProvider for UnreachableProvider {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn complete(
        &self,
        _system_prompt: &str,
        _user_message: &str,
    ) -> Result<String, CompletionError> {
        Err(CompletionError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        })
    }
}

/// Provider that answers, as the hosted endpoint would.
struct CannedProvider(&'static str);

#[async_trait]
impl CompletionProvider for CannedProvider {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn complete(
        &self,
        _system_prompt: &str,
        _user_message: &str,
    ) -> Result<String, CompletionError> {
        Ok(self.0.to_string())
    }
}

fn offline() -> Structurer {
    Structurer::new(Box::new(UnreachableProvider))
}

#[tokio::test]
async fn structure_never_fails_on_any_input() {
    let structurer = offline();
    let inputs = [
        "",
        " ",
        "x",
        "no sentence boundaries at all",
        "?!.",
        "Ünïcödéテキスト。",
        "a. b. c. d. e. f. g.",
    ];

    for input in inputs {
        // The contract is simply that this returns without panicking and
        // derives its output from the input.
        let _ = structurer.structure(input).await;
    }
}

#[tokio::test]
async fn meeting_transcript_is_sectioned_offline() {
    let structurer = offline();
    let raw = "We discussed the budget. We need to finalize the report by Friday. Is the deadline fixed?";
    let output = structurer.structure(raw).await;

    assert!(output.contains("Discussion Points:"));
    assert!(output.contains("Action Items:"));
    assert!(output.contains("Questions:"));
    assert!(output.contains("\u{2022} Is the deadline fixed?"));
}

#[tokio::test]
async fn long_plain_transcript_becomes_bullets_offline() {
    let structurer = offline();
    let raw = "Packed the bags. Checked the tickets. Called the taxi. Locked the door. \
               Dropped the keys. Caught the train. Arrived on time.";
    let output = structurer.structure(raw).await;

    assert_eq!(output.lines().count(), 7);
    assert!(output.lines().all(|line| line.starts_with("\u{2022} ")));
}

#[tokio::test]
async fn remote_completion_wins_when_available() {
    let structurer = Structurer::new(Box::new(CannedProvider(
        "```markdown\nPolished note text.\n```",
    )));
    let output = structurer.structure("raw rambling words").await;
    assert_eq!(output, "Polished note text.");
}

#[tokio::test]
async fn blank_remote_completion_falls_through_to_heuristics() {
    let structurer = Structurer::new(Box::new(CannedProvider("```\n```")));
    let output = structurer.structure("Still the raw words.").await;
    assert_eq!(output, "Still the raw words.");
}

#[tokio::test]
async fn title_degrades_to_first_sentence() {
    let structurer = offline();
    let title = structurer
        .generate_title("um so basically we need to ship this by Friday. Then we celebrate.")
        .await;
    assert_eq!(title, "um so basically we need to ship this by Friday");
}

#[tokio::test]
async fn format_note_bundles_all_three_strings() {
    let structurer = offline();
    let note = structurer
        .format_note("Grocery run tomorrow. Milk and eggs first.")
        .await;

    assert_eq!(note.raw_text, "Grocery run tomorrow. Milk and eggs first.");
    assert!(!note.formatted_text.is_empty());
    assert_eq!(note.title, "Grocery run tomorrow");
}
