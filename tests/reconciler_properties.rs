//! Merge-contract tests for the transcript reconciler, exercised through the
//! public API exactly as the session machine uses it.

use voxnote::merge;

#[test]
fn empty_operands_are_identity() {
    for text in ["", "hello", "hello world.", "  spaced  "] {
        assert_eq!(merge(text, ""), text);
        assert_eq!(merge("", text), text);
    }
}

#[test]
fn prefix_continuation_takes_incoming() {
    let cases = [
        ("hello", "hello world"),
        ("we were", "we were talking about the launch"),
        ("a", "a b c d"),
    ];
    for (previous, incoming) in cases {
        assert_eq!(merge(previous, incoming), incoming);
    }
}

#[test]
fn contained_incoming_never_truncates() {
    // A stale restart fragment already present in the buffer is discarded;
    // the buffer must never regress.
    let previous = "first we talked about budget then headcount";
    for incoming in ["budget", "we talked", "then headcount"] {
        assert_eq!(merge(previous, incoming), previous);
    }
}

#[test]
fn overlap_is_stitched_without_duplication() {
    assert_eq!(merge("hello wor", "world peace"), "hello world peace");
    assert_eq!(
        merge("let's meet on tues", "tuesday at noon"),
        "let's meet on tuesday at noon"
    );
}

#[test]
fn unrelated_fragments_concatenate_with_one_space() {
    assert_eq!(merge("foo", "bar"), "foo bar");
    assert_eq!(merge("foo ", "bar"), "foo bar");
}

#[test]
fn merge_is_deterministic() {
    let previous = "the quick brown fox";
    let incoming = "fox jumps over";
    let first = merge(previous, incoming);
    let second = merge(previous, incoming);
    assert_eq!(first, second);
}

#[test]
fn simulated_recognizer_stream_stays_coherent() {
    // A realistic event stream: continuations, a duplicate, a restart with
    // overlap, and an unrelated trailing fragment.
    let events = [
        "okay quick note",
        "okay quick note about the",
        "okay quick note about the offsite",
        "okay quick note about the offsite", // duplicate
        "the offsite we should book rooms",  // restart with overlap
        "by thursday",                       // no overlap
    ];

    let mut transcript = String::new();
    for event in events {
        transcript = merge(&transcript, event);
    }

    assert_eq!(
        transcript,
        "okay quick note about the offsite we should book rooms by thursday"
    );
}
