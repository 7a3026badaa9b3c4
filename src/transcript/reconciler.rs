//! Reconciliation of incremental speech-recognition updates.
//!
//! Recognition engines re-send text in awkward ways: a strict continuation of
//! what they already said, a full replacement with extra context, a stale
//! fragment after an internal restart, or a partial overlap when the engine
//! rewound mid-utterance. `merge` folds any of those into one running text
//! without dropping confirmed content.

/// Merge one incoming transcript fragment into the accumulated text.
///
/// Pure and deterministic. Containment checks run before the suffix/prefix
/// overlap scan: whole-string containment is the more reliable signal when
/// the recognizer rewinds and resends a longer span.
pub fn merge(previous: &str, incoming: &str) -> String {
    // Empty/noise events leave the buffer untouched.
    if incoming.is_empty() {
        return previous.to_string();
    }
    if previous.is_empty() {
        return incoming.to_string();
    }

    // The recognizer re-sent the whole session plus a new tail, or
    // re-timestamped it so the old text sits somewhere inside. Either way
    // the incoming string is the new authoritative full text.
    if incoming.starts_with(previous) || incoming.contains(previous) {
        return incoming.to_string();
    }

    // Stale or partial restart: the incoming fragment is already contained
    // in what we have. Discarding it avoids truncating the buffer.
    if previous.contains(incoming) {
        return previous.to_string();
    }

    // Partial overlap after an engine restart: find the longest suffix of
    // `previous` equal to a prefix of `incoming`, longest-first, and append
    // only the non-overlapping remainder.
    let max_overlap = previous.len().min(incoming.len());
    for len in (1..=max_overlap).rev() {
        if !incoming.is_char_boundary(len) {
            continue;
        }
        if previous.ends_with(&incoming[..len]) {
            let mut merged = String::with_capacity(previous.len() + incoming.len() - len);
            merged.push_str(previous);
            merged.push_str(&incoming[len..]);
            return merged;
        }
    }

    // Unrelated fragments: concatenate with a single separating space.
    let mut merged = String::with_capacity(previous.len() + incoming.len() + 1);
    merged.push_str(previous);
    if !previous.ends_with(char::is_whitespace) {
        merged.push(' ');
    }
    merged.push_str(incoming);
    merged
}
