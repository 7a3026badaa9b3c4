//! Rule-based note formatting, used whenever the remote structuring call is
//! unavailable. Classifies the transcript as meeting notes, a list, or plain
//! prose, and formats accordingly. Signal word lists carry romanized Hindi
//! equivalents alongside the English ones, matching the transcripts the
//! recognizer produces for mixed-language speakers.

use regex::Regex;
use tracing::debug;

/// Classification of a single sentence when meeting-style structuring is
/// selected. Buckets are mutually exclusive, assigned in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceKind {
    Question,
    ActionItem,
    Discussion,
    Note,
}

/// Document-level signals detected over the normalized transcript.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSignals {
    pub is_meeting: bool,
    pub is_list: bool,
    pub has_action_items: bool,
}

pub struct HeuristicFormatter {
    space_before_punct: Regex,
    missing_space_after_punct: Regex,
    meeting_signal: Regex,
    list_signal: Regex,
    action_signal: Regex,
    transition_start: Regex,
    discussion_sentence: Regex,
    action_sentence: Regex,
    leading_pronoun: Regex,
    list_marker: Regex,
}

impl HeuristicFormatter {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            space_before_punct: Regex::new(r"\s+([.,!?;:])")?,
            missing_space_after_punct: Regex::new(r"([.,!?;:])(\S)")?,
            meeting_signal: Regex::new(
                r"(?i)\b(meeting|meet|discuss\w*|agenda|action item\w*|standup|sync|team|project|client|stakeholder)\b",
            )?,
            list_signal: Regex::new(
                r"(?i)\b(first(ly)?|second(ly)?|third(ly)?|finally|lastly|step one|number (one|two|three)|pehle|pehla|doosra|dusra|teesra|phir|aakhir)\b",
            )?,
            action_signal: Regex::new(
                r"(?i)\b(need(s)? to|have to|has to|should|must|will|going to|gonna|let'?s|chahiye|karna hai|karni hai|karenge)\b",
            )?,
            transition_start: Regex::new(
                r"(?i)^(however|but|also|next|then|anyway|additionally|moreover|meanwhile|lekin|phir|waise|aur|toh)\b",
            )?,
            discussion_sentence: Regex::new(
                r"(?i)\b(discuss\w*|talk\w* about|went over|review\w*|decid\w*|agree\w*|consider\w*)\b",
            )?,
            action_sentence: Regex::new(
                r"(?i)\b(need(s)? to|have to|has to|should|must|will|going to|gonna|deadline|due (by|on)|by (monday|tuesday|wednesday|thursday|friday|saturday|sunday|tomorrow|tonight|next week)|chahiye|karna hai|karni hai)\b",
            )?,
            leading_pronoun: Regex::new(r"(?i)^(i|we|you|they|he|she|it)\s+")?,
            list_marker: Regex::new(r"^\s*([-*\u{2022}\u{2023}\u{00b7}]|\d+[.)])\s*")?,
        })
    }

    /// Collapse whitespace runs to single spaces, drop spaces before
    /// punctuation and guarantee one space after it. Idempotent.
    pub fn normalize(&self, raw: &str) -> String {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let no_space_before = self.space_before_punct.replace_all(&collapsed, "$1");
        self.missing_space_after_punct
            .replace_all(&no_space_before, "$1 $2")
            .trim()
            .to_string()
    }

    pub fn detect_signals(&self, text: &str) -> ContentSignals {
        ContentSignals {
            is_meeting: self.meeting_signal.is_match(text),
            is_list: self.list_signal.is_match(text),
            has_action_items: self.action_signal.is_match(text),
        }
    }

    pub fn classify_sentence(&self, sentence: &str) -> SentenceKind {
        if sentence.contains('?') {
            SentenceKind::Question
        } else if self.action_sentence.is_match(sentence) {
            SentenceKind::ActionItem
        } else if self.discussion_sentence.is_match(sentence) {
            SentenceKind::Discussion
        } else {
            SentenceKind::Note
        }
    }

    /// Format a raw transcript into readable notes using local rules only.
    pub fn structure(&self, raw: &str) -> String {
        let normalized = self.normalize(raw);
        if normalized.is_empty() {
            return normalized;
        }

        let sentences = split_sentences(&normalized);
        if sentences.is_empty() {
            return normalized;
        }

        let signals = self.detect_signals(&normalized);
        debug!(
            "Heuristic structuring: {} sentences, signals {:?}",
            sentences.len(),
            signals
        );

        if signals.is_meeting && (signals.has_action_items || signals.is_list) {
            self.format_meeting(&sentences)
        } else if signals.is_list || sentences.len() > 5 {
            self.format_list(&sentences)
        } else {
            self.format_paragraphs(&sentences)
        }
    }

    /// Group consecutive sentences into paragraphs of up to four, breaking
    /// earlier when a sentence opens with a transition word (a topic-change
    /// signal).
    fn format_paragraphs(&self, sentences: &[String]) -> String {
        let mut paragraphs: Vec<String> = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for sentence in sentences {
            let topic_change = self.transition_start.is_match(sentence);
            if !current.is_empty() && (current.len() >= 4 || topic_change) {
                paragraphs.push(current.join(" "));
                current.clear();
            }
            current.push(sentence);
        }
        if !current.is_empty() {
            paragraphs.push(current.join(" "));
        }

        paragraphs.join("\n\n")
    }

    /// One bullet per sentence. Any list marker the speaker dictated is
    /// stripped before the uniform bullet is added.
    fn format_list(&self, sentences: &[String]) -> String {
        sentences
            .iter()
            .map(|sentence| {
                let stripped = self.list_marker.replace(sentence, "");
                format!("\u{2022} {}", stripped.trim())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Bucket every sentence and emit the non-empty sections in fixed order.
    fn format_meeting(&self, sentences: &[String]) -> String {
        let mut discussion: Vec<String> = Vec::new();
        let mut actions: Vec<String> = Vec::new();
        let mut questions: Vec<String> = Vec::new();
        let mut notes: Vec<String> = Vec::new();

        for sentence in sentences {
            match self.classify_sentence(sentence) {
                SentenceKind::Question => questions.push(sentence.clone()),
                SentenceKind::ActionItem => {
                    let stripped = self.leading_pronoun.replace(sentence, "");
                    actions.push(capitalize_first(stripped.trim()));
                }
                SentenceKind::Discussion => discussion.push(sentence.clone()),
                SentenceKind::Note => notes.push(sentence.clone()),
            }
        }

        let mut sections: Vec<String> = Vec::new();
        if !discussion.is_empty() {
            sections.push(format!("Discussion Points:\n{}", bullet_lines(&discussion)));
        }
        if !actions.is_empty() {
            sections.push(format!("Action Items:\n{}", bullet_lines(&actions)));
        }
        if !questions.is_empty() {
            sections.push(format!("Questions:\n{}", bullet_lines(&questions)));
        }
        if !notes.is_empty() {
            sections.push(format!("Notes:\n{}", notes.join(" ")));
        }

        if sections.is_empty() {
            return sentences.join(" ");
        }

        sections.join("\n\n")
    }
}

/// Split normalized text into sentences. A sentence ends at `.`, `!` or `?`
/// followed by whitespace; a trailing fragment without terminal punctuation
/// still counts as a sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            if let Some(next) = chars.peek() {
                if next.is_whitespace() {
                    let sentence = current.trim();
                    if !sentence.is_empty() {
                        sentences.push(sentence.to_string());
                    }
                    current.clear();
                }
            }
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

/// Last-resort formatting: split on sentence punctuation and bullet whatever
/// remains. If the text has no sentence boundaries at all it passes through
/// unchanged.
pub fn basic_bullets(raw: &str) -> String {
    let fragments: Vec<&str> = raw
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect();

    if fragments.is_empty() {
        return raw.trim().to_string();
    }

    fragments
        .iter()
        .map(|fragment| format!("\u{2022} {fragment}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bullet_lines(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\u{2022} {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> HeuristicFormatter {
        HeuristicFormatter::new().unwrap()
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        let f = formatter();
        assert_eq!(f.normalize("  hello   world  "), "hello world");
    }

    #[test]
    fn test_normalize_fixes_punctuation_spacing() {
        let f = formatter();
        assert_eq!(f.normalize("hello , world .next"), "hello, world. next");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let f = formatter();
        let once = f.normalize("so  um ,we met .then we   left!now what");
        let twice = f.normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_split_sentences_on_terminal_punctuation() {
        let sentences = split_sentences("First one. Second one! Third one? Trailing bit");
        assert_eq!(
            sentences,
            vec!["First one.", "Second one!", "Third one?", "Trailing bit"]
        );
    }

    #[test]
    fn test_split_sentences_keeps_inline_numbers_together() {
        // "3.5" has no whitespace after the dot, so it does not end a sentence.
        let sentences = split_sentences("Version 3.5 shipped. Everyone cheered.");
        assert_eq!(sentences, vec!["Version 3.5 shipped.", "Everyone cheered."]);
    }

    #[test]
    fn test_meeting_sentences_land_in_their_sections() {
        let f = formatter();
        let raw = "We discussed the budget. We need to finalize the report by Friday. Is the deadline fixed?";
        let output = f.structure(raw);

        assert!(output.contains("Discussion Points:\n\u{2022} We discussed the budget."));
        assert!(output.contains("Action Items:\n\u{2022} Need to finalize the report by Friday."));
        assert!(output.contains("Questions:\n\u{2022} Is the deadline fixed?"));
        // Sections appear in the fixed order.
        let d = output.find("Discussion Points").unwrap();
        let a = output.find("Action Items").unwrap();
        let q = output.find("Questions").unwrap();
        assert!(d < a && a < q);
    }

    #[test]
    fn test_many_plain_sentences_become_a_list() {
        let f = formatter();
        let raw = "I bought apples. I bought pears. The sky was grey. The bus was late. \
                   Lunch was soup. The phone rang twice. Dinner was pasta.";
        let output = f.structure(raw);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 7);
        for line in &lines {
            assert!(line.starts_with("\u{2022} "), "not a bullet: {line}");
        }
        assert_eq!(lines[0], "\u{2022} I bought apples.");
        assert_eq!(lines[6], "\u{2022} Dinner was pasta.");
    }

    #[test]
    fn test_list_formatting_strips_dictated_markers() {
        let f = formatter();
        let sentences = vec![
            "- first item.".to_string(),
            "2. second item.".to_string(),
            "\u{2022} third item.".to_string(),
        ];
        let output = f.format_list(&sentences);
        assert_eq!(
            output,
            "\u{2022} first item.\n\u{2022} second item.\n\u{2022} third item."
        );
    }

    #[test]
    fn test_short_prose_becomes_paragraphs() {
        let f = formatter();
        let raw = "The trip went well. The weather held up. We walked a lot.";
        let output = f.structure(raw);
        assert!(!output.contains('\u{2022}'));
        assert_eq!(output, "The trip went well. The weather held up. We walked a lot.");
    }

    #[test]
    fn test_paragraph_breaks_on_transition_word() {
        let f = formatter();
        let sentences = vec![
            "The trip went well.".to_string(),
            "The weather held up.".to_string(),
            "However the hotel was noisy.".to_string(),
        ];
        let output = f.format_paragraphs(&sentences);
        assert_eq!(
            output,
            "The trip went well. The weather held up.\n\nHowever the hotel was noisy."
        );
    }

    #[test]
    fn test_paragraph_cap_of_four_sentences() {
        let f = formatter();
        let sentences: Vec<String> = (1..=5).map(|i| format!("Sentence {i}.")).collect();
        let output = f.format_paragraphs(&sentences);
        let paragraphs: Vec<&str> = output.split("\n\n").collect();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(
            paragraphs[0],
            "Sentence 1. Sentence 2. Sentence 3. Sentence 4."
        );
        assert_eq!(paragraphs[1], "Sentence 5.");
    }

    #[test]
    fn test_transliterated_signals_are_detected() {
        let f = formatter();
        let signals = f.detect_signals("pehle dukaan jana hai phir ghar aana hai");
        assert!(signals.is_list);

        let signals = f.detect_signals("yeh kaam karna hai aaj");
        assert!(signals.has_action_items);
    }

    #[test]
    fn test_basic_bullets_fallback() {
        assert_eq!(
            basic_bullets("one thing. another thing! done?"),
            "\u{2022} one thing\n\u{2022} another thing\n\u{2022} done"
        );
    }

    #[test]
    fn test_basic_bullets_without_boundaries_passes_through() {
        assert_eq!(basic_bullets("  just words  "), "just words");
    }

    #[test]
    fn test_structure_handles_degenerate_inputs() {
        let f = formatter();
        assert_eq!(f.structure(""), "");
        assert_eq!(f.structure("x"), "x");
        assert_eq!(f.structure("no punctuation here at all"), "no punctuation here at all");
    }
}
