//! The fixed vocabulary and its output file names.

use serde::Serialize;

/// Phrases voiced before the alphabet and digits, in generation order.
pub const PHRASES: &[&str] = &[
    "backspace",
    "delete",
    "space",
    "enter",
    "shift",
    "caps lock",
    "period",
    "comma",
    "question mark",
    "exclamation point",
    "apostrophe",
    "at sign",
    "dash",
    "slash",
    "pound",
    "star",
    "dialing",
    "calling",
    "voicemail",
    "contacts",
    "call log",
    "no contacts",
    "no matches",
    "cancel",
    "home screen",
    "you are about to call",
    "press call to dial",
    "top of list",
    "end of list",
];

/// Prefix for digit file names, so `5` becomes `num_5`.
pub const DIGIT_PREFIX: &str = "num_";

/// What kind of lexicon entry this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A word or multi-word phrase.
    Phrase,
    /// A single lowercase letter.
    Letter,
    /// A single digit.
    Digit,
}

/// One word, phrase or character to voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexiconEntry {
    text: String,
    kind: EntryKind,
}

impl LexiconEntry {
    /// Classifies `text` as a letter, digit or phrase.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut chars = text.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => EntryKind::Digit,
            (Some(c), None) if c.is_ascii_lowercase() => EntryKind::Letter,
            _ => EntryKind::Phrase,
        };
        Self { text, kind }
    }

    /// The text handed to the synthesizer.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Output file name without extension.
    ///
    /// Spaces become underscores; digits get [`DIGIT_PREFIX`].
    pub fn file_stem(&self) -> String {
        match self.kind {
            EntryKind::Digit => format!("{}{}", DIGIT_PREFIX, self.text),
            EntryKind::Letter | EntryKind::Phrase => self.text.replace(' ', "_"),
        }
    }

    /// Output file name with `extension`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.file_stem(), extension)
    }
}

/// An ordered list of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    /// Phrases, then `a` through `z`, then `0` through `9`.
    pub fn standard() -> Self {
        let phrases = PHRASES.iter().map(|p| LexiconEntry::new(*p));
        let letters = ('a'..='z').map(|c| LexiconEntry::new(c.to_string()));
        let digits = ('0'..='9').map(|c| LexiconEntry::new(c.to_string()));

        Self {
            entries: phrases.chain(letters).chain(digits).collect(),
        }
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the entry with exactly this text.
    pub fn find(&self, text: &str) -> Option<&LexiconEntry> {
        self.entries.iter().find(|e| e.text == text)
    }

    /// Keeps only the entries whose text is in `texts`, preserving order.
    ///
    /// Returns the first text that names no entry as the error.
    pub fn restrict<S: AsRef<str>>(&self, texts: &[S]) -> Result<Self, String> {
        let wanted: Vec<&str> = texts.iter().map(|t| t.as_ref()).collect();
        if let Some(unknown) = wanted.iter().find(|t| self.find(t).is_none()) {
            return Err(unknown.to_string());
        }

        Ok(Self {
            entries: self
                .entries
                .iter()
                .filter(|e| wanted.contains(&e.text.as_str()))
                .cloned()
                .collect(),
        })
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_classification() {
        assert_eq!(LexiconEntry::new("5").kind(), EntryKind::Digit);
        assert_eq!(LexiconEntry::new("q").kind(), EntryKind::Letter);
        assert_eq!(LexiconEntry::new("caps lock").kind(), EntryKind::Phrase);
        assert_eq!(LexiconEntry::new("Q").kind(), EntryKind::Phrase);
        assert_eq!(LexiconEntry::new("42").kind(), EntryKind::Phrase);
    }

    #[test]
    fn test_file_stems() {
        assert_eq!(LexiconEntry::new("question mark").file_stem(), "question_mark");
        assert_eq!(
            LexiconEntry::new("you are about to call").file_stem(),
            "you_are_about_to_call"
        );
        assert_eq!(LexiconEntry::new("k").file_stem(), "k");
        assert_eq!(LexiconEntry::new("5").file_stem(), "num_5");
        assert_eq!(LexiconEntry::new("0").file_name("wav"), "num_0.wav");
    }

    #[test]
    fn test_standard_order() {
        let lexicon = Lexicon::standard();
        let entries = lexicon.entries();
        assert_eq!(lexicon.len(), PHRASES.len() + 26 + 10);

        assert_eq!(entries[0].text(), PHRASES[0]);
        assert_eq!(entries[PHRASES.len()].text(), "a");
        assert_eq!(entries[PHRASES.len() + 25].text(), "z");
        assert_eq!(entries[PHRASES.len() + 26].text(), "0");
        assert_eq!(entries.last().unwrap().text(), "9");

        assert!(entries[..PHRASES.len()]
            .iter()
            .all(|e| e.kind() == EntryKind::Phrase));
    }

    #[test]
    fn test_no_stem_collisions() {
        let lexicon = Lexicon::standard();
        let stems: HashSet<String> = lexicon.entries().iter().map(|e| e.file_stem()).collect();
        assert_eq!(stems.len(), lexicon.len());
    }

    #[test]
    fn test_digit_stems_distinct_from_single_chars() {
        let lexicon = Lexicon::standard();
        for digit in lexicon.entries().iter().filter(|e| e.kind() == EntryKind::Digit) {
            let stem = digit.file_stem();
            assert!(stem.starts_with(DIGIT_PREFIX));
            assert!(stem.len() > 1);
            assert!(lexicon
                .entries()
                .iter()
                .filter(|e| e.kind() != EntryKind::Digit)
                .all(|e| e.file_stem() != stem));
        }
    }

    #[test]
    fn test_restrict_keeps_lexicon_order() {
        let lexicon = Lexicon::standard();
        let subset = lexicon.restrict(&["7", "a", "delete"]).unwrap();
        let texts: Vec<&str> = subset.entries().iter().map(|e| e.text()).collect();
        assert_eq!(texts, vec!["delete", "a", "7"]);
    }

    #[test]
    fn test_restrict_unknown() {
        let lexicon = Lexicon::standard();
        assert_eq!(lexicon.restrict(&["a", "zebra"]).unwrap_err(), "zebra");
    }
}
