use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use super::{Language, SentenceSegmenter};

/// Sentence splitter built on UAX #29 sentence boundaries.
///
/// A boundary directly after a known abbreviation (`art.`, `núm.`) is
/// suppressed, since legal text is full of them.
#[derive(Debug, Clone, Default)]
pub struct UnicodeSentenceSegmenter {
    abbreviations: HashSet<String>,
}

impl UnicodeSentenceSegmenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_abbreviations<I, S>(abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            abbreviations: abbreviations
                .into_iter()
                .map(|a| a.as_ref().to_lowercase())
                .collect(),
        }
    }

    #[must_use]
    pub fn for_language(language: Language) -> Self {
        Self::with_abbreviations(language.abbreviations())
    }

    fn ends_with_abbreviation(&self, text: &str) -> bool {
        if self.abbreviations.is_empty() {
            return false;
        }
        let Some(last_word) = text.split_whitespace().next_back() else {
            return false;
        };
        let last_word = last_word.trim_start_matches(|c: char| !c.is_alphanumeric());
        self.abbreviations.contains(&last_word.to_lowercase())
    }
}

fn push_sentence(sentences: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_owned());
    }
}

impl SentenceSegmenter for UnicodeSentenceSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut pending = String::new();

        for piece in text.split_sentence_bounds() {
            pending.push_str(piece);
            if self.ends_with_abbreviation(&pending) {
                continue;
            }
            push_sentence(&mut sentences, &pending);
            pending.clear();
        }
        push_sentence(&mut sentences, &pending);

        sentences
    }
}
