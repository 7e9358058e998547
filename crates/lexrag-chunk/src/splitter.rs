use std::collections::VecDeque;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ChunkingError;
use crate::types::{Document, Segment};

static SENTENCE_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    /// Upper bound on segment length, in characters.
    pub max_chars: usize,
    /// Characters carried over between consecutive segments.
    pub overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            max_chars: 512,
            overlap: 0,
        }
    }
}

/// Separator levels, finest-grained boundary first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Paragraph,
    Line,
    SentenceEnd,
    Whitespace,
    Char,
}

const HIERARCHY: [Separator; 5] = [
    Separator::Paragraph,
    Separator::Line,
    Separator::SentenceEnd,
    Separator::Whitespace,
    Separator::Char,
];

impl Separator {
    fn occurs_in(self, text: &str) -> bool {
        match self {
            Self::Paragraph => text.contains("\n\n"),
            Self::Line => text.contains('\n'),
            Self::SentenceEnd => SENTENCE_END_RE.is_match(text),
            Self::Whitespace => text.contains(char::is_whitespace),
            Self::Char => !text.is_empty(),
        }
    }

    /// Byte offsets at which a new piece starts. The separator itself stays
    /// attached to the piece it opens, except sentence punctuation which stays
    /// with the sentence it closes.
    fn boundaries(self, text: &str) -> Vec<usize> {
        match self {
            Self::Paragraph => text.match_indices("\n\n").map(|(i, _)| i).collect(),
            Self::Line => text.match_indices('\n').map(|(i, _)| i).collect(),
            Self::SentenceEnd => SENTENCE_END_RE
                .find_iter(text)
                .map(|m| m.start() + 1)
                .collect(),
            Self::Whitespace => WHITESPACE_RE.find_iter(text).map(|m| m.start()).collect(),
            Self::Char => text.char_indices().skip(1).map(|(i, _)| i).collect(),
        }
    }

    fn split(self, text: &str) -> Vec<&str> {
        let mut pieces = Vec::new();
        let mut start = 0;
        for boundary in self.boundaries(text) {
            if boundary > start {
                pieces.push(&text[start..boundary]);
                start = boundary;
            }
        }
        if start < text.len() {
            pieces.push(&text[start..]);
        }
        pieces
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn push_trimmed(out: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_owned());
    }
}

/// Splits documents into contiguous segments of at most `max_chars` characters,
/// preferring paragraph, line, sentence and word boundaries in that order.
#[derive(Debug, Clone)]
pub struct FixedSizeSplitter {
    config: SplitterConfig,
}

impl FixedSizeSplitter {
    /// # Errors
    ///
    /// Returns [`ChunkingError::InvalidConfig`] if `max_chars` is zero or the
    /// overlap is not smaller than `max_chars`.
    pub fn new(config: SplitterConfig) -> Result<Self, ChunkingError> {
        if config.max_chars == 0 {
            return Err(ChunkingError::InvalidConfig(
                "max_chars must be greater than zero".into(),
            ));
        }
        if config.overlap >= config.max_chars {
            return Err(ChunkingError::InvalidConfig(format!(
                "overlap ({}) must be smaller than max_chars ({})",
                config.overlap, config.max_chars
            )));
        }
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    #[must_use]
    pub fn split(&self, document: &Document) -> Vec<Segment> {
        self.split_text(&document.content)
            .into_iter()
            .map(|content| Segment {
                content,
                metadata: document.metadata.clone(),
            })
            .collect()
    }

    #[must_use]
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let mut out = Vec::new();
        self.split_recursive(text, &HIERARCHY, &mut out);
        out
    }

    fn split_recursive(&self, text: &str, levels: &[Separator], out: &mut Vec<String>) {
        let Some(pos) = levels.iter().position(|s| s.occurs_in(text)) else {
            push_trimmed(out, text);
            return;
        };
        let finer = &levels[pos + 1..];

        let mut fitting: Vec<&str> = Vec::new();
        for piece in levels[pos].split(text) {
            if char_len(piece) < self.config.max_chars {
                fitting.push(piece);
                continue;
            }
            if !fitting.is_empty() {
                self.merge(&fitting, out);
                fitting.clear();
            }
            if finer.is_empty() {
                push_trimmed(out, piece);
            } else {
                self.split_recursive(piece, finer, out);
            }
        }
        if !fitting.is_empty() {
            self.merge(&fitting, out);
        }
    }

    /// Greedily packs pieces shorter than the limit back into segments.
    fn merge(&self, pieces: &[&str], out: &mut Vec<String>) {
        let max = self.config.max_chars;
        let overlap = self.config.overlap;
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0;

        for &piece in pieces {
            let len = char_len(piece);
            if total + len > max && !window.is_empty() {
                push_trimmed(out, &window.iter().map(|(p, _)| *p).collect::<String>());
                while total > overlap || (total + len > max && total > 0) {
                    let Some((_, dropped)) = window.pop_front() else {
                        break;
                    };
                    total -= dropped;
                }
            }
            window.push_back((piece, len));
            total += len;
        }

        if !window.is_empty() {
            push_trimmed(out, &window.iter().map(|(p, _)| *p).collect::<String>());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metadata;

    fn splitter(max_chars: usize) -> FixedSizeSplitter {
        FixedSizeSplitter::new(SplitterConfig {
            max_chars,
            overlap: 0,
        })
        .unwrap()
    }

    fn make_doc(content: &str) -> Document {
        Document::new(content, Metadata::new().with(Metadata::SOURCE, "test"))
    }

    #[test]
    fn empty_document() {
        assert!(splitter(10).split(&make_doc("")).is_empty());
    }

    #[test]
    fn whitespace_only_document() {
        assert!(splitter(10).split(&make_doc(" \n\n\t  ")).is_empty());
    }

    #[test]
    fn short_document_is_single_segment() {
        let segments = splitter(512).split(&make_doc("  Artículo 1. Objeto.  "));
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].content, "Artículo 1. Objeto.");
    }

    #[test]
    fn prefers_paragraph_breaks() {
        let segments = splitter(20).split_text("First paragraph.\n\nSecond paragraph.");
        assert_eq!(segments, vec!["First paragraph.", "Second paragraph."]);
    }

    #[test]
    fn small_paragraphs_are_merged() {
        let segments = splitter(100).split_text("Uno.\n\nDos.\n\nTres.");
        assert_eq!(segments, vec!["Uno.\n\nDos.\n\nTres."]);
    }

    #[test]
    fn falls_back_to_sentences_inside_long_paragraph() {
        let text = "Primera oración corta. Segunda oración corta. Tercera.";
        let segments = splitter(25).split_text(text);
        assert_eq!(
            segments,
            vec!["Primera oración corta.", "Segunda oración corta.", "Tercera."]
        );
    }

    #[test]
    fn falls_back_to_words() {
        let segments = splitter(12).split_text("alpha beta gamma delta");
        assert_eq!(segments, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn falls_back_to_raw_characters() {
        let segments = splitter(4).split_text("abcdefghij");
        assert_eq!(segments, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let segments = splitter(3).split_text("ñáéíó");
        assert_eq!(segments, vec!["ñáé", "íó"]);
    }

    #[test]
    fn metadata_inherited_by_every_segment() {
        let doc = make_doc("uno dos tres cuatro cinco seis siete");
        let segments = splitter(10).split(&doc);
        assert!(segments.len() > 1);
        for segment in &segments {
            assert_eq!(segment.metadata, doc.metadata);
        }
    }

    #[test]
    fn overlap_repeats_trailing_words() {
        let splitter = FixedSizeSplitter::new(SplitterConfig {
            max_chars: 11,
            overlap: 6,
        })
        .unwrap();
        let segments = splitter.split_text("aa bb cc dd ee");
        assert_eq!(segments, vec!["aa bb cc dd", "cc dd ee"]);
    }

    #[test]
    fn zero_max_chars_rejected() {
        let result = FixedSizeSplitter::new(SplitterConfig {
            max_chars: 0,
            overlap: 0,
        });
        assert!(matches!(result, Err(ChunkingError::InvalidConfig(_))));
    }

    #[test]
    fn overlap_not_smaller_than_max_rejected() {
        let result = FixedSizeSplitter::new(SplitterConfig {
            max_chars: 10,
            overlap: 10,
        });
        assert!(matches!(result, Err(ChunkingError::InvalidConfig(_))));
    }

    mod proptest_splitter {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn split_never_panics(content in "\\PC{0,2000}", max_chars in 1usize..600) {
                let _ = splitter(max_chars).split_text(&content);
            }

            #[test]
            fn segments_respect_length_bound(
                content in "[a-zñá .,!?\n]{0,1500}",
                max_chars in 1usize..300,
            ) {
                for segment in splitter(max_chars).split_text(&content) {
                    prop_assert!(segment.chars().count() <= max_chars);
                }
            }

            #[test]
            fn no_empty_segments(content in "[a-z .\n\t]{0,800}", max_chars in 1usize..200) {
                for segment in splitter(max_chars).split_text(&content) {
                    prop_assert!(!segment.trim().is_empty());
                    prop_assert_eq!(segment.trim(), segment.as_str());
                }
            }

            #[test]
            fn words_survive_in_order(
                words in proptest::collection::vec("[a-z]{1,8}", 0..120),
                max_chars in 10usize..200,
            ) {
                let text = words.join(" ");
                let rejoined: Vec<String> = splitter(max_chars)
                    .split_text(&text)
                    .iter()
                    .flat_map(|s| s.split_whitespace().map(str::to_owned).collect::<Vec<_>>())
                    .collect();
                prop_assert_eq!(rejoined, words);
            }
        }
    }
}
