use std::sync::Arc;

use crate::error::ChunkingError;
use crate::nlp::SentenceSegmenter;
use crate::types::{Chunk, Segment, word_count};

/// Re-splits segments into sentences and greedily packs them into chunks of
/// roughly `min_words` words.
///
/// A sentence is appended to the open chunk unless doing so would push the
/// word count past `min_words`; in that case the open chunk is emitted first
/// and the sentence starts a new one. The minimum is therefore soft: a chunk
/// closes below it when the next sentence is long, and a single sentence
/// longer than `min_words` becomes a chunk on its own.
#[derive(Clone)]
pub struct SemanticRegrouper {
    segmenter: Arc<dyn SentenceSegmenter>,
    min_words: usize,
}

impl std::fmt::Debug for SemanticRegrouper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticRegrouper")
            .field("min_words", &self.min_words)
            .finish_non_exhaustive()
    }
}

impl SemanticRegrouper {
    /// # Errors
    ///
    /// Returns [`ChunkingError::InvalidConfig`] if `min_words` is zero.
    pub fn new(
        segmenter: Arc<dyn SentenceSegmenter>,
        min_words: usize,
    ) -> Result<Self, ChunkingError> {
        if min_words == 0 {
            return Err(ChunkingError::InvalidConfig(
                "min_words must be greater than zero".into(),
            ));
        }
        Ok(Self {
            segmenter,
            min_words,
        })
    }

    #[must_use]
    pub fn min_words(&self) -> usize {
        self.min_words
    }

    #[must_use]
    pub fn regroup(&self, segment: &Segment) -> Vec<Chunk> {
        let sentences = self.segmenter.segment(&segment.content);
        group_sentences(&sentences, self.min_words)
            .into_iter()
            .map(|content| Chunk {
                content,
                metadata: segment.metadata.clone(),
            })
            .collect()
    }
}

/// Greedy accumulation over already segmented sentences. Blank sentences are skipped.
#[must_use]
pub fn group_sentences<S: AsRef<str>>(sentences: &[S], min_words: usize) -> Vec<String> {
    let mut groups = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for sentence in sentences {
        let sentence = sentence.as_ref().trim();
        if sentence.is_empty() {
            continue;
        }
        let len = word_count(sentence);
        if current_len + len > min_words && !current.is_empty() {
            groups.push(current.join(" "));
            current.clear();
            current_len = 0;
        }
        current.push(sentence);
        current_len += len;
    }

    if !current.is_empty() {
        groups.push(current.join(" "));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::UnicodeSentenceSegmenter;
    use crate::types::Metadata;

    /// Returns a fixed sentence list regardless of input.
    struct ScriptedSegmenter(Vec<&'static str>);

    impl SentenceSegmenter for ScriptedSegmenter {
        fn segment(&self, _text: &str) -> Vec<String> {
            self.0.iter().map(|s| (*s).to_owned()).collect()
        }
    }

    fn segment(content: &str) -> Segment {
        Segment {
            content: content.into(),
            metadata: Metadata::new().with(Metadata::SOURCE, "ley.pdf"),
        }
    }

    const LONG: &str =
        "A third short fact that is somewhat longer than the others combined together now.";

    #[test]
    fn flushes_before_sentence_that_would_exceed_threshold() {
        let segmenter = ScriptedSegmenter(vec!["A short fact.", "Another short fact.", LONG]);
        let regrouper = SemanticRegrouper::new(Arc::new(segmenter), 5).unwrap();
        let chunks = regrouper.regroup(&segment("ignored"));

        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["A short fact.", "Another short fact.", LONG]);
    }

    #[test]
    fn accumulates_until_threshold() {
        let groups = group_sentences(&["uno dos.", "tres.", "cuatro cinco.", "seis."], 5);
        assert_eq!(groups, vec!["uno dos. tres. cuatro cinco.", "seis."]);
    }

    #[test]
    fn exact_threshold_does_not_flush() {
        let groups = group_sentences(&["a b c", "d e"], 5);
        assert_eq!(groups, vec!["a b c d e"]);
    }

    #[test]
    fn long_first_sentence_stands_alone() {
        let groups = group_sentences(&["a b c d e f g", "h"], 3);
        assert_eq!(groups, vec!["a b c d e f g", "h"]);
    }

    #[test]
    fn empty_sentence_list_yields_nothing() {
        let regrouper = SemanticRegrouper::new(Arc::new(ScriptedSegmenter(vec![])), 5).unwrap();
        assert!(regrouper.regroup(&segment("whatever")).is_empty());
    }

    #[test]
    fn blank_sentences_skipped() {
        let groups = group_sentences(&["  ", "uno.", "", "dos."], 100);
        assert_eq!(groups, vec!["uno. dos."]);
    }

    #[test]
    fn chunks_inherit_segment_metadata() {
        let regrouper =
            SemanticRegrouper::new(Arc::new(UnicodeSentenceSegmenter::new()), 2).unwrap();
        let seg = segment("Uno dos. Tres cuatro. Cinco.");
        let chunks = regrouper.regroup(&seg);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.metadata == seg.metadata));
    }

    #[test]
    fn zero_min_words_rejected() {
        let result = SemanticRegrouper::new(Arc::new(UnicodeSentenceSegmenter::new()), 0);
        assert!(matches!(result, Err(ChunkingError::InvalidConfig(_))));
    }

    mod proptest_regroup {
        use super::*;
        use proptest::prelude::*;

        fn sentences() -> impl Strategy<Value = Vec<String>> {
            proptest::collection::vec(
                proptest::collection::vec("[a-z]{1,6}", 0..12).prop_map(|w| w.join(" ")),
                0..40,
            )
        }

        proptest! {
            #[test]
            fn no_empty_chunks(sentences in sentences(), min_words in 1usize..30) {
                for group in group_sentences(&sentences, min_words) {
                    prop_assert!(!group.trim().is_empty());
                }
            }

            #[test]
            fn words_preserved_in_order(sentences in sentences(), min_words in 1usize..30) {
                let expected: Vec<&str> =
                    sentences.iter().flat_map(|s| s.split_whitespace()).collect();
                let groups = group_sentences(&sentences, min_words);
                let actual: Vec<&str> = groups.iter().flat_map(|g| g.split_whitespace()).collect();
                prop_assert_eq!(actual, expected);
            }

            #[test]
            fn chunk_closes_only_when_next_sentence_overflows(
                sentences in sentences(),
                min_words in 1usize..30,
            ) {
                let non_blank: Vec<&str> = sentences
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .collect();
                let groups = group_sentences(&non_blank, min_words);

                // Walk sentences alongside groups to recover each group's sentence count.
                let mut idx = 0;
                for (i, group) in groups.iter().enumerate() {
                    let mut words = 0;
                    let mut taken = 0;
                    while words < word_count(group) {
                        words += word_count(non_blank[idx + taken]);
                        taken += 1;
                    }
                    prop_assert_eq!(words, word_count(group));
                    if taken > 1 {
                        prop_assert!(words <= min_words);
                    }
                    if i + 1 < groups.len() {
                        let next = word_count(non_blank[idx + taken]);
                        prop_assert!(words + next > min_words);
                    }
                    idx += taken;
                }
                prop_assert_eq!(idx, non_blank.len());
            }
        }
    }
}
