use lexrag_chunk::clean::strip_diacritics;
use unicode_segmentation::UnicodeSegmentation;

/// Lowercased, accent-free word tokens used for lexical scoring.
pub(crate) fn terms(text: &str) -> Vec<String> {
    strip_diacritics(&text.to_lowercase())
        .unicode_words()
        .map(str::to_owned)
        .collect()
}
