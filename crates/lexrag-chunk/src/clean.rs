use std::sync::Arc;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::NlpError;
use crate::nlp::{LanguageModel, TokenAnalyzer};

/// Normalizes passage text for lexical matching: lowercase, letters only,
/// no diacritics, stop-words removed and every remaining word lemmatized.
#[derive(Clone)]
pub struct TextCleaner {
    disallowed: Regex,
    analyzer: Arc<dyn TokenAnalyzer>,
}

impl std::fmt::Debug for TextCleaner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextCleaner")
            .field("disallowed", &self.disallowed.as_str())
            .finish_non_exhaustive()
    }
}

impl TextCleaner {
    /// # Errors
    ///
    /// Returns [`NlpError::Pattern`] if the language alphabet does not form a
    /// valid character class.
    pub fn new(model: &LanguageModel) -> Result<Self, NlpError> {
        let letters = regex::escape(model.language().extra_letters());
        let disallowed = Regex::new(&format!(r"[^a-z{letters}\s]"))?;
        Ok(Self {
            disallowed,
            analyzer: model.analyzer(),
        })
    }

    #[must_use]
    pub fn clean(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let letters_only = self.disallowed.replace_all(&lowered, "");
        let plain = strip_diacritics(&letters_only);

        let lemmas: Vec<String> = self
            .analyzer
            .analyze(&plain)
            .into_iter()
            .filter(|t| !t.is_stop && !t.is_punct && !t.lemma.trim().is_empty())
            .map(|t| t.lemma)
            .collect();

        lemmas.join(" ")
    }
}

/// Canonical decomposition with every combining mark removed.
#[must_use]
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::nlp::{Language, Lexicon, Token, UnicodeSentenceSegmenter};

    fn model_with(lexicon: Lexicon) -> LanguageModel {
        LanguageModel::new(
            Language::Spanish,
            Arc::new(UnicodeSentenceSegmenter::new()),
            Arc::new(lexicon),
        )
    }

    fn spanish_lexicon() -> Lexicon {
        Lexicon::from_entries(
            ["el", "la", "los", "de", "que", "se", "en", "y"]
                .into_iter()
                .map(str::to_owned),
            [
                ("normas", "norma"),
                ("alimentos", "alimento"),
                ("establecen", "establecer"),
                ("sanitarias", "sanitario"),
                ("sanitaria", "sanitario"),
            ]
            .into_iter()
            .map(|(f, l)| (f.to_owned(), l.to_owned())),
        )
    }

    struct UppercaseAnalyzer;

    impl TokenAnalyzer for UppercaseAnalyzer {
        fn analyze(&self, text: &str) -> Vec<Token> {
            text.split_whitespace()
                .map(|w| Token {
                    text: w.to_owned(),
                    lemma: w.to_uppercase(),
                    is_stop: w == "x",
                    is_punct: false,
                })
                .collect()
        }
    }

    #[test]
    fn strip_diacritics_keeps_base_letters() {
        assert_eq!(strip_diacritics("áéíóú ñ ü Ç"), "aeiou n u C");
    }

    #[test]
    fn removes_digits_and_punctuation() {
        let cleaner = TextCleaner::new(&model_with(Lexicon::default())).unwrap();
        assert_eq!(cleaner.clean("Artículo 5°: (inciso b) ¡Vigente!"), "articulo inciso b vigente");
    }

    #[test]
    fn lemmatizes_and_drops_stopwords() {
        let cleaner = TextCleaner::new(&model_with(spanish_lexicon())).unwrap();
        assert_eq!(
            cleaner.clean("Se establecen las normas sanitarias de los alimentos."),
            "establecer las norma sanitario alimento"
        );
    }

    #[test]
    fn collapses_whitespace() {
        let cleaner = TextCleaner::new(&model_with(Lexicon::default())).unwrap();
        assert_eq!(cleaner.clean("  uno \n\n dos\t tres "), "uno dos tres");
    }

    #[test]
    fn empty_and_symbol_only_input() {
        let cleaner = TextCleaner::new(&model_with(Lexicon::default())).unwrap();
        assert_eq!(cleaner.clean(""), "");
        assert_eq!(cleaner.clean("123 -- %%"), "");
    }

    #[test]
    fn uses_injected_analyzer() {
        let model = LanguageModel::new(
            Language::English,
            Arc::new(UnicodeSentenceSegmenter::new()),
            Arc::new(UppercaseAnalyzer),
        );
        let cleaner = TextCleaner::new(&model).unwrap();
        assert_eq!(cleaner.clean("a x b"), "A B");
    }

    #[test]
    fn english_drops_spanish_letters() {
        let model = LanguageModel::new(
            Language::English,
            Arc::new(UnicodeSentenceSegmenter::new()),
            Arc::new(Lexicon::default()),
        );
        let cleaner = TextCleaner::new(&model).unwrap();
        assert_eq!(cleaner.clean("niño café"), "nio caf");
    }

    #[test]
    fn idempotent_with_bundled_resources() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../resources/es");
        let model = LanguageModel::load(Language::Spanish, &dir).unwrap();
        let cleaner = TextCleaner::new(&model).unwrap();
        let text = "Los alimentos que se expendan deberán cumplir con las normas \
                    establecidas en el presente Reglamento Sanitario de los Alimentos.";
        let once = cleaner.clean(text);
        assert!(!once.is_empty());
        assert_eq!(cleaner.clean(&once), once);
    }

    mod proptest_cleaner {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(300))]

            #[test]
            fn cleaning_is_idempotent(text in "[A-Za-zÁÉÍÓÚáéíóúñÑü0-9 .,;:¿?¡!\n]{0,300}") {
                let cleaner = TextCleaner::new(&model_with(spanish_lexicon())).unwrap();
                let once = cleaner.clean(&text);
                prop_assert_eq!(cleaner.clean(&once), once);
            }

            #[test]
            fn output_is_ascii_words(text in "\\PC{0,300}") {
                let cleaner = TextCleaner::new(&model_with(spanish_lexicon())).unwrap();
                let out = cleaner.clean(&text);
                prop_assert!(out.chars().all(|c| c.is_ascii_lowercase() || c == ' '));
                prop_assert!(!out.contains("  "));
                prop_assert_eq!(out.trim(), out.as_str());
            }
        }
    }
}
