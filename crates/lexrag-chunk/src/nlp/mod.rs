//! Language capabilities consumed by the chunker and the cleaner.
//!
//! Both capabilities are traits so callers can swap in a different sentence
//! splitter or lemmatizer; [`LanguageModel`] bundles one of each and is built
//! once per run, then shared read-only.

mod lexicon;
mod segmenter;

use std::path::Path;
use std::sync::Arc;

pub use lexicon::Lexicon;
pub use segmenter::UnicodeSentenceSegmenter;

use crate::error::NlpError;

/// Splits text into ordered sentence strings, each trimmed and non-empty.
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// One analyzed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub is_stop: bool,
    pub is_punct: bool,
}

/// Tokenizes text and tags every token with its lemma and stop-word/punctuation flags.
pub trait TokenAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Vec<Token>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Spanish,
    English,
}

impl Language {
    /// Parse an ISO 639-1 code.
    ///
    /// # Errors
    ///
    /// Returns [`NlpError::UnsupportedLanguage`] for unknown codes.
    pub fn from_code(code: &str) -> Result<Self, NlpError> {
        match code.to_ascii_lowercase().as_str() {
            "es" | "spa" | "spanish" => Ok(Self::Spanish),
            "en" | "eng" | "english" => Ok(Self::English),
            other => Err(NlpError::UnsupportedLanguage(other.to_owned())),
        }
    }

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Spanish => "es",
            Self::English => "en",
        }
    }

    /// Lowercase letters outside `a-z` that belong to the alphabet.
    #[must_use]
    pub fn extra_letters(self) -> &'static str {
        match self {
            Self::Spanish => "áéíóúñü",
            Self::English => "",
        }
    }

    /// Abbreviations whose trailing period does not end a sentence.
    #[must_use]
    pub fn abbreviations(self) -> &'static [&'static str] {
        match self {
            Self::Spanish => &[
                "art.", "arts.", "núm.", "nº.", "n.", "inc.", "lit.", "sr.", "sra.", "srs.",
                "dr.", "dra.", "etc.", "pág.", "págs.", "cap.", "ej.", "aprox.", "min.", "máx.",
                "ud.", "uds.", "depto.", "av.", "ord.", "res.", "dto.", "d.s.", "d.f.l.",
            ],
            Self::English => &[
                "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "etc.", "e.g.",
                "i.e.", "no.", "art.", "sec.", "fig.", "approx.",
            ],
        }
    }
}

/// Explicitly constructed handle over the sentence and token capabilities of one language.
#[derive(Clone)]
pub struct LanguageModel {
    language: Language,
    segmenter: Arc<dyn SentenceSegmenter>,
    analyzer: Arc<dyn TokenAnalyzer>,
}

impl std::fmt::Debug for LanguageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageModel")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl LanguageModel {
    #[must_use]
    pub fn new(
        language: Language,
        segmenter: Arc<dyn SentenceSegmenter>,
        analyzer: Arc<dyn TokenAnalyzer>,
    ) -> Self {
        Self {
            language,
            segmenter,
            analyzer,
        }
    }

    /// Build the built-in model: UAX #29 sentences plus a lexicon read from `resource_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`NlpError::ResourceMissing`] if a lexicon file is absent.
    pub fn load(language: Language, resource_dir: &Path) -> Result<Self, NlpError> {
        let lexicon = Lexicon::load(resource_dir)?;
        tracing::info!(
            language = language.code(),
            stopwords = lexicon.stopword_count(),
            lemmas = lexicon.lemma_count(),
            "language model loaded"
        );
        Ok(Self::new(
            language,
            Arc::new(UnicodeSentenceSegmenter::for_language(language)),
            Arc::new(lexicon),
        ))
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn segmenter(&self) -> Arc<dyn SentenceSegmenter> {
        Arc::clone(&self.segmenter)
    }

    #[must_use]
    pub fn analyzer(&self) -> Arc<dyn TokenAnalyzer> {
        Arc::clone(&self.analyzer)
    }
}
