use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::{Token, TokenAnalyzer};
use crate::error::NlpError;

/// Dictionary-backed lemmatizer and stop-word tagger.
///
/// Entries are folded to lowercase ASCII on construction and lemma chains are
/// resolved to their final form, so `lemma(lemma(w)) == lemma(w)` and a word
/// whose lemma is a stop-word is itself treated as a stop-word.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    stopwords: HashSet<String>,
    lemmas: HashMap<String, String>,
}

impl Lexicon {
    pub const STOPWORDS_FILE: &'static str = "stopwords.txt";
    pub const LEMMAS_FILE: &'static str = "lemmas.tsv";
    pub const RESOURCE_FILES: [&'static str; 2] = [Self::STOPWORDS_FILE, Self::LEMMAS_FILE];

    /// Read `stopwords.txt` (one word per line) and `lemmas.tsv`
    /// (`form<TAB>lemma` per line) from `dir`. Lines starting with `#` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`NlpError::ResourceMissing`] if either file does not exist, or
    /// [`NlpError::ResourceRead`] if it cannot be read.
    pub fn load(dir: &Path) -> Result<Self, NlpError> {
        let stopwords = read_resource(&dir.join(Self::STOPWORDS_FILE))?;
        let lemmas = read_resource(&dir.join(Self::LEMMAS_FILE))?;

        let lemma_pairs = lemmas.lines().filter_map(|line| {
            let mut cols = line.split('\t');
            let form = cols.next()?;
            let lemma = cols.next()?;
            Some((form.to_owned(), lemma.to_owned()))
        });

        Ok(Self::from_entries(
            stopwords.lines().map(str::to_owned),
            lemma_pairs,
        ))
    }

    /// Resource files absent from `dir`.
    #[must_use]
    pub fn missing_resources(dir: &Path) -> Vec<PathBuf> {
        Self::RESOURCE_FILES
            .iter()
            .map(|f| dir.join(f))
            .filter(|p| !p.is_file())
            .collect()
    }

    #[must_use]
    pub fn from_entries<S, L>(stopwords: S, lemmas: L) -> Self
    where
        S: IntoIterator<Item = String>,
        L: IntoIterator<Item = (String, String)>,
    {
        let stopwords: HashSet<String> = stopwords
            .into_iter()
            .filter(|w| !w.trim_start().starts_with('#'))
            .map(|w| fold(&w))
            .filter(|w| !w.is_empty())
            .collect();

        let raw: HashMap<String, String> = lemmas
            .into_iter()
            .filter(|(form, _)| !form.trim_start().starts_with('#'))
            .map(|(form, lemma)| (fold(&form), fold(&lemma)))
            .filter(|(form, lemma)| !form.is_empty() && !lemma.is_empty())
            .collect();

        let lemmas = raw
            .keys()
            .filter_map(|form| {
                let resolved = resolve(&raw, form);
                (resolved != *form).then(|| (form.clone(), resolved))
            })
            .collect();

        Self { stopwords, lemmas }
    }

    #[must_use]
    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    #[must_use]
    pub fn lemma_count(&self) -> usize {
        self.lemmas.len()
    }

    /// Dictionary form of an already folded word; the word itself when unknown.
    #[must_use]
    pub fn lemma<'a>(&'a self, word: &'a str) -> &'a str {
        self.lemmas.get(word).map_or(word, String::as_str)
    }

    #[must_use]
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }
}

impl TokenAnalyzer for Lexicon {
    fn analyze(&self, text: &str) -> Vec<Token> {
        text.split_whitespace()
            .map(|raw| {
                let is_punct = !raw.chars().any(char::is_alphanumeric);
                let key = fold(raw);
                let lemma = self.lemma(&key).to_owned();
                let is_stop = self.is_stopword(&key) || self.is_stopword(&lemma);
                Token {
                    text: raw.to_owned(),
                    lemma,
                    is_stop,
                    is_punct,
                }
            })
            .collect()
    }
}

fn read_resource(path: &Path) -> Result<String, NlpError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(NlpError::ResourceMissing {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(NlpError::ResourceRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Lowercase, strip diacritics and keep only `a-z`.
fn fold(word: &str) -> String {
    word.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(char::is_ascii_lowercase)
        .collect()
}

/// Follow `form -> lemma` links to the end of the chain. A cycle collapses to
/// its smallest member so every member resolves to the same form.
fn resolve(map: &HashMap<String, String>, start: &str) -> String {
    let mut path: Vec<&str> = vec![start];
    let mut current = start;
    while let Some(next) = map.get(current) {
        if next == current {
            break;
        }
        if let Some(pos) = path.iter().position(|p| p == next) {
            return path[pos..]
                .iter()
                .min()
                .map_or_else(|| current.to_owned(), |s| (*s).to_owned());
        }
        path.push(next);
        current = next;
    }
    current.to_owned()
}
