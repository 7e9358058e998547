use std::collections::HashMap;

use super::{RankFuture, RankedText, Reranker, sort_ranked};
use crate::text::terms;

/// Okapi BM25 over the candidate set itself. Needs no model or network.
#[derive(Debug, Clone)]
pub struct LexicalReranker {
    pub k1: f32,
    pub b: f32,
}

impl Default for LexicalReranker {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

impl LexicalReranker {
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn score(&self, query: &str, candidates: &[String]) -> Vec<f32> {
        let docs: Vec<Vec<String>> = candidates.iter().map(|c| terms(c)).collect();
        if docs.is_empty() {
            return Vec::new();
        }
        let n = docs.len() as f32;
        let avg_len = docs.iter().map(Vec::len).sum::<usize>() as f32 / n;

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for doc in &docs {
            let mut seen: Vec<&str> = doc.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_default() += 1;
            }
        }

        let mut query_terms = terms(query);
        query_terms.sort_unstable();
        query_terms.dedup();

        docs.iter()
            .map(|doc| {
                let len = doc.len() as f32;
                query_terms
                    .iter()
                    .map(|term| {
                        let count = doc.iter().filter(|t| *t == term).count();
                        if count == 0 {
                            return 0.0;
                        }
                        let tf = count as f32;
                        let df = doc_freq.get(term.as_str()).copied().unwrap_or(0) as f32;
                        let idf = ((n - df + 0.5) / (df + 0.5)).ln_1p();
                        let norm = if avg_len > 0.0 {
                            1.0 - self.b + self.b * len / avg_len
                        } else {
                            1.0
                        };
                        idf * tf * (self.k1 + 1.0) / (tf + self.k1 * norm)
                    })
                    .sum()
            })
            .collect()
    }
}

impl Reranker for LexicalReranker {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "bm25"
    }

    fn rank<'a>(&'a self, query: &'a str, candidates: &'a [String]) -> RankFuture<'a> {
        Box::pin(async move {
            let mut ranked: Vec<RankedText> = self
                .score(query, candidates)
                .into_iter()
                .zip(candidates)
                .enumerate()
                .map(|(index, (score, text))| RankedText {
                    index,
                    text: text.clone(),
                    score,
                })
                .collect();
            sort_ranked(&mut ranked);
            Ok(ranked)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        vec![
            "Los envases deben ser de material sanitario.".into(),
            "El rotulado nutricional indicará las calorías y grasas del alimento.".into(),
            "Queda prohibido el uso de colorantes no autorizados.".into(),
        ]
    }

    #[tokio::test]
    async fn best_lexical_match_first() {
        let ranked = LexicalReranker::default()
            .rank("¿Qué indica el rotulado nutricional?", &candidates())
            .await
            .unwrap();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].index, 1);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[tokio::test]
    async fn no_overlap_keeps_original_order() {
        let ranked = LexicalReranker::default()
            .rank("xyz", &candidates())
            .await
            .unwrap();
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn empty_candidates() {
        let ranked = LexicalReranker::default().rank("q", &[]).await.unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn accents_do_not_matter() {
        let scores = LexicalReranker::default().score(
            "calorias",
            &["calorías por porción".to_owned(), "otra cosa".to_owned()],
        );
        assert!(scores[0] > 0.0);
        assert!(scores[1].abs() < f32::EPSILON);
    }
}
