//! Retrieval quality metrics computed from term overlap.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::text::terms;

/// Share of a reference's content terms a context must contain to count as relevant.
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.5;

/// Terms shorter than this are treated as function words and ignored.
const MIN_TERM_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalSample {
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
    pub reference: String,
    /// Retrieved passages, best first.
    #[serde(default)]
    pub contexts: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvalScores {
    pub context_recall: f32,
    pub context_precision: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_f1: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    pub samples: Vec<EvalScores>,
}

impl EvalReport {
    /// Per-metric average. `answer_f1` averages only samples that had an answer.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn mean(&self) -> EvalScores {
        let n = self.samples.len().max(1) as f32;
        let answered: Vec<f32> = self.samples.iter().filter_map(|s| s.answer_f1).collect();
        EvalScores {
            context_recall: self.samples.iter().map(|s| s.context_recall).sum::<f32>() / n,
            context_precision: self.samples.iter().map(|s| s.context_precision).sum::<f32>() / n,
            answer_f1: (!answered.is_empty())
                .then(|| answered.iter().sum::<f32>() / answered.len() as f32),
        }
    }
}

pub type EvalFuture<'a> = Pin<Box<dyn Future<Output = Result<EvalReport, EvalError>> + Send + 'a>>;

pub trait Evaluator: Send + Sync {
    fn evaluate<'a>(&'a self, samples: &'a [EvalSample]) -> EvalFuture<'a>;
}

#[derive(Debug, Clone)]
pub struct LexicalEvaluator {
    pub relevance_threshold: f32,
}

impl Default for LexicalEvaluator {
    fn default() -> Self {
        Self {
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
        }
    }
}

impl LexicalEvaluator {
    /// # Errors
    ///
    /// Returns [`EvalError::Empty`] for no samples and
    /// [`EvalError::InvalidSample`] for a blank question or reference.
    pub fn score_all(&self, samples: &[EvalSample]) -> Result<EvalReport, EvalError> {
        if samples.is_empty() {
            return Err(EvalError::Empty);
        }
        let scores = samples
            .iter()
            .enumerate()
            .map(|(index, sample)| {
                if sample.question.trim().is_empty() {
                    return Err(EvalError::InvalidSample {
                        index,
                        reason: "question is empty",
                    });
                }
                if sample.reference.trim().is_empty() {
                    return Err(EvalError::InvalidSample {
                        index,
                        reason: "reference is empty",
                    });
                }
                Ok(self.score(sample))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EvalReport { samples: scores })
    }

    #[must_use]
    pub fn score(&self, sample: &EvalSample) -> EvalScores {
        let reference = content_terms(&sample.reference);
        EvalScores {
            context_recall: context_recall(&reference, &sample.contexts),
            context_precision: self.context_precision(&reference, &sample.contexts),
            answer_f1: sample
                .answer
                .as_deref()
                .map(|answer| token_f1(answer, &sample.reference)),
        }
    }

    /// Mean of precision@k over the ranks holding a relevant context.
    #[expect(clippy::cast_precision_loss)]
    fn context_precision(&self, reference: &HashSet<String>, contexts: &[String]) -> f32 {
        let mut relevant = 0usize;
        let mut total = 0.0_f32;
        for (rank, context) in contexts.iter().enumerate() {
            if overlap(reference, &content_terms(context)) >= self.relevance_threshold {
                relevant += 1;
                total += relevant as f32 / (rank + 1) as f32;
            }
        }
        if relevant == 0 {
            0.0
        } else {
            total / relevant as f32
        }
    }
}

impl Evaluator for LexicalEvaluator {
    fn evaluate<'a>(&'a self, samples: &'a [EvalSample]) -> EvalFuture<'a> {
        Box::pin(async move { self.score_all(samples) })
    }
}

fn content_terms(text: &str) -> HashSet<String> {
    terms(text)
        .into_iter()
        .filter(|t| t.chars().count() >= MIN_TERM_CHARS)
        .collect()
}

/// Share of `reference` found in `found`; 1.0 for an empty reference.
#[expect(clippy::cast_precision_loss)]
fn overlap(reference: &HashSet<String>, found: &HashSet<String>) -> f32 {
    if reference.is_empty() {
        return 1.0;
    }
    reference.intersection(found).count() as f32 / reference.len() as f32
}

fn context_recall(reference: &HashSet<String>, contexts: &[String]) -> f32 {
    let found: HashSet<String> = contexts.iter().flat_map(|c| content_terms(c)).collect();
    overlap(reference, &found)
}

#[expect(clippy::cast_precision_loss)]
fn token_f1(answer: &str, reference: &str) -> f32 {
    let answer = terms(answer);
    let mut remaining = terms(reference);
    if answer.is_empty() || remaining.is_empty() {
        return 0.0;
    }
    let reference_len = remaining.len();
    let mut common = 0usize;
    for token in &answer {
        if let Some(pos) = remaining.iter().position(|t| t == token) {
            remaining.swap_remove(pos);
            common += 1;
        }
    }
    if common == 0 {
        return 0.0;
    }
    let precision = common as f32 / answer.len() as f32;
    let recall = common as f32 / reference_len as f32;
    2.0 * precision * recall / (precision + recall)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(reference: &str, contexts: &[&str]) -> EvalSample {
        EvalSample {
            question: "¿Cuál es la temperatura de conservación?".into(),
            answer: None,
            reference: reference.into(),
            contexts: contexts.iter().map(|c| (*c).to_owned()).collect(),
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn perfect_retrieval() {
        let scores = LexicalEvaluator::default().score(&sample(
            "La leche pasteurizada se conserva refrigerada.",
            &["La leche pasteurizada se conserva refrigerada bajo cinco grados."],
        ));
        assert!(approx(scores.context_recall, 1.0));
        assert!(approx(scores.context_precision, 1.0));
        assert_eq!(scores.answer_f1, None);
    }

    #[test]
    fn relevant_context_ranked_second() {
        let scores = LexicalEvaluator::default().score(&sample(
            "leche pasteurizada refrigerada",
            &["envases sanitarios", "leche pasteurizada refrigerada"],
        ));
        assert!(approx(scores.context_precision, 0.5));
        assert!(approx(scores.context_recall, 1.0));
    }

    #[test]
    fn partial_recall() {
        let scores = LexicalEvaluator::default().score(&sample(
            "aditivos autorizados ministerio salud",
            &["aditivos autorizados"],
        ));
        assert!(approx(scores.context_recall, 0.5));
    }

    #[test]
    fn no_contexts_scores_zero() {
        let scores = LexicalEvaluator::default().score(&sample("leche pasteurizada", &[]));
        assert!(approx(scores.context_recall, 0.0));
        assert!(approx(scores.context_precision, 0.0));
    }

    #[test]
    fn answer_f1_counts_shared_tokens() {
        assert!(approx(token_f1("cinco grados", "bajo cinco grados"), 0.8));
        assert!(approx(token_f1("nada", "bajo cinco grados"), 0.0));
        assert!(approx(token_f1("", "algo"), 0.0));
    }

    #[test]
    fn mean_ignores_missing_answers() {
        let report = EvalReport {
            samples: vec![
                EvalScores {
                    context_recall: 1.0,
                    context_precision: 0.5,
                    answer_f1: Some(0.6),
                },
                EvalScores {
                    context_recall: 0.0,
                    context_precision: 0.5,
                    answer_f1: None,
                },
            ],
        };
        let mean = report.mean();
        assert!(approx(mean.context_recall, 0.5));
        assert!(approx(mean.context_precision, 0.5));
        assert!(approx(mean.answer_f1.unwrap(), 0.6));
    }

    #[tokio::test]
    async fn empty_dataset_rejected() {
        let err = LexicalEvaluator::default().evaluate(&[]).await.unwrap_err();
        assert!(matches!(err, EvalError::Empty));
    }

    #[tokio::test]
    async fn blank_reference_rejected() {
        let samples = vec![sample("leche", &["leche"]), sample("  ", &[])];
        let err = LexicalEvaluator::default().evaluate(&samples).await.unwrap_err();
        assert!(matches!(err, EvalError::InvalidSample { index: 1, .. }));
    }

    #[test]
    fn dataset_deserializes_without_contexts() {
        let samples: Vec<EvalSample> = serde_json::from_str(
            r#"[{"question": "q", "reference": "r", "answer": "a"}]"#,
        )
        .unwrap();
        assert!(samples[0].contexts.is_empty());
        assert_eq!(samples[0].answer.as_deref(), Some("a"));
    }
}
