use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, bail};
use lexrag_index::{
    ChatProvider, EvalReport, EvalSample, EvalScores, Evaluator, Retriever, ScoredPassage,
};

/// Baseline vector retrieval scored side by side with reranked retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub baseline: EvalReport,
    pub reranked: Option<EvalReport>,
}

/// Reads a JSON array of `{question, reference, answer?}` records.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or holds no records.
pub fn load_dataset(path: &Path) -> anyhow::Result<Vec<EvalSample>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    let samples: Vec<EvalSample> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;
    if samples.is_empty() {
        bail!("dataset {} is empty", path.display());
    }
    Ok(samples)
}

/// Retrieves `top_k` contexts per question with and without the retriever's
/// reranker, then scores both runs.
///
/// With an `answerer`, samples that carry no answer get one generated from
/// each run's own contexts, so `answer_f1` compares the two runs end to end.
///
/// # Errors
///
/// Returns an error if retrieval, answer generation or scoring fails.
pub async fn evaluate(
    retriever: &Retriever,
    evaluator: &dyn Evaluator,
    answerer: Option<&dyn ChatProvider>,
    dataset: &[EvalSample],
    top_k: usize,
) -> anyhow::Result<Comparison> {
    let mut baseline = Vec::with_capacity(dataset.len());
    let mut reranked = Vec::with_capacity(dataset.len());

    for sample in dataset {
        let hits = retriever
            .search(&sample.question, top_k)
            .await
            .with_context(|| format!("retrieval failed for {:?}", sample.question))?;
        baseline.push(run_sample(sample, hits, answerer).await?);

        if retriever.has_reranker() {
            let hits = retriever
                .search_reranked(&sample.question, top_k)
                .await
                .with_context(|| format!("reranking failed for {:?}", sample.question))?;
            reranked.push(run_sample(sample, hits, answerer).await?);
        }
    }

    let baseline = evaluator
        .evaluate(&baseline)
        .await
        .context("baseline evaluation failed")?;
    let reranked = if reranked.is_empty() {
        None
    } else {
        Some(
            evaluator
                .evaluate(&reranked)
                .await
                .context("reranked evaluation failed")?,
        )
    };

    tracing::info!(
        samples = dataset.len(),
        reranked = reranked.is_some(),
        answered = answerer.is_some(),
        "evaluation complete"
    );
    Ok(Comparison { baseline, reranked })
}

async fn run_sample(
    sample: &EvalSample,
    hits: Vec<ScoredPassage>,
    answerer: Option<&dyn ChatProvider>,
) -> anyhow::Result<EvalSample> {
    let contexts: Vec<String> = hits.into_iter().map(|p| p.chunk.content).collect();
    let answer = match (&sample.answer, answerer) {
        (None, Some(chat)) => Some(
            lexrag_index::answer(chat, &sample.question, &contexts)
                .await
                .with_context(|| format!("answer generation failed for {:?}", sample.question))?,
        ),
        (answer, _) => answer.clone(),
    };
    Ok(EvalSample {
        answer,
        contexts,
        ..sample.clone()
    })
}

#[must_use]
pub fn render_comparison(comparison: &Comparison) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>15} {:>18} {:>10}",
        "run", "context_recall", "context_precision", "answer_f1"
    );
    write_row(&mut out, "baseline", &comparison.baseline.mean());
    if let Some(reranked) = &comparison.reranked {
        write_row(&mut out, "reranked", &reranked.mean());
    }
    out
}

fn write_row(out: &mut String, label: &str, scores: &EvalScores) {
    let f1 = scores
        .answer_f1
        .map_or_else(|| "-".to_owned(), |f| format!("{f:.4}"));
    let _ = writeln!(
        out,
        "{label:<10} {:>15.4} {:>18.4} {f1:>10}",
        scores.context_recall, scores.context_precision
    );
}
