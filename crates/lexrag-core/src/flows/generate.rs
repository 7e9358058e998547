use std::path::Path;

use anyhow::{Context, bail};
use lexrag_chunk::Chunk;
use lexrag_index::{ChatProvider, EvalSample, generate_samples};

use super::sample_chunks;

/// Samples up to `n` chunks and asks `chat` for one factoid question/answer
/// pair per chunk. Replies the model did not format correctly are dropped.
///
/// # Errors
///
/// Returns an error if there are no chunks, the provider fails, or no reply
/// could be parsed.
pub async fn generate_dataset(
    chunks: &[Chunk],
    chat: &dyn ChatProvider,
    n: usize,
    seed: Option<u64>,
) -> anyhow::Result<Vec<EvalSample>> {
    if chunks.is_empty() {
        bail!("no chunks to generate questions from; run `lexrag preprocess` first");
    }
    let contexts: Vec<&str> = sample_chunks(chunks, n, seed)
        .into_iter()
        .map(|c| c.content.as_str())
        .collect();
    let samples = generate_samples(chat, &contexts)
        .await
        .context("question generation failed")?;
    if samples.is_empty() {
        bail!(
            "{} replies from {} held no `Factoid question:`/`Answer:` pair",
            contexts.len(),
            chat.name()
        );
    }
    Ok(samples)
}

/// Writes `samples` as a JSON array readable by [`load_dataset`](super::load_dataset).
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_dataset(path: &Path, samples: &[EvalSample]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(samples)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), samples = samples.len(), "dataset saved");
    Ok(())
}
