use std::fmt::Write as _;

use anyhow::Context;
use lexrag_index::{ChatProvider, Retriever, ScoredPassage};

use super::search;

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<ScoredPassage>,
}

/// Retrieves `top_k` passages for `question` and has `chat` answer from them.
///
/// # Errors
///
/// Returns an error if retrieval or generation fails.
pub async fn ask(
    retriever: &Retriever,
    chat: &dyn ChatProvider,
    question: &str,
    top_k: usize,
) -> anyhow::Result<Answer> {
    let sources = search(retriever, question, top_k).await?;
    let contexts: Vec<String> = sources.iter().map(|p| p.chunk.content.clone()).collect();
    let text = lexrag_index::answer(chat, question, &contexts)
        .await
        .with_context(|| format!("answer generation failed for {question:?}"))?;
    Ok(Answer { text, sources })
}

#[must_use]
pub fn render_answer(answer: &Answer) -> String {
    let mut out = format!("{}\n", answer.text);
    if answer.sources.is_empty() {
        return out;
    }
    out.push_str("\nsources:\n");
    for (rank, passage) in answer.sources.iter().enumerate() {
        let meta = &passage.chunk.metadata;
        let source = meta.source().unwrap_or("<unknown>");
        let _ = match meta.page() {
            Some(page) => writeln!(out, "[{}] {source} p.{page}", rank + 1),
            None => writeln!(out, "[{}] {source}", rank + 1),
        };
    }
    out
}
