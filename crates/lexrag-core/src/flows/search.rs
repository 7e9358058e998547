use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, bail};
use lexrag_chunk::load_chunks;
use lexrag_index::{Retriever, ScoredPassage, VectorStore, load_embeddings};

use crate::bootstrap::build_indexer;
use crate::config::{Config, StoreBackend};

/// Makes `store` queryable. An in-memory store is filled from the persisted
/// chunk and embedding files; a Qdrant collection must already exist unless
/// the last preprocessing run produced no chunks.
///
/// # Errors
///
/// Returns an error if the persisted files are missing, the embeddings were
/// computed from different chunks, or the Qdrant collection has not been
/// built yet.
pub async fn prepare_store(config: &Config, store: Arc<dyn VectorStore>) -> anyhow::Result<()> {
    let collection = &config.vector_store.collection;
    match config.vector_store.backend {
        StoreBackend::Memory => {
            let chunks = load_chunks(&config.data.chunks_path())?;
            if chunks.is_empty() {
                tracing::info!("chunk file is empty, nothing to index");
                return Ok(());
            }
            let embeddings_path = config.data.embeddings_path();
            let stored = load_embeddings(&embeddings_path)?;
            if !stored.matches(&chunks) {
                bail!(
                    "{} was computed from different chunks; run `lexrag preprocess` again",
                    embeddings_path.display()
                );
            }
            build_indexer(&config.vector_store, store)
                .index_chunks(&chunks, &stored.vectors)
                .await
                .context("persisted chunks and embeddings do not match")?;
        }
        StoreBackend::Qdrant => {
            if !store.collection_exists(collection).await? && !empty_corpus(config) {
                bail!("collection {collection} not found; run `lexrag preprocess` first");
            }
        }
    }
    Ok(())
}

fn empty_corpus(config: &Config) -> bool {
    load_chunks(&config.data.chunks_path()).is_ok_and(|chunks| chunks.is_empty())
}

/// # Errors
///
/// Returns an error if retrieval or reranking fails.
pub async fn search(
    retriever: &Retriever,
    query: &str,
    top_k: usize,
) -> anyhow::Result<Vec<ScoredPassage>> {
    let passages = if retriever.has_reranker() {
        retriever.search_reranked(query, top_k).await
    } else {
        retriever.search(query, top_k).await
    };
    passages.with_context(|| format!("search failed for query {query:?}"))
}

#[must_use]
pub fn render_passages(passages: &[ScoredPassage]) -> String {
    if passages.is_empty() {
        return "no results\n".into();
    }
    let mut out = String::new();
    for (rank, passage) in passages.iter().enumerate() {
        let meta = &passage.chunk.metadata;
        let source = meta.source().unwrap_or("<unknown>");
        let _ = match meta.page() {
            Some(page) => writeln!(out, "[{}] {source} p.{page} (score {:.4})", rank + 1, passage.score),
            None => writeln!(out, "[{}] {source} (score {:.4})", rank + 1, passage.score),
        };
        let _ = writeln!(out, "{}\n", passage.chunk.content);
    }
    out
}
