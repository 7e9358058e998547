use std::sync::Arc;

use anyhow::Context;
use lexrag_chunk::{LanguageModel, chunks_hash, save_chunks};
use lexrag_index::{
    Embedder, StoredEmbeddings, VectorStore, embed_all, remove_embeddings, save_embeddings,
};

use crate::bootstrap::{build_indexer, build_loader, build_pipeline};
use crate::config::Config;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessSummary {
    pub documents: usize,
    pub chunks: usize,
    pub embedded: usize,
    pub indexed: usize,
}

/// Load every document under `data.raw_dir`, chunk, and write `chunks.json`.
///
/// With an embedder, vectors are written to `embeddings.json` as well; with a
/// store, the collection is rebuilt from them. Any `embeddings.json` left by an
/// earlier run is removed first, so vectors never outlive the chunks they
/// were computed from.
///
/// # Errors
///
/// Returns an error if no document can be loaded, the configuration is
/// invalid, or any write, embedding or index step fails.
pub async fn preprocess(
    config: &Config,
    model: &LanguageModel,
    embedder: Option<&dyn Embedder>,
    store: Option<Arc<dyn VectorStore>>,
) -> anyhow::Result<PreprocessSummary> {
    let pipeline = build_pipeline(config, model)?;
    let documents = build_loader(config)
        .load_dir(&config.data.raw_dir)
        .await
        .with_context(|| format!("failed to load documents from {}", config.data.raw_dir.display()))?;

    let chunks = pipeline.process(&documents);
    let chunks_path = config.data.chunks_path();
    save_chunks(&chunks_path, &chunks)
        .with_context(|| format!("failed to write {}", chunks_path.display()))?;

    let embeddings_path = config.data.embeddings_path();
    remove_embeddings(&embeddings_path)
        .with_context(|| format!("failed to remove {}", embeddings_path.display()))?;

    let mut summary = PreprocessSummary {
        documents: documents.len(),
        chunks: chunks.len(),
        ..PreprocessSummary::default()
    };

    let Some(embedder) = embedder else {
        return Ok(summary);
    };
    let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
    let vectors = embed_all(embedder, &texts)
        .await
        .context("failed to embed chunks")?;
    let stored = StoredEmbeddings {
        chunks_hash: chunks_hash(&chunks),
        vectors,
    };
    save_embeddings(&embeddings_path, &stored)
        .with_context(|| format!("failed to write {}", embeddings_path.display()))?;
    let vectors = stored.vectors;
    summary.embedded = vectors.len();

    if let Some(store) = store {
        let indexer = build_indexer(&config.vector_store, store);
        indexer.reset().await.context("failed to reset collection")?;
        summary.indexed = indexer
            .index_chunks(&chunks, &vectors)
            .await
            .context("failed to index chunks")?;
    }

    tracing::info!(
        documents = summary.documents,
        chunks = summary.chunks,
        embedded = summary.embedded,
        indexed = summary.indexed,
        "preprocessing complete"
    );
    Ok(summary)
}
