use std::sync::Arc;

use lexrag_chunk::Chunk;

use crate::embed::Embedder;
use crate::error::RetrievalError;
use crate::rerank::Reranker;
use crate::vector_store::{ScoredVectorPoint, VectorStore};

/// Candidates fetched from the vector store before a reranker trims them.
pub const DEFAULT_CANDIDATES: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPassage {
    pub chunk: Chunk,
    pub score: f32,
}

/// Query-time side of the index: embed the question, search, optionally rerank.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    collection: String,
    reranker: Option<Arc<dyn Reranker>>,
    candidates: usize,
}

impl Retriever {
    #[must_use]
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            store,
            collection: collection.into(),
            reranker: None,
            candidates: DEFAULT_CANDIDATES,
        }
    }

    #[must_use]
    pub fn with_reranker(mut self, reranker: Arc<dyn Reranker>, candidates: usize) -> Self {
        self.reranker = Some(reranker);
        self.candidates = candidates.max(1);
        self
    }

    #[must_use]
    pub fn has_reranker(&self) -> bool {
        self.reranker.is_some()
    }

    /// Nearest `top_k` passages by vector similarity.
    ///
    /// An absent collection is an empty index: indexing an empty corpus
    /// creates no collection, so there is nothing to match.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding or search fails, or a stored payload is
    /// not a chunk record.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredPassage>, RetrievalError> {
        if !self.store.collection_exists(&self.collection).await? {
            tracing::debug!(collection = %self.collection, "collection absent, no passages");
            return Ok(Vec::new());
        }
        let vector = self.embedder.embed(query).await?;
        let points = self
            .store
            .search(&self.collection, vector, top_k as u64)
            .await?;
        let passages = points
            .into_iter()
            .map(to_passage)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(query, hits = passages.len(), "vector search");
        Ok(passages)
    }

    /// Fetches the configured candidate pool, reranks it and keeps `top_k`.
    /// Falls back to [`search`](Self::search) when no reranker is set.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval or reranking fails.
    pub async fn search_reranked(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredPassage>, RetrievalError> {
        let Some(reranker) = &self.reranker else {
            return self.search(query, top_k).await;
        };

        let mut pool = self.search(query, self.candidates.max(top_k)).await?;
        let texts: Vec<String> = pool.iter().map(|p| p.chunk.content.clone()).collect();
        let ranked = reranker.rank(query, &texts).await?;

        let mut slots: Vec<Option<ScoredPassage>> = pool.drain(..).map(Some).collect();
        let passages: Vec<ScoredPassage> = ranked
            .into_iter()
            .filter_map(|r| {
                slots.get_mut(r.index).and_then(Option::take).map(|mut p| {
                    p.score = r.score;
                    p
                })
            })
            .take(top_k)
            .collect();

        tracing::debug!(
            query,
            reranker = reranker.name(),
            candidates = texts.len(),
            kept = passages.len(),
            "reranked"
        );
        Ok(passages)
    }
}

fn to_passage(point: ScoredVectorPoint) -> Result<ScoredPassage, RetrievalError> {
    let chunk: Chunk = serde_json::from_value(serde_json::Value::Object(point.payload))
        .map_err(|source| RetrievalError::Payload {
            id: point.id.clone(),
            source,
        })?;
    Ok(ScoredPassage {
        chunk,
        score: point.score,
    })
}
