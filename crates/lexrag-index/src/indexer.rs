use std::sync::Arc;

use lexrag_chunk::{Chunk, Metadata};

use crate::error::IndexError;
use crate::vector_store::{Payload, VectorPoint, VectorStore};

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Writes passages and their vectors into a collection.
///
/// Point ids are the passage positions (`0..n`), and every payload carries the
/// passage text under `page_content` plus its metadata, matching the chunk
/// file record shape.
pub struct Indexer {
    store: Arc<dyn VectorStore>,
    collection: String,
    batch_size: usize,
}

impl Indexer {
    #[must_use]
    pub fn new(store: Arc<dyn VectorStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Drops the collection so the next [`index`](Self::index) starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    pub async fn reset(&self) -> Result<(), IndexError> {
        if self.store.collection_exists(&self.collection).await? {
            self.store.delete_collection(&self.collection).await?;
            tracing::info!(collection = %self.collection, "collection dropped");
        }
        Ok(())
    }

    /// Upserts `texts[i]` with `vectors[i]` and `metadata[i]`. Returns the
    /// number of points written.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::LengthMismatch`] or [`IndexError::MetadataMismatch`]
    /// when the inputs do not pair up, [`IndexError::DimensionMismatch`] when
    /// vectors differ in length, or a store error.
    pub async fn index(
        &self,
        texts: &[String],
        vectors: &[Vec<f32>],
        metadata: &[Metadata],
    ) -> Result<usize, IndexError> {
        if texts.len() != vectors.len() {
            return Err(IndexError::LengthMismatch {
                texts: texts.len(),
                vectors: vectors.len(),
            });
        }
        if texts.len() != metadata.len() {
            return Err(IndexError::MetadataMismatch {
                texts: texts.len(),
                metadata: metadata.len(),
            });
        }
        let Some(dimension) = vectors.first().map(Vec::len) else {
            return Ok(0);
        };
        if let Some((index, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dimension) {
            return Err(IndexError::DimensionMismatch {
                index,
                expected: dimension,
                found: v.len(),
            });
        }

        self.store
            .ensure_collection(&self.collection, dimension as u64)
            .await?;

        let mut written = 0;
        for (batch_no, start) in (0..texts.len()).step_by(self.batch_size).enumerate() {
            let end = (start + self.batch_size).min(texts.len());
            let points = (start..end)
                .map(|i| {
                    Ok(VectorPoint {
                        id: i as u64,
                        vector: vectors[i].clone(),
                        payload: chunk_payload(&texts[i], &metadata[i])?,
                    })
                })
                .collect::<Result<Vec<_>, IndexError>>()?;
            self.store.upsert(&self.collection, points).await?;
            written += end - start;
            tracing::debug!(batch = batch_no, written, "batch upserted");
        }

        tracing::info!(collection = %self.collection, points = written, "index updated");
        Ok(written)
    }

    /// [`index`](Self::index) over chunk records.
    ///
    /// # Errors
    ///
    /// Same as [`index`](Self::index).
    pub async fn index_chunks(
        &self,
        chunks: &[Chunk],
        vectors: &[Vec<f32>],
    ) -> Result<usize, IndexError> {
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let metadata: Vec<Metadata> = chunks.iter().map(|c| c.metadata.clone()).collect();
        self.index(&texts, vectors, &metadata).await
    }
}

fn chunk_payload(text: &str, metadata: &Metadata) -> Result<Payload, serde_json::Error> {
    let mut payload = Payload::new();
    payload.insert("page_content".into(), serde_json::Value::String(text.to_owned()));
    payload.insert("metadata".into(), serde_json::to_value(metadata)?);
    Ok(payload)
}
