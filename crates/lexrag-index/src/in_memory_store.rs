use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::vector_store::{
    BoxFuture, Payload, ScoredVectorPoint, VectorPoint, VectorStore, VectorStoreError,
};

struct StoredPoint {
    vector: Vec<f32>,
    payload: Payload,
}

struct InMemoryCollection {
    vector_size: u64,
    points: BTreeMap<u64, StoredPoint>,
}

/// Brute-force cosine store kept in process memory.
pub struct InMemoryVectorStore {
    collections: RwLock<BTreeMap<String, InMemoryCollection>>,
}

impl InMemoryVectorStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of points in `collection`, or `None` if it does not exist.
    #[must_use]
    pub fn point_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .ok()?
            .get(collection)
            .map(|c| c.points.len())
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryVectorStore").finish_non_exhaustive()
    }
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl VectorStore for InMemoryVectorStore {
    fn ensure_collection(
        &self,
        collection: &str,
        vector_size: u64,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let mut cols = self
                .collections
                .write()
                .map_err(|e| VectorStoreError::Collection(e.to_string()))?;
            cols.entry(collection)
                .or_insert_with(|| InMemoryCollection {
                    vector_size,
                    points: BTreeMap::new(),
                });
            Ok(())
        })
    }

    fn collection_exists(&self, collection: &str) -> BoxFuture<'_, Result<bool, VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let cols = self
                .collections
                .read()
                .map_err(|e| VectorStoreError::Collection(e.to_string()))?;
            Ok(cols.contains_key(&collection))
        })
    }

    fn delete_collection(&self, collection: &str) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let mut cols = self
                .collections
                .write()
                .map_err(|e| VectorStoreError::Collection(e.to_string()))?;
            cols.remove(&collection);
            Ok(())
        })
    }

    fn upsert(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let mut cols = self
                .collections
                .write()
                .map_err(|e| VectorStoreError::Upsert(e.to_string()))?;
            let col = cols.get_mut(&collection).ok_or_else(|| {
                VectorStoreError::Upsert(format!("collection {collection} not found"))
            })?;
            for p in points {
                if p.vector.len() as u64 != col.vector_size {
                    return Err(VectorStoreError::Upsert(format!(
                        "point {} has dimension {}, collection expects {}",
                        p.id,
                        p.vector.len(),
                        col.vector_size
                    )));
                }
                col.points.insert(
                    p.id,
                    StoredPoint {
                        vector: p.vector,
                        payload: p.payload,
                    },
                );
            }
            Ok(())
        })
    }

    fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> BoxFuture<'_, Result<Vec<ScoredVectorPoint>, VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let cols = self
                .collections
                .read()
                .map_err(|e| VectorStoreError::Search(e.to_string()))?;
            let col = cols.get(&collection).ok_or_else(|| {
                VectorStoreError::Search(format!("collection {collection} not found"))
            })?;

            let mut scored: Vec<ScoredVectorPoint> = col
                .points
                .iter()
                .map(|(id, sp)| ScoredVectorPoint {
                    id: id.to_string(),
                    score: cosine_similarity(&vector, &sp.vector),
                    payload: sp.payload.clone(),
                })
                .collect();

            // Stable sort keeps insertion (id) order among equal scores.
            scored.sort_by(|a, b| b.score.total_cmp(&a.score));
            scored.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            Ok(scored)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: u64, vector: Vec<f32>, text: &str) -> VectorPoint {
        let mut payload = Payload::new();
        payload.insert("page_content".into(), serde_json::json!(text));
        VectorPoint {
            id,
            vector,
            payload,
        }
    }

    #[tokio::test]
    async fn ensure_collection_is_idempotent() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection("docs", 3).await.unwrap();
        store
            .upsert("docs", vec![point(0, vec![1.0, 0.0, 0.0], "a")])
            .await
            .unwrap();
        store.ensure_collection("docs", 3).await.unwrap();
        assert_eq!(store.point_count("docs"), Some(1));
        assert!(store.collection_exists("docs").await.unwrap());
    }

    #[tokio::test]
    async fn search_orders_by_cosine_similarity() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection("docs", 2).await.unwrap();
        store
            .upsert(
                "docs",
                vec![
                    point(0, vec![0.0, 1.0], "ortogonal"),
                    point(1, vec![1.0, 0.1], "cercano"),
                    point(2, vec![1.0, 0.5], "medio"),
                ],
            )
            .await
            .unwrap();

        let results = store.search("docs", vec![1.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "1");
        assert_eq!(results[1].id, "2");
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn upsert_replaces_same_id() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection("docs", 2).await.unwrap();
        store
            .upsert("docs", vec![point(7, vec![1.0, 0.0], "viejo")])
            .await
            .unwrap();
        store
            .upsert("docs", vec![point(7, vec![0.0, 1.0], "nuevo")])
            .await
            .unwrap();
        let results = store.search("docs", vec![0.0, 1.0], 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].payload["page_content"], "nuevo");
    }

    #[tokio::test]
    async fn wrong_dimension_rejected() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection("docs", 3).await.unwrap();
        let result = store.upsert("docs", vec![point(0, vec![1.0], "x")]).await;
        assert!(matches!(result, Err(VectorStoreError::Upsert(_))));
    }

    #[tokio::test]
    async fn missing_collection_errors() {
        let store = InMemoryVectorStore::new();
        assert!(store.search("nope", vec![1.0], 1).await.is_err());
        assert!(store.upsert("nope", vec![]).await.is_err());
        assert!(!store.collection_exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn delete_collection_removes_points() {
        let store = InMemoryVectorStore::new();
        store.ensure_collection("docs", 1).await.unwrap();
        store.delete_collection("docs").await.unwrap();
        assert_eq!(store.point_count("docs"), None);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).abs() < f32::EPSILON);
        assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-6);
    }
}
