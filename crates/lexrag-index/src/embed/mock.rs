//! Deterministic offline embedder for tests and local runs.

use super::{EmbedFuture, Embedder};
use crate::error::EmbedError;

/// Hashes each lowercase word into one of `dimension` buckets, so texts that
/// share words get similar vectors.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    pub dimension: usize,
    pub fail: bool,
}

impl MockEmbedder {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            fail: false,
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(4)
        }
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        for word in text.split_whitespace() {
            let word: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if word.is_empty() {
                continue;
            }
            let hash = blake3::hash(word.as_bytes());
            let mut bucket = [0u8; 8];
            bucket.copy_from_slice(&hash.as_bytes()[..8]);
            let idx = u64::from_le_bytes(bucket) % self.dimension as u64;
            #[expect(clippy::cast_possible_truncation)]
            let idx = idx as usize;
            vector[idx] += 1.0;
        }
        vector
    }
}

impl Embedder for MockEmbedder {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }

    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        Box::pin(async move {
            if self.fail {
                return Err(EmbedError::Other("mock embedding error".into()));
            }
            Ok(self.vectorize(text))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deterministic_and_sized() {
        let embedder = MockEmbedder::new(16);
        let a = embedder.embed("Reglamento Sanitario").await.unwrap();
        let b = embedder.embed("reglamento sanitario.").await.unwrap();
        assert_eq!(a.len(), 16);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn empty_text_is_zero_vector() {
        let v = MockEmbedder::new(4).embed("").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
