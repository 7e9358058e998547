//! Text embedding providers and the persisted embeddings file.

#[cfg(any(test, feature = "mock"))]
mod mock;
mod ollama;
mod openai;

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use lexrag_chunk::{Chunk, chunks_hash};
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;

use crate::error::EmbedError;

pub const EMBEDDINGS_FILE: &str = "embeddings.json";

pub type EmbedFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<f32>, EmbedError>> + Send + 'a>>;

/// Maps a text to a dense vector.
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a>;
}

/// Embeds `texts` one at a time, in order.
///
/// # Errors
///
/// Returns the first provider error encountered.
pub async fn embed_all<S: AsRef<str>>(
    embedder: &dyn Embedder,
    texts: &[S],
) -> Result<Vec<Vec<f32>>, EmbedError> {
    let mut vectors = Vec::with_capacity(texts.len());
    for (i, text) in texts.iter().enumerate() {
        vectors.push(embedder.embed(text.as_ref()).await?);
        if (i + 1) % 100 == 0 {
            tracing::debug!(done = i + 1, total = texts.len(), "embedding progress");
        }
    }
    tracing::info!(
        provider = embedder.name(),
        vectors = vectors.len(),
        "embeddings generated"
    );
    Ok(vectors)
}

/// Vectors persisted next to the chunk file, tagged with the
/// [`chunks_hash`](lexrag_chunk::chunks_hash) of the chunks they were computed
/// from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEmbeddings {
    pub chunks_hash: String,
    pub vectors: Vec<Vec<f32>>,
}

impl StoredEmbeddings {
    /// Whether these vectors were computed from `chunks`.
    #[must_use]
    pub fn matches(&self, chunks: &[Chunk]) -> bool {
        self.vectors.len() == chunks.len() && self.chunks_hash == chunks_hash(chunks)
    }
}

/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_embeddings(path: &Path, stored: &StoredEmbeddings) -> Result<(), EmbedError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string(stored)?)?;
    tracing::info!(
        path = %path.display(),
        vectors = stored.vectors.len(),
        "embeddings saved"
    );
    Ok(())
}

/// # Errors
///
/// Returns [`EmbedError::FileMissing`] if `path` does not exist.
pub fn load_embeddings(path: &Path) -> Result<StoredEmbeddings, EmbedError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(EmbedError::FileMissing {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Deletes the embeddings file at `path`, if any. Returns whether one existed.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn remove_embeddings(path: &Path) -> Result<bool, EmbedError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "stale embeddings removed");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use lexrag_chunk::Metadata;

    use super::*;

    #[tokio::test]
    async fn embed_all_preserves_order() {
        let embedder = MockEmbedder::new(8);
        let texts = ["uno", "dos", "tres"];
        let vectors = embed_all(&embedder, &texts).await.unwrap();
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[1], embedder.embed("dos").await.unwrap());
    }

    #[tokio::test]
    async fn embed_all_stops_at_first_error() {
        let embedder = MockEmbedder::failing();
        let result = embed_all(&embedder, &["a", "b"]).await;
        assert!(result.is_err());
    }

    fn chunk(text: &str) -> Chunk {
        Chunk {
            content: text.into(),
            metadata: Metadata::new().with(Metadata::SOURCE, "rsa.pdf"),
        }
    }

    #[test]
    fn embeddings_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed").join(EMBEDDINGS_FILE);
        let chunks = vec![chunk("uno"), chunk("dos")];
        let stored = StoredEmbeddings {
            chunks_hash: chunks_hash(&chunks),
            vectors: vec![vec![0.25_f32, -1.0, 3.5], vec![0.0, 0.0, 1.0]],
        };
        save_embeddings(&path, &stored).unwrap();
        let loaded = load_embeddings(&path).unwrap();
        assert_eq!(loaded, stored);
        assert!(loaded.matches(&chunks));
    }

    #[test]
    fn vectors_from_other_text_do_not_match() {
        let chunks = vec![chunk("uno"), chunk("dos")];
        let stored = StoredEmbeddings {
            chunks_hash: chunks_hash(&chunks),
            vectors: vec![vec![1.0], vec![2.0]],
        };
        assert!(!stored.matches(&[chunk("uno"), chunk("tres")]));
        assert!(!stored.matches(&chunks[..1]));
    }

    #[test]
    fn remove_reports_whether_file_existed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EMBEDDINGS_FILE);
        assert!(!remove_embeddings(&path).unwrap());
        std::fs::write(&path, "{}").unwrap();
        assert!(remove_embeddings(&path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn missing_embeddings_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_embeddings(&dir.path().join(EMBEDDINGS_FILE)).unwrap_err();
        assert!(matches!(err, EmbedError::FileMissing { .. }));
        assert!(err.to_string().contains("lexrag preprocess"));
    }
}
