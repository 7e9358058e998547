//! Error types for lexrag-index.

use crate::vector_store::VectorStoreError;

/// Errors raised by embedding providers.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{provider} embedding request failed (status {status})")]
    Status { provider: &'static str, status: u16 },

    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("embeddings file {} not found; run `lexrag preprocess` first", path.display())]
    FileMissing { path: std::path::PathBuf },

    #[error("{0}")]
    Other(String),
}

/// Errors raised by chat-completion providers.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{provider} chat request failed (status {status})")]
    Status { provider: &'static str, status: u16 },

    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },

    #[error("{0}")]
    Other(String),
}

/// Errors raised while writing vectors into a store.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Texts and vectors must pair up one to one.
    #[error("length mismatch: {texts} texts but {vectors} vectors")]
    LengthMismatch { texts: usize, vectors: usize },

    #[error("length mismatch: {texts} texts but {metadata} metadata entries")]
    MetadataMismatch { texts: usize, metadata: usize },

    #[error("vector {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RerankError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rerank request failed (status {0})")]
    Status(u16),

    #[error("reranker returned index {index} for {candidates} candidates")]
    IndexOutOfRange { index: usize, candidates: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("embedding failed: {0}")]
    Embed(#[from] EmbedError),

    #[error("vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("rerank failed: {0}")]
    Rerank(#[from] RerankError),

    #[error("point {id} has a malformed payload: {source}")]
    Payload {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("sample {index}: {reason}")]
    InvalidSample { index: usize, reason: &'static str },

    #[error("no samples to evaluate")]
    Empty,
}
