use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub chunking: ChunkingSection,
    #[serde(default)]
    pub language: LanguageConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_raw_dir() -> PathBuf {
    PathBuf::from("data/raw")
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("data/processed")
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DataConfig {
    /// Directory holding the source documents.
    #[serde(default = "default_raw_dir")]
    pub raw_dir: PathBuf,
    /// Directory receiving `chunks.json` and `embeddings.json`.
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_max_file_size() -> u64 {
    lexrag_chunk::DEFAULT_MAX_FILE_SIZE
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
            processed_dir: default_processed_dir(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl DataConfig {
    #[must_use]
    pub fn chunks_path(&self) -> PathBuf {
        self.processed_dir.join(lexrag_chunk::CHUNKS_FILE)
    }

    #[must_use]
    pub fn embeddings_path(&self) -> PathBuf {
        self.processed_dir.join(lexrag_index::EMBEDDINGS_FILE)
    }
}

fn default_initial_chunk_size() -> usize {
    512
}

fn default_min_length() -> usize {
    100
}

/// `[chunking]` table; mirrors [`lexrag_chunk::ChunkingConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChunkingSection {
    #[serde(default = "default_initial_chunk_size")]
    pub initial_chunk_size: usize,
    #[serde(default)]
    pub chunk_overlap: usize,
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default)]
    pub clean: bool,
}

impl Default for ChunkingSection {
    fn default() -> Self {
        Self {
            initial_chunk_size: default_initial_chunk_size(),
            chunk_overlap: 0,
            min_length: default_min_length(),
            clean: false,
        }
    }
}

impl From<&ChunkingSection> for lexrag_chunk::ChunkingConfig {
    fn from(section: &ChunkingSection) -> Self {
        Self {
            initial_chunk_size: section.initial_chunk_size,
            chunk_overlap: section.chunk_overlap,
            min_length: section.min_length,
            clean: section.clean,
        }
    }
}

fn default_language_code() -> String {
    "es".into()
}

fn default_resources_dir() -> PathBuf {
    PathBuf::from("resources")
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LanguageConfig {
    /// ISO 639-1 code; resources are read from `<resources_dir>/<code>/`.
    #[serde(default = "default_language_code")]
    pub code: String,
    #[serde(default = "default_resources_dir")]
    pub resources_dir: PathBuf,
    /// Base URL for a one-time download of missing resource files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_url: Option<String>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            code: default_language_code(),
            resources_dir: default_resources_dir(),
            resource_url: None,
        }
    }
}

impl LanguageConfig {
    #[must_use]
    pub fn model_dir(&self) -> PathBuf {
        self.resources_dir.join(&self.code)
    }
}

/// Embedding backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    #[default]
    Ollama,
    OpenAi,
    Mock,
}

impl EmbeddingProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
            Self::Mock => "mock",
        }
    }
}

impl std::fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_embedding_base_url() -> String {
    "http://localhost:11434".into()
}

fn default_embedding_model() -> String {
    "paraphrase-multilingual".into()
}

fn default_dimension() -> usize {
    384
}

#[derive(Clone, PartialEq, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProvider,
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Vector size of the mock provider.
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// Only read from `LEXRAG_OPENAI_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::default(),
            base_url: default_embedding_base_url(),
            model: default_embedding_model(),
            dimension: default_dimension(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Rebuilt from `embeddings.json` on every query run.
    #[default]
    Memory,
    Qdrant,
}

fn default_qdrant_url() -> String {
    "http://localhost:6334".into()
}

fn default_collection() -> String {
    "my_documents".into()
}

fn default_batch_size() -> usize {
    lexrag_index::indexer::DEFAULT_BATCH_SIZE
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VectorStoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_qdrant_url")]
    pub qdrant_url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            qdrant_url: default_qdrant_url(),
            collection: default_collection(),
            batch_size: default_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RerankerKind {
    None,
    #[default]
    Lexical,
    Http,
}

fn default_top_k() -> usize {
    3
}

fn default_candidates() -> usize {
    lexrag_index::retriever::DEFAULT_CANDIDATES
}

fn default_reranker_url() -> String {
    "http://localhost:8080".into()
}

fn default_reranker_model() -> String {
    "cross-encoder/ms-marco-MiniLM-L-6-v2".into()
}

fn default_sample_size() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Pool fetched from the store before reranking.
    #[serde(default = "default_candidates")]
    pub candidates: usize,
    #[serde(default)]
    pub reranker: RerankerKind,
    #[serde(default = "default_reranker_url")]
    pub reranker_url: String,
    #[serde(default = "default_reranker_model")]
    pub reranker_model: String,
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            candidates: default_candidates(),
            reranker: RerankerKind::default(),
            reranker_url: default_reranker_url(),
            reranker_model: default_reranker_model(),
            sample_size: default_sample_size(),
        }
    }
}

/// Chat backend used for answers and dataset generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProvider {
    #[default]
    Ollama,
    OpenAi,
    Mock,
}

fn default_generation_base_url() -> String {
    "http://localhost:11434".into()
}

fn default_generation_model() -> String {
    "llama3.1".into()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_dataset_size() -> usize {
    20
}

#[derive(Clone, PartialEq, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub provider: GenerationProvider,
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// Reply length cap for OpenAI-compatible endpoints.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Chunks sampled by `generate-dataset` when `-n` is not given.
    #[serde(default = "default_dataset_size")]
    pub dataset_size: usize,
    /// Only read from `LEXRAG_OPENAI_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("dataset_size", &self.dataset_size)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: GenerationProvider::default(),
            base_url: default_generation_base_url(),
            model: default_generation_model(),
            max_tokens: default_max_tokens(),
            dataset_size: default_dataset_size(),
            api_key: None,
        }
    }
}
