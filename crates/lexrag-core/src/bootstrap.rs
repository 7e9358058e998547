//! Component construction from [`Config`].

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use lexrag_chunk::{
    ChunkingConfig, ChunkingPipeline, DirectoryLoader, Language, LanguageModel, Lexicon, NlpError,
};
use lexrag_index::{
    ChatProvider, Embedder, HttpReranker, InMemoryVectorStore, Indexer, LexicalReranker,
    OllamaChat, OllamaEmbedder, OpenAiChat, OpenAiEmbedder, QdrantOps, Reranker, Retriever,
    VectorStore,
};

use crate::config::{
    Config, EmbeddingConfig, EmbeddingProvider, GenerationConfig, GenerationProvider,
    LanguageConfig, RerankerKind, RetrievalConfig, StoreBackend, VectorStoreConfig,
};

/// Loads the language model, downloading missing resource files once when
/// `language.resource_url` is set.
///
/// # Errors
///
/// Returns an error for an unsupported language, or when the resources are
/// still missing after the download attempt.
pub async fn load_language_model(config: &LanguageConfig) -> anyhow::Result<LanguageModel> {
    let language = Language::from_code(&config.code)?;
    let dir = config.model_dir();

    match LanguageModel::load(language, &dir) {
        Ok(model) => Ok(model),
        Err(NlpError::ResourceMissing { path }) => {
            let Some(base_url) = config.resource_url.as_deref() else {
                bail!(
                    "language resource {} is missing and no language.resource_url is configured",
                    path.display()
                );
            };
            tracing::warn!(path = %path.display(), "language resources missing, fetching");
            fetch_resources(base_url, language, &dir).await?;
            LanguageModel::load(language, &dir).with_context(|| {
                format!("language resources in {} unusable after fetch", dir.display())
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Downloads every resource file absent from `dir` from `<base_url>/<code>/<file>`.
///
/// # Errors
///
/// Returns an error if a request fails or a file cannot be written.
pub async fn fetch_resources(base_url: &str, language: Language, dir: &Path) -> anyhow::Result<()> {
    let missing = Lexicon::missing_resources(dir);
    if missing.is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let client = lexrag_index::http::default_client();
    let base = base_url.trim_end_matches('/');
    for path in missing {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let url = format!("{base}/{}/{name}", language.code());
        let body = client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .with_context(|| format!("failed to download {url}"))?
            .text()
            .await
            .with_context(|| format!("failed to read {url}"))?;
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(url, path = %path.display(), "language resource fetched");
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the chunking settings are invalid.
pub fn build_pipeline(config: &Config, model: &LanguageModel) -> anyhow::Result<ChunkingPipeline> {
    let chunking = ChunkingConfig::from(&config.chunking);
    ChunkingPipeline::new(&chunking, model).context("invalid chunking configuration")
}

#[must_use]
pub fn build_loader(config: &Config) -> DirectoryLoader {
    DirectoryLoader::with_max_file_size(config.data.max_file_size)
}

/// # Errors
///
/// Returns an error if the provider is not usable with the given settings.
pub fn create_embedder(config: &EmbeddingConfig) -> anyhow::Result<Arc<dyn Embedder>> {
    match config.provider {
        EmbeddingProvider::Ollama => {
            let embedder = OllamaEmbedder::new(&config.base_url, config.model.clone())
                .context("failed to create Ollama embedder")?;
            Ok(Arc::new(embedder))
        }
        EmbeddingProvider::OpenAi => {
            let api_key = config
                .api_key
                .clone()
                .context("LEXRAG_OPENAI_API_KEY not found for the openai embedding provider")?;
            Ok(Arc::new(OpenAiEmbedder::new(
                api_key,
                config.base_url.clone(),
                config.model.clone(),
            )))
        }
        #[cfg(feature = "mock")]
        EmbeddingProvider::Mock => Ok(Arc::new(lexrag_index::MockEmbedder::new(
            config.dimension,
        ))),
        #[cfg(not(feature = "mock"))]
        EmbeddingProvider::Mock => bail!("embedding provider mock not available (feature not enabled)"),
    }
}

/// # Errors
///
/// Returns an error if the provider is not usable with the given settings.
pub fn create_chat(config: &GenerationConfig) -> anyhow::Result<Arc<dyn ChatProvider>> {
    match config.provider {
        GenerationProvider::Ollama => {
            let chat = OllamaChat::new(&config.base_url, config.model.clone())
                .context("failed to create Ollama chat client")?;
            Ok(Arc::new(chat))
        }
        GenerationProvider::OpenAi => {
            let api_key = config
                .api_key
                .clone()
                .context("LEXRAG_OPENAI_API_KEY not found for the openai generation provider")?;
            Ok(Arc::new(OpenAiChat::new(
                api_key,
                config.base_url.clone(),
                config.model.clone(),
                config.max_tokens,
            )))
        }
        #[cfg(feature = "mock")]
        GenerationProvider::Mock => Ok(Arc::new(lexrag_index::MockChat::default())),
        #[cfg(not(feature = "mock"))]
        GenerationProvider::Mock => bail!("generation provider mock not available (feature not enabled)"),
    }
}

/// # Errors
///
/// Returns an error if the Qdrant client cannot be created.
pub fn create_store(config: &VectorStoreConfig) -> anyhow::Result<Arc<dyn VectorStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(InMemoryVectorStore::new())),
        StoreBackend::Qdrant => {
            let ops = QdrantOps::new(&config.qdrant_url)
                .map_err(|e| anyhow::anyhow!("{e}"))
                .with_context(|| format!("failed to create Qdrant client for {}", config.qdrant_url))?;
            Ok(Arc::new(ops))
        }
    }
}

#[must_use]
pub fn create_reranker(config: &RetrievalConfig) -> Option<Arc<dyn Reranker>> {
    match config.reranker {
        RerankerKind::None => None,
        RerankerKind::Lexical => Some(Arc::new(LexicalReranker::default())),
        RerankerKind::Http => Some(Arc::new(HttpReranker::new(
            config.reranker_url.clone(),
            config.reranker_model.clone(),
        ))),
    }
}

#[must_use]
pub fn build_indexer(config: &VectorStoreConfig, store: Arc<dyn VectorStore>) -> Indexer {
    Indexer::new(store, config.collection.clone()).with_batch_size(config.batch_size)
}

/// Retriever over `store`, with the configured reranker attached when `rerank` is set.
#[must_use]
pub fn build_retriever(
    config: &Config,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    rerank: bool,
) -> Retriever {
    let retriever = Retriever::new(embedder, store, config.vector_store.collection.clone());
    match create_reranker(&config.retrieval).filter(|_| rerank) {
        Some(reranker) => retriever.with_reranker(reranker, config.retrieval.candidates),
        None => retriever,
    }
}
