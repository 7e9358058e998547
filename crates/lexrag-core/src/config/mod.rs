mod env;
mod types;


pub use types::*;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str::<Self>(&content)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        let chunking = &self.chunking;
        if chunking.initial_chunk_size == 0 {
            bail!("chunking.initial_chunk_size must be greater than zero");
        }
        if chunking.chunk_overlap >= chunking.initial_chunk_size {
            bail!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.initial_chunk_size ({})",
                chunking.chunk_overlap,
                chunking.initial_chunk_size
            );
        }
        if chunking.min_length == 0 {
            bail!("chunking.min_length must be greater than zero");
        }
        if self.data.max_file_size == 0 {
            bail!("data.max_file_size must be greater than zero");
        }
        if self.embedding.dimension == 0 {
            bail!("embedding.dimension must be greater than zero");
        }
        if self.vector_store.batch_size == 0 {
            bail!("vector_store.batch_size must be greater than zero");
        }
        if self.vector_store.collection.trim().is_empty() {
            bail!("vector_store.collection must not be empty");
        }
        if self.retrieval.top_k == 0 {
            bail!("retrieval.top_k must be greater than zero");
        }
        if self.retrieval.candidates < self.retrieval.top_k {
            bail!(
                "retrieval.candidates ({}) must be at least retrieval.top_k ({})",
                self.retrieval.candidates,
                self.retrieval.top_k
            );
        }
        if !(1..=100).contains(&self.retrieval.sample_size) {
            bail!("retrieval.sample_size must be between 1 and 100");
        }
        if self.generation.max_tokens == 0 {
            bail!("generation.max_tokens must be greater than zero");
        }
        if self.generation.dataset_size == 0 {
            bail!("generation.dataset_size must be greater than zero");
        }
        Ok(())
    }
}

/// Priority: explicit path > `LEXRAG_CONFIG` env > `config/default.toml`.
#[must_use]
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("LEXRAG_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_CONFIG_PATH)
}
