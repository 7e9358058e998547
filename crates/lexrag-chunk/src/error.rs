use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read document source {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file too large: {0} bytes")]
    FileTooLarge(u64),

    #[cfg(feature = "pdf")]
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("no documents found in {}", path.display())]
    NoDocuments { path: PathBuf },
}

/// Errors raised while loading language resources.
#[derive(Debug, thiserror::Error)]
pub enum NlpError {
    #[error("language resource {} is missing", path.display())]
    ResourceMissing { path: PathBuf },

    #[error("failed to read language resource {}: {source}", path.display())]
    ResourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("invalid character class: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ChunkingError {
    #[error("invalid chunking configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Nlp(#[from] NlpError),
}

#[derive(Debug, thiserror::Error)]
pub enum ChunkFileError {
    #[error("chunk file {} not found; run `lexrag preprocess` first", path.display())]
    Missing { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
