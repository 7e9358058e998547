use std::path::{Path, PathBuf};

use super::{DEFAULT_MAX_FILE_SIZE, DocumentLoader, TextLoader};
use crate::error::DocumentError;
use crate::types::Document;

/// Loads every supported file directly inside one directory.
///
/// Files are visited in file-name order. A file that fails to load is logged
/// and skipped; the batch only fails when nothing at all could be loaded.
pub struct DirectoryLoader {
    loaders: Vec<Box<dyn DocumentLoader>>,
}

impl Default for DirectoryLoader {
    fn default() -> Self {
        Self::with_max_file_size(DEFAULT_MAX_FILE_SIZE)
    }
}

impl DirectoryLoader {
    #[must_use]
    pub fn new(loaders: Vec<Box<dyn DocumentLoader>>) -> Self {
        Self { loaders }
    }

    /// Built-in loaders (text, markdown and, with the `pdf` feature, PDF).
    #[must_use]
    pub fn with_max_file_size(max_file_size: u64) -> Self {
        let mut loaders: Vec<Box<dyn DocumentLoader>> = Vec::new();
        #[cfg(feature = "pdf")]
        loaders.push(Box::new(super::PdfLoader { max_file_size }));
        loaders.push(Box::new(TextLoader { max_file_size }));
        Self { loaders }
    }

    fn loader_for(&self, path: &Path) -> Option<&dyn DocumentLoader> {
        self.loaders
            .iter()
            .find(|l| l.supports(path))
            .map(|l| &**l)
    }

    /// Supported files in `dir`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::SourceUnreadable`] if the directory cannot be listed.
    pub async fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>, DocumentError> {
        let unreadable = |source| DocumentError::SourceUnreadable {
            path: dir.to_path_buf(),
            source,
        };
        let mut entries = tokio::fs::read_dir(dir).await.map_err(unreadable)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if self.loader_for(&path).is_some() {
                files.push(path);
            } else {
                tracing::debug!(path = %path.display(), "skipping unsupported file");
            }
        }
        files.sort();
        Ok(files)
    }

    /// # Errors
    ///
    /// Returns [`DocumentError::NoDocuments`] if no file in `dir` produced a
    /// document, or [`DocumentError::SourceUnreadable`] if `dir` cannot be listed.
    pub async fn load_dir(&self, dir: &Path) -> Result<Vec<Document>, DocumentError> {
        let files = self.discover(dir).await?;
        let mut documents = Vec::new();
        let mut failed = 0usize;

        for path in &files {
            let Some(loader) = self.loader_for(path) else {
                continue;
            };
            match loader.load(path).await {
                Ok(docs) => {
                    tracing::debug!(path = %path.display(), documents = docs.len(), "file loaded");
                    documents.extend(docs);
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(path = %path.display(), "skipping document: {e:#}");
                }
            }
        }

        if documents.is_empty() {
            return Err(DocumentError::NoDocuments {
                path: dir.to_path_buf(),
            });
        }

        tracing::info!(
            dir = %dir.display(),
            files = files.len(),
            failed,
            documents = documents.len(),
            "documents loaded"
        );
        Ok(documents)
    }
}
