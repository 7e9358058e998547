use std::path::Path;

use super::{DEFAULT_MAX_FILE_SIZE, DocumentLoader, LoadFuture, checked_path};
use crate::types::{Document, Metadata};

/// Loads a plain-text or markdown file as a single document.
pub struct TextLoader {
    pub max_file_size: u64,
}

impl Default for TextLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for TextLoader {
    fn load(&self, path: &Path) -> LoadFuture<'_> {
        let path = path.to_path_buf();
        let max_size = self.max_file_size;
        Box::pin(async move {
            let path = checked_path(&path, max_size).await?;

            let content_type = match path.extension().and_then(|e| e.to_str()) {
                Some("md" | "markdown") => "text/markdown",
                _ => "text/plain",
            };

            let content = tokio::fs::read_to_string(&path).await?;

            Ok(vec![Document::new(
                content,
                Metadata::new()
                    .with(Metadata::SOURCE, path.display().to_string())
                    .with(Metadata::CONTENT_TYPE, content_type),
            )])
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt", "md", "markdown"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentError;

    #[tokio::test]
    async fn load_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("decreto.txt");
        std::fs::write(&file, "Artículo 1. Objeto.").unwrap();

        let docs = TextLoader::default().load(&file).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "Artículo 1. Objeto.");
        assert_eq!(docs[0].metadata.content_type(), Some("text/plain"));
        assert_eq!(docs[0].metadata.page(), None);
    }

    #[tokio::test]
    async fn load_markdown_file() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["notas.md", "notas.markdown"] {
            let file = dir.path().join(name);
            std::fs::write(&file, "# Título").unwrap();
            let docs = TextLoader::default().load(&file).await.unwrap();
            assert_eq!(docs[0].metadata.content_type(), Some("text/markdown"));
        }
    }

    #[tokio::test]
    async fn missing_file_is_unreadable_source() {
        let result = TextLoader::default()
            .load(Path::new("/nonexistent/ley.txt"))
            .await;
        assert!(matches!(result, Err(DocumentError::SourceUnreadable { .. })));
    }

    #[tokio::test]
    async fn empty_file_loads_as_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("vacio.txt");
        std::fs::write(&file, "").unwrap();

        let docs = TextLoader::default().load(&file).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].content.is_empty());
    }

    #[tokio::test]
    async fn source_is_canonical_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ley.txt");
        std::fs::write(&file, "data").unwrap();

        let docs = TextLoader::default().load(&file).await.unwrap();
        let canonical = std::fs::canonicalize(&file).unwrap();
        assert_eq!(
            docs[0].metadata.source(),
            Some(canonical.display().to_string().as_str())
        );
    }

    #[tokio::test]
    async fn file_too_large_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("grande.txt");
        std::fs::write(&file, "x").unwrap();

        let loader = TextLoader { max_file_size: 0 };
        let result = loader.load(&file).await;
        assert!(matches!(result, Err(DocumentError::FileTooLarge(1))));
    }

    #[test]
    fn supports_by_extension() {
        let loader = TextLoader::default();
        assert!(loader.supports(Path::new("a/b.txt")));
        assert!(loader.supports(Path::new("README.MD")));
        assert!(!loader.supports(Path::new("ley.pdf")));
        assert!(!loader.supports(Path::new("sin_extension")));
    }
}
