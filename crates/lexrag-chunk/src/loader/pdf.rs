use std::path::Path;

use super::{DEFAULT_MAX_FILE_SIZE, DocumentLoader, LoadFuture, checked_path};
use crate::error::DocumentError;
use crate::types::{Document, Metadata};

/// Extracts text from a PDF, one document per page. Pages are numbered from 0.
pub struct PdfLoader {
    pub max_file_size: u64,
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> LoadFuture<'_> {
        let path = path.to_path_buf();
        let max_size = self.max_file_size;
        Box::pin(async move {
            let path = checked_path(&path, max_size).await?;

            let source = path.display().to_string();
            let path_buf = path.clone();
            let pages = tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_by_pages(&path_buf)
                    .map_err(|e| DocumentError::Pdf(e.to_string()))
            })
            .await
            .map_err(|e| DocumentError::Io(std::io::Error::other(e)))??;

            tracing::debug!(source = %source, pages = pages.len(), "pdf extracted");

            Ok(pages
                .into_iter()
                .enumerate()
                .map(|(page, content)| {
                    Document::new(
                        content,
                        Metadata::new()
                            .with(Metadata::SOURCE, source.clone())
                            .with(Metadata::CONTENT_TYPE, "application/pdf")
                            .with(Metadata::PAGE, page.to_string()),
                    )
                })
                .collect())
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}
