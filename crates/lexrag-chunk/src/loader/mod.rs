mod directory;
#[cfg(feature = "pdf")]
mod pdf;
mod text;

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

pub use directory::DirectoryLoader;
#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;
pub use text::TextLoader;

use crate::error::DocumentError;
use crate::types::Document;

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

pub type LoadFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Document>, DocumentError>> + Send + 'a>>;

pub trait DocumentLoader: Send + Sync {
    fn load(&self, path: &Path) -> LoadFuture<'_>;

    fn supported_extensions(&self) -> &[&str];

    fn supports(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.supported_extensions()
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(ext))
            })
    }
}

/// Rejects files above `max_size` and returns the canonical path.
async fn checked_path(path: &Path, max_size: u64) -> Result<std::path::PathBuf, DocumentError> {
    let path = tokio::fs::canonicalize(path)
        .await
        .map_err(|source| DocumentError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    let meta = tokio::fs::metadata(&path).await?;
    if meta.len() > max_size {
        return Err(DocumentError::FileTooLarge(meta.len()));
    }
    Ok(path)
}
