//! Persisted chunk list shared between preprocessing and the query side.
//!
//! The file is a pretty-printed JSON array of `{"page_content", "metadata"}`
//! records. [`chunks_hash`] fingerprints a chunk list so files derived from it
//! (such as stored embeddings) can be checked against the current one.

use std::path::Path;

use crate::error::ChunkFileError;
use crate::types::Chunk;

pub const CHUNKS_FILE: &str = "chunks.json";

/// Writes `chunks` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be written.
pub fn save_chunks(path: &Path, chunks: &[Chunk]) -> Result<(), ChunkFileError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(chunks)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), chunks = chunks.len(), "chunks saved");
    Ok(())
}

/// BLAKE3 hex digest over every chunk's text and metadata, in order.
///
/// Fields are length-prefixed, so moving text between a chunk and its
/// neighbour changes the digest.
#[must_use]
pub fn chunks_hash(chunks: &[Chunk]) -> String {
    fn field(hasher: &mut blake3::Hasher, value: &str) {
        hasher.update(&(value.len() as u64).to_le_bytes());
        hasher.update(value.as_bytes());
    }

    let mut hasher = blake3::Hasher::new();
    hasher.update(&(chunks.len() as u64).to_le_bytes());
    for chunk in chunks {
        field(&mut hasher, &chunk.content);
        hasher.update(&(chunk.metadata.len() as u64).to_le_bytes());
        for (key, value) in chunk.metadata.iter() {
            field(&mut hasher, key);
            field(&mut hasher, value);
        }
    }
    hasher.finalize().to_hex().to_string()
}

/// # Errors
///
/// Returns [`ChunkFileError::Missing`] if nothing exists at `path`, or an
/// IO/JSON error if the file cannot be read or parsed.
pub fn load_chunks(path: &Path) -> Result<Vec<Chunk>, ChunkFileError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ChunkFileError::Missing {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };
    let chunks: Vec<Chunk> = serde_json::from_str(&raw)?;
    tracing::debug!(path = %path.display(), chunks = chunks.len(), "chunks loaded");
    Ok(chunks)
}
