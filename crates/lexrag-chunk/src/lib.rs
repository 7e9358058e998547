//! Document loading and two-stage chunking for regulatory text.
//!
//! Documents are split into fixed-size segments, optionally cleaned, and
//! regrouped along sentence boundaries into chunks of a minimum word length.

pub mod chunk_file;
pub mod clean;
pub mod error;
pub mod loader;
pub mod nlp;
pub mod pipeline;
pub mod regroup;
pub mod splitter;
pub mod types;

pub use chunk_file::{CHUNKS_FILE, chunks_hash, load_chunks, save_chunks};
pub use clean::TextCleaner;
pub use error::{ChunkFileError, ChunkingError, DocumentError, NlpError};
#[cfg(feature = "pdf")]
pub use loader::PdfLoader;
pub use loader::{DEFAULT_MAX_FILE_SIZE, DirectoryLoader, DocumentLoader, TextLoader};
pub use nlp::{Language, LanguageModel, Lexicon, SentenceSegmenter, TokenAnalyzer};
pub use pipeline::{ChunkingConfig, ChunkingPipeline};
pub use regroup::SemanticRegrouper;
pub use splitter::{FixedSizeSplitter, SplitterConfig};
pub use types::{Chunk, Document, Metadata, Segment};
