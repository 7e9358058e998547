use crate::clean::TextCleaner;
use crate::error::ChunkingError;
use crate::nlp::LanguageModel;
use crate::regroup::SemanticRegrouper;
use crate::splitter::{FixedSizeSplitter, SplitterConfig};
use crate::types::{Chunk, Document, Segment};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Fixed-size split length, in characters.
    pub initial_chunk_size: usize,
    pub chunk_overlap: usize,
    /// Soft minimum chunk length, in words.
    pub min_length: usize,
    /// Clean segment text before sentence regrouping.
    pub clean: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            initial_chunk_size: 512,
            chunk_overlap: 0,
            min_length: 100,
            clean: false,
        }
    }
}

/// Fixed-size split, optional cleaning, then sentence regrouping.
#[derive(Debug, Clone)]
pub struct ChunkingPipeline {
    splitter: FixedSizeSplitter,
    cleaner: Option<TextCleaner>,
    regrouper: SemanticRegrouper,
}

impl ChunkingPipeline {
    /// # Errors
    ///
    /// Returns [`ChunkingError::InvalidConfig`] for zero sizes or an overlap not
    /// smaller than the chunk size, and [`ChunkingError::Nlp`] if the cleaner
    /// cannot be built for the model's language.
    pub fn new(config: &ChunkingConfig, model: &LanguageModel) -> Result<Self, ChunkingError> {
        let splitter = FixedSizeSplitter::new(SplitterConfig {
            max_chars: config.initial_chunk_size,
            overlap: config.chunk_overlap,
        })?;
        let regrouper = SemanticRegrouper::new(model.segmenter(), config.min_length)?;
        let cleaner = if config.clean {
            Some(TextCleaner::new(model)?)
        } else {
            None
        };
        Ok(Self {
            splitter,
            cleaner,
            regrouper,
        })
    }

    /// Chunks every document in input order. No documents means no chunks.
    #[must_use]
    pub fn process(&self, documents: &[Document]) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| self.process_document(doc))
            .collect();

        tracing::info!(
            documents = documents.len(),
            chunks = chunks.len(),
            cleaned = self.cleaner.is_some(),
            "chunking complete"
        );
        chunks
    }

    #[must_use]
    pub fn process_document(&self, document: &Document) -> Vec<Chunk> {
        let segments = self.splitter.split(document);
        let segment_count = segments.len();

        let chunks: Vec<Chunk> = segments
            .into_iter()
            .map(|segment| self.clean_segment(segment))
            .flat_map(|segment| self.regrouper.regroup(&segment))
            .collect();

        tracing::debug!(
            source = document.metadata.source().unwrap_or("<unknown>"),
            segments = segment_count,
            chunks = chunks.len(),
            "document chunked"
        );
        chunks
    }

    fn clean_segment(&self, segment: Segment) -> Segment {
        match &self.cleaner {
            Some(cleaner) => Segment {
                content: cleaner.clean(&segment.content),
                metadata: segment.metadata,
            },
            None => segment,
        }
    }
}
