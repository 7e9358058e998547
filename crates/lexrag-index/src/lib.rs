//! Embedding, vector indexing, retrieval, reranking, answer generation and
//! evaluation over chunk records produced by `lexrag-chunk`.

pub mod chat;
pub mod embed;
pub mod error;
pub mod eval;
pub mod http;
pub mod in_memory_store;
pub mod indexer;
pub mod qa;
pub mod qdrant_ops;
pub mod rerank;
pub mod retriever;
mod text;
pub mod vector_store;

#[cfg(any(test, feature = "mock"))]
pub use chat::MockChat;
pub use chat::{ChatProvider, Message, OllamaChat, OpenAiChat, Role};
#[cfg(any(test, feature = "mock"))]
pub use embed::MockEmbedder;
pub use embed::{
    EMBEDDINGS_FILE, Embedder, OllamaEmbedder, OpenAiEmbedder, StoredEmbeddings, embed_all,
    load_embeddings, remove_embeddings, save_embeddings,
};
pub use error::{ChatError, EmbedError, EvalError, IndexError, RerankError, RetrievalError};
pub use eval::{EvalReport, EvalSample, EvalScores, Evaluator, LexicalEvaluator};
pub use in_memory_store::InMemoryVectorStore;
pub use indexer::Indexer;
pub use qa::{NO_ANSWER, answer, generate_samples, parse_factoid};
pub use qdrant_ops::QdrantOps;
pub use rerank::{HttpReranker, LexicalReranker, RankedText, Reranker};
pub use retriever::{Retriever, ScoredPassage};
pub use vector_store::{VectorStore, VectorStoreError};
