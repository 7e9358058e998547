use super::Config;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_data();
        self.apply_env_overrides_embedding();
        self.apply_env_overrides_retrieval();
        self.apply_env_overrides_generation();
    }

    fn apply_env_overrides_data(&mut self) {
        if let Ok(v) = std::env::var("LEXRAG_RAW_DIR") {
            self.data.raw_dir = v.into();
        }
        if let Ok(v) = std::env::var("LEXRAG_PROCESSED_DIR") {
            self.data.processed_dir = v.into();
        }
        if let Ok(v) = std::env::var("LEXRAG_CHUNK_SIZE") {
            match v.parse::<usize>() {
                Ok(size) => self.chunking.initial_chunk_size = size,
                Err(_) => tracing::warn!("ignoring invalid LEXRAG_CHUNK_SIZE value: {v}"),
            }
        }
        if let Ok(v) = std::env::var("LEXRAG_CHUNK_OVERLAP") {
            match v.parse::<usize>() {
                Ok(overlap) => self.chunking.chunk_overlap = overlap,
                Err(_) => tracing::warn!("ignoring invalid LEXRAG_CHUNK_OVERLAP value: {v}"),
            }
        }
        if let Ok(v) = std::env::var("LEXRAG_MIN_LENGTH") {
            match v.parse::<usize>() {
                Ok(min) => self.chunking.min_length = min,
                Err(_) => tracing::warn!("ignoring invalid LEXRAG_MIN_LENGTH value: {v}"),
            }
        }
        if let Ok(v) = std::env::var("LEXRAG_CLEAN") {
            match v.parse::<bool>() {
                Ok(clean) => self.chunking.clean = clean,
                Err(_) => tracing::warn!("ignoring invalid LEXRAG_CLEAN value: {v}"),
            }
        }
        if let Ok(v) = std::env::var("LEXRAG_LANGUAGE") {
            self.language.code = v;
        }
        if let Ok(v) = std::env::var("LEXRAG_RESOURCES_DIR") {
            self.language.resources_dir = v.into();
        }
        if let Ok(v) = std::env::var("LEXRAG_RESOURCE_URL") {
            self.language.resource_url = Some(v);
        }
    }

    fn apply_env_overrides_embedding(&mut self) {
        if let Ok(v) = std::env::var("LEXRAG_EMBEDDING_PROVIDER") {
            if let Ok(kind) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.embedding.provider = kind;
            } else {
                tracing::warn!("ignoring invalid LEXRAG_EMBEDDING_PROVIDER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("LEXRAG_EMBEDDING_BASE_URL") {
            self.embedding.base_url = v;
        }
        if let Ok(v) = std::env::var("LEXRAG_EMBEDDING_MODEL") {
            self.embedding.model = v;
        }
        if let Ok(v) = std::env::var("LEXRAG_OPENAI_API_KEY") {
            self.embedding.api_key = Some(v.clone());
            self.generation.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("LEXRAG_VECTOR_STORE") {
            if let Ok(backend) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.vector_store.backend = backend;
            } else {
                tracing::warn!("ignoring invalid LEXRAG_VECTOR_STORE value: {v}");
            }
        }
        if let Ok(v) = std::env::var("LEXRAG_QDRANT_URL") {
            self.vector_store.qdrant_url = v;
        }
        if let Ok(v) = std::env::var("LEXRAG_COLLECTION") {
            self.vector_store.collection = v;
        }
    }

    fn apply_env_overrides_retrieval(&mut self) {
        if let Ok(v) = std::env::var("LEXRAG_TOP_K") {
            match v.parse::<usize>() {
                Ok(k) => self.retrieval.top_k = k,
                Err(_) => tracing::warn!("ignoring invalid LEXRAG_TOP_K value: {v}"),
            }
        }
        if let Ok(v) = std::env::var("LEXRAG_RERANKER") {
            if let Ok(kind) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.retrieval.reranker = kind;
            } else {
                tracing::warn!("ignoring invalid LEXRAG_RERANKER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("LEXRAG_RERANKER_URL") {
            self.retrieval.reranker_url = v;
        }
    }

    fn apply_env_overrides_generation(&mut self) {
        if let Ok(v) = std::env::var("LEXRAG_GENERATION_PROVIDER") {
            if let Ok(kind) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.generation.provider = kind;
            } else {
                tracing::warn!("ignoring invalid LEXRAG_GENERATION_PROVIDER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("LEXRAG_GENERATION_BASE_URL") {
            self.generation.base_url = v;
        }
        if let Ok(v) = std::env::var("LEXRAG_GENERATION_MODEL") {
            self.generation.model = v;
        }
    }
}
