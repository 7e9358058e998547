use ollama_rs::Ollama;
use ollama_rs::generation::embeddings::request::{EmbeddingsInput, GenerateEmbeddingsRequest};

use super::{EmbedFuture, Embedder};
use crate::error::EmbedError;

#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: Ollama,
    model: String,
}

impl OllamaEmbedder {
    /// # Errors
    ///
    /// Returns [`EmbedError::Other`] if `base_url` is not a valid URL.
    pub fn new(base_url: &str, model: String) -> Result<Self, EmbedError> {
        let client = crate::http::ollama_client(base_url).map_err(EmbedError::Other)?;
        Ok(Self { client, model })
    }

    async fn request(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let request =
            GenerateEmbeddingsRequest::new(self.model.clone(), EmbeddingsInput::from(text));

        let response = self
            .client
            .generate_embeddings(request)
            .await
            .map_err(|e| EmbedError::Other(format!("Ollama embedding request failed: {e}")))?;

        response
            .embeddings
            .into_iter()
            .next()
            .ok_or(EmbedError::EmptyResponse { provider: "ollama" })
    }
}

impl Embedder for OllamaEmbedder {
    fn name(&self) -> &str {
        &self.model
    }

    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        Box::pin(self.request(text))
    }
}
