use serde::{Deserialize, Serialize};

use super::{RankFuture, RankedText, Reranker, sort_ranked};
use crate::error::RerankError;

/// Cross-encoder served behind a text-embeddings-inference style `/rerank` endpoint.
#[derive(Debug, Clone)]
pub struct HttpReranker {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct RerankRequest<'a> {
    query: &'a str,
    texts: &'a [String],
}

#[derive(Deserialize)]
struct RerankHit {
    index: usize,
    score: f32,
}

impl HttpReranker {
    #[must_use]
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            client: crate::http::default_client(),
            base_url: crate::http::trim_base_url(base_url),
            model,
        }
    }

    async fn request(
        &self,
        query: &str,
        candidates: &[String],
    ) -> Result<Vec<RankedText>, RerankError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .client
            .post(format!("{}/rerank", self.base_url))
            .json(&RerankRequest {
                query,
                texts: candidates,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!("rerank API error {status}: {body}");
            return Err(RerankError::Status(status.as_u16()));
        }

        let hits: Vec<RerankHit> = serde_json::from_str(&body)?;
        let mut ranked = hits
            .into_iter()
            .map(|hit| {
                let text = candidates
                    .get(hit.index)
                    .ok_or(RerankError::IndexOutOfRange {
                        index: hit.index,
                        candidates: candidates.len(),
                    })?;
                Ok(RankedText {
                    index: hit.index,
                    text: text.clone(),
                    score: hit.score,
                })
            })
            .collect::<Result<Vec<_>, RerankError>>()?;
        sort_ranked(&mut ranked);
        Ok(ranked)
    }
}

impl Reranker for HttpReranker {
    fn name(&self) -> &str {
        &self.model
    }

    fn rank<'a>(&'a self, query: &'a str, candidates: &'a [String]) -> RankFuture<'a> {
        Box::pin(self.request(query, candidates))
    }
}
