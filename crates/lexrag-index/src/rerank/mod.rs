//! Second-stage scoring of retrieved candidates against the query.

mod http;
mod lexical;

use std::future::Future;
use std::pin::Pin;

pub use http::HttpReranker;
pub use lexical::LexicalReranker;

use crate::error::RerankError;

/// One candidate after reranking. `index` points into the slice given to
/// [`Reranker::rank`].
#[derive(Debug, Clone, PartialEq)]
pub struct RankedText {
    pub index: usize,
    pub text: String,
    pub score: f32,
}

pub type RankFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<RankedText>, RerankError>> + Send + 'a>>;

pub trait Reranker: Send + Sync {
    fn name(&self) -> &str;

    /// Scores every candidate; result is sorted by descending score.
    fn rank<'a>(&'a self, query: &'a str, candidates: &'a [String]) -> RankFuture<'a>;
}

/// Sorts by descending score, ties broken by original position.
pub(crate) fn sort_ranked(ranked: &mut [RankedText]) {
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
}
