use async_trait::async_trait;

use crate::domain::{cosine_similarities, DomainError, EmbeddingConfig};

/// Maps text to fixed-dimension vectors and scores vectors against each other.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Embed many texts at once. The i-th vector belongs to the i-th text.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError>;

    /// Cosine similarity of `query` against each candidate, in candidate order.
    fn similarity(&self, query: &[f32], candidates: &[Vec<f32>]) -> Vec<f32> {
        cosine_similarities(query, candidates)
    }

    fn config(&self) -> &EmbeddingConfig;
}
