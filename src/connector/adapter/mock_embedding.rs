use async_trait::async_trait;
use rand::Rng;
use rand::SeedableRng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;

use crate::application::EmbeddingService;
use crate::domain::{DomainError, EmbeddingConfig};

const LEXICAL_DIMENSIONS: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockMode {
    /// Pseudo-random unit vector seeded by the whole text.
    Random,
    /// Hashed bag of lowercase words, so texts sharing words are similar.
    Lexical,
}

/// Deterministic embedding provider for tests and offline runs.
pub struct MockEmbedding {
    config: EmbeddingConfig,
    mode: MockMode,
}

impl MockEmbedding {
    pub fn new() -> Self {
        Self {
            config: EmbeddingConfig::new("mock-embedding".to_string(), 384, 512),
            mode: MockMode::Random,
        }
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            config: EmbeddingConfig::new("mock-embedding".to_string(), dimensions, 512),
            mode: MockMode::Random,
        }
    }

    pub fn lexical() -> Self {
        Self {
            config: EmbeddingConfig::new(
                "mock-lexical-embedding".to_string(),
                LEXICAL_DIMENSIONS,
                512,
            ),
            mode: MockMode::Lexical,
        }
    }

    fn generate_embedding(&self, text: &str) -> Vec<f32> {
        let mut vector = match self.mode {
            MockMode::Random => self.random_vector(text),
            MockMode::Lexical => self.word_vector(text),
        };

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for x in &mut vector {
                *x /= magnitude;
            }
        }

        vector
    }

    fn random_vector(&self, text: &str) -> Vec<f32> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(hash_of(text));
        (0..self.config.dimensions())
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect()
    }

    fn word_vector(&self, text: &str) -> Vec<f32> {
        let dimensions = self.config.dimensions();
        let mut vector = vec![0.0f32; dimensions];

        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = (hash_of(&word.to_lowercase()) % dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }

        vector
    }
}

fn hash_of(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

impl Default for MockEmbedding {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingService for MockEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        Ok(self.generate_embedding(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        let results: Vec<Vec<f32>> = texts
            .iter()
            .map(|text| self.generate_embedding(text))
            .collect();

        debug!("Generated {} mock embeddings", results.len());

        Ok(results)
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}
