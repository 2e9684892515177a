pub mod config;
pub mod hash;
pub mod similarity;

pub use config::{load_config_from_env, EmbeddingConfig};
pub use hash::HashEmbedder;
pub use similarity::cosine_similarity;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fixed-length vector representation of a skill name or short text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub vector: Vec<f32>,
}

impl Embedding {
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// Narrow seam for semantic comparison so the matching core stays testable
/// with stub vectors and never owns a model runtime.
///
/// Implementations must be deterministic: identical input text yields a
/// bit-identical vector, which the scorer relies on for reproducible scores.
pub trait EmbeddingProvider: Send + Sync {
    /// Implementation name ("hash", ...). Recorded by callers that track
    /// which embedder produced a ranking.
    fn name(&self) -> &'static str;

    /// Version marker for generation management. Bump when the token design
    /// or hash function changes.
    fn version(&self) -> &str;

    fn dimension(&self) -> usize;

    /// Embed a skill name or short text fragment.
    fn embed(&self, text: &str) -> Embedding;

    /// Batch embedding; default implementation loops.
    fn embed_all(&self, texts: &[String]) -> Vec<Embedding> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Similarity of two embeddings in 0.0..=1.0.
    fn similarity(&self, a: &Embedding, b: &Embedding) -> f32 {
        if a.dimension() != b.dimension() {
            warn!(
                a_dimension = a.dimension(),
                b_dimension = b.dimension(),
                "embedding dimension mismatch; returning zero similarity"
            );
            return 0.0;
        }
        cosine_similarity(&a.vector, &b.vector)
    }
}

/// Embedding provider factory. Unknown names fall back to the hash embedder.
pub fn create_provider(name: &str, config: EmbeddingConfig) -> Box<dyn EmbeddingProvider> {
    match name {
        "hash" => Box::new(HashEmbedder::new(config)),
        other => {
            warn!(requested = other, "unknown embedder; falling back to hash");
            Box::new(HashEmbedder::new(config))
        }
    }
}

/// Build the provider named by `JM_EMBEDDER` (default "hash") with the
/// dimension from `JM_EMBED_DIMENSION`.
pub fn provider_from_env() -> Box<dyn EmbeddingProvider> {
    let name = std::env::var("JM_EMBEDDER").unwrap_or_else(|_| "hash".into());
    create_provider(&name, load_config_from_env())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_falls_back_to_hash() {
        let provider = create_provider("does-not-exist", EmbeddingConfig::default());
        assert_eq!(provider.name(), "hash");
    }

    #[test]
    fn mismatched_dimensions_yield_zero_similarity() {
        let provider = create_provider("hash", EmbeddingConfig::default());
        let a = provider.embed("python");
        let b = Embedding {
            vector: vec![1.0, 0.0],
        };
        assert_eq!(provider.similarity(&a, &b), 0.0);
    }
}
