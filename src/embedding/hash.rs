use siphasher::sip::SipHasher13;
use std::hash::{Hash, Hasher};

use super::{Embedding, EmbeddingConfig, EmbeddingProvider};

/// Fixed seeds for deterministic hashing.
/// Changing either value changes every embedding; bump `version()` with it.
const HASH_SEED_K0: u64 = 0x6a6f_626d_6174_6368;
const HASH_SEED_K1: u64 = 0x736b_696c_6c73_2e76;

const TOKEN_WEIGHT: f32 = 1.0;
const NGRAM_WEIGHT: f32 = 0.5;
const NGRAM_LEN: usize = 3;

/// Feature-hashing embedder over whole tokens plus character trigrams.
///
/// - No training; a fixed hash function keeps it fully deterministic.
/// - SipHash13 with fixed seeds for stability across Rust versions.
/// - Trigram features let near-identical surface forms ("postgres" vs
///   "postgresql") land close, while unrelated skills stay near the 0.5
///   orthogonal baseline of the mapped cosine.
pub struct HashEmbedder {
    config: EmbeddingConfig,
}

struct WeightedFeature {
    feature: String,
    weight: f32,
}

impl HashEmbedder {
    pub fn new(config: EmbeddingConfig) -> Self {
        let mut cfg = config;
        cfg.dimension = cfg.dimension.max(1);
        Self { config: cfg }
    }

    fn hash_feature(&self, feature: &str) -> usize {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        feature.hash(&mut hasher);
        (hasher.finish() as usize) % self.config.dimension
    }

    fn features(&self, text: &str) -> Vec<WeightedFeature> {
        let mut features = Vec::new();

        for token in text
            .to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || matches!(c, '#' | '+' | '.')))
            .filter(|t| !t.is_empty())
        {
            features.push(WeightedFeature {
                feature: token.to_string(),
                weight: TOKEN_WEIGHT,
            });

            let chars: Vec<char> = token.chars().collect();
            if chars.len() > NGRAM_LEN {
                for window in chars.windows(NGRAM_LEN) {
                    features.push(WeightedFeature {
                        feature: window.iter().collect(),
                        weight: NGRAM_WEIGHT,
                    });
                }
            }
        }

        features
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn version(&self) -> &str {
        "v1"
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn embed(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; self.config.dimension];

        for wf in self.features(text) {
            let idx = self.hash_feature(&wf.feature);
            // Sign hashing: even hash of the marker feature -> +weight.
            let sign = if self.hash_feature(&format!("{}_sign", wf.feature)) % 2 == 0 {
                1.0
            } else {
                -1.0
            };
            vector[idx] += sign * wf.weight;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Embedding { vector }
    }
}
