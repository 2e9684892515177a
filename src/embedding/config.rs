#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    /// Embedding dimension (powers of two recommended: 128, 256, 512).
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { dimension: 256 }
    }
}

/// Read the embedding configuration from the environment.
pub fn load_config_from_env() -> EmbeddingConfig {
    EmbeddingConfig {
        dimension: std::env::var("JM_EMBED_DIMENSION")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
    }
}
