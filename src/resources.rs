use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::error::EngineError;
use crate::skills;
use crate::LearningLink;

/// Learning guidance for one skill.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LearningResource {
    #[serde(rename = "estimated_learning_time")]
    pub learning_time: String,
    pub resources: Vec<LearningLink>,
}

/// Lookup seam for learning-content metadata so the gap analyzer can be
/// tested with a stub catalog and production can swap in a remote one.
pub trait LearningResourceLookup: Send + Sync {
    /// Resolve a skill name (canonical or synonym) to learning guidance.
    fn lookup(&self, skill: &str) -> Option<LearningResource>;
}

static BUNDLED_CATALOG: LazyLock<HashMap<String, LearningResource>> = LazyLock::new(|| {
    match serde_json::from_str(include_str!("learning_resources.json")) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(error = %err, "bundled learning resource catalog is malformed; using empty catalog");
            HashMap::new()
        }
    }
});

/// Catalog backed by the JSON shipped with the crate, keyed by canonical
/// skill name.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticResourceCatalog;

impl LearningResourceLookup for StaticResourceCatalog {
    fn lookup(&self, skill: &str) -> Option<LearningResource> {
        BUNDLED_CATALOG
            .get(&skills::normalize_skill(skill))
            .cloned()
    }
}

/// Catalog parsed from caller-supplied JSON in the same shape as the
/// bundled file. Lets deployments override learning content without a
/// rebuild.
#[derive(Debug, Clone, Default)]
pub struct JsonResourceCatalog {
    entries: HashMap<String, LearningResource>,
}

impl JsonResourceCatalog {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(Self {
            entries: serde_json::from_str(json)?,
        })
    }
}

impl LearningResourceLookup for JsonResourceCatalog {
    fn lookup(&self, skill: &str) -> Option<LearningResource> {
        self.entries.get(&skills::normalize_skill(skill)).cloned()
    }
}
