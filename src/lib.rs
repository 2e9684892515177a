pub mod embedding;
pub mod error;
pub mod logging;
pub mod matching;
pub mod resources;
pub mod skills;

use serde::{Deserialize, Serialize};

pub use embedding::Embedding;
pub use error::EngineError;
pub use matching::{
    FactorScore, FactorScores, Impact, MatchConfig, MatchResult, MatchScorer,
    RecommendationEngine, SkillGap, SkillGapAnalyzer,
};

/// Work arrangement a candidate is willing to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Remote,
    Hybrid,
    Onsite,
}

/// User profile as assembled by the chat layer. Immutable for the duration
/// of one scoring pass; empty preference lists mean "no preference".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub skills: Vec<CanonicalSkill>,
    pub experience_years: u32,
    pub preferred_locations: Vec<String>,
    pub preferred_job_types: Vec<JobType>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
}

/// A normalized skill with its embedding computed once by the skill
/// normalizer and cached here. The matching core treats it as read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSkill {
    pub name: String,
    pub category: String,
    pub embedding: Embedding,
}

/// Job posting as delivered by the job source, already deduplicated
/// upstream. `Option` salary fields reflect that partial data is the norm
/// for postings, not an exceptional case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub remote: bool,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub currency: String,
}

/// External learning resource attached to a skill gap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningLink {
    pub title: String,
    pub url: String,
}
