pub mod experience;
pub mod gaps;
pub mod ranker;
pub mod scorer;
pub mod weights;

pub use gaps::{Impact, SkillGap, SkillGapAnalyzer, MAX_GAPS};
pub use ranker::{RecommendationEngine, MAX_RECOMMENDATIONS, MIN_RECOMMENDATIONS};
pub use scorer::{FactorScore, FactorScores, MatchConfig, MatchResult, MatchScorer};
pub use weights::{FactorWeights, DEFAULT_WEIGHTS};
