use std::cmp::Ordering;

use super::scorer::{MatchConfig, MatchResult, MatchScorer};
use crate::embedding::EmbeddingProvider;
use crate::error::EngineError;
use crate::{Job, Profile};

/// Recommendation lists are clamped into this window so they are neither
/// too sparse nor overwhelming.
pub const MIN_RECOMMENDATIONS: usize = 5;
pub const MAX_RECOMMENDATIONS: usize = 15;

/// Scores every candidate job against a profile and returns an ordered,
/// size-bounded recommendation list.
pub struct RecommendationEngine<'a> {
    scorer: MatchScorer<'a>,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(
        config: MatchConfig,
        provider: &'a dyn EmbeddingProvider,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            scorer: MatchScorer::new(config, provider)?,
        })
    }

    pub fn scorer(&self) -> &MatchScorer<'a> {
        &self.scorer
    }

    /// Rank all candidates for the profile, best first.
    ///
    /// Each job is scored independently (the scorer is pure, so this is
    /// freely parallelizable by the caller); the sort is stable with ties
    /// broken by confidence and then input order, and zero-score candidates
    /// are kept rather than silently dropped.
    pub fn rank(&self, profile: &Profile, jobs: &[Job], limit: usize) -> Vec<MatchResult> {
        let limit = limit.clamp(MIN_RECOMMENDATIONS, MAX_RECOMMENDATIONS);
        tracing::debug!(candidates = jobs.len(), limit, "ranking candidate jobs");

        let mut results: Vec<MatchResult> = jobs
            .iter()
            .map(|job| self.scorer.score(profile, job))
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    b.confidence
                        .partial_cmp(&a.confidence)
                        .unwrap_or(Ordering::Equal)
                })
        });
        results.truncate(limit);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{EmbeddingConfig, HashEmbedder};
    use crate::skills;

    fn provider() -> HashEmbedder {
        HashEmbedder::new(EmbeddingConfig::default())
    }

    fn profile(provider: &HashEmbedder) -> Profile {
        Profile {
            skills: skills::canonicalize(
                &["Python".to_string(), "SQL".to_string()],
                provider,
            ),
            experience_years: 3,
            ..Profile::default()
        }
    }

    fn job(id: &str, requirements: &[&str]) -> Job {
        Job {
            id: id.into(),
            title: format!("Role {id}"),
            company: "Acme".into(),
            location: "Remote".into(),
            remote: true,
            requirements: requirements.iter().map(|s| s.to_string()).collect(),
            currency: "USD".into(),
            ..Job::default()
        }
    }

    #[test]
    fn ranks_best_matches_first() {
        let p = provider();
        let engine = RecommendationEngine::new(MatchConfig::default(), &p).unwrap();
        let jobs = vec![
            job("weak", &["Rust", "Go", "Kafka"]),
            job("strong", &["Python", "SQL"]),
            job("partial", &["Python", "Docker"]),
        ];

        let ranked = engine.rank(&profile(&p), &jobs, 10);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].job.id, "strong");
        assert!(ranked
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn limit_is_clamped_to_the_minimum() {
        let p = provider();
        let engine = RecommendationEngine::new(MatchConfig::default(), &p).unwrap();
        let jobs: Vec<Job> = (0..8).map(|i| job(&i.to_string(), &["Python"])).collect();

        assert_eq!(engine.rank(&profile(&p), &jobs, 2).len(), 5);
    }

    #[test]
    fn limit_is_clamped_to_the_maximum() {
        let p = provider();
        let engine = RecommendationEngine::new(MatchConfig::default(), &p).unwrap();
        let jobs: Vec<Job> = (0..20).map(|i| job(&i.to_string(), &["Python"])).collect();

        assert_eq!(engine.rank(&profile(&p), &jobs, 50).len(), 15);
    }

    #[test]
    fn fewer_jobs_than_limit_returns_all() {
        let p = provider();
        let engine = RecommendationEngine::new(MatchConfig::default(), &p).unwrap();
        let jobs = vec![job("only", &["Python"])];

        assert_eq!(engine.rank(&profile(&p), &jobs, 10).len(), 1);
    }

    #[test]
    fn zero_score_candidates_are_kept() {
        let p = provider();
        let engine = RecommendationEngine::new(MatchConfig::default(), &p).unwrap();
        let mut hopeless = job("hopeless", &["Cobol"]);
        hopeless.remote = false;
        hopeless.location = "Nowhere".into();

        let mut strict = profile(&p);
        strict.preferred_locations = vec!["Berlin".into()];
        strict.skills = Vec::new();

        let ranked = engine.rank(&strict, &[hopeless], 10);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn ties_break_by_confidence_then_input_order() {
        let p = provider();
        let engine = RecommendationEngine::new(MatchConfig::default(), &p).unwrap();

        // Same factor values, but the second job discloses a salary range
        // that exactly mirrors the neutral default, raising confidence only.
        let mut profile = profile(&p);
        profile.salary_min = Some(50_000.0);
        profile.salary_max = Some(100_000.0);

        let sparse = job("sparse", &["Python", "SQL"]);
        let mut disclosed = job("disclosed", &["Python", "SQL"]);
        disclosed.salary_min = Some(50_000.0);
        disclosed.salary_max = Some(75_000.0);

        let ranked = engine.rank(&profile, &[sparse.clone(), disclosed], 10);
        assert_eq!(ranked[0].job.id, "disclosed");
        assert!(ranked[0].confidence > ranked[1].confidence);

        // Full ties preserve input order (stable sort).
        let twin_a = job("a", &["Python"]);
        let twin_b = job("b", &["Python"]);
        let tied = engine.rank(&profile, &[twin_a, twin_b], 10);
        assert_eq!(tied[0].job.id, "a");
        assert_eq!(tied[1].job.id, "b");
    }
}
