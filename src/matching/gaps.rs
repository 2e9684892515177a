use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::scorer::{MatchConfig, MatchScorer};
use crate::embedding::EmbeddingProvider;
use crate::error::EngineError;
use crate::resources::LearningResourceLookup;
use crate::{Job, LearningLink, Profile};

/// Gap lists are capped to stay actionable.
pub const MAX_GAPS: usize = 10;

/// How much acquiring a missing skill would move the needle, classified by
/// demand frequency across the candidate pool: a simple, auditable
/// heuristic rather than a learned model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    /// High when more than half of candidate jobs require the skill,
    /// medium from 20% up.
    pub fn classify(frequency: usize, total_jobs: usize) -> Self {
        if total_jobs == 0 {
            return Impact::Low;
        }
        let share = frequency as f64 / total_jobs as f64;
        if share > 0.5 {
            Impact::High
        } else if share >= 0.2 {
            Impact::Medium
        } else {
            Impact::Low
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Impact::High => 0,
            Impact::Medium => 1,
            Impact::Low => 2,
        }
    }
}

/// A skill frequently required by candidate jobs but absent from the
/// profile. Computed fresh per request; never persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub frequency: usize,
    pub impact: Impact,
    pub learning_time: String,
    pub resources: Vec<LearningLink>,
}

/// Derives missing-skill insights from the same matching substrate the
/// ranker uses, across the whole candidate set so the result reflects
/// overall market demand rather than what already ranked well.
pub struct SkillGapAnalyzer<'a> {
    scorer: MatchScorer<'a>,
    resources: &'a dyn LearningResourceLookup,
}

impl<'a> SkillGapAnalyzer<'a> {
    pub fn new(
        config: MatchConfig,
        provider: &'a dyn EmbeddingProvider,
        resources: &'a dyn LearningResourceLookup,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            scorer: MatchScorer::new(config, provider)?,
            resources,
        })
    }

    /// Aggregate unmatched requirements across all candidate jobs into a
    /// ranked, enriched gap list.
    pub fn analyze(&self, profile: &Profile, jobs: &[Job]) -> Vec<SkillGap> {
        let mut frequency: BTreeMap<String, usize> = BTreeMap::new();
        for job in jobs {
            let result = self.scorer.score(profile, job);
            for skill in result.missing_skills {
                *frequency.entry(skill).or_default() += 1;
            }
        }

        let total_jobs = jobs.len();
        let mut gaps: Vec<SkillGap> = frequency
            .into_iter()
            .map(|(skill, frequency)| {
                let impact = Impact::classify(frequency, total_jobs);
                let (learning_time, resources) = match self.resources.lookup(&skill) {
                    Some(entry) => (entry.learning_time, entry.resources),
                    None => ("varies".to_string(), Vec::new()),
                };
                SkillGap {
                    skill,
                    frequency,
                    impact,
                    learning_time,
                    resources,
                }
            })
            .collect();

        // BTreeMap iteration is name-ordered, so the stable sort leaves
        // equal (frequency, impact) entries alphabetical.
        gaps.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then_with(|| a.impact.rank().cmp(&b.impact.rank()))
        });
        gaps.truncate(MAX_GAPS);
        gaps
    }
}
