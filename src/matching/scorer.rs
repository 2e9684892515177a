use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::experience::{self, ExperienceRequirement};
use super::weights::FactorWeights;
use crate::embedding::EmbeddingProvider;
use crate::error::EngineError;
use crate::skills;
use crate::{CanonicalSkill, Job, JobType, Profile};

#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub weights: FactorWeights,
    /// Cosine similarity (0..=1) above which a requirement counts as
    /// covered by a profile skill. Exact-synonym embeddings land well above
    /// 0.7 and unrelated skills near the 0.5 orthogonal baseline, so 0.6
    /// leaves a safety margin on both sides.
    pub skill_similarity_threshold: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            skill_similarity_threshold: env_similarity_threshold(),
        }
    }
}

fn env_similarity_threshold() -> f64 {
    std::env::var("JM_SKILL_SIM_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.6)
}

/// One factor's contribution to a match.
///
/// `from_data` is false when the posting lacked the data to compute the
/// factor and a neutral default was used instead; confidence is derived
/// from these flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub value: f64,
    pub from_data: bool,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub skill: FactorScore,
    pub experience: FactorScore,
    pub location: FactorScore,
    pub salary: FactorScore,
}

impl FactorScores {
    /// Fraction of factors computed from actual posting data rather than
    /// defaulted neutrally.
    pub fn confidence(&self) -> f64 {
        let derived = [&self.skill, &self.experience, &self.location, &self.salary]
            .iter()
            .filter(|f| f.from_data)
            .count();
        derived as f64 / 4.0
    }
}

/// Relevance of one job to one profile. Ephemeral; recomputed per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job: Job,
    pub score: f64,
    pub factors: FactorScores,
    pub matching_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub explanation: String,
    pub confidence: f64,
}

/// Pure scorer for (profile, job) pairs: no I/O, no mutation, identical
/// inputs always produce identical output.
pub struct MatchScorer<'a> {
    config: MatchConfig,
    provider: &'a dyn EmbeddingProvider,
}

impl<'a> MatchScorer<'a> {
    pub fn new(
        config: MatchConfig,
        provider: &'a dyn EmbeddingProvider,
    ) -> Result<Self, EngineError> {
        config.weights.validate()?;
        Ok(Self { config, provider })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Compute the weighted multi-factor match for a single job.
    pub fn score(&self, profile: &Profile, job: &Job) -> MatchResult {
        let (skill, matching_skills, missing_skills) = self.score_skills(profile, job);
        let experience = self.score_experience(profile, job);
        let location = self.score_location(profile, job);
        let salary = self.score_salary(profile, job);

        let w = self.config.weights;
        let score = (100.0
            * (skill.value * w.skill
                + experience.value * w.experience
                + location.value * w.location
                + salary.value * w.salary))
            .clamp(0.0, 100.0);

        let factors = FactorScores {
            skill,
            experience,
            location,
            salary,
        };
        let confidence = factors.confidence();
        let explanation = build_explanation(score, &factors, &w);

        MatchResult {
            job: job.clone(),
            score,
            factors,
            matching_skills,
            missing_skills,
            explanation,
            confidence,
        }
    }

    fn score_skills(
        &self,
        profile: &Profile,
        job: &Job,
    ) -> (FactorScore, BTreeSet<String>, BTreeSet<String>) {
        let mut matching = BTreeSet::new();
        let mut missing = BTreeSet::new();

        if job.requirements.is_empty() {
            // Absence of data is not malformed data: worst-case factor, but
            // flagged as not data-derived so confidence drops.
            let factor = FactorScore {
                value: 0.0,
                from_data: false,
                detail: "no skill requirements listed".into(),
            };
            return (factor, matching, missing);
        }

        let total = job.requirements.len();
        let mut matched_count = 0usize;

        for requirement in &job.requirements {
            let canonical = skills::normalize_skill(requirement);
            let requirement_embedding = self.provider.embed(&canonical);

            let mut best: Option<(&CanonicalSkill, f32)> = None;
            for skill in &profile.skills {
                let sim = self
                    .provider
                    .similarity(&skill.embedding, &requirement_embedding);
                // Strictly greater keeps the first of equals, so ties stay
                // deterministic across runs.
                if best.map_or(true, |(_, current)| sim > current) {
                    best = Some((skill, sim));
                }
            }

            match best {
                Some((skill, sim))
                    if f64::from(sim) > self.config.skill_similarity_threshold =>
                {
                    matched_count += 1;
                    matching.insert(skill.name.clone());
                }
                _ => {
                    missing.insert(canonical);
                }
            }
        }

        let value = matched_count as f64 / total as f64;
        let detail = if matched_count == total {
            format!("all {total} required skills matched")
        } else {
            format!("{matched_count}/{total} required skills matched")
        };

        (
            FactorScore {
                value,
                from_data: true,
                detail,
            },
            matching,
            missing,
        )
    }

    fn score_experience(&self, profile: &Profile, job: &Job) -> FactorScore {
        let mut text = job.description.clone();
        for requirement in &job.requirements {
            text.push(' ');
            text.push_str(requirement);
        }

        match experience::parse_requirement(&text) {
            None => FactorScore {
                value: 0.5,
                from_data: false,
                detail: "no experience requirement stated".into(),
            },
            Some(ExperienceRequirement::Years(target)) => {
                let years = f64::from(profile.experience_years);
                let target_years = f64::from(target);
                let value = 1.0 - ((years - target_years).abs() / target_years.max(1.0)).min(1.0);
                let detail = match profile.experience_years.cmp(&target) {
                    Ordering::Equal => format!("experience matches the {target}-year requirement"),
                    Ordering::Greater => format!("experience above the {target}-year requirement"),
                    Ordering::Less => format!("experience below the {target}-year requirement"),
                };
                FactorScore {
                    value,
                    from_data: true,
                    detail,
                }
            }
            Some(ExperienceRequirement::Band(band)) => {
                let profile_band = experience::band_for_years(profile.experience_years);
                let (value, detail) = match experience::band_distance(profile_band, band) {
                    0 => (1.0, format!("seniority matches the {} level", band.label())),
                    1 => (0.5, format!("seniority one level from {}", band.label())),
                    _ => (
                        0.0,
                        format!("seniority far from the {} requirement", band.label()),
                    ),
                };
                FactorScore {
                    value,
                    from_data: true,
                    detail,
                }
            }
        }
    }

    fn score_location(&self, profile: &Profile, job: &Job) -> FactorScore {
        let accepts_remote = profile.preferred_job_types.is_empty()
            || profile.preferred_job_types.contains(&JobType::Remote);
        if job.remote && accepts_remote {
            return FactorScore {
                value: 1.0,
                from_data: true,
                detail: "remote-friendly".into(),
            };
        }

        let job_location = job.location.to_lowercase();
        if profile
            .preferred_locations
            .iter()
            .any(|preferred| job_location.contains(&preferred.to_lowercase()))
        {
            return FactorScore {
                value: 1.0,
                from_data: true,
                detail: format!("located in preferred area ({})", job.location),
            };
        }

        if profile.preferred_locations.is_empty() {
            // Partial credit: not a match, but not a mismatch either.
            return FactorScore {
                value: 0.3,
                from_data: true,
                detail: "no location preference given".into(),
            };
        }

        FactorScore {
            value: 0.0,
            from_data: true,
            detail: format!("located in {}, outside preferred areas", job.location),
        }
    }

    fn score_salary(&self, profile: &Profile, job: &Job) -> FactorScore {
        if profile.salary_min.is_none() && profile.salary_max.is_none() {
            return FactorScore {
                value: 1.0,
                from_data: true,
                detail: "no salary constraints".into(),
            };
        }
        if job.salary_min.is_none() && job.salary_max.is_none() {
            return FactorScore {
                value: 0.5,
                from_data: false,
                detail: "salary not disclosed".into(),
            };
        }

        // Half-open ranges widen to the available bound.
        let profile_lo = profile.salary_min.unwrap_or(0.0);
        let profile_hi = profile.salary_max.unwrap_or(f64::INFINITY);
        let job_lo = job.salary_min.unwrap_or(0.0);
        let job_hi = job.salary_max.unwrap_or(f64::INFINITY);

        let overlap = profile_hi.min(job_hi) - profile_lo.max(job_lo);
        if overlap < 0.0 {
            let detail = if job_hi < profile_lo {
                "pay below the requested minimum"
            } else {
                "pay above the requested maximum"
            };
            return FactorScore {
                value: 0.0,
                from_data: true,
                detail: detail.into(),
            };
        }

        let width = profile_hi - profile_lo;
        let value = if !width.is_finite() || width == 0.0 {
            1.0
        } else {
            (overlap / width).clamp(0.0, 1.0)
        };

        FactorScore {
            value,
            from_data: true,
            detail: format!("salary overlaps {:.0}% of the requested range", value * 100.0),
        }
    }
}

/// Deterministic template explanation: an overall assessment followed by
/// the two most salient factor phrases. Salience is the weighted distance
/// from the 0.5 midpoint, so strong contributors and strong detractors
/// both surface; ties keep the fixed factor order skill > experience >
/// location > salary.
fn build_explanation(score: f64, factors: &FactorScores, weights: &FactorWeights) -> String {
    let prefix = if score >= 80.0 {
        "Excellent match!"
    } else if score >= 60.0 {
        "Good match."
    } else {
        "Potential match."
    };

    let mut ranked: Vec<(f64, &str)> = vec![
        (
            weights.skill * (factors.skill.value - 0.5).abs(),
            factors.skill.detail.as_str(),
        ),
        (
            weights.experience * (factors.experience.value - 0.5).abs(),
            factors.experience.detail.as_str(),
        ),
        (
            weights.location * (factors.location.value - 0.5).abs(),
            factors.location.detail.as_str(),
        ),
        (
            weights.salary * (factors.salary.value - 0.5).abs(),
            factors.salary.detail.as_str(),
        ),
    ];
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    format!("{} {}; {}.", prefix, ranked[0].1, ranked[1].1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{EmbeddingConfig, HashEmbedder};

    fn provider() -> HashEmbedder {
        HashEmbedder::new(EmbeddingConfig::default())
    }

    fn profile_with(skills: &[&str], provider: &HashEmbedder) -> Profile {
        let raw: Vec<String> = skills.iter().map(|s| s.to_string()).collect();
        Profile {
            skills: crate::skills::canonicalize(&raw, provider),
            experience_years: 3,
            ..Profile::default()
        }
    }

    fn job_with(requirements: &[&str]) -> Job {
        Job {
            id: "j1".into(),
            title: "Backend Developer".into(),
            company: "Acme".into(),
            location: "Berlin, Germany".into(),
            requirements: requirements.iter().map(|s| s.to_string()).collect(),
            currency: "EUR".into(),
            ..Job::default()
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let profile = profile_with(&["Python", "SQL"], &p);
        let job = job_with(&["Python", "Docker"]);

        assert_eq!(scorer.score(&profile, &job), scorer.score(&profile, &job));
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let p = provider();
        let config = MatchConfig {
            weights: FactorWeights {
                skill: 0.9,
                experience: 0.9,
                location: 0.0,
                salary: 0.0,
            },
            ..MatchConfig::default()
        };
        assert!(MatchScorer::new(config, &p).is_err());
    }

    #[test]
    fn aliases_count_as_matched_requirements() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let profile = profile_with(&["JavaScript", "Kubernetes"], &p);
        let job = job_with(&["js", "k8s"]);

        let result = scorer.score(&profile, &job);
        assert_eq!(result.factors.skill.value, 1.0);
        assert!(result.missing_skills.is_empty());
        assert_eq!(
            result.matching_skills,
            ["javascript", "kubernetes"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        );
    }

    #[test]
    fn matched_and_missing_partition_the_requirements() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let profile = profile_with(&["Python"], &p);
        let job = job_with(&["Python", "Rust"]);

        let result = scorer.score(&profile, &job);
        assert!(result.matching_skills.is_disjoint(&result.missing_skills));

        let mut union = result.matching_skills.clone();
        union.extend(result.missing_skills.iter().cloned());
        let normalized: BTreeSet<String> =
            crate::skills::normalize_skill_set(&job.requirements);
        assert_eq!(union, normalized);
    }

    #[test]
    fn empty_requirements_score_worst_case_without_error() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let profile = profile_with(&["Python"], &p);
        let job = job_with(&[]);

        let result = scorer.score(&profile, &job);
        assert_eq!(result.factors.skill.value, 0.0);
        assert!(!result.factors.skill.from_data);
        assert!(result.matching_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn more_matched_requirements_never_lower_the_skill_factor() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let profile = profile_with(&["Python", "SQL"], &p);

        let partial = scorer.score(&profile, &job_with(&["Python", "SQL", "Docker"]));
        let full = scorer.score(&profile, &job_with(&["Python", "SQL"]));
        assert!(full.factors.skill.value >= partial.factors.skill.value);
    }

    #[test]
    fn numeric_experience_requirement_uses_distance_formula() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let mut profile = profile_with(&["Python"], &p);
        profile.experience_years = 3;

        let mut job = job_with(&["Python"]);
        job.description = "We need 5+ years of backend work".into();

        let result = scorer.score(&profile, &job);
        assert!((result.factors.experience.value - 0.6).abs() < 1e-9);
        assert!(result.factors.experience.detail.contains("below"));
    }

    #[test]
    fn band_requirement_scores_adjacent_band_at_half() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let mut profile = profile_with(&["Python"], &p);
        profile.experience_years = 4; // mid band

        let mut job = job_with(&["Python"]);
        job.description = "Senior engineer for the data platform".into();

        let result = scorer.score(&profile, &job);
        assert_eq!(result.factors.experience.value, 0.5);
        assert!(result.factors.experience.from_data);
    }

    #[test]
    fn missing_experience_signal_defaults_neutrally() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let profile = profile_with(&["Python"], &p);
        let job = job_with(&["Python"]);

        let result = scorer.score(&profile, &job);
        assert_eq!(result.factors.experience.value, 0.5);
        assert!(!result.factors.experience.from_data);
    }

    #[test]
    fn remote_job_matches_remote_preference() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let mut profile = profile_with(&["Python"], &p);
        profile.preferred_job_types = vec![JobType::Remote];

        let mut job = job_with(&["Python"]);
        job.remote = true;

        let result = scorer.score(&profile, &job);
        assert_eq!(result.factors.location.value, 1.0);
        assert_eq!(result.factors.location.detail, "remote-friendly");
    }

    #[test]
    fn remote_job_does_not_satisfy_onsite_only_profiles() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let mut profile = profile_with(&["Python"], &p);
        profile.preferred_job_types = vec![JobType::Onsite];
        profile.preferred_locations = vec!["Tokyo".into()];

        let mut job = job_with(&["Python"]);
        job.remote = true;
        job.location = "Berlin, Germany".into();

        let result = scorer.score(&profile, &job);
        assert_eq!(result.factors.location.value, 0.0);
    }

    #[test]
    fn preferred_location_substring_matches_case_insensitively() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let mut profile = profile_with(&["Python"], &p);
        profile.preferred_locations = vec!["berlin".into()];

        let result = scorer.score(&profile, &job_with(&["Python"]));
        assert_eq!(result.factors.location.value, 1.0);
    }

    #[test]
    fn no_location_preference_gets_partial_credit() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let profile = profile_with(&["Python"], &p);

        let result = scorer.score(&profile, &job_with(&["Python"]));
        assert_eq!(result.factors.location.value, 0.3);
        assert!(result.factors.location.from_data);
    }

    #[test]
    fn undisclosed_salary_defaults_to_exactly_half() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let mut profile = profile_with(&["Python"], &p);
        profile.salary_min = Some(80_000.0);
        profile.salary_max = Some(120_000.0);

        let result = scorer.score(&profile, &job_with(&["Python"]));
        assert_eq!(result.factors.salary.value, 0.5);
        assert!(!result.factors.salary.from_data);
    }

    #[test]
    fn salary_overlap_is_a_fraction_of_the_profile_range() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let mut profile = profile_with(&["Python"], &p);
        profile.salary_min = Some(80_000.0);
        profile.salary_max = Some(120_000.0);

        let mut job = job_with(&["Python"]);
        job.salary_min = Some(100_000.0);
        job.salary_max = Some(150_000.0);

        // Overlap 100k..120k over a 40k-wide request.
        let result = scorer.score(&profile, &job);
        assert!((result.factors.salary.value - 0.5).abs() < 1e-9);
        assert!(result.factors.salary.from_data);
    }

    #[test]
    fn pay_below_requested_minimum_scores_zero() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let mut profile = profile_with(&["Python"], &p);
        profile.salary_min = Some(100_000.0);
        profile.salary_max = Some(140_000.0);

        let mut job = job_with(&["Python"]);
        job.salary_min = Some(50_000.0);
        job.salary_max = Some(70_000.0);

        let result = scorer.score(&profile, &job);
        assert_eq!(result.factors.salary.value, 0.0);
        assert!(result.factors.salary.detail.contains("below"));
    }

    #[test]
    fn no_salary_constraints_score_full() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let profile = profile_with(&["Python"], &p);

        let mut job = job_with(&["Python"]);
        job.salary_min = Some(10_000.0);
        job.salary_max = Some(20_000.0);

        let result = scorer.score(&profile, &job);
        assert_eq!(result.factors.salary.value, 1.0);
    }

    #[test]
    fn confidence_counts_data_derived_factors() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let mut profile = profile_with(&["Python"], &p);
        profile.salary_min = Some(80_000.0);
        profile.salary_max = Some(120_000.0);

        // Requirements present, no experience signal, no salary disclosed.
        let result = scorer.score(&profile, &job_with(&["Python"]));
        assert!((result.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn explanation_leads_with_the_most_salient_factor() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let profile = profile_with(&["Python", "SQL"], &p);

        let mut job = job_with(&["Python", "SQL"]);
        job.remote = true;

        let result = scorer.score(&profile, &job);
        assert!(result.explanation.contains("all 2 required skills matched"));
        assert!(
            result.explanation.starts_with("Excellent match!")
                || result.explanation.starts_with("Good match.")
        );
    }

    #[test]
    fn scores_stay_within_bounds() {
        let p = provider();
        let scorer = MatchScorer::new(MatchConfig::default(), &p).unwrap();
        let profile = Profile::default();
        let jobs = [
            job_with(&[]),
            job_with(&["Python", "Rust", "Go"]),
            {
                let mut j = job_with(&["Python"]);
                j.remote = true;
                j.salary_min = Some(1.0);
                j.salary_max = Some(2.0);
                j
            },
        ];

        for job in &jobs {
            let result = scorer.score(&profile, job);
            assert!((0.0..=100.0).contains(&result.score));
            for factor in [
                &result.factors.skill,
                &result.factors.experience,
                &result.factors.location,
                &result.factors.salary,
            ] {
                assert!((0.0..=1.0).contains(&factor.value));
            }
        }
    }
}
