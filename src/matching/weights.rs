use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Default policy: skill similarity dominates, experience next, location and
/// salary share the rest.
pub const DEFAULT_WEIGHTS: FactorWeights = FactorWeights {
    skill: 0.50,
    experience: 0.20,
    location: 0.15,
    salary: 0.15,
};

/// Relative weight of each factor in the overall match score. Passed into
/// the scorer constructor so multiple policies can coexist (A/B testing)
/// without shared mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub skill: f64,
    pub experience: f64,
    pub location: f64,
    pub salary: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl FactorWeights {
    pub fn sum(&self) -> f64 {
        self.skill + self.experience + self.location + self.salary
    }

    /// Weights must sum to 1.0 for the score to stay on the 0-100 scale.
    pub fn validate(&self) -> Result<(), EngineError> {
        let sum = self.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(EngineError::InvalidWeights { sum });
        }
        Ok(())
    }
}
