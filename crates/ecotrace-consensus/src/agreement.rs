// crates/ecotrace-consensus/src/agreement.rs
//
// Agreement classification from the dispersion of unweighted model scores.
//
// Cutoffs on the population variance of normalized scores:
//   variance < 0.05  -> high
//   variance < 0.15  -> medium
//   otherwise        -> low
// Scores on both sides of 0.5 never rate "high". A lone score rates "low".
// These cutoffs are user-visible; keep them stable across releases.

use serde::{Deserialize, Serialize};

use ecotrace_core::{AgreementLevel, EcoTraceError, AI_THRESHOLD};

use crate::aggregator::quantize;

/// Variance cutoffs separating the agreement levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgreementThresholds {
    /// Variance strictly below this rates `High`.
    pub high_below: f64,
    /// Variance strictly below this (and not `High`) rates `Medium`.
    pub medium_below: f64,
}

impl Default for AgreementThresholds {
    fn default() -> Self {
        Self {
            high_below: 0.05,
            medium_below: 0.15,
        }
    }
}

impl AgreementThresholds {
    pub fn validate(&self) -> Result<(), EcoTraceError> {
        let ordered = self.high_below.is_finite()
            && self.medium_below.is_finite()
            && self.high_below >= 0.0
            && self.high_below < self.medium_below;
        if !ordered {
            return Err(EcoTraceError::InvalidConfig(format!(
                "agreement thresholds must satisfy 0 <= high_below < medium_below, got {} / {}",
                self.high_below, self.medium_below
            )));
        }
        Ok(())
    }
}

/// Population variance: sum((s - mean)^2) / n. Zero for fewer than two scores.
pub fn population_variance(scores: &[f64]) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    scores
        .iter()
        .map(|&s| {
            let diff = s - mean;
            diff * diff
        })
        .sum::<f64>()
        / n
}

/// Classify how tightly the scores cluster.
pub fn classify_agreement(scores: &[f64], thresholds: &AgreementThresholds) -> AgreementLevel {
    if scores.len() < 2 {
        return AgreementLevel::Low;
    }

    let variance = quantize(population_variance(scores));
    let level = if variance < thresholds.high_below {
        AgreementLevel::High
    } else if variance < thresholds.medium_below {
        AgreementLevel::Medium
    } else {
        AgreementLevel::Low
    };

    let straddles = scores.iter().any(|&s| s >= AI_THRESHOLD)
        && scores.iter().any(|&s| s < AI_THRESHOLD);
    if straddles && level == AgreementLevel::High {
        AgreementLevel::Medium
    } else {
        level
    }
}
