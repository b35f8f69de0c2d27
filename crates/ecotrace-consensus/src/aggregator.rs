// crates/ecotrace-consensus/src/aggregator.rs
//
// Linear opinion pool over normalized model scores.
//
// ai_likelihood = sum(normalized_score_i * weight_i). The pool keeps the
// magnitude of each opinion (a narrow 51% and a confident 95% both say "AI"
// but carry different trust), which majority voting would throw away.

use serde::{Deserialize, Serialize};

use ecotrace_core::{NormalizedOutput, Verdict};

/// Scores are kept on a 1e-9 grid so decimal inputs land on decimal values.
const SCORE_QUANTUM: f64 = 1e9;

/// Snap a score onto the 1e-9 grid. Monotone non-decreasing.
pub fn quantize(x: f64) -> f64 {
    (x * SCORE_QUANTUM).round() / SCORE_QUANTUM
}

/// Pooled likelihood and the verdict it implies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Consensus {
    /// Weighted probability of AI generation, in [0, 1].
    pub ai_likelihood: f64,
    /// `AiGenerated` iff `ai_likelihood >= 0.5`.
    pub final_verdict: Verdict,
}

/// Pool weighted scores into one likelihood and verdict.
///
/// Total over any input; an empty slice pools to 0.0 / `Real`.
pub fn aggregate(outputs: &[NormalizedOutput]) -> Consensus {
    let pooled: f64 = outputs
        .iter()
        .map(|o| o.normalized_score * o.weight)
        .sum();

    let ai_likelihood = quantize(pooled).clamp(0.0, 1.0);

    Consensus {
        ai_likelihood,
        final_verdict: Verdict::from_score(ai_likelihood),
    }
}
