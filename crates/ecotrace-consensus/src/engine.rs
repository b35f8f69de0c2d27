// crates/ecotrace-consensus/src/engine.rs
//
// The consensus pipeline for a single analysis request.
//
// raw outputs -> normalize -> resolve weights -> aggregate + classify agreement
//             -> synthesize evidence and scam risk -> assemble Analysis
//
// The engine is synchronous and stateless between calls: it works on
// whatever batch the orchestrator collected by its deadline (possibly
// partial) and keeps nothing from one request to the next.

use serde::{Deserialize, Serialize};

use ecotrace_core::{
    AgreementLevel, Analysis, AnalysisContext, BehavioralReport, ContentType, EcoTraceError,
    NormalizedOutput, RawModelOutput,
};

use crate::aggregator::{aggregate, Consensus};
use crate::agreement::classify_agreement;
use crate::assembler::assemble;
use crate::config::ConsensusConfig;
use crate::evidence::synthesize;
use crate::normalizer::normalize_batch;
use crate::weights::resolve_weights;

/// Result of the scoring stages, before evidence and assembly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsensusOutcome {
    /// Usable outputs in processing order, with resolved weights.
    pub outputs: Vec<NormalizedOutput>,
    pub consensus: Consensus,
    pub agreement_level: AgreementLevel,
    /// Number of raw outputs discarded as malformed.
    pub discarded: usize,
}

/// Multi-model consensus engine. Cheap to clone, safe to share.
#[derive(Debug, Clone, Default)]
pub struct ConsensusEngine {
    config: ConsensusConfig,
}

impl ConsensusEngine {
    /// Create an engine, rejecting invalid configuration.
    pub fn new(config: ConsensusConfig) -> Result<Self, EcoTraceError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    /// Normalize, weight, pool, and classify agreement.
    ///
    /// Fails with `NoAnalysisPossible` when no output survives normalization.
    pub fn evaluate(
        &self,
        raws: &[RawModelOutput],
        content_type: ContentType,
    ) -> Result<ConsensusOutcome, EcoTraceError> {
        let mut outputs = normalize_batch(raws);
        let discarded = raws.len() - outputs.len();

        if outputs.is_empty() {
            tracing::warn!(
                "No usable model outputs ({} received, {} discarded)",
                raws.len(),
                discarded
            );
            return Err(EcoTraceError::NoAnalysisPossible);
        }

        resolve_weights(&self.config.weights, &mut outputs, content_type);
        tracing::debug!(
            "Resolved weights for {} live models ({})",
            outputs.len(),
            content_type
        );

        let consensus = aggregate(&outputs);
        let scores: Vec<f64> = outputs.iter().map(|o| o.normalized_score).collect();
        let agreement_level = classify_agreement(&scores, &self.config.agreement);

        tracing::debug!(
            "Consensus: ai_likelihood={:.4} verdict={} agreement={}",
            consensus.ai_likelihood,
            consensus.final_verdict,
            agreement_level
        );

        Ok(ConsensusOutcome {
            outputs,
            consensus,
            agreement_level,
            discarded,
        })
    }

    /// Run the full pipeline and assemble the Analysis record.
    pub fn analyze(
        &self,
        raws: &[RawModelOutput],
        behavioral: &BehavioralReport,
        ctx: &AnalysisContext,
    ) -> Result<Analysis, EcoTraceError> {
        validate_behavioral(behavioral)?;

        let outcome = self.evaluate(raws, ctx.content_type)?;
        let synthesis = synthesize(
            &outcome.outputs,
            behavioral,
            &self.config.severity,
            &self.config.deception,
        );
        tracing::debug!(
            "Synthesized {} evidence items, scam_risk={:.4}",
            synthesis.evidence.len(),
            synthesis.scam_risk_score
        );

        let analysis = assemble(
            ctx,
            &outcome.consensus,
            outcome.agreement_level,
            outcome.outputs,
            synthesis,
            behavioral,
        );

        tracing::info!(
            "Analysis {} ({}): {} at {:.4}, agreement {}, {} models",
            analysis.request_id,
            analysis.content_type,
            analysis.final_verdict,
            analysis.ai_likelihood,
            analysis.agreement_level,
            analysis.model_outputs.len()
        );

        Ok(analysis)
    }
}

fn validate_behavioral(report: &BehavioralReport) -> Result<(), EcoTraceError> {
    for (name, value) in [
        ("behavioral_score", report.behavioral_score),
        ("scam_risk_score", report.scam_risk_score),
    ] {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(EcoTraceError::InvalidInput(format!(
                "behavioral report {} must lie in [0, 1], got {}",
                name, value
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agreement::AgreementThresholds;
    use ecotrace_core::{Source, Verdict};

    #[test]
    fn test_invalid_config_rejected() {
        let config = ConsensusConfig {
            agreement: AgreementThresholds { high_below: 0.5, medium_below: 0.1 },
            ..Default::default()
        };
        assert!(ConsensusEngine::new(config).is_err());
    }

    #[test]
    fn test_evaluate_counts_discarded() {
        let engine = ConsensusEngine::default();
        let raws = vec![
            RawModelOutput::new("model-a", Verdict::AiGenerated, 0.8),
            RawModelOutput::new("model-b", Verdict::Real, 7.0),
        ];
        let outcome = engine.evaluate(&raws, ContentType::Image).unwrap();
        assert_eq!(outcome.discarded, 1);
        assert_eq!(outcome.outputs.len(), 1);
        assert!((outcome.outputs[0].weight - 1.0).abs() < 1e-10);
        assert_eq!(outcome.agreement_level, AgreementLevel::Low);
    }

    #[test]
    fn test_empty_batch_is_no_analysis_possible() {
        let engine = ConsensusEngine::default();
        let err = engine.evaluate(&[], ContentType::Text).unwrap_err();
        assert!(matches!(err, EcoTraceError::NoAnalysisPossible));
    }

    #[test]
    fn test_out_of_range_behavioral_report_rejected() {
        let engine = ConsensusEngine::default();
        let raws = vec![RawModelOutput::new("model-a", Verdict::AiGenerated, 0.8)];
        let ctx = AnalysisContext::new("u", ContentType::Text, Source::Web);
        let behavioral = BehavioralReport {
            behavioral_score: 1.4,
            ..Default::default()
        };
        let err = engine.analyze(&raws, &behavioral, &ctx).unwrap_err();
        assert!(matches!(err, EcoTraceError::InvalidInput(_)));
    }
}
