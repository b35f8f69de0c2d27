// crates/ecotrace-consensus/src/assembler.rs
//
// Packages the stage outputs and caller context into the immutable Analysis.

use ecotrace_core::{AgreementLevel, Analysis, AnalysisContext, BehavioralReport, NormalizedOutput};

use crate::aggregator::Consensus;
use crate::evidence::Synthesis;

/// Build the Analysis record. Pure packaging: the same inputs always yield
/// the same record, and only `created_at` comes from the caller's clock.
pub fn assemble(
    ctx: &AnalysisContext,
    consensus: &Consensus,
    agreement_level: AgreementLevel,
    model_outputs: Vec<NormalizedOutput>,
    synthesis: Synthesis,
    behavioral: &BehavioralReport,
) -> Analysis {
    Analysis {
        id: Analysis::derive_id(&ctx.user_id, &ctx.request_id),
        user_id: ctx.user_id.clone(),
        request_id: ctx.request_id,
        content_type: ctx.content_type,
        final_verdict: consensus.final_verdict,
        ai_likelihood: consensus.ai_likelihood,
        agreement_level,
        scam_risk_score: synthesis.scam_risk_score,
        behavioral_score: behavioral.behavioral_score,
        model_outputs,
        evidence: synthesis.evidence,
        source: ctx.source,
        created_at: ctx.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ecotrace_core::{ContentType, ModelFamily, Source, Verdict};
    use uuid::Uuid;

    fn make_inputs() -> (AnalysisContext, Consensus, Vec<NormalizedOutput>, Synthesis, BehavioralReport) {
        let ctx = AnalysisContext {
            user_id: "user-7".to_string(),
            request_id: Uuid::from_u128(99),
            content_type: ContentType::Text,
            source: Source::Extension,
            created_at: Utc::now(),
        };
        let consensus = Consensus {
            ai_likelihood: 0.72,
            final_verdict: Verdict::AiGenerated,
        };
        let outputs = vec![NormalizedOutput {
            model: "gpt-4o-vision".to_string(),
            family: ModelFamily::VisionLanguage,
            verdict: Verdict::AiGenerated,
            confidence: 0.72,
            weight: 1.0,
            normalized_score: 0.72,
            reasons: vec![],
            structural_flags: vec![],
        }];
        let synthesis = Synthesis {
            evidence: vec![],
            scam_risk_score: 0.2,
        };
        let behavioral = BehavioralReport {
            behavioral_score: 0.35,
            scam_risk_score: 0.2,
            flags: vec![],
        };
        (ctx, consensus, outputs, synthesis, behavioral)
    }

    #[test]
    fn test_all_fields_populated_from_inputs() {
        let (ctx, consensus, outputs, synthesis, behavioral) = make_inputs();
        let a = assemble(&ctx, &consensus, AgreementLevel::Low, outputs, synthesis, &behavioral);
        assert_eq!(a.id, Analysis::derive_id("user-7", &Uuid::from_u128(99)));
        assert_eq!(a.user_id, "user-7");
        assert_eq!(a.request_id, Uuid::from_u128(99));
        assert_eq!(a.content_type, ContentType::Text);
        assert_eq!(a.source, Source::Extension);
        assert_eq!(a.final_verdict, Verdict::AiGenerated);
        assert!((a.ai_likelihood - 0.72).abs() < 1e-10);
        assert_eq!(a.agreement_level, AgreementLevel::Low);
        assert!((a.scam_risk_score - 0.2).abs() < 1e-10);
        assert!((a.behavioral_score - 0.35).abs() < 1e-10);
        assert_eq!(a.model_outputs.len(), 1);
        assert_eq!(a.created_at, ctx.created_at);
        assert!(a.is_single_model());
    }

    #[test]
    fn test_assembling_twice_is_identical() {
        let (ctx, consensus, outputs, synthesis, behavioral) = make_inputs();
        let a = assemble(&ctx, &consensus, AgreementLevel::Low, outputs.clone(), synthesis.clone(), &behavioral);
        let b = assemble(&ctx, &consensus, AgreementLevel::Low, outputs, synthesis, &behavioral);
        assert_eq!(a, b);
        assert_eq!(serde_json::to_vec(&a).unwrap(), serde_json::to_vec(&b).unwrap());
    }
}
