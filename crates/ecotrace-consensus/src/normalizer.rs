// crates/ecotrace-consensus/src/normalizer.rs
//
// Boundary validation and normalization of raw per-model results.
//
// Every model integration reports a verdict label and a confidence on its
// own scale. This module validates each output and re-expresses it as a
// probability of AI generation, so nothing downstream sees the raw shapes.
// Malformed outputs are discarded whole; they are never clamped.

use ecotrace_core::{ConfidenceScale, EcoTraceError, NormalizedOutput, RawModelOutput, Verdict};

use crate::aggregator::quantize;

/// Validate one raw output and put it on the common probability-of-AI scale.
///
/// The returned output has `weight = 0.0`; the Weight Resolver fills it in.
pub fn normalize(raw: &RawModelOutput) -> Result<NormalizedOutput, EcoTraceError> {
    let model = raw.model.trim();
    if model.is_empty() {
        return Err(EcoTraceError::malformed("<unnamed>", "missing model identifier"));
    }

    if !raw.success {
        return Err(EcoTraceError::malformed(model, "model reported failure"));
    }

    let verdict = Verdict::parse_label(&raw.verdict).ok_or_else(|| {
        EcoTraceError::malformed(model, format!("unknown verdict label '{}'", raw.verdict))
    })?;

    let confidence = raw.confidence;
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(EcoTraceError::malformed(
            model,
            format!("confidence {} outside [0, 1]", confidence),
        ));
    }

    let family = raw.resolved_family();
    let scale = raw.resolved_scale();
    let raw_score = match scale {
        ConfidenceScale::VerdictConfidence => match verdict {
            Verdict::AiGenerated => confidence,
            Verdict::Real => 1.0 - confidence,
        },
        ConfidenceScale::AiProbability => confidence,
    };
    let normalized_score = quantize(raw_score);

    // The score must point the same way as the verdict it came with.
    if Verdict::from_score(normalized_score) != verdict {
        return Err(EcoTraceError::malformed(
            model,
            format!(
                "score {} contradicts verdict '{}' ({:?})",
                normalized_score, verdict, scale
            ),
        ));
    }

    Ok(NormalizedOutput {
        model: model.to_string(),
        family,
        verdict,
        confidence,
        weight: 0.0,
        normalized_score,
        reasons: raw.reasons.clone(),
        structural_flags: raw.structural_flags.clone(),
    })
}

/// Normalize a batch in arrival order, dropping (and logging) malformed outputs.
pub fn normalize_batch(raws: &[RawModelOutput]) -> Vec<NormalizedOutput> {
    raws.iter()
        .filter_map(|raw| match normalize(raw) {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::warn!("Discarding model output: {}", e);
                None
            }
        })
        .collect()
}

/// Parse a JSON array of raw model outputs.
///
/// Entries that are not even shaped like a model output (not an object,
/// wrong field types) are logged and skipped; the rest of the batch survives.
pub fn parse_raw_batch(json: &str) -> Result<Vec<RawModelOutput>, EcoTraceError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut raws = Vec::with_capacity(values.len());
    for (idx, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<RawModelOutput>(value) {
            Ok(raw) => raws.push(raw),
            Err(e) => tracing::warn!("Skipping unreadable model output #{}: {}", idx, e),
        }
    }
    Ok(raws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecotrace_core::ModelFamily;

    #[test]
    fn test_ai_verdict_keeps_confidence() {
        let raw = RawModelOutput::new("gpt-4o-vision", Verdict::AiGenerated, 0.85);
        let out = normalize(&raw).unwrap();
        assert!((out.normalized_score - 0.85).abs() < 1e-10);
        assert_eq!(out.verdict, Verdict::AiGenerated);
        assert_eq!(out.family, ModelFamily::VisionLanguage);
        assert_eq!(out.weight, 0.0);
    }

    #[test]
    fn test_real_verdict_inverts_confidence() {
        let raw = RawModelOutput::new("model-b", Verdict::Real, 0.9);
        let out = normalize(&raw).unwrap();
        assert_eq!(out.normalized_score, 0.1);
        assert_eq!(out.verdict, Verdict::Real);
    }

    #[test]
    fn test_real_verdict_inverts_for_every_family() {
        for model in ["cnn-image-classifier", "ela-forensics", "face-skin-analyzer", "gpt-4o-vision"] {
            let raw = RawModelOutput::new(model, Verdict::Real, 0.9);
            let out = normalize(&raw).unwrap();
            assert_eq!(out.normalized_score, 0.1, "{}", model);
            assert_eq!(out.verdict, Verdict::Real);
        }
    }

    #[test]
    fn test_declared_ai_probability_scale_used_directly() {
        let raw = RawModelOutput::new("watermark-meta-analyzer", Verdict::Real, 0.2)
            .with_scale(ConfidenceScale::AiProbability);
        let out = normalize(&raw).unwrap();
        assert!((out.normalized_score - 0.2).abs() < 1e-10);
    }

    #[test]
    fn test_boundary_confidence_inclusive_on_ai_side() {
        let raw = RawModelOutput::new("model-a", Verdict::AiGenerated, 0.5);
        let out = normalize(&raw).unwrap();
        assert_eq!(out.normalized_score, 0.5);

        // A "real" verdict at 0.5 would land on the AI side of the boundary.
        let raw = RawModelOutput::new("model-a", Verdict::Real, 0.5);
        assert!(normalize(&raw).is_err());
    }

    #[test]
    fn test_out_of_range_confidence_rejected_not_clamped() {
        for bad in [1.2, -0.1, f64::NAN, f64::INFINITY] {
            let raw = RawModelOutput::new("model-a", Verdict::AiGenerated, bad);
            match normalize(&raw) {
                Err(EcoTraceError::MalformedOutput { model, .. }) => assert_eq!(model, "model-a"),
                other => panic!("expected MalformedOutput for {}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_unknown_verdict_label_rejected() {
        let mut raw = RawModelOutput::new("model-a", Verdict::AiGenerated, 0.7);
        raw.verdict = "probably_fake".to_string();
        assert!(normalize(&raw).is_err());
    }

    #[test]
    fn test_reported_failure_rejected() {
        let mut raw = RawModelOutput::new("gpt-4o-vision", Verdict::Real, 0.0);
        raw.success = false;
        assert!(normalize(&raw).is_err());
    }

    #[test]
    fn test_contradictory_confidence_rejected() {
        // Confidence below one half in an "ai_generated" verdict points the other way.
        let raw = RawModelOutput::new("model-a", Verdict::AiGenerated, 0.3);
        assert!(normalize(&raw).is_err());
        // A declared AI-probability output claiming "real" at 0.7.
        let raw = RawModelOutput::new("face-skin-analyzer", Verdict::Real, 0.7)
            .with_scale(ConfidenceScale::AiProbability);
        assert!(normalize(&raw).is_err());
        // Without a declared scale the same output is a confident "real".
        let raw = RawModelOutput::new("face-skin-analyzer", Verdict::Real, 0.7);
        assert!((normalize(&raw).unwrap().normalized_score - 0.3).abs() < 1e-10);
    }

    #[test]
    fn test_batch_drops_malformed_and_keeps_order() {
        let raws = vec![
            RawModelOutput::new("model-a", Verdict::AiGenerated, 0.9),
            RawModelOutput::new("model-b", Verdict::AiGenerated, 1.5),
            RawModelOutput::new("model-c", Verdict::Real, 0.8),
        ];
        let outs = normalize_batch(&raws);
        let names: Vec<&str> = outs.iter().map(|o| o.model.as_str()).collect();
        assert_eq!(names, vec!["model-a", "model-c"]);
    }

    #[test]
    fn test_parse_raw_batch_skips_unreadable_entries() {
        let json = r#"[
            {"model": "gpt-4o-vision", "verdict": "ai_generated", "confidence": 0.8,
             "reasons": ["Waxy skin"], "structural_flags": ["unnaturally_smooth_skin"]},
            {"model": "broken", "confidence": "high"},
            42
        ]"#;
        let raws = parse_raw_batch(json).unwrap();
        assert_eq!(raws.len(), 1);
        assert_eq!(raws[0].structural_flags, vec!["unnaturally_smooth_skin"]);
    }

    #[test]
    fn test_parse_raw_batch_rejects_non_array() {
        assert!(parse_raw_batch(r#"{"model": "a"}"#).is_err());
    }
}
