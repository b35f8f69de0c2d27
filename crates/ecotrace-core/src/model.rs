// crates/ecotrace-core/src/model.rs
//
// Per-model outputs: the raw shape handed over by the model invocation layer,
// and the canonical normalized shape everything downstream consumes.

use serde::{Deserialize, Serialize};

use crate::verdict::Verdict;

/// Family of a model integration. Decides which default base weight it receives.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    /// Hosted multimodal LLMs (e.g. gpt-4o-vision).
    VisionLanguage,
    /// Trained binary image classifiers.
    CnnClassifier,
    /// Signal-level forensics (error level analysis, statistical forensics).
    Forensic,
    /// Local rule-based analyzers (face/skin, artifact frequency, watermark/meta).
    Heuristic,
    /// Anything not recognised by name.
    Unknown,
}

/// Local rule-based analyzers, matched by exact name.
const HEURISTIC_MODELS: &[&str] = &[
    "face-skin-analyzer",
    "artifact-frequency-analyzer",
    "watermark-meta-analyzer",
];

impl ModelFamily {
    /// Classify a model by its identifier. Provider prefixes
    /// (`openai/gpt-4o`) are ignored.
    pub fn classify(model: &str) -> Self {
        let name = model
            .rsplit('/')
            .next()
            .unwrap_or(model)
            .trim()
            .to_ascii_lowercase();

        if name.contains("gpt") || name.contains("vision") {
            ModelFamily::VisionLanguage
        } else if name.contains("cnn") {
            ModelFamily::CnnClassifier
        } else if name == "ela"
            || name.starts_with("ela-")
            || name.starts_with("ela_")
            || name.contains("forensic")
        {
            ModelFamily::Forensic
        } else if HEURISTIC_MODELS.contains(&name.as_str()) {
            ModelFamily::Heuristic
        } else {
            ModelFamily::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::VisionLanguage => "vision_language",
            ModelFamily::CnnClassifier => "cnn_classifier",
            ModelFamily::Forensic => "forensic",
            ModelFamily::Heuristic => "heuristic",
            ModelFamily::Unknown => "unknown",
        }
    }
}

/// Meaning of a raw `confidence` value.
///
/// Every output uses `VerdictConfidence` unless it declares otherwise; the
/// scale is never inferred from the model name.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceScale {
    /// Confidence in the stated verdict: `real` at 0.9 means 10% AI.
    #[default]
    VerdictConfidence,
    /// Confidence is already the probability that the content is AI-generated.
    AiProbability,
}

fn default_success() -> bool {
    true
}

fn missing_confidence() -> f64 {
    f64::NAN
}

/// One model's result exactly as the invocation layer produced it.
///
/// `verdict` stays a string and `confidence` defaults to NaN so that a
/// malformed entry survives deserialization and is rejected by the normalizer
/// rather than failing the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawModelOutput {
    /// Model identifier (e.g. "gpt-4o-vision").
    pub model: String,
    /// Explicit family. Classified from `model` when absent.
    #[serde(default)]
    pub family: Option<ModelFamily>,
    /// Verdict label as emitted by the model.
    #[serde(default)]
    pub verdict: String,
    #[serde(default = "missing_confidence")]
    pub confidence: f64,
    /// Declared meaning of `confidence`. Confidence in the verdict when absent.
    #[serde(default)]
    pub scale: Option<ConfidenceScale>,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub structural_flags: Vec<String>,
    /// False when the integration itself reported a failure.
    #[serde(default = "default_success")]
    pub success: bool,
}

impl RawModelOutput {
    pub fn new(model: impl Into<String>, verdict: Verdict, confidence: f64) -> Self {
        Self {
            model: model.into(),
            family: None,
            verdict: verdict.as_str().to_string(),
            confidence,
            scale: None,
            reasons: Vec::new(),
            structural_flags: Vec::new(),
            success: true,
        }
    }

    pub fn with_reasons<I, S>(mut self, reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reasons = reasons.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.structural_flags = flags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_family(mut self, family: ModelFamily) -> Self {
        self.family = Some(family);
        self
    }

    /// Declare that `confidence` is already the probability of AI.
    pub fn with_scale(mut self, scale: ConfidenceScale) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn resolved_scale(&self) -> ConfidenceScale {
        self.scale.unwrap_or_default()
    }

    /// The explicit family if given, otherwise the one implied by the name.
    pub fn resolved_family(&self) -> ModelFamily {
        self.family.unwrap_or_else(|| ModelFamily::classify(&self.model))
    }
}

/// A model output on the common probability-of-AI scale.
///
/// Invariant: `verdict == AiGenerated` iff `normalized_score >= 0.5`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedOutput {
    pub model: String,
    pub family: ModelFamily,
    pub verdict: Verdict,
    /// Raw confidence as reported, validated to lie in [0, 1].
    pub confidence: f64,
    /// Share of the consensus, in [0, 1]. Sums to 1.0 over one analysis.
    pub weight: f64,
    /// Probability of AI generation: 1.0 certainly AI, 0.0 certainly real.
    pub normalized_score: f64,
    pub reasons: Vec<String>,
    pub structural_flags: Vec<String>,
}

impl NormalizedOutput {
    /// Model name without any provider prefix.
    pub fn short_name(&self) -> &str {
        self.model.rsplit('/').next().unwrap_or(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_models() {
        assert_eq!(ModelFamily::classify("gpt-4o-vision"), ModelFamily::VisionLanguage);
        assert_eq!(ModelFamily::classify("openai/gpt-4o"), ModelFamily::VisionLanguage);
        assert_eq!(ModelFamily::classify("advanced-cnn-classifier"), ModelFamily::CnnClassifier);
        assert_eq!(ModelFamily::classify("cnn-image-classifier"), ModelFamily::CnnClassifier);
        assert_eq!(ModelFamily::classify("ela-forensics"), ModelFamily::Forensic);
        assert_eq!(ModelFamily::classify("statistical-forensics"), ModelFamily::Forensic);
        assert_eq!(ModelFamily::classify("face-skin-analyzer"), ModelFamily::Heuristic);
        assert_eq!(ModelFamily::classify("watermark-meta-analyzer"), ModelFamily::Heuristic);
        assert_eq!(ModelFamily::classify("model-a"), ModelFamily::Unknown);
    }

    #[test]
    fn test_ela_prefix_needs_separator() {
        assert_eq!(ModelFamily::classify("ela_v2"), ModelFamily::Forensic);
        assert_eq!(ModelFamily::classify("elastic-detector"), ModelFamily::Unknown);
        assert_eq!(ModelFamily::classify("elastic-net"), ModelFamily::Unknown);
    }

    #[test]
    fn test_scale_defaults_to_verdict_confidence() {
        for model in ["gpt-4o-vision", "cnn-image-classifier", "ela-forensics", "face-skin-analyzer"] {
            let raw = RawModelOutput::new(model, Verdict::Real, 0.9);
            assert_eq!(raw.resolved_scale(), ConfidenceScale::VerdictConfidence);
        }
        let raw: RawModelOutput = serde_json::from_str(
            r#"{"model": "face-skin-analyzer", "verdict": "real", "confidence": 0.2, "scale": "ai_probability"}"#,
        )
        .unwrap();
        assert_eq!(raw.resolved_scale(), ConfidenceScale::AiProbability);
    }

    #[test]
    fn test_raw_output_defaults_on_missing_fields() {
        let raw: RawModelOutput = serde_json::from_str(r#"{"model": "m"}"#).unwrap();
        assert!(raw.success);
        assert!(raw.verdict.is_empty());
        assert!(raw.confidence.is_nan());
        assert!(raw.reasons.is_empty());
        assert!(raw.structural_flags.is_empty());
        assert_eq!(raw.resolved_family(), ModelFamily::Unknown);
    }

    #[test]
    fn test_explicit_family_wins() {
        let raw = RawModelOutput::new("gpt-4o-vision", Verdict::Real, 0.7)
            .with_family(ModelFamily::Heuristic);
        assert_eq!(raw.resolved_family(), ModelFamily::Heuristic);
    }
}
