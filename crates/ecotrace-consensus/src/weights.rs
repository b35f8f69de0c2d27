// crates/ecotrace-consensus/src/weights.rs
//
// Weight resolution for the models that responded to a request.
//
// Each model has a static base weight per content type, looked up from an
// explicit WeightTable. Base weights of the live models are renormalized to
// sum to 1.0, so a model that timed out hands its share to the others in
// proportion instead of leaving missing mass in the pooled score.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ecotrace_core::{ContentType, EcoTraceError, ModelFamily, NormalizedOutput};

/// Base weight of one model (or family) for each content type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ContentWeights {
    pub image: f64,
    pub text: f64,
    pub video: f64,
}

impl ContentWeights {
    pub const fn new(image: f64, text: f64, video: f64) -> Self {
        Self { image, text, video }
    }

    pub const fn uniform(weight: f64) -> Self {
        Self::new(weight, weight, weight)
    }

    pub fn get(&self, content_type: ContentType) -> f64 {
        match content_type {
            ContentType::Image => self.image,
            ContentType::Text => self.text,
            ContentType::Video => self.video,
        }
    }

    fn validate(&self, label: &str) -> Result<(), EcoTraceError> {
        for (column, w) in [("image", self.image), ("text", self.text), ("video", self.video)] {
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(EcoTraceError::InvalidConfig(format!(
                    "base weight for {} ({}) must lie in [0, 1], got {}",
                    label, column, w
                )));
            }
        }
        Ok(())
    }
}

/// Default base weights per model family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FamilyWeights {
    pub vision_language: ContentWeights,
    pub cnn_classifier: ContentWeights,
    pub forensic: ContentWeights,
    pub heuristic: ContentWeights,
    pub unknown: ContentWeights,
}

impl Default for FamilyWeights {
    fn default() -> Self {
        Self {
            vision_language: ContentWeights::new(0.40, 0.55, 0.55),
            cnn_classifier: ContentWeights::new(0.30, 0.0, 0.30),
            forensic: ContentWeights::new(0.10, 0.0, 0.10),
            heuristic: ContentWeights::new(0.10, 0.15, 0.15),
            unknown: ContentWeights::uniform(0.10),
        }
    }
}

impl FamilyWeights {
    pub fn for_family(&self, family: ModelFamily) -> &ContentWeights {
        match family {
            ModelFamily::VisionLanguage => &self.vision_language,
            ModelFamily::CnnClassifier => &self.cnn_classifier,
            ModelFamily::Forensic => &self.forensic,
            ModelFamily::Heuristic => &self.heuristic,
            ModelFamily::Unknown => &self.unknown,
        }
    }
}

/// Static base-weight configuration, keyed by model name and content type.
///
/// Lookup order: exact model override, then the model's family default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeightTable {
    pub families: FamilyWeights,
    /// Per-model overrides, keyed by model identifier.
    pub models: BTreeMap<String, ContentWeights>,
}

impl WeightTable {
    /// Add or replace a per-model override.
    pub fn with_model(mut self, model: impl Into<String>, weights: ContentWeights) -> Self {
        self.models.insert(model.into(), weights);
        self
    }

    /// Base weight of a model for a content type.
    pub fn base_weight(&self, model: &str, family: ModelFamily, content_type: ContentType) -> f64 {
        self.models
            .get(model)
            .unwrap_or_else(|| self.families.for_family(family))
            .get(content_type)
    }

    /// Check every configured weight lies in [0, 1].
    pub fn validate(&self) -> Result<(), EcoTraceError> {
        let f = &self.families;
        f.vision_language.validate("family vision_language")?;
        f.cnn_classifier.validate("family cnn_classifier")?;
        f.forensic.validate("family forensic")?;
        f.heuristic.validate("family heuristic")?;
        f.unknown.validate("family unknown")?;
        for (model, weights) in &self.models {
            weights.validate(&format!("model '{}'", model))?;
        }
        Ok(())
    }
}

/// Assign each live model its renormalized weight: `base_i / sum(base_j)`.
///
/// A single live model gets 1.0. If every live base weight is zero the
/// weights fall back to uniform. An empty slice is left untouched.
pub fn resolve_weights(
    table: &WeightTable,
    outputs: &mut [NormalizedOutput],
    content_type: ContentType,
) {
    if outputs.is_empty() {
        return;
    }

    let bases: Vec<f64> = outputs
        .iter()
        .map(|o| table.base_weight(&o.model, o.family, content_type))
        .collect();
    let total: f64 = bases.iter().sum();

    if total > 0.0 {
        for (output, base) in outputs.iter_mut().zip(bases) {
            output.weight = base / total;
        }
    } else {
        tracing::warn!(
            "All {} live models have zero base weight for {}; using uniform weights",
            outputs.len(),
            content_type
        );
        let uniform = 1.0 / outputs.len() as f64;
        for output in outputs.iter_mut() {
            output.weight = uniform;
        }
    }
}
