// crates/ecotrace-consensus/src/evidence.rs
//
// Evidence and scam-risk synthesis.
//
// Merges model reasons, structural flags, and behavioral flags into one
// deduplicated evidence list ordered by descending severity (stable, so
// equal-severity items keep processing order). Scam risk is computed from
// deception-pattern flags only and never from ai_likelihood.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use ecotrace_core::{
    BehavioralReport, EcoTraceError, EvidenceItem, EvidenceKind, NormalizedOutput, Severity,
};

use crate::aggregator::quantize;

/// Reasons this short carry no information and are dropped.
const MIN_REASON_LEN: usize = 6;
/// Flags this short are dropped.
const MIN_FLAG_LEN: usize = 4;
/// Behavioral score above which behavioral flags rate `Medium`.
const BEHAVIORAL_MEDIUM_ABOVE: f64 = 0.3;

fn flag_key(flag: &str) -> String {
    flag.trim().to_lowercase()
}

/// Rekey a loaded table so configured names match lookups.
fn normalize_keys<V>(flags: BTreeMap<String, V>) -> BTreeMap<String, V> {
    flags.into_iter().map(|(flag, v)| (flag_key(&flag), v)).collect()
}

/// Severity per structural flag. A configured table replaces the built-in one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "BTreeMap<String, Severity>", into = "BTreeMap<String, Severity>")]
pub struct SeverityTable {
    flags: BTreeMap<String, Severity>,
}

impl From<BTreeMap<String, Severity>> for SeverityTable {
    fn from(flags: BTreeMap<String, Severity>) -> Self {
        Self { flags: normalize_keys(flags) }
    }
}

impl From<SeverityTable> for BTreeMap<String, Severity> {
    fn from(table: SeverityTable) -> Self {
        table.flags
    }
}

impl Default for SeverityTable {
    fn default() -> Self {
        let high = [
            "ai_attribution",
            "watermark_detected",
            "watermark_removed",
            "metadata_mismatch",
            "deformed_fingers",
            "missing_eyes",
            "face_distortion",
            "cnn_ai_detected",
        ];
        let medium = [
            "watermark_strip",
            "exif_tampered",
            "unnaturally_smooth_skin",
            "eye_misalignment",
            "unnatural_symmetry",
            "ai_dimensions",
            "color_banding",
            "ela_too_clean",
            "ela_uniform",
            "ela_grid_uniform",
            "ela_edge_uniform",
            "benford_violation",
            "ai_phrases",
            "uniform_sentences",
        ];
        let low = [
            "no_exif",
            "smooth_histogram",
            "low_edge_density",
            "low_high_frequency",
            "uniform_texture",
            "no_sensor_noise",
            "uniform_noise",
            "smooth_gradients",
            "excessive_skin_tone",
            "repetitive_starters",
            "no_personal_voice",
            "uniform_word_length",
            "uniform_paragraphs",
            "low_vocabulary",
        ];

        let mut flags = BTreeMap::new();
        for (names, severity) in [(&high[..], Severity::High), (&medium[..], Severity::Medium), (&low[..], Severity::Low)] {
            for name in names {
                flags.insert(name.to_string(), severity);
            }
        }
        Self { flags }
    }
}

impl SeverityTable {
    pub fn empty() -> Self {
        Self { flags: BTreeMap::new() }
    }

    pub fn with_flag(mut self, flag: &str, severity: Severity) -> Self {
        self.flags.insert(flag_key(flag), severity);
        self
    }

    pub fn lookup(&self, flag: &str) -> Option<Severity> {
        self.flags.get(&flag_key(flag)).copied()
    }
}

/// Per-flag risk contribution of deception patterns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct DeceptionTable {
    flags: BTreeMap<String, f64>,
}

impl From<BTreeMap<String, f64>> for DeceptionTable {
    fn from(flags: BTreeMap<String, f64>) -> Self {
        Self { flags: normalize_keys(flags) }
    }
}

impl From<DeceptionTable> for BTreeMap<String, f64> {
    fn from(table: DeceptionTable) -> Self {
        table.flags
    }
}

impl Default for DeceptionTable {
    fn default() -> Self {
        let flags = [
            ("watermark_removed", 0.7),
            ("metadata_mismatch", 0.6),
            ("exif_tampered", 0.5),
            ("watermark_strip", 0.4),
            ("no_exif", 0.15),
        ]
        .into_iter()
        .map(|(name, risk)| (name.to_string(), risk))
        .collect();
        Self { flags }
    }
}

impl DeceptionTable {
    pub fn empty() -> Self {
        Self { flags: BTreeMap::new() }
    }

    pub fn with_flag(mut self, flag: &str, risk: f64) -> Self {
        self.flags.insert(flag_key(flag), risk);
        self
    }

    pub fn risk(&self, flag: &str) -> Option<f64> {
        self.flags.get(&flag_key(flag)).copied()
    }

    pub fn validate(&self) -> Result<(), EcoTraceError> {
        for (flag, &risk) in &self.flags {
            if !risk.is_finite() || !(0.0..=1.0).contains(&risk) {
                return Err(EcoTraceError::InvalidConfig(format!(
                    "deception risk for '{}' must lie in [0, 1], got {}",
                    flag, risk
                )));
            }
        }
        Ok(())
    }
}

/// Ranked evidence plus the derived scam risk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Synthesis {
    pub evidence: Vec<EvidenceItem>,
    pub scam_risk_score: f64,
}

/// Build the evidence list and scam risk for one analysis.
pub fn synthesize(
    outputs: &[NormalizedOutput],
    behavioral: &BehavioralReport,
    severities: &SeverityTable,
    deception: &DeceptionTable,
) -> Synthesis {
    let mut evidence = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for output in outputs {
        let fallback = Severity::from_confidence(output.confidence);
        let name = output.short_name();

        for reason in &output.reasons {
            let key = flag_key(reason);
            if reason.chars().count() < MIN_REASON_LEN || !seen.insert(key) {
                continue;
            }
            evidence.push(EvidenceItem {
                kind: EvidenceKind::ModelAnalysis,
                description: format!("[{}] {}", name, reason),
                severity: fallback,
            });
        }

        for flag in &output.structural_flags {
            let key = flag_key(flag);
            if flag.chars().count() < MIN_FLAG_LEN || !seen.insert(key) {
                continue;
            }
            evidence.push(EvidenceItem {
                kind: EvidenceKind::Structural,
                description: format!("[{}] {}", name, flag),
                severity: severities.lookup(flag).unwrap_or(fallback),
            });
        }
    }

    let behavioral_severity = if behavioral.behavioral_score > BEHAVIORAL_MEDIUM_ABOVE {
        Severity::Medium
    } else {
        Severity::Low
    };
    for flag in &behavioral.flags {
        if flag.trim().is_empty() || !seen.insert(flag_key(flag)) {
            continue;
        }
        evidence.push(EvidenceItem {
            kind: EvidenceKind::Behavioral,
            description: format!("[internal] {}", flag),
            severity: behavioral_severity,
        });
    }

    // Stable: equal severities keep the order models were processed in.
    evidence.sort_by(|a, b| b.severity.cmp(&a.severity));

    Synthesis {
        evidence,
        scam_risk_score: scam_risk(outputs, behavioral, deception),
    }
}

/// Noisy-OR of the distinct deception flags present and the behavioral
/// collaborator's scam indicator: `1 - prod(1 - r)`.
pub fn scam_risk(
    outputs: &[NormalizedOutput],
    behavioral: &BehavioralReport,
    deception: &DeceptionTable,
) -> f64 {
    let mut counted: BTreeSet<String> = BTreeSet::new();
    let mut clean = 1.0;

    for flag in outputs.iter().flat_map(|o| o.structural_flags.iter()) {
        if let Some(risk) = deception.risk(flag) {
            if counted.insert(flag_key(flag)) {
                clean *= 1.0 - risk.clamp(0.0, 1.0);
            }
        }
    }

    let indicator = behavioral.scam_risk_score;
    if indicator.is_finite() {
        clean *= 1.0 - indicator.clamp(0.0, 1.0);
    }

    quantize(1.0 - clean).clamp(0.0, 1.0)
}
