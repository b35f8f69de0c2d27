// crates/ecotrace-core/src/analysis.rs
//
// The persisted Analysis record and the pieces it is assembled from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::EcoTraceError;
use crate::model::NormalizedOutput;
use crate::verdict::{AgreementLevel, ContentType, Severity, Source, Verdict};

/// Namespace for deriving an Analysis id from `(user_id, request_id)`.
const ANALYSIS_NAMESPACE: Uuid = Uuid::from_u128(0x6ec0_7ace_5e1f_4c2a_9b0d_41a1_7e5c_0de1);

/// Category of an evidence item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    /// A free-text reason given by a model.
    ModelAnalysis,
    /// A categorical structural flag raised by a model.
    Structural,
    /// A flag raised by the behavioral collaborator.
    Behavioral,
}

impl EvidenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceKind::ModelAnalysis => "model_analysis",
            EvidenceKind::Structural => "structural",
            EvidenceKind::Behavioral => "behavioral",
        }
    }
}

/// One human-readable, severity-tagged justification shown with a verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceItem {
    #[serde(rename = "type")]
    pub kind: EvidenceKind,
    pub description: String,
    pub severity: Severity,
}

/// Output of the behavioral collaborator. Passed through, never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BehavioralReport {
    /// Orthogonal behavioral signal in [0, 1].
    pub behavioral_score: f64,
    /// Scam-indicator strength found by the collaborator, in [0, 1].
    pub scam_risk_score: f64,
    pub flags: Vec<String>,
}

impl BehavioralReport {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Caller-supplied context for one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisContext {
    pub user_id: String,
    /// Externally visible correlation key.
    pub request_id: Uuid,
    pub content_type: ContentType,
    pub source: Source,
    pub created_at: DateTime<Utc>,
}

impl AnalysisContext {
    /// Context with a fresh request id, stamped now.
    pub fn new(user_id: impl Into<String>, content_type: ContentType, source: Source) -> Self {
        Self {
            user_id: user_id.into(),
            request_id: Uuid::now_v7(),
            content_type,
            source,
            created_at: Utc::now(),
        }
    }
}

/// A completed analysis, owned by exactly one user. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    /// Internal id, derived from `(user_id, request_id)`.
    pub id: Uuid,
    pub user_id: String,
    pub request_id: Uuid,
    pub content_type: ContentType,
    pub final_verdict: Verdict,
    /// Weighted probability of AI generation, in [0, 1].
    pub ai_likelihood: f64,
    pub agreement_level: AgreementLevel,
    pub scam_risk_score: f64,
    pub behavioral_score: f64,
    pub model_outputs: Vec<NormalizedOutput>,
    pub evidence: Vec<EvidenceItem>,
    pub source: Source,
    pub created_at: DateTime<Utc>,
}

impl Analysis {
    /// Deterministic internal id for a user's request.
    pub fn derive_id(user_id: &str, request_id: &Uuid) -> Uuid {
        let name = format!("{}:{}", user_id, request_id);
        Uuid::new_v5(&ANALYSIS_NAMESPACE, name.as_bytes())
    }

    /// Hex SHA-256 over the canonical JSON of every field except `created_at`.
    ///
    /// Two analyses assembled from identical inputs share a fingerprint.
    pub fn fingerprint(&self) -> Result<String, EcoTraceError> {
        let mut value = serde_json::to_value(self)?;
        if let Some(map) = value.as_object_mut() {
            map.remove("created_at");
        }
        let bytes = serde_json::to_vec(&value)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }

    /// True when the verdict rests on a single model.
    pub fn is_single_model(&self) -> bool {
        self.model_outputs.len() == 1
    }
}
