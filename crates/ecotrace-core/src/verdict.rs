// crates/ecotrace-core/src/verdict.rs
//
// Categorical vocabulary of an analysis: verdicts, content types, request
// sources, agreement levels, and evidence severities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EcoTraceError;

/// Score at or above which content is judged AI-generated. Ties go to AI.
pub const AI_THRESHOLD: f64 = 0.5;

/// Final or per-model judgement about a piece of content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    AiGenerated,
    Real,
}

impl Verdict {
    /// Parse a wire label (`ai_generated` / `real`), trimmed and case-insensitive.
    /// Returns `None` for anything else.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "ai_generated" => Some(Verdict::AiGenerated),
            "real" => Some(Verdict::Real),
            _ => None,
        }
    }

    /// The verdict implied by a probability-of-AI score.
    pub fn from_score(score: f64) -> Self {
        if score >= AI_THRESHOLD {
            Verdict::AiGenerated
        } else {
            Verdict::Real
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Verdict::AiGenerated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::AiGenerated => "ai_generated",
            Verdict::Real => "real",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = EcoTraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verdict::parse_label(s)
            .ok_or_else(|| EcoTraceError::InvalidInput(format!("unknown verdict '{}'", s)))
    }
}

/// Kind of content submitted for analysis. Selects the weight table column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Image,
    Text,
    Video,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Image => "image",
            ContentType::Text => "text",
            ContentType::Video => "video",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = EcoTraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(ContentType::Image),
            "text" => Ok(ContentType::Text),
            "video" => Ok(ContentType::Video),
            other => Err(EcoTraceError::InvalidInput(format!(
                "invalid content type '{}': must be 'image', 'text', or 'video'",
                other
            ))),
        }
    }
}

/// Surface the request came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Web,
    Extension,
}

impl Source {
    /// Parse a source label; anything unrecognised is treated as `Web`.
    pub fn parse_or_default(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "extension" => Source::Extension,
            _ => Source::Web,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Web => "web",
            Source::Extension => "extension",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How tightly the model scores cluster. Surfaced to users as a trust signal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgreementLevel {
    High,
    Medium,
    Low,
}

impl AgreementLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgreementLevel::High => "high",
            AgreementLevel::Medium => "medium",
            AgreementLevel::Low => "low",
        }
    }
}

impl fmt::Display for AgreementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of an evidence item. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Severity band for a model confidence: `>= 0.8` high, `>= 0.5` medium.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            Severity::High
        } else if confidence >= 0.5 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::parse_label("ai_generated"), Some(Verdict::AiGenerated));
        assert_eq!(Verdict::parse_label("  REAL "), Some(Verdict::Real));
        assert_eq!(Verdict::parse_label("fake"), None);
        assert_eq!(Verdict::parse_label(""), None);
    }

    #[test]
    fn test_verdict_from_score_ties_to_ai() {
        assert_eq!(Verdict::from_score(0.5), Verdict::AiGenerated);
        assert_eq!(Verdict::from_score(0.4999), Verdict::Real);
        assert_eq!(Verdict::from_score(1.0), Verdict::AiGenerated);
        assert_eq!(Verdict::from_score(0.0), Verdict::Real);
    }

    #[test]
    fn test_verdict_serde_snake_case() {
        let json = serde_json::to_string(&Verdict::AiGenerated).unwrap();
        assert_eq!(json, "\"ai_generated\"");
        let back: Verdict = serde_json::from_str("\"real\"").unwrap();
        assert_eq!(back, Verdict::Real);
    }

    #[test]
    fn test_content_type_parse() {
        assert_eq!("image".parse::<ContentType>().unwrap(), ContentType::Image);
        assert_eq!("Text".parse::<ContentType>().unwrap(), ContentType::Text);
        assert!("audio".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_unknown_source_defaults_to_web() {
        assert_eq!(Source::parse_or_default("extension"), Source::Extension);
        assert_eq!(Source::parse_or_default("mobile"), Source::Web);
    }

    #[test]
    fn test_severity_order_and_bands() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!(Severity::from_confidence(0.8), Severity::High);
        assert_eq!(Severity::from_confidence(0.79), Severity::Medium);
        assert_eq!(Severity::from_confidence(0.5), Severity::Medium);
        assert_eq!(Severity::from_confidence(0.1), Severity::Low);
    }
}
