// crates/ecotrace-signals/src/text.rs
//
// Keyword and structure heuristics over submitted text.

use ecotrace_core::{BehavioralAnalyzer, BehavioralReport, ContentType};

/// Texts shorter than this (in chars) are not inspected.
const MIN_TEXT_LEN: usize = 20;
/// At most this many matched phrases per list are reported as flags.
const MAX_PHRASE_FLAGS: usize = 3;

const AI_PHRASE_STEP: f64 = 0.1;
const AI_PHRASE_CAP: f64 = 0.4;
const UNIFORM_SENTENCE_BONUS: f64 = 0.15;
const UNIFORM_SENTENCE_VARIANCE: f64 = 5.0;
const BULLET_BONUS: f64 = 0.1;
const BULLET_LIMIT: usize = 5;
const SCAM_PHRASE_STEP: f64 = 0.2;

const VIDEO_SCAM_BASELINE: f64 = 0.1;

/// Heuristic behavioral analyzer for text content.
///
/// Image and video content carry no inspectable text; images yield an empty
/// report and video a fixed low scam baseline.
#[derive(Debug, Clone)]
pub struct TextHeuristicAnalyzer {
    /// Stock phrases over-represented in LLM output.
    ai_phrases: Vec<String>,
    /// Phrases common in scam and phishing copy.
    scam_phrases: Vec<String>,
}

impl TextHeuristicAnalyzer {
    /// Create an analyzer with the default phrase lists.
    pub fn new() -> Self {
        let ai_phrases = [
            "as an ai",
            "i cannot",
            "it's important to note",
            "it is worth noting",
            "in conclusion",
            "furthermore",
            "delve into",
            "it's crucial",
            "landscape",
            "tapestry",
            "multifaceted",
            "comprehensive",
            "leverage",
            "foster",
            "paradigm",
            "in the realm of",
            "navigating the",
        ];
        let scam_phrases = [
            "act now",
            "limited time",
            "click here",
            "urgent",
            "congratulations",
            "you've won",
            "wire transfer",
            "social security",
            "password",
            "verify your account",
        ];
        Self {
            ai_phrases: ai_phrases.iter().map(|s| s.to_string()).collect(),
            scam_phrases: scam_phrases.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the scam phrase list.
    pub fn with_scam_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scam_phrases = phrases.into_iter().map(|p| p.into().to_lowercase()).collect();
        self
    }

    /// Run the text heuristics.
    pub fn analyze_text(&self, text: &str) -> BehavioralReport {
        let mut report = BehavioralReport::empty();
        if text.chars().count() < MIN_TEXT_LEN {
            return report;
        }
        let lowered = text.to_lowercase();

        let ai_hits = matched_phrases(&lowered, &self.ai_phrases);
        for phrase in ai_hits.iter().take(MAX_PHRASE_FLAGS) {
            report.flags.push(format!("Common AI phrase detected: \"{}\"", phrase));
        }
        if !ai_hits.is_empty() {
            report.behavioral_score += (ai_hits.len() as f64 * AI_PHRASE_STEP).min(AI_PHRASE_CAP);
        }

        if has_uniform_sentences(text) {
            report.flags.push("Very uniform sentence length (AI indicator)".to_string());
            report.behavioral_score += UNIFORM_SENTENCE_BONUS;
        }

        let bullets = text.matches('•').count() + text.matches("- ").count() + text.matches("* ").count();
        if bullets > BULLET_LIMIT {
            report.flags.push("Heavy use of bullet points/lists".to_string());
            report.behavioral_score += BULLET_BONUS;
        }

        let scam_hits = matched_phrases(&lowered, &self.scam_phrases);
        for phrase in scam_hits.iter().take(MAX_PHRASE_FLAGS) {
            report.flags.push(format!("Scam indicator: \"{}\"", phrase));
        }
        if !scam_hits.is_empty() {
            report.scam_risk_score = (scam_hits.len() as f64 * SCAM_PHRASE_STEP).min(1.0);
        }

        report.behavioral_score = report.behavioral_score.min(1.0);
        tracing::debug!(
            "Text heuristics: behavioral={:.2} scam={:.2} flags={}",
            report.behavioral_score,
            report.scam_risk_score,
            report.flags.len()
        );
        report
    }
}

impl Default for TextHeuristicAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl BehavioralAnalyzer for TextHeuristicAnalyzer {
    fn analyze(&self, content: &str, content_type: ContentType) -> BehavioralReport {
        match content_type {
            ContentType::Text => self.analyze_text(content),
            ContentType::Video => BehavioralReport {
                behavioral_score: 0.0,
                scam_risk_score: VIDEO_SCAM_BASELINE,
                flags: vec!["Video metadata analysis requires specialized tools".to_string()],
            },
            ContentType::Image => BehavioralReport::empty(),
        }
    }
}

/// Phrases from `list` found in `lowered`, in list order.
fn matched_phrases<'a>(lowered: &str, list: &'a [String]) -> Vec<&'a str> {
    list.iter()
        .filter(|p| lowered.contains(p.as_str()))
        .map(|p| p.as_str())
        .collect()
}

/// More than three sentences whose word counts barely vary.
fn has_uniform_sentences(text: &str) -> bool {
    let sentences: Vec<&str> = text
        .split(|c| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.len() <= 3 {
        return false;
    }

    let lengths: Vec<f64> = sentences
        .iter()
        .map(|s| s.split_whitespace().count())
        .filter(|&n| n > 2)
        .map(|n| n as f64)
        .collect();
    if lengths.is_empty() {
        return false;
    }

    let n = lengths.len() as f64;
    let mean = lengths.iter().sum::<f64>() / n;
    let variance = lengths.iter().map(|l| (l - mean) * (l - mean)).sum::<f64>() / n;
    variance < UNIFORM_SENTENCE_VARIANCE
}
