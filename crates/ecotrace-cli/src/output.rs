// crates/ecotrace-cli/src/output.rs
//
// Output formatting utilities for the EcoTrace CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use tabled::{Table, Tabled};

use ecotrace_core::Analysis;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Family")]
    family: &'static str,
    #[tabled(rename = "Verdict")]
    verdict: &'static str,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

#[derive(Tabled)]
struct EvidenceRow {
    #[tabled(rename = "Severity")]
    severity: &'static str,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Description")]
    description: String,
}

/// A row in the history listing.
#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Request")]
    request_id: String,
    #[tabled(rename = "Type")]
    content_type: &'static str,
    #[tabled(rename = "Verdict")]
    verdict: &'static str,
    #[tabled(rename = "AI Likelihood")]
    ai_likelihood: String,
    #[tabled(rename = "Agreement")]
    agreement: &'static str,
    #[tabled(rename = "Created")]
    created_at: String,
}

/// Render one Analysis: summary, per-model breakdown, then evidence.
pub fn render_analysis(analysis: &Analysis, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return format_json(analysis);
    }

    let summary = vec![
        SummaryRow { field: "ID", value: analysis.id.to_string() },
        SummaryRow { field: "Request", value: analysis.request_id.to_string() },
        SummaryRow { field: "Content type", value: analysis.content_type.to_string() },
        SummaryRow { field: "Verdict", value: analysis.final_verdict.to_string() },
        SummaryRow { field: "AI likelihood", value: format!("{:.4}", analysis.ai_likelihood) },
        SummaryRow { field: "Agreement", value: analysis.agreement_level.as_str().to_string() },
        SummaryRow { field: "Scam risk", value: format!("{:.4}", analysis.scam_risk_score) },
        SummaryRow { field: "Behavioral", value: format!("{:.4}", analysis.behavioral_score) },
        SummaryRow { field: "Source", value: analysis.source.as_str().to_string() },
        SummaryRow { field: "Created", value: analysis.created_at.to_rfc3339() },
    ];

    let models: Vec<ModelRow> = analysis
        .model_outputs
        .iter()
        .map(|o| ModelRow {
            model: o.model.clone(),
            family: o.family.as_str(),
            verdict: o.verdict.as_str(),
            confidence: format!("{:.3}", o.confidence),
            score: format!("{:.3}", o.normalized_score),
            weight: format!("{:.3}", o.weight),
        })
        .collect();

    let mut out = format_table(&summary);
    out.push_str("\n\n");
    out.push_str(&format_table(&models));

    if !analysis.evidence.is_empty() {
        let evidence: Vec<EvidenceRow> = analysis
            .evidence
            .iter()
            .map(|e| EvidenceRow {
                severity: e.severity.as_str(),
                kind: e.kind.as_str(),
                description: e.description.clone(),
            })
            .collect();
        out.push_str("\n\n");
        out.push_str(&format_table(&evidence));
    }
    out
}

/// Render a page of history, newest first.
pub fn render_history(analyses: &[Analysis], format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return format_json(&analyses);
    }
    if analyses.is_empty() {
        return "No analyses found.".to_string();
    }

    let rows: Vec<HistoryRow> = analyses
        .iter()
        .map(|a| HistoryRow {
            id: a.id.to_string(),
            request_id: a.request_id.to_string(),
            content_type: a.content_type.as_str(),
            verdict: a.final_verdict.as_str(),
            ai_likelihood: format!("{:.4}", a.ai_likelihood),
            agreement: a.agreement_level.as_str(),
            created_at: a.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();
    format_table(&rows)
}
