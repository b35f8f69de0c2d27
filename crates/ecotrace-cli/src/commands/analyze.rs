// crates/ecotrace-cli/src/commands/analyze.rs
//
// `ecotrace analyze`: run the consensus pipeline over collected model outputs.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use uuid::Uuid;

use ecotrace_consensus::{parse_raw_batch, ConsensusEngine};
use ecotrace_core::{Analysis, AnalysisContext, AnalysisStore, BehavioralAnalyzer, ContentType, Source};

use crate::output::{render_analysis, OutputFormat};

/// Owner recorded on analyses run without `--user`.
const LOCAL_USER: &str = "local";

/// Arguments for `ecotrace analyze`.
#[derive(Debug, Args)]
pub struct AnalyzeCmd {
    /// JSON file holding an array of raw model outputs.
    #[arg(long)]
    pub input: PathBuf,
    /// Content type: image, text, or video.
    #[arg(long)]
    pub content_type: ContentType,
    /// Submission surface: web or extension.
    #[arg(long, default_value = "web")]
    pub source: String,
    /// File with the submitted text, fed to the behavioral heuristics.
    #[arg(long)]
    pub text: Option<PathBuf>,
    /// Owner of the analysis. When set, the result is persisted.
    #[arg(long)]
    pub user: Option<String>,
    /// Correlation id for the request (default: freshly generated).
    #[arg(long)]
    pub request_id: Option<Uuid>,
}

/// Build the Analysis for a command and persist it if a store is given.
pub async fn execute(
    cmd: &AnalyzeCmd,
    engine: &ConsensusEngine,
    analyzer: &dyn BehavioralAnalyzer,
    store: Option<&dyn AnalysisStore>,
) -> Result<Analysis, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(&cmd.input)?;
    let raws = parse_raw_batch(&json)?;

    let content = match &cmd.text {
        Some(path) => fs::read_to_string(path)?,
        None => String::new(),
    };
    let behavioral = analyzer.analyze(&content, cmd.content_type);

    let user_id = cmd.user.clone().unwrap_or_else(|| LOCAL_USER.to_string());
    let mut ctx = AnalysisContext::new(user_id, cmd.content_type, Source::parse_or_default(&cmd.source));
    if let Some(request_id) = cmd.request_id {
        ctx.request_id = request_id;
    }

    let analysis = engine.analyze(&raws, &behavioral, &ctx)?;

    if let Some(store) = store {
        store.save_analysis(&analysis).await?;
        tracing::info!("Stored analysis {} for user {}", analysis.id, analysis.user_id);
    }
    Ok(analysis)
}

/// Run the analyze command and print the result.
pub async fn run(
    cmd: &AnalyzeCmd,
    engine: &ConsensusEngine,
    analyzer: &dyn BehavioralAnalyzer,
    store: Option<&dyn AnalysisStore>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let analysis = execute(cmd, engine, analyzer, store).await?;
    println!("{}", render_analysis(&analysis, format));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecotrace_core::{EvidenceKind, HistoryFilter, Verdict};
    use ecotrace_signals::TextHeuristicAnalyzer;
    use ecotrace_store::InMemoryAnalysisStore;

    fn write_temp(label: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ecotrace_cli_{}_{}", label, Uuid::now_v7()));
        fs::write(&path, contents).unwrap();
        path
    }

    fn cmd(input: PathBuf, content_type: ContentType) -> AnalyzeCmd {
        AnalyzeCmd {
            input,
            content_type,
            source: "web".to_string(),
            text: None,
            user: None,
            request_id: None,
        }
    }

    const IMAGE_OUTPUTS: &str = r#"[
        {"model": "openai/gpt-4o-vision", "verdict": "ai_generated", "confidence": 0.9,
         "reasons": ["Unnatural skin texture on the left cheek"], "structural_flags": ["no_exif"]},
        {"model": "advanced-cnn-classifier", "verdict": "ai_generated", "confidence": 0.8},
        {"model": "ela-forensics", "verdict": "bogus", "confidence": 0.7},
        "not an object"
    ]"#;

    #[tokio::test]
    async fn test_execute_image_without_store() {
        let input = write_temp("image", IMAGE_OUTPUTS);
        let engine = ConsensusEngine::default();
        let analyzer = TextHeuristicAnalyzer::new();

        let analysis = execute(&cmd(input.clone(), ContentType::Image), &engine, &analyzer, None)
            .await
            .unwrap();
        assert_eq!(analysis.final_verdict, Verdict::AiGenerated);
        assert_eq!(analysis.user_id, LOCAL_USER);
        assert_eq!(analysis.model_outputs.len(), 2);
        assert!(analysis
            .evidence
            .iter()
            .any(|e| e.kind == EvidenceKind::Structural));
        let _ = fs::remove_file(input);
    }

    #[tokio::test]
    async fn test_execute_text_persists_with_user() {
        let input = write_temp(
            "text",
            r#"[{"model": "gpt-4o", "verdict": "real", "confidence": 0.7}]"#,
        );
        let text = write_temp(
            "text_body",
            "URGENT: verify your account now or click here to keep access.",
        );
        let request_id = Uuid::now_v7();
        let mut command = cmd(input.clone(), ContentType::Text);
        command.text = Some(text.clone());
        command.user = Some("alice".to_string());
        command.request_id = Some(request_id);
        command.source = "extension".to_string();

        let engine = ConsensusEngine::default();
        let analyzer = TextHeuristicAnalyzer::new();
        let store = InMemoryAnalysisStore::new();
        let analysis = execute(&command, &engine, &analyzer, Some(&store)).await.unwrap();

        assert_eq!(analysis.request_id, request_id);
        assert_eq!(analysis.source, Source::Extension);
        assert!(analysis.scam_risk_score > 0.0);
        let stored = store.list_analyses("alice", &HistoryFilter::default()).await.unwrap();
        assert_eq!(stored, vec![analysis]);

        // Same request id again is rejected.
        assert!(execute(&command, &engine, &analyzer, Some(&store)).await.is_err());
        let _ = fs::remove_file(input);
        let _ = fs::remove_file(text);
    }

    #[tokio::test]
    async fn test_execute_no_usable_outputs_fails() {
        let input = write_temp("empty", "[]");
        let engine = ConsensusEngine::default();
        let analyzer = TextHeuristicAnalyzer::new();
        let result = execute(&cmd(input.clone(), ContentType::Video), &engine, &analyzer, None).await;
        assert!(result.is_err());
        let _ = fs::remove_file(input);
    }
}
