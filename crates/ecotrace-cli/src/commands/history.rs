// crates/ecotrace-cli/src/commands/history.rs
//
// `ecotrace history {list, get, delete}`: browse a user's stored analyses.

use clap::Subcommand;
use uuid::Uuid;

use ecotrace_core::history::DEFAULT_HISTORY_LIMIT;
use ecotrace_core::{AnalysisStore, ContentType, EcoTraceError, HistoryFilter, Verdict};

use crate::output::{render_analysis, render_history, OutputFormat};

/// History subcommands.
#[derive(Debug, Subcommand)]
pub enum HistoryCmd {
    /// List a user's analyses, newest first.
    List {
        #[arg(long)]
        user: String,
        /// Only analyses of this content type.
        #[arg(long)]
        content_type: Option<ContentType>,
        /// Only analyses with this verdict: ai_generated or real.
        #[arg(long)]
        verdict: Option<Verdict>,
        /// Page size (1-100).
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Show one analysis by its request id.
    Get {
        #[arg(long)]
        user: String,
        #[arg(long)]
        request_id: Uuid,
    },
    /// Delete one analysis by its internal id.
    Delete {
        #[arg(long)]
        user: String,
        #[arg(long)]
        id: Uuid,
    },
}

/// Run the history subcommand.
pub async fn run(
    cmd: &HistoryCmd,
    store: &dyn AnalysisStore,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        HistoryCmd::List {
            user,
            content_type,
            verdict,
            limit,
            offset,
        } => {
            let filter = HistoryFilter {
                content_type: *content_type,
                verdict: *verdict,
                limit: *limit,
                offset: *offset,
            };
            let analyses = store.list_analyses(user, &filter).await?;
            println!("{}", render_history(&analyses, format));
        }
        HistoryCmd::Get { user, request_id } => {
            let analysis = store
                .get_analysis(user, request_id)
                .await?
                .ok_or_else(|| EcoTraceError::NotFound(format!("analysis for request {}", request_id)))?;
            println!("{}", render_analysis(&analysis, format));
        }
        HistoryCmd::Delete { user, id } => {
            if !store.delete_analysis(user, id).await? {
                return Err(EcoTraceError::NotFound(format!("analysis {}", id)).into());
            }
            println!("Deleted analysis {}", id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecotrace_consensus::ConsensusEngine;
    use ecotrace_core::{AnalysisContext, BehavioralReport, RawModelOutput, Source};
    use ecotrace_store::InMemoryAnalysisStore;

    async fn seeded_store(user: &str) -> (InMemoryAnalysisStore, ecotrace_core::Analysis) {
        let store = InMemoryAnalysisStore::new();
        let engine = ConsensusEngine::default();
        let ctx = AnalysisContext::new(user, ContentType::Image, Source::Web);
        let raws = vec![RawModelOutput::new("gpt-4o-vision", Verdict::Real, 0.8)];
        let analysis = engine.analyze(&raws, &BehavioralReport::empty(), &ctx).unwrap();
        store.save_analysis(&analysis).await.unwrap();
        (store, analysis)
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let (store, analysis) = seeded_store("alice").await;
        let list = HistoryCmd::List {
            user: "alice".to_string(),
            content_type: Some(ContentType::Image),
            verdict: None,
            limit: DEFAULT_HISTORY_LIMIT,
            offset: 0,
        };
        assert!(run(&list, &store, OutputFormat::Table).await.is_ok());

        let get = HistoryCmd::Get {
            user: "alice".to_string(),
            request_id: analysis.request_id,
        };
        assert!(run(&get, &store, OutputFormat::Json).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_other_user_is_not_found() {
        let (store, analysis) = seeded_store("alice").await;
        let get = HistoryCmd::Get {
            user: "bob".to_string(),
            request_id: analysis.request_id,
        };
        assert!(run(&get, &store, OutputFormat::Table).await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, analysis) = seeded_store("alice").await;
        let delete = HistoryCmd::Delete {
            user: "alice".to_string(),
            id: analysis.id,
        };
        assert!(run(&delete, &store, OutputFormat::Table).await.is_ok());
        assert!(store.is_empty().unwrap());
        assert!(run(&delete, &store, OutputFormat::Table).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_limit_rejected() {
        let (store, _) = seeded_store("alice").await;
        let list = HistoryCmd::List {
            user: "alice".to_string(),
            content_type: None,
            verdict: None,
            limit: 500,
            offset: 0,
        };
        assert!(run(&list, &store, OutputFormat::Table).await.is_err());
    }
}
