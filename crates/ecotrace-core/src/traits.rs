// crates/ecotrace-core/src/traits.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::analysis::{Analysis, BehavioralReport};
use crate::error::EcoTraceError;
use crate::history::HistoryFilter;
use crate::verdict::ContentType;

/// Trait for persistent Analysis storage, keyed by `(user_id, request_id)`.
///
/// Implemented by ecotrace-store (RocksDB and in-memory backends).
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Persist a new Analysis. Fails with `AlreadyExists` if the user already
    /// has an Analysis under the same request id.
    async fn save_analysis(&self, analysis: &Analysis) -> Result<(), EcoTraceError>;

    /// Point lookup by request id, scoped to a user.
    async fn get_analysis(
        &self,
        user_id: &str,
        request_id: &Uuid,
    ) -> Result<Option<Analysis>, EcoTraceError>;

    /// A user's analyses matching the filter, newest first.
    async fn list_analyses(
        &self,
        user_id: &str,
        filter: &HistoryFilter,
    ) -> Result<Vec<Analysis>, EcoTraceError>;

    /// Delete by internal id, scoped to a user. Returns whether a record was removed.
    async fn delete_analysis(&self, user_id: &str, id: &Uuid) -> Result<bool, EcoTraceError>;
}

/// Trait for the behavioral-signal collaborator.
///
/// Implemented by ecotrace-signals.
pub trait BehavioralAnalyzer: Send + Sync {
    /// Inspect submitted content and report behavioral and scam indicators.
    fn analyze(&self, content: &str, content_type: ContentType) -> BehavioralReport;
}
