// crates/ecotrace-store/src/memory.rs
//
// In-memory Analysis store implementing the `AnalysisStore` trait.
//
// Same contract as the RocksDB store, held in a HashMap behind an RwLock.
// Nothing survives the process; used by tests and one-shot CLI runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use ecotrace_core::error::EcoTraceError;
use ecotrace_core::history::HistoryFilter;
use ecotrace_core::traits::AnalysisStore;
use ecotrace_core::Analysis;

/// In-memory Analysis store keyed by `(user_id, request_id)`.
#[derive(Debug, Default)]
pub struct InMemoryAnalysisStore {
    analyses: RwLock<HashMap<(String, Uuid), Analysis>>,
}

impl InMemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of analyses held across all users.
    pub fn len(&self) -> Result<usize, EcoTraceError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, EcoTraceError> {
        Ok(self.len()? == 0)
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<(String, Uuid), Analysis>>, EcoTraceError> {
        self.analyses
            .read()
            .map_err(|e| EcoTraceError::Storage(format!("Lock poisoned: {}", e)))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<(String, Uuid), Analysis>>, EcoTraceError> {
        self.analyses
            .write()
            .map_err(|e| EcoTraceError::Storage(format!("Lock poisoned: {}", e)))
    }
}

#[async_trait]
impl AnalysisStore for InMemoryAnalysisStore {
    async fn save_analysis(&self, analysis: &Analysis) -> Result<(), EcoTraceError> {
        if analysis.user_id.is_empty() {
            return Err(EcoTraceError::InvalidInput("user_id must not be empty".to_string()));
        }
        let key = (analysis.user_id.clone(), analysis.request_id);
        let mut analyses = self.write()?;
        if analyses.contains_key(&key) {
            return Err(EcoTraceError::AlreadyExists(format!(
                "analysis for request {} of user {}",
                analysis.request_id, analysis.user_id
            )));
        }
        analyses.insert(key, analysis.clone());
        Ok(())
    }

    async fn get_analysis(
        &self,
        user_id: &str,
        request_id: &Uuid,
    ) -> Result<Option<Analysis>, EcoTraceError> {
        Ok(self.read()?.get(&(user_id.to_string(), *request_id)).cloned())
    }

    async fn list_analyses(
        &self,
        user_id: &str,
        filter: &HistoryFilter,
    ) -> Result<Vec<Analysis>, EcoTraceError> {
        filter.validate()?;
        let analyses = self.read()?;
        Ok(filter.apply(
            analyses
                .values()
                .filter(|a| a.user_id == user_id)
                .cloned(),
        ))
    }

    async fn delete_analysis(&self, user_id: &str, id: &Uuid) -> Result<bool, EcoTraceError> {
        let mut analyses = self.write()?;
        let key = analyses
            .iter()
            .find(|((owner, _), a)| owner == user_id && a.id == *id)
            .map(|(k, _)| k.clone());
        Ok(match key {
            Some(k) => analyses.remove(&k).is_some(),
            None => false,
        })
    }
}
