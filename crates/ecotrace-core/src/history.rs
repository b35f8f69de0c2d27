// crates/ecotrace-core/src/history.rs

use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::error::EcoTraceError;
use crate::verdict::{ContentType, Verdict};

pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const MAX_HISTORY_LIMIT: usize = 100;

/// Filter and paging for listing a user's analyses (newest first).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryFilter {
    pub content_type: Option<ContentType>,
    pub verdict: Option<Verdict>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self {
            content_type: None,
            verdict: None,
            limit: DEFAULT_HISTORY_LIMIT,
            offset: 0,
        }
    }
}

impl HistoryFilter {
    /// Reject a limit outside `1..=100`.
    pub fn validate(&self) -> Result<(), EcoTraceError> {
        if self.limit == 0 || self.limit > MAX_HISTORY_LIMIT {
            return Err(EcoTraceError::InvalidInput(format!(
                "limit must be between 1 and {}, got {}",
                MAX_HISTORY_LIMIT, self.limit
            )));
        }
        Ok(())
    }

    pub fn matches(&self, analysis: &Analysis) -> bool {
        self.content_type.map_or(true, |ct| analysis.content_type == ct)
            && self.verdict.map_or(true, |v| analysis.final_verdict == v)
    }

    /// Filter, order newest first, then page. Shared by store backends.
    pub fn apply(&self, analyses: impl IntoIterator<Item = Analysis>) -> Vec<Analysis> {
        let mut matched: Vec<Analysis> = analyses.into_iter().filter(|a| self.matches(a)).collect();
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.request_id.cmp(&a.request_id))
        });
        matched.into_iter().skip(self.offset).take(self.limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_is_valid() {
        let filter = HistoryFilter::default();
        assert_eq!(filter.limit, 20);
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_limit_bounds() {
        let zero = HistoryFilter { limit: 0, ..Default::default() };
        assert!(zero.validate().is_err());
        let too_many = HistoryFilter { limit: 101, ..Default::default() };
        assert!(too_many.validate().is_err());
        let max = HistoryFilter { limit: 100, ..Default::default() };
        assert!(max.validate().is_ok());
    }
}
