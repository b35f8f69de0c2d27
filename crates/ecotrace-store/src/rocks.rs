// crates/ecotrace-store/src/rocks.rs
//
// RocksDB-backed persistent storage for Analyses.
//
// Key format:
//   - Primary:   `analysis:{user_id}:{request_id}` -> JSON-serialized Analysis
//   - Secondary: `analysis_id:{user_id}:{id}` -> request id (index only)
//
// Every key is scoped by user, so a user can never reach another user's
// records through a lookup, listing, or delete.

use async_trait::async_trait;
use rocksdb::{DBWithThreadMode, MultiThreaded, Options};
use uuid::Uuid;

use ecotrace_core::error::EcoTraceError;
use ecotrace_core::history::HistoryFilter;
use ecotrace_core::traits::AnalysisStore;
use ecotrace_core::Analysis;

/// RocksDB wrapper implementing the `AnalysisStore` trait.
#[derive(Debug)]
pub struct RocksAnalysisStore {
    db: DBWithThreadMode<MultiThreaded>,
}

impl RocksAnalysisStore {
    /// Open a RocksDB database at the given filesystem path.
    ///
    /// Creates the database directory if it does not exist.
    pub fn open(path: &str) -> Result<Self, EcoTraceError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DBWithThreadMode::<MultiThreaded>::open(&opts, path)
            .map_err(|e| EcoTraceError::Storage(format!("Failed to open RocksDB at {}: {}", path, e)))?;

        tracing::debug!("Opened analysis store at {}", path);
        Ok(Self { db })
    }

    /// Primary key: `analysis:{user_id}:{request_id}`.
    fn analysis_key(user_id: &str, request_id: &Uuid) -> Vec<u8> {
        format!("analysis:{}:{}", user_id, request_id).into_bytes()
    }

    /// Secondary index key: `analysis_id:{user_id}:{id}`.
    fn id_key(user_id: &str, id: &Uuid) -> Vec<u8> {
        format!("analysis_id:{}:{}", user_id, id).into_bytes()
    }

    fn put_raw(&self, key: &[u8], value: &[u8]) -> Result<(), EcoTraceError> {
        self.db
            .put(key, value)
            .map_err(|e| EcoTraceError::Storage(format!("RocksDB put failed: {}", e)))
    }

    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EcoTraceError> {
        self.db
            .get(key)
            .map_err(|e| EcoTraceError::Storage(format!("RocksDB get failed: {}", e)))
    }

    fn delete_raw(&self, key: &[u8]) -> Result<(), EcoTraceError> {
        self.db
            .delete(key)
            .map_err(|e| EcoTraceError::Storage(format!("RocksDB delete failed: {}", e)))
    }

    /// Store an Analysis synchronously. Analyses are immutable, so an existing
    /// record under the same `(user_id, request_id)` is an error.
    pub fn save_analysis_sync(&self, analysis: &Analysis) -> Result<(), EcoTraceError> {
        if analysis.user_id.is_empty() {
            return Err(EcoTraceError::InvalidInput("user_id must not be empty".to_string()));
        }
        let key = Self::analysis_key(&analysis.user_id, &analysis.request_id);
        if self.get_raw(&key)?.is_some() {
            return Err(EcoTraceError::AlreadyExists(format!(
                "analysis for request {} of user {}",
                analysis.request_id, analysis.user_id
            )));
        }

        let json = serde_json::to_vec(analysis)?;
        self.put_raw(&key, &json)?;
        self.put_raw(
            &Self::id_key(&analysis.user_id, &analysis.id),
            analysis.request_id.to_string().as_bytes(),
        )?;
        Ok(())
    }

    /// Get an Analysis by request id without going through the async trait.
    pub fn get_analysis_sync(
        &self,
        user_id: &str,
        request_id: &Uuid,
    ) -> Result<Option<Analysis>, EcoTraceError> {
        match self.get_raw(&Self::analysis_key(user_id, request_id))? {
            Some(bytes) => {
                let analysis: Analysis = serde_json::from_slice(&bytes)?;
                Ok(Some(analysis))
            }
            None => Ok(None),
        }
    }

    /// Every Analysis stored for a user, in key order.
    fn scan_user(&self, user_id: &str) -> Result<Vec<Analysis>, EcoTraceError> {
        let prefix_str = format!("analysis:{}:", user_id);
        let prefix = prefix_str.as_bytes();
        let mut analyses = Vec::new();

        for item in self.db.prefix_iterator(prefix) {
            let (key, value) = item
                .map_err(|e| EcoTraceError::Storage(format!("RocksDB iteration error: {}", e)))?;

            if !key.starts_with(prefix) {
                break;
            }

            // Keys are written with the hyphenated form only. Any other suffix
            // (`x:<uuid>`, `urn:uuid:<uuid>`) belongs to a user whose id merely
            // starts with this one.
            let suffix = std::str::from_utf8(&key[prefix.len()..]).unwrap_or("");
            if !is_request_suffix(suffix) {
                continue;
            }
            let analysis: Analysis = serde_json::from_slice(&value)?;
            if analysis.user_id != user_id {
                continue;
            }
            analyses.push(analysis);
        }

        Ok(analyses)
    }
}

#[async_trait]
impl AnalysisStore for RocksAnalysisStore {
    async fn save_analysis(&self, analysis: &Analysis) -> Result<(), EcoTraceError> {
        self.save_analysis_sync(analysis)
    }

    async fn get_analysis(
        &self,
        user_id: &str,
        request_id: &Uuid,
    ) -> Result<Option<Analysis>, EcoTraceError> {
        self.get_analysis_sync(user_id, request_id)
    }

    async fn list_analyses(
        &self,
        user_id: &str,
        filter: &HistoryFilter,
    ) -> Result<Vec<Analysis>, EcoTraceError> {
        filter.validate()?;
        Ok(filter.apply(self.scan_user(user_id)?))
    }

    async fn delete_analysis(&self, user_id: &str, id: &Uuid) -> Result<bool, EcoTraceError> {
        let id_key = Self::id_key(user_id, id);
        let request_id = match self.get_raw(&id_key)? {
            Some(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                Uuid::parse_str(&text).map_err(|e| {
                    EcoTraceError::Storage(format!("Corrupt id index entry for {}: {}", id, e))
                })?
            }
            None => return Ok(false),
        };

        self.delete_raw(&Self::analysis_key(user_id, &request_id))?;
        self.delete_raw(&id_key)?;
        tracing::debug!("Deleted analysis {} (request {}) for user {}", id, request_id, user_id);
        Ok(true)
    }
}

/// True when `suffix` is a request id exactly as `analysis_key` writes it.
fn is_request_suffix(suffix: &str) -> bool {
    match Uuid::try_parse(suffix) {
        Ok(id) => id.hyphenated().to_string() == suffix,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_suffix_accepts_only_hyphenated_form() {
        let id = Uuid::from_u128(0x01a1_3e35_0000_4000_8000_0000_0000_0001);
        assert!(is_request_suffix(&id.to_string()));
        assert!(!is_request_suffix(&format!("urn:uuid:{}", id)));
        assert!(!is_request_suffix(&id.simple().to_string()));
        assert!(!is_request_suffix(&format!("x:{}", id)));
    }

    #[test]
    fn test_key_formats() {
        let id = Uuid::nil();
        assert_eq!(
            RocksAnalysisStore::analysis_key("alice", &id),
            format!("analysis:alice:{}", id).into_bytes()
        );
        assert_eq!(
            RocksAnalysisStore::id_key("alice", &id),
            format!("analysis_id:alice:{}", id).into_bytes()
        );
    }
}
