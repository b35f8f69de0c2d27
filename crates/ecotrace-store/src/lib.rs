// crates/ecotrace-store/src/lib.rs
//
// ecotrace-store: Storage layer for EcoTrace analyses.
//
// Provides RocksDB-backed persistence for completed analyses and an
// in-memory store with the same contract for tests and ephemeral runs.

pub mod memory;
pub mod rocks;

pub use memory::InMemoryAnalysisStore;
pub use rocks::RocksAnalysisStore;
