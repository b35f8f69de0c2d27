// crates/ecotrace-core/src/lib.rs
//
// ecotrace-core: Core types, error enum, and collaborator traits for the
// EcoTrace multi-model consensus engine.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the raw and normalized model outputs, the persisted Analysis
// record, and the store and behavioral-analyzer seams.

pub mod analysis;
pub mod error;
pub mod history;
pub mod model;
pub mod traits;
pub mod verdict;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use ecotrace_core::Analysis;`

// Verdict vocabulary
pub use verdict::{AgreementLevel, ContentType, Severity, Source, Verdict, AI_THRESHOLD};

// Model outputs
pub use model::{ConfidenceScale, ModelFamily, NormalizedOutput, RawModelOutput};

// Analysis record
pub use analysis::{Analysis, AnalysisContext, BehavioralReport, EvidenceItem, EvidenceKind};

// History paging
pub use history::HistoryFilter;

// Error type
pub use error::EcoTraceError;

// Traits
pub use traits::{AnalysisStore, BehavioralAnalyzer};
