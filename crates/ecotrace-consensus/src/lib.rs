// crates/ecotrace-consensus/src/lib.rs
//
// ecotrace-consensus: Multi-model consensus for content-authenticity verdicts.
//
// Given the per-model verdicts collected for one piece of content, this crate
// computes a single calibrated verdict, an aggregate AI likelihood, an
// agreement level, ranked evidence, and a scam-risk score. The pipeline is
// deterministic, synchronous, and tolerant of missing or malformed models.

pub mod aggregator;
pub mod agreement;
pub mod assembler;
pub mod config;
pub mod engine;
pub mod evidence;
pub mod normalizer;
pub mod weights;

pub use aggregator::{aggregate, quantize, Consensus};
pub use agreement::{classify_agreement, AgreementThresholds};
pub use assembler::assemble;
pub use config::ConsensusConfig;
pub use engine::{ConsensusEngine, ConsensusOutcome};
pub use evidence::{synthesize, DeceptionTable, SeverityTable, Synthesis};
pub use normalizer::{normalize, normalize_batch, parse_raw_batch};
pub use weights::{resolve_weights, ContentWeights, FamilyWeights, WeightTable};
