// crates/ecotrace-signals/src/lib.rs
//
// ecotrace-signals: Behavioral signals for the EcoTrace consensus engine.
//
// Produces the behavioral score, scam indicators, and behavioral flags that
// the consensus engine passes through alongside its own verdict. Nothing
// here looks at model outputs; the signals are orthogonal by construction.

pub mod text;

pub use text::TextHeuristicAnalyzer;
