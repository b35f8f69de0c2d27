// crates/ecotrace-cli/src/commands/mod.rs
//
// Command module declarations for the EcoTrace CLI.

pub mod analyze;
pub mod history;
