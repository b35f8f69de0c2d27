// crates/ecotrace-consensus/src/config.rs
//
// Deployment-swappable configuration for the consensus pipeline.

use serde::{Deserialize, Serialize};

use ecotrace_core::EcoTraceError;

use crate::agreement::AgreementThresholds;
use crate::evidence::{DeceptionTable, SeverityTable};
use crate::weights::WeightTable;

/// Everything the pipeline looks up instead of hard-coding.
///
/// Every section is optional when deserialized; missing sections take the
/// built-in defaults. A `severity` or `deception` section replaces the
/// built-in table rather than extending it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsensusConfig {
    pub weights: WeightTable,
    pub agreement: AgreementThresholds,
    pub severity: SeverityTable,
    pub deception: DeceptionTable,
}

impl ConsensusConfig {
    pub fn validate(&self) -> Result<(), EcoTraceError> {
        self.weights.validate()?;
        self.agreement.validate()?;
        self.deception.validate()?;
        Ok(())
    }
}
