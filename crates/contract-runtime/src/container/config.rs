//! # Runtime Configuration
//!
//! Unified configuration for every engine plus the genesis key set.
//!
//! ## Requirements
//!
//! - The multisig threshold must be satisfiable (`1 <= required <= signers`)
//! - When genesis keys are supplied, every multisig signer must have one

use gd_03_ledger_engine::LedgerConfig;
use gd_04_governance::MultisigConfig;
use genusd_telemetry::TelemetryConfig;

use crate::errors::RuntimeError;
use crate::genesis::GenesisConfig;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Logging, metrics and audit buffer.
    pub telemetry: TelemetryConfig,
    /// Ledger limits and asset code.
    pub ledger: LedgerConfig,
    /// Governance signer set and threshold.
    pub multisig: MultisigConfig,
    /// Keys registered at start-up.
    pub genesis: GenesisConfig,
}

impl RuntimeConfig {
    /// Read every section from `GENUSD_*` environment variables.
    pub fn from_env() -> Result<Self, RuntimeError> {
        Ok(Self {
            telemetry: TelemetryConfig::from_env(),
            ledger: LedgerConfig::from_env(),
            multisig: MultisigConfig::from_env(),
            genesis: GenesisConfig::from_env()?,
        })
    }

    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.ledger.asset_code.trim().is_empty() {
            return Err(RuntimeError::Config("asset code must not be empty".into()));
        }
        if self.ledger.max_inputs == 0 || self.ledger.max_outputs == 0 {
            return Err(RuntimeError::Config("input and output limits must be positive".into()));
        }
        if self.ledger.large_mint_threshold == 0 {
            return Err(RuntimeError::Config("large mint threshold must be positive".into()));
        }

        self.multisig.validate()?;
        self.genesis.validate()?;

        if !self.genesis.is_empty() {
            if let Some(missing) = self.multisig.signers.iter().find(|s| !self.genesis.contains(s)) {
                return Err(RuntimeError::Config(format!(
                    "multisig signer {missing} has no genesis key"
                )));
            }
        }
        Ok(())
    }
}
