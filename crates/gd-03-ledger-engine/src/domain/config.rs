//! Ledger engine configuration.

use std::env;

pub const DEFAULT_ASSET_CODE: &str = "GENUSD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Asset code stamped on every output.
    pub asset_code: String,

    /// Largest total a direct mint may create; bigger mints need a
    /// `MINT_LARGE` proposal.
    pub large_mint_threshold: u64,

    pub max_inputs: usize,

    pub max_outputs: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            asset_code: DEFAULT_ASSET_CODE.to_string(),
            large_mint_threshold: 100_000_000_000,
            max_inputs: 256,
            max_outputs: 256,
        }
    }
}

impl LedgerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GENUSD_ASSET_CODE` (default: GENUSD)
    /// - `GENUSD_LARGE_MINT_THRESHOLD` (default: 100000000000)
    /// - `GENUSD_MAX_INPUTS` (default: 256)
    /// - `GENUSD_MAX_OUTPUTS` (default: 256)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            asset_code: env::var("GENUSD_ASSET_CODE").unwrap_or(defaults.asset_code),
            large_mint_threshold: env::var("GENUSD_LARGE_MINT_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.large_mint_threshold),
            max_inputs: env::var("GENUSD_MAX_INPUTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_inputs),
            max_outputs: env::var("GENUSD_MAX_OUTPUTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_outputs),
        }
    }
}
