//! Threshold configuration for proposals.

use std::collections::BTreeSet;
use std::env;

use serde::{Deserialize, Serialize};

use crate::domain::errors::GovernanceError;

pub const DEFAULT_PROPOSAL_TTL_SECS: u64 = 86_400;

/// `required_signatures`-of-`signers` with a proposal lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigConfig {
    pub signers: BTreeSet<String>,
    pub required_signatures: usize,
    pub proposal_ttl_secs: u64,
}

impl Default for MultisigConfig {
    fn default() -> Self {
        Self {
            signers: ["admin", "compliance", "auditor"].into_iter().map(String::from).collect(),
            required_signatures: 2,
            proposal_ttl_secs: DEFAULT_PROPOSAL_TTL_SECS,
        }
    }
}

impl MultisigConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GENUSD_MULTISIG_SIGNERS`: comma-separated identifiers (default: admin,compliance,auditor)
    /// - `GENUSD_MULTISIG_REQUIRED`: threshold (default: 2)
    /// - `GENUSD_PROPOSAL_TTL_SECS`: proposal lifetime (default: 86400)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            signers: env::var("GENUSD_MULTISIG_SIGNERS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or(defaults.signers),
            required_signatures: env::var("GENUSD_MULTISIG_REQUIRED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.required_signatures),
            proposal_ttl_secs: env::var("GENUSD_PROPOSAL_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.proposal_ttl_secs),
        }
    }

    /// `1 <= required_signatures <= signers` and a positive TTL.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.signers.iter().any(|s| s.trim().is_empty()) {
            return Err(GovernanceError::InvalidMultisig("empty signer identifier".into()));
        }
        if self.required_signatures == 0 || self.required_signatures > self.signers.len() {
            return Err(GovernanceError::InvalidMultisig(format!(
                "required {} of {} signers",
                self.required_signatures,
                self.signers.len()
            )));
        }
        if self.proposal_ttl_secs == 0 {
            return Err(GovernanceError::InvalidMultisig("proposal TTL must be positive".into()));
        }
        Ok(())
    }

    pub fn is_signer(&self, identifier: &str) -> bool {
        self.signers.contains(identifier)
    }
}
