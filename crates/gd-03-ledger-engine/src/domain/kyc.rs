//! KYC tiers and daily outflow limits.
//!
//! The tier is read from the `kyc_tag` carried on a holder's outputs.
//! Untagged holdings are not tier-limited.

use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::Timestamp;

pub const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycTier {
    Basic,
    Standard,
    Premium,
}

impl KycTier {
    /// Parse a tag such as `basic`, `KYC_STANDARD` or `premium`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        let tag = tag.strip_prefix("kyc_").unwrap_or(&tag);
        match tag {
            "basic" => Some(KycTier::Basic),
            "standard" => Some(KycTier::Standard),
            "premium" => Some(KycTier::Premium),
            _ => None,
        }
    }

    /// Daily outflow ceiling in the smallest unit; `None` is unlimited.
    pub fn daily_limit(&self) -> Option<u64> {
        match self {
            KycTier::Basic => Some(100_000),
            KycTier::Standard => Some(1_000_000),
            KycTier::Premium => None,
        }
    }
}

impl fmt::Display for KycTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KycTier::Basic => "basic",
            KycTier::Standard => "standard",
            KycTier::Premium => "premium",
        };
        f.write_str(s)
    }
}

/// Most restrictive tier among `tags`; `None` when none parse.
pub fn effective_tier<'a>(tags: impl IntoIterator<Item = Option<&'a str>>) -> Option<KycTier> {
    tags.into_iter().flatten().filter_map(KycTier::from_tag).min()
}

/// Unix day number used in usage keys.
pub fn day_of(ts: Timestamp) -> u64 {
    ts / SECONDS_PER_DAY
}
