//! # Policy Registry
//!
//! Explicit authorization table: which roles may perform each privileged
//! action directly, how often, and up to what amount.
//!
//! | Action | Roles | Cooldown | Scope | Max amount |
//! |--------|-------|----------|-------|-----------|
//! | `FREEZE_ACCOUNT` | compliance, admin | 0 | target | - |
//! | `UNFREEZE_ACCOUNT` | compliance, admin | 86 400 s after last freeze | target (fixed) | - |
//! | `SEIZE_UTXO` | admin | 0 | - | 10 000 000 000 |
//! | `REDEEM_STABLECOIN` | issuer | 3 600 s | actor | 100 000 000 000 |
//! | `ATTEST_RESERVE` | auditor | 21 600 s | global | - |

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::keys::cooldown_key;
use shared_types::{Role, Timestamp};

use crate::domain::errors::GovernanceError;
use crate::domain::multisig::MultisigConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GovernanceAction {
    FreezeAccount,
    UnfreezeAccount,
    SeizeUtxo,
    RedeemStablecoin,
    AttestReserve,
}

impl GovernanceAction {
    pub const ALL: [GovernanceAction; 5] = [
        GovernanceAction::FreezeAccount,
        GovernanceAction::UnfreezeAccount,
        GovernanceAction::SeizeUtxo,
        GovernanceAction::RedeemStablecoin,
        GovernanceAction::AttestReserve,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GovernanceAction::FreezeAccount => "FREEZE_ACCOUNT",
            GovernanceAction::UnfreezeAccount => "UNFREEZE_ACCOUNT",
            GovernanceAction::SeizeUtxo => "SEIZE_UTXO",
            GovernanceAction::RedeemStablecoin => "REDEEM_STABLECOIN",
            GovernanceAction::AttestReserve => "ATTEST_RESERVE",
        }
    }

    /// Signing context for the direct path.
    pub fn context(&self) -> &'static str {
        match self {
            GovernanceAction::FreezeAccount => "genusd.governance.freeze_account",
            GovernanceAction::UnfreezeAccount => "genusd.governance.unfreeze_account",
            GovernanceAction::SeizeUtxo => "genusd.governance.seize_utxo",
            GovernanceAction::RedeemStablecoin => "genusd.governance.redeem_stablecoin",
            GovernanceAction::AttestReserve => "genusd.governance.attest_reserve",
        }
    }

    /// Action whose last occurrence starts this action's cooldown.
    pub fn cooldown_anchor(&self) -> GovernanceAction {
        match self {
            GovernanceAction::UnfreezeAccount => GovernanceAction::FreezeAccount,
            other => *other,
        }
    }
}

impl fmt::Display for GovernanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a cooldown is counted per.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CooldownScope {
    None,
    Target,
    Actor,
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    pub roles: BTreeSet<Role>,
    pub cooldown_secs: u64,
    pub cooldown_scope: CooldownScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<u64>,
    /// Refuse the single-signature path; only an executed proposal may act.
    #[serde(default)]
    pub requires_multisig: bool,
}

impl PolicyRule {
    fn new(roles: &[Role], cooldown_secs: u64, cooldown_scope: CooldownScope, max_amount: Option<u64>) -> Self {
        Self {
            roles: roles.iter().copied().collect(),
            cooldown_secs,
            cooldown_scope,
            max_amount,
            requires_multisig: false,
        }
    }

    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.roles.is_empty() {
            return Err(GovernanceError::InvalidPolicy("rule must name at least one role".into()));
        }
        if self.max_amount == Some(0) {
            return Err(GovernanceError::InvalidPolicy("max amount must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRegistry {
    pub rules: BTreeMap<GovernanceAction, PolicyRule>,
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        use GovernanceAction::*;

        let staff = [Role::Compliance, Role::Admin];
        let rules = BTreeMap::from([
            (FreezeAccount, PolicyRule::new(&staff, 0, CooldownScope::Target, None)),
            (UnfreezeAccount, PolicyRule::new(&staff, 86_400, CooldownScope::Target, None)),
            (SeizeUtxo, PolicyRule::new(&[Role::Admin], 0, CooldownScope::None, Some(10_000_000_000))),
            (
                RedeemStablecoin,
                PolicyRule::new(&[Role::Issuer], 3_600, CooldownScope::Actor, Some(100_000_000_000)),
            ),
            (AttestReserve, PolicyRule::new(&[Role::Auditor], 21_600, CooldownScope::Global, None)),
        ]);
        Self { rules }
    }
}

impl PolicyRegistry {
    pub fn rule(&self, action: GovernanceAction) -> Result<&PolicyRule, GovernanceError> {
        self.rules
            .get(&action)
            .ok_or_else(|| GovernanceError::InvalidPolicy(format!("no rule for {action}")))
    }

    pub fn set_rule(&mut self, action: GovernanceAction, rule: PolicyRule) -> Result<(), GovernanceError> {
        rule.validate()?;
        self.rules.insert(action, rule);
        Ok(())
    }

    /// First role in `held` the rule for `action` accepts.
    pub fn permitted_role(&self, action: GovernanceAction, held: &[Role]) -> Result<Option<Role>, GovernanceError> {
        let rule = self.rule(action)?;
        Ok(held.iter().copied().find(|r| rule.roles.contains(r)))
    }

    pub fn check_amount(&self, action: GovernanceAction, amount: u64) -> Result<(), GovernanceError> {
        match self.rule(action)?.max_amount {
            Some(ceiling) if amount > ceiling => Err(GovernanceError::LimitExceeded {
                action,
                amount,
                ceiling,
            }),
            _ => Ok(()),
        }
    }

    /// Store key holding the last time `action` ran for this subject.
    ///
    /// Unfreeze always reads the target's freeze time, whatever scope
    /// either rule names.
    pub fn cooldown_key(&self, action: GovernanceAction, target: &str, actor: &str) -> Result<Option<String>, GovernanceError> {
        let scope = self.rule(action)?.cooldown_scope;
        if action.cooldown_anchor() != action {
            return Ok(Some(frozen_at_key(target)));
        }
        let name = action.as_str();
        Ok(match scope {
            CooldownScope::None => None,
            CooldownScope::Target => Some(cooldown_key(name, target)),
            CooldownScope::Actor => Some(cooldown_key(name, actor)),
            CooldownScope::Global => Some(cooldown_key(name, "GLOBAL")),
        })
    }

    /// Fails while `now` is inside the window opened at `last`.
    pub fn check_cooldown(
        &self,
        action: GovernanceAction,
        last: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let cooldown = self.rule(action)?.cooldown_secs;
        let Some(last) = last else {
            return Ok(());
        };
        let ready_at = last.saturating_add(cooldown);
        if now < ready_at {
            return Err(GovernanceError::CooldownViolation {
                action,
                remaining_secs: ready_at - now,
            });
        }
        Ok(())
    }
}

/// Store key holding when `target` was last frozen.
pub fn frozen_at_key(target: &str) -> String {
    cooldown_key(GovernanceAction::FreezeAccount.as_str(), target)
}

/// Change carried by a `POLICY_UPDATE` proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PolicyChange {
    SetRule {
        action: GovernanceAction,
        rule: PolicyRule,
    },
    SetMultisig {
        config: MultisigConfig,
    },
    /// Emergency halt of mint, transfer and burn.
    SetHalt {
        halted: bool,
    },
}

impl PolicyChange {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        match self {
            PolicyChange::SetRule { rule, .. } => rule.validate(),
            PolicyChange::SetMultisig { config } => config.validate(),
            PolicyChange::SetHalt { .. } => Ok(()),
        }
    }
}
