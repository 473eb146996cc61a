//! # Outbound Ports (Dependencies)
//!
//! Mutations governance applies through other subsystems. Every method
//! works inside the caller's [`StagedState`], so the effect commits with
//! the proposal or action that caused it.

use gd_02_commitment_tracker::{CommitmentError, CommitmentRecord};
use gd_03_ledger_engine::{AccountRecord, LedgerError, LedgerReceipt, OutputSpec, Seizure, Utxo};
use shared_types::StagedState;

pub trait LedgerGateway: Send + Sync {
    fn mint(&self, state: &mut StagedState<'_>, issuer: &str, outputs: &[OutputSpec]) -> Result<LedgerReceipt, LedgerError>;

    fn load_utxo(&self, state: &StagedState<'_>, utxo_id: &str) -> Result<Utxo, LedgerError>;

    fn set_account_frozen(
        &self,
        state: &mut StagedState<'_>,
        account_id: &str,
        frozen: bool,
        by: &str,
        reason: Option<&str>,
    ) -> Result<AccountRecord, LedgerError>;

    fn set_utxo_frozen(
        &self,
        state: &mut StagedState<'_>,
        utxo_id: &str,
        frozen: bool,
        by: &str,
        reason: Option<&str>,
    ) -> Result<Utxo, LedgerError>;

    fn seize(
        &self,
        state: &mut StagedState<'_>,
        utxo_id: &str,
        vault_owner: &str,
        authority: &str,
        reason: &str,
    ) -> Result<Seizure, LedgerError>;

    fn redeem(
        &self,
        state: &mut StagedState<'_>,
        owner: &str,
        amount: u64,
        authority: &str,
        redemption_id: &str,
    ) -> Result<LedgerReceipt, LedgerError>;

    fn total_supply(&self, state: &StagedState<'_>) -> Result<u64, LedgerError>;

    fn set_halted(&self, state: &mut StagedState<'_>, halted: bool) -> Result<(), LedgerError>;
}

pub trait CommitmentGateway: Send + Sync {
    /// Mark a stored commitment used by the staged transaction.
    fn consume(&self, state: &mut StagedState<'_>, commitment: &str) -> Result<CommitmentRecord, CommitmentError>;

    /// Called once the state that consumed `commitment` has committed.
    fn settle(&self, commitment: &str);
}
