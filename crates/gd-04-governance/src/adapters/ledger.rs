//! [`LedgerGateway`] over the ledger engine.

use gd_03_ledger_engine::domain::utxo_set;
use gd_03_ledger_engine::{AccountRecord, LedgerEngine, LedgerError, LedgerReceipt, OutputSpec, Seizure, Utxo};
use shared_types::StagedState;

use crate::ports::outbound::LedgerGateway;

impl LedgerGateway for LedgerEngine {
    fn mint(&self, state: &mut StagedState<'_>, issuer: &str, outputs: &[OutputSpec]) -> Result<LedgerReceipt, LedgerError> {
        self.mint_in(state, issuer, outputs)
    }

    fn load_utxo(&self, state: &StagedState<'_>, utxo_id: &str) -> Result<Utxo, LedgerError> {
        utxo_set::load_utxo(state, utxo_id)
    }

    fn set_account_frozen(
        &self,
        state: &mut StagedState<'_>,
        account_id: &str,
        frozen: bool,
        by: &str,
        reason: Option<&str>,
    ) -> Result<AccountRecord, LedgerError> {
        self.set_account_frozen_in(state, account_id, frozen, by, reason)
    }

    fn set_utxo_frozen(
        &self,
        state: &mut StagedState<'_>,
        utxo_id: &str,
        frozen: bool,
        by: &str,
        reason: Option<&str>,
    ) -> Result<Utxo, LedgerError> {
        self.set_utxo_frozen_in(state, utxo_id, frozen, by, reason)
    }

    fn seize(
        &self,
        state: &mut StagedState<'_>,
        utxo_id: &str,
        vault_owner: &str,
        authority: &str,
        reason: &str,
    ) -> Result<Seizure, LedgerError> {
        self.seize_in(state, utxo_id, vault_owner, authority, reason)
    }

    fn redeem(
        &self,
        state: &mut StagedState<'_>,
        owner: &str,
        amount: u64,
        authority: &str,
        redemption_id: &str,
    ) -> Result<LedgerReceipt, LedgerError> {
        self.redeem_in(state, owner, amount, authority, redemption_id)
    }

    fn total_supply(&self, state: &StagedState<'_>) -> Result<u64, LedgerError> {
        utxo_set::read_supply(state)
    }

    fn set_halted(&self, state: &mut StagedState<'_>, halted: bool) -> Result<(), LedgerError> {
        self.set_halted_in(state, halted)
    }
}
