//! # Inbound Ports (API)
//!
//! Every mutating call is atomic: it commits all of its writes or none.

use crate::domain::entities::{AccountRecord, LedgerReceipt, OutputSpec, Utxo};
use crate::domain::errors::LedgerError;
use crate::domain::invariants::SupplyAudit;

pub trait LedgerApi: Send + Sync {
    /// Create new outputs and grow total supply.
    ///
    /// `issuer` must hold the issuer role and sign the mint message.
    ///
    /// # Errors
    /// - `EmptyOutputs`, `ZeroAmount`, `MissingOwner` on malformed outputs
    /// - `Authority` on role or signature failure
    /// - `LimitExceeded` above the direct mint threshold
    fn mint(&self, outputs: &[OutputSpec], issuer: &str, signature: &[u8]) -> Result<LedgerReceipt, LedgerError>;

    /// Spend `inputs` owned by `sender` into `outputs`.
    ///
    /// # Errors
    /// - `UtxoNotFound`, `NotActive`, `NotOwner` per input
    /// - `ConservationViolation` when sums differ
    /// - `KycLimitExceeded` when the sender's tier allowance is used up
    fn transfer(
        &self,
        inputs: &[String],
        outputs: &[OutputSpec],
        sender: &str,
        signature: &[u8],
    ) -> Result<LedgerReceipt, LedgerError>;

    /// Destroy `inputs` owned by `owner` and shrink total supply.
    fn burn(&self, inputs: &[String], owner: &str, signature: &[u8]) -> Result<LedgerReceipt, LedgerError>;

    /// Transfer `amount` using the sender's active outputs in id order,
    /// returning change to the sender.
    fn simple_transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount: u64,
        signature: &[u8],
    ) -> Result<LedgerReceipt, LedgerError>;

    /// Burn `amount` from the owner's active outputs, returning change.
    fn simple_burn(&self, owner: &str, amount: u64, signature: &[u8]) -> Result<LedgerReceipt, LedgerError>;

    /// Sum of `owner`'s active outputs.
    fn get_balance(&self, owner: &str) -> Result<u64, LedgerError>;

    fn get_utxo(&self, id: &str) -> Result<Utxo, LedgerError>;

    /// Every output ever created for `owner`, any status.
    fn list_utxos(&self, owner: &str) -> Result<Vec<Utxo>, LedgerError>;

    fn get_total_supply(&self) -> Result<u64, LedgerError>;

    fn get_account(&self, account_id: &str) -> Result<AccountRecord, LedgerError>;

    /// Compare `TOTAL_SUPPLY` with outstanding outputs.
    fn audit_supply(&self) -> Result<SupplyAudit, LedgerError>;
}
