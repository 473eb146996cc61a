//! Signed message layout for ledger operations.
//!
//! `GENUSD/{OP}/v1|{tx_id}|{actor}|{sha3(payload json)}`, verified under
//! context `genusd.ledger.{op}`. Binding the host transaction id means a
//! signature authorises exactly one transaction.

use serde::Serialize;
use shared_types::hashing::canonical_hash;
use shared_types::StoreError;

use crate::domain::entities::OutputSpec;
use crate::domain::errors::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerAction {
    Mint,
    Transfer,
    Burn,
    SimpleTransfer,
    SimpleBurn,
}

impl LedgerAction {
    pub fn tag(&self) -> &'static str {
        match self {
            LedgerAction::Mint => "MINT",
            LedgerAction::Transfer => "TRANSFER",
            LedgerAction::Burn => "BURN",
            LedgerAction::SimpleTransfer => "SIMPLE_TRANSFER",
            LedgerAction::SimpleBurn => "SIMPLE_BURN",
        }
    }

    pub fn context(&self) -> &'static str {
        match self {
            LedgerAction::Mint => "genusd.ledger.mint",
            LedgerAction::Transfer => "genusd.ledger.transfer",
            LedgerAction::Burn => "genusd.ledger.burn",
            LedgerAction::SimpleTransfer => "genusd.ledger.simple_transfer",
            LedgerAction::SimpleBurn => "genusd.ledger.simple_burn",
        }
    }
}

#[derive(Serialize)]
struct MintPayload<'a> {
    outputs: &'a [OutputSpec],
}

#[derive(Serialize)]
struct TransferPayload<'a> {
    inputs: &'a [String],
    outputs: &'a [OutputSpec],
}

#[derive(Serialize)]
struct BurnPayload<'a> {
    inputs: &'a [String],
}

#[derive(Serialize)]
struct SimpleTransferPayload<'a> {
    recipient: &'a str,
    amount: u64,
}

#[derive(Serialize)]
struct SimpleBurnPayload {
    amount: u64,
}

fn signing_message<T: Serialize>(
    action: LedgerAction,
    tx_id: &str,
    actor: &str,
    payload: &T,
) -> Result<Vec<u8>, LedgerError> {
    let digest = canonical_hash(payload).map_err(|e| StoreError::Encode {
        key: action.tag().to_string(),
        reason: e.to_string(),
    })?;
    Ok(format!("GENUSD/{}/v1|{tx_id}|{actor}|{digest}", action.tag()).into_bytes())
}

pub fn mint_message(tx_id: &str, issuer: &str, outputs: &[OutputSpec]) -> Result<Vec<u8>, LedgerError> {
    signing_message(LedgerAction::Mint, tx_id, issuer, &MintPayload { outputs })
}

pub fn transfer_message(
    tx_id: &str,
    sender: &str,
    inputs: &[String],
    outputs: &[OutputSpec],
) -> Result<Vec<u8>, LedgerError> {
    signing_message(LedgerAction::Transfer, tx_id, sender, &TransferPayload { inputs, outputs })
}

pub fn burn_message(tx_id: &str, owner: &str, inputs: &[String]) -> Result<Vec<u8>, LedgerError> {
    signing_message(LedgerAction::Burn, tx_id, owner, &BurnPayload { inputs })
}

pub fn simple_transfer_message(
    tx_id: &str,
    sender: &str,
    recipient: &str,
    amount: u64,
) -> Result<Vec<u8>, LedgerError> {
    signing_message(
        LedgerAction::SimpleTransfer,
        tx_id,
        sender,
        &SimpleTransferPayload { recipient, amount },
    )
}

pub fn simple_burn_message(tx_id: &str, owner: &str, amount: u64) -> Result<Vec<u8>, LedgerError> {
    signing_message(LedgerAction::SimpleBurn, tx_id, owner, &SimpleBurnPayload { amount })
}
