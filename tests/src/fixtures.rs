//! Fully wired engines over one in-memory store.
//!
//! Signatures use the digest gateway so scenarios run fast; the Dilithium
//! path is covered by [`dilithium_contract`].

use std::sync::Arc;

use contract_runtime::{GenesisConfig, GenesisKey, GenusdContract, GenusdServices, RuntimeConfig, RuntimeDependencies};
use gd_01_signature_verification::{DilithiumMode, DilithiumSigner};
use gd_02_commitment_tracker::{CommitmentTracker, TranscriptVerifier};
use gd_03_ledger_engine::domain::messages;
use gd_03_ledger_engine::{LedgerAction, LedgerApi, LedgerConfig, LedgerEngine, LedgerError, LedgerReceipt, OutputSpec};
use gd_04_governance::{
    direct_action_message, ActionOutcome, ActionRequest, ExecutionResult, GovernanceApi, GovernanceDependencies,
    GovernanceEngine, GovernanceError, GovernanceProposal, MultisigConfig, ProposalPayload, APPROVE_CONTEXT,
    REJECT_CONTEXT,
};
use genusd_telemetry::TelemetryAuditSink;
use shared_types::test_utils::{digest_sign, DigestGateway};
use shared_types::{InMemoryStateStore, ManualTimeSource, Role, StagedState};

pub const T0: u64 = 1_700_000_000;
pub const ISSUER: &str = "central_bank";

pub struct Stack {
    pub store: Arc<InMemoryStateStore>,
    pub clock: Arc<ManualTimeSource>,
    pub audit: Arc<TelemetryAuditSink>,
    pub gateway: Arc<DigestGateway>,
    pub ledger: Arc<LedgerEngine>,
    pub tracker: Arc<CommitmentTracker<TranscriptVerifier>>,
    pub gov: GovernanceEngine,
}

pub fn stack() -> Stack {
    let store = Arc::new(InMemoryStateStore::new());
    let clock = Arc::new(ManualTimeSource::new(T0));
    let audit = Arc::new(TelemetryAuditSink::with_capacity(10_000, false));
    let gateway = Arc::new(
        DigestGateway::new()
            .with_identity(ISSUER, &[Role::Issuer])
            .with_identity("admin", &[Role::Admin])
            .with_identity("compliance", &[Role::Compliance])
            .with_identity("auditor", &[Role::Auditor])
            .with_identity("user1", &[])
            .with_identity("user2", &[])
            .with_identity("mallory", &[]),
    );
    let ledger = Arc::new(LedgerEngine::new(
        store.clone(),
        gateway.clone(),
        clock.clone(),
        audit.clone(),
        LedgerConfig::default(),
    ));
    let tracker = Arc::new(CommitmentTracker::new(
        store.clone(),
        TranscriptVerifier,
        clock.clone(),
        audit.clone(),
    ));
    let gov = GovernanceEngine::new(
        GovernanceDependencies {
            store: store.clone(),
            gateway: gateway.clone(),
            ledger: ledger.clone(),
            commitments: tracker.clone(),
            clock: clock.clone(),
            audit: audit.clone(),
        },
        MultisigConfig::default(),
    );

    store.set_tx_id("tx-genesis");
    let mut state = StagedState::begin(store.as_ref());
    gov.initialize_in(&mut state).unwrap();
    state.commit().unwrap();

    Stack {
        store,
        clock,
        audit,
        gateway,
        ledger,
        tracker,
        gov,
    }
}

impl Stack {
    pub fn mint(&self, tx: &str, outputs: &[OutputSpec]) -> Result<LedgerReceipt, LedgerError> {
        self.store.set_tx_id(tx);
        let message = messages::mint_message(tx, ISSUER, outputs).unwrap();
        let sig = digest_sign(ISSUER, &message, LedgerAction::Mint.context());
        self.ledger.mint(outputs, ISSUER, &sig)
    }

    pub fn transfer(
        &self,
        tx: &str,
        sender: &str,
        inputs: &[String],
        outputs: &[OutputSpec],
    ) -> Result<LedgerReceipt, LedgerError> {
        self.store.set_tx_id(tx);
        let message = messages::transfer_message(tx, sender, inputs, outputs).unwrap();
        let sig = digest_sign(sender, &message, LedgerAction::Transfer.context());
        self.ledger.transfer(inputs, outputs, sender, &sig)
    }

    pub fn burn(&self, tx: &str, owner: &str, inputs: &[String]) -> Result<LedgerReceipt, LedgerError> {
        self.store.set_tx_id(tx);
        let message = messages::burn_message(tx, owner, inputs).unwrap();
        let sig = digest_sign(owner, &message, LedgerAction::Burn.context());
        self.ledger.burn(inputs, owner, &sig)
    }

    pub fn balance(&self, owner: &str) -> u64 {
        self.ledger.get_balance(owner).unwrap()
    }

    pub fn supply(&self) -> u64 {
        self.ledger.get_total_supply().unwrap()
    }

    pub fn propose(&self, tx: &str, proposer: &str, payload: ProposalPayload) -> Result<GovernanceProposal, GovernanceError> {
        self.store.set_tx_id(tx);
        self.gov.create_proposal(payload.proposal_type(), proposer, payload)
    }

    pub fn approve(&self, tx: &str, id: &str, signer: &str) -> Result<GovernanceProposal, GovernanceError> {
        self.store.set_tx_id(tx);
        let message = self.gov.get_proposal(id)?.signing_message()?;
        self.gov.approve_proposal(id, signer, &digest_sign(signer, &message, APPROVE_CONTEXT))
    }

    pub fn reject(&self, tx: &str, id: &str, signer: &str) -> Result<GovernanceProposal, GovernanceError> {
        self.store.set_tx_id(tx);
        let message = self.gov.get_proposal(id)?.signing_message()?;
        self.gov.reject_proposal(id, signer, &digest_sign(signer, &message, REJECT_CONTEXT))
    }

    pub fn execute(&self, tx: &str, id: &str, executor: &str) -> Result<ExecutionResult, GovernanceError> {
        self.store.set_tx_id(tx);
        self.gov.execute_proposal(id, executor)
    }

    pub fn act(&self, tx: &str, request: ActionRequest, actor: &str) -> Result<ActionOutcome, GovernanceError> {
        self.store.set_tx_id(tx);
        let message = direct_action_message(tx, actor, &request).unwrap();
        let sig = digest_sign(actor, &message, request.action().context());
        self.gov.execute_action(request, actor, &sig)
    }
}

/// Runtime over real Dilithium2 keys for every governance identity.
pub struct DilithiumHarness {
    pub contract: GenusdContract,
    pub store: Arc<InMemoryStateStore>,
    pub clock: Arc<ManualTimeSource>,
    pub signers: Vec<(String, DilithiumSigner)>,
}

impl DilithiumHarness {
    pub fn signer(&self, identifier: &str) -> &DilithiumSigner {
        self.signers
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, s)| s)
            .unwrap()
    }
}

pub fn dilithium_contract() -> DilithiumHarness {
    let identities = [
        (ISSUER, vec![Role::Issuer]),
        ("admin", vec![Role::Admin]),
        ("compliance", vec![Role::Compliance]),
        ("auditor", vec![Role::Auditor]),
        ("user1", vec![]),
    ];
    let mut genesis = GenesisConfig::default();
    let mut signers = Vec::new();
    for (identifier, roles) in identities {
        let signer = DilithiumSigner::generate(DilithiumMode::Dilithium2);
        genesis.keys.push(GenesisKey {
            identifier: identifier.to_string(),
            mode: DilithiumMode::Dilithium2,
            public_key_hex: hex::encode(signer.public_key().bytes),
            roles,
        });
        signers.push((identifier.to_string(), signer));
    }

    let store = Arc::new(InMemoryStateStore::new());
    let clock = Arc::new(ManualTimeSource::new(T0));
    let config = RuntimeConfig {
        genesis,
        ..RuntimeConfig::default()
    };
    let services = GenusdServices::build(
        &config,
        RuntimeDependencies {
            store: store.clone(),
            clock: clock.clone(),
            audit: Arc::new(TelemetryAuditSink::with_capacity(1_000, false)),
        },
    )
    .unwrap();
    let contract = GenusdContract::new(services);
    store.set_tx_id("tx-init");
    contract.init_ledger().unwrap();

    DilithiumHarness {
        contract,
        store,
        clock,
        signers,
    }
}
