//! Engine construction and ledger initialisation.

use std::sync::Arc;

use gd_01_signature_verification::{KeyRegistry, PqDilithiumScheme, SignatureVerifier};
use gd_02_commitment_tracker::{CommitmentTracker, TranscriptVerifier};
use gd_03_ledger_engine::domain::utxo_set;
use gd_03_ledger_engine::LedgerEngine;
use gd_04_governance::{GovernanceDependencies, GovernanceEngine};
use shared_types::keys::TOTAL_SUPPLY;
use shared_types::{
    AuditEvent, AuditEventType, AuditSink, SignatureGateway, StagedState, StateStore, TimeSource,
};
use tracing::info;

use crate::container::config::RuntimeConfig;
use crate::errors::RuntimeError;

pub type Verifier = SignatureVerifier<PqDilithiumScheme>;
pub type Tracker = CommitmentTracker<TranscriptVerifier>;

/// Host-provided collaborators.
pub struct RuntimeDependencies {
    pub store: Arc<dyn StateStore>,
    pub clock: Arc<dyn TimeSource>,
    pub audit: Arc<dyn AuditSink>,
}

/// Every engine, sharing one store, clock and audit sink.
pub struct GenusdServices {
    pub store: Arc<dyn StateStore>,
    pub clock: Arc<dyn TimeSource>,
    pub audit: Arc<dyn AuditSink>,
    pub verifier: Arc<Verifier>,
    pub commitments: Arc<Tracker>,
    pub ledger: Arc<LedgerEngine>,
    pub governance: Arc<GovernanceEngine>,
}

impl GenusdServices {
    /// Validate `config`, register genesis keys and wire the engines.
    pub fn build(config: &RuntimeConfig, deps: RuntimeDependencies) -> Result<Self, RuntimeError> {
        config.validate()?;
        let RuntimeDependencies { store, clock, audit } = deps;

        let verifier = Arc::new(SignatureVerifier::new(
            Arc::new(KeyRegistry::new()),
            PqDilithiumScheme,
            Arc::clone(&clock),
            Arc::clone(&audit),
        ));
        let registered = config.genesis.register(verifier.as_ref())?;
        let gateway: Arc<dyn SignatureGateway> = verifier.clone();

        let commitments = Arc::new(CommitmentTracker::new(
            Arc::clone(&store),
            TranscriptVerifier,
            Arc::clone(&clock),
            Arc::clone(&audit),
        ));

        let ledger = Arc::new(LedgerEngine::new(
            Arc::clone(&store),
            Arc::clone(&gateway),
            Arc::clone(&clock),
            Arc::clone(&audit),
            config.ledger.clone(),
        ));

        let governance = Arc::new(GovernanceEngine::new(
            GovernanceDependencies {
                store: Arc::clone(&store),
                gateway,
                ledger: ledger.clone(),
                commitments: commitments.clone(),
                clock: Arc::clone(&clock),
                audit: Arc::clone(&audit),
            },
            config.multisig.clone(),
        ));

        info!(
            genesis_keys = registered.len(),
            signers = config.multisig.signers.len(),
            required = config.multisig.required_signatures,
            asset = %config.ledger.asset_code,
            "GENUSD engines wired"
        );

        Ok(Self {
            store,
            clock,
            audit,
            verifier,
            commitments,
            ledger,
            governance,
        })
    }

    /// Seed `TOTAL_SUPPLY`, `POLICY_REGISTRY` and `MULTISIG_CONFIG` if absent.
    ///
    /// Idempotent. Returns `true` when anything was written.
    pub fn init_ledger(&self) -> Result<bool, RuntimeError> {
        let event = AuditEvent::new(
            AuditEventType::Governance,
            "INIT_LEDGER",
            "runtime",
            TOTAL_SUPPLY,
            self.clock.now(),
            self.store.tx_id(),
        );
        let outcome = self.seed();
        let event = match &outcome {
            Ok(wrote) => event.param("initialized", wrote),
            Err(_) => event,
        }
        .with_outcome(&outcome);
        self.audit.log_event(event);
        outcome
    }

    fn seed(&self) -> Result<bool, RuntimeError> {
        let mut state = StagedState::begin(self.store.as_ref());
        let mut wrote = false;
        if state.get(TOTAL_SUPPLY)?.is_none() {
            utxo_set::write_supply(&mut state, 0)?;
            wrote = true;
        }
        wrote |= self.governance.initialize_in(&mut state)?;
        if wrote {
            state.commit()?;
            info!("Ledger initialized");
        }
        Ok(wrote)
    }
}
