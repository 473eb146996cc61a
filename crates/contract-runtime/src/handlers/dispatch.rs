//! # Request Dispatcher
//!
//! Routes one [`ContractRequest`] to the engine that owns the operation and
//! renders the outcome as a [`ContractResponse`]. Each engine call commits
//! atomically, so a request either lands completely or leaves no trace.

use std::sync::Arc;

use gd_01_signature_verification::SignatureVerificationApi;
use gd_02_commitment_tracker::{CommitmentTrackerApi, StarkProof};
use gd_03_ledger_engine::LedgerApi;
use gd_04_governance::{ActionRequest, GovernanceApi};
use genusd_telemetry::{init_telemetry, log_event, time_histogram, REQUEST_DURATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use shared_types::{
    AuditEvent, Categorized, ContractRequest, ContractResponse, ErrorCategory, SignatureGateway,
    StateStore, StoreError, TimeSource,
};

use crate::container::{GenusdServices, RuntimeConfig, RuntimeDependencies};
use crate::errors::RuntimeError;
use crate::handlers::envelope::{request_message, REQUEST_CONTEXT};
use crate::handlers::operations::Operation;
use crate::handlers::payloads::*;

/// Entry point the host ledger invokes once per transaction.
pub struct GenusdContract {
    services: GenusdServices,
}

impl GenusdContract {
    pub fn new(services: GenusdServices) -> Self {
        Self { services }
    }

    /// Initialise telemetry, register genesis keys and wire the engines
    /// over the host's store, with the telemetry sink as the audit trail.
    pub fn bootstrap(
        config: &RuntimeConfig,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, RuntimeError> {
        let telemetry = init_telemetry(&config.telemetry)?;
        let services = GenusdServices::build(
            config,
            RuntimeDependencies {
                store,
                clock,
                audit: telemetry.audit_sink(),
            },
        )?;
        Ok(Self::new(services))
    }

    pub fn services(&self) -> &GenusdServices {
        &self.services
    }

    pub fn init_ledger(&self) -> Result<bool, RuntimeError> {
        self.services.init_ledger()
    }

    /// Dispatch a request given as JSON and render the response as JSON.
    pub fn handle_json(&self, request: &str) -> String {
        let response = match serde_json::from_str::<ContractRequest>(request) {
            Ok(request) => self.handle(request),
            Err(e) => ContractResponse::err(&RuntimeError::Payload {
                operation: "request".to_string(),
                reason: e.to_string(),
            }),
        };
        serde_json::to_string(&response).unwrap_or_else(|e| {
            format!(
                r#"{{"success":false,"error":{{"category":"storage","message":"response encoding failed: {}"}}}}"#,
                e.to_string().replace('"', "'")
            )
        })
    }

    pub fn handle(&self, request: ContractRequest) -> ContractResponse {
        let operation = match request.operation.parse::<Operation>() {
            Ok(op) => op,
            Err(e) => {
                log_event!(warn, "runtime", "Unknown operation", operation = %request.operation, actor = %request.actor_id);
                return ContractResponse::err(&e);
            }
        };
        let _timer = time_histogram!(REQUEST_DURATION, &[operation.as_str()]);

        match self.dispatch(operation, &request) {
            Ok(data) => {
                if operation.is_query() {
                    log_event!(debug, "runtime", "Query served", operation = %operation, actor = %request.actor_id);
                } else {
                    log_event!(info, "runtime", "Request committed", operation = %operation, actor = %request.actor_id);
                }
                ContractResponse::ok(data)
            }
            Err(e) => {
                if e.category() == ErrorCategory::Integrity {
                    log_event!(error, "runtime", "Request failed integrity check", operation = %operation, actor = %request.actor_id, error = %e);
                } else {
                    log_event!(warn, "runtime", "Request rejected", operation = %operation, actor = %request.actor_id, category = ?e.category(), error = %e);
                }
                ContractResponse::err(&e)
            }
        }
    }

    fn dispatch(&self, operation: Operation, request: &ContractRequest) -> Result<Value, RuntimeError> {
        if operation != Operation::InitLedger && !operation.is_query() && request.actor_id.trim().is_empty() {
            return self.reject(operation, request, RuntimeError::MissingActor);
        }
        if operation.requires_envelope_signature() {
            if let Err(e) = self.verify_envelope(operation, request) {
                return self.reject(operation, request, e);
            }
        }

        let svc = &self.services;
        let actor = request.actor_id.as_str();
        let sig = request.signature_bytes.as_slice();

        match operation {
            Operation::InitLedger => render(operation, &json!({ "initialized": svc.init_ledger()? })),

            // -----------------------------------------------------------------
            // Ledger
            // -----------------------------------------------------------------
            Operation::Mint => {
                let p: MintRequest = self.payload(operation, request)?;
                render(operation, &svc.ledger.mint(&p.outputs, actor, sig)?)
            }
            Operation::Transfer => {
                let p: TransferRequest = self.payload(operation, request)?;
                render(operation, &svc.ledger.transfer(&p.inputs, &p.outputs, actor, sig)?)
            }
            Operation::Burn => {
                let p: BurnRequest = self.payload(operation, request)?;
                render(operation, &svc.ledger.burn(&p.inputs, actor, sig)?)
            }
            Operation::SimpleTransfer => {
                let p: SimpleTransferRequest = self.payload(operation, request)?;
                render(operation, &svc.ledger.simple_transfer(actor, &p.recipient, p.amount, sig)?)
            }
            Operation::SimpleBurn => {
                let p: AmountRequest = self.payload(operation, request)?;
                render(operation, &svc.ledger.simple_burn(actor, p.amount, sig)?)
            }
            Operation::GetBalance => {
                let p: OwnerQuery = self.payload(operation, request)?;
                let balance = svc.ledger.get_balance(&p.owner)?;
                render(operation, &json!({ "owner": p.owner, "balance": balance }))
            }
            Operation::GetUtxo => {
                let p: UtxoQuery = self.payload(operation, request)?;
                render(operation, &svc.ledger.get_utxo(&p.utxo_id)?)
            }
            Operation::ListUtxos => {
                let p: OwnerQuery = self.payload(operation, request)?;
                render(operation, &svc.ledger.list_utxos(&p.owner)?)
            }
            Operation::GetTotalSupply => {
                render(operation, &json!({ "total_supply": svc.ledger.get_total_supply()? }))
            }
            Operation::GetAccount => {
                let p: AccountQuery = self.payload(operation, request)?;
                render(operation, &svc.ledger.get_account(&p.account_id)?)
            }
            Operation::AuditSupply => render(operation, &svc.ledger.audit_supply()?),

            // -----------------------------------------------------------------
            // Commitments
            // -----------------------------------------------------------------
            Operation::VerifyProof => {
                let proof: StarkProof = self.payload(operation, request)?;
                render(operation, &svc.commitments.verify_and_store(&proof)?)
            }
            Operation::GetCommitment => {
                let p: CommitmentQuery = self.payload(operation, request)?;
                render(operation, &svc.commitments.get_commitment(&p.commitment)?)
            }
            Operation::IsNullifierUsed => {
                let p: NullifierQuery = self.payload(operation, request)?;
                let used = svc.commitments.is_nullifier_used(&p.nullifier)?;
                render(operation, &json!({ "nullifier": p.nullifier, "used": used }))
            }
            Operation::AuditNullifiers => render(operation, &svc.commitments.audit_nullifiers()?),

            // -----------------------------------------------------------------
            // Proposals
            // -----------------------------------------------------------------
            Operation::CreateProposal => {
                let p: CreateProposalRequest = self.payload(operation, request)?;
                render(operation, &svc.governance.create_proposal(p.proposal_type, actor, p.payload)?)
            }
            Operation::ApproveProposal => {
                let p: ProposalRef = self.payload(operation, request)?;
                render(operation, &svc.governance.approve_proposal(&p.proposal_id, actor, sig)?)
            }
            Operation::RejectProposal => {
                let p: ProposalRef = self.payload(operation, request)?;
                render(operation, &svc.governance.reject_proposal(&p.proposal_id, actor, sig)?)
            }
            Operation::ExecuteProposal => {
                let p: ProposalRef = self.payload(operation, request)?;
                render(operation, &svc.governance.execute_proposal(&p.proposal_id, actor)?)
            }
            Operation::GetProposal => {
                let p: ProposalRef = self.payload(operation, request)?;
                render(operation, &svc.governance.get_proposal(&p.proposal_id)?)
            }
            Operation::ListProposals => {
                let p: ProposalFilter = self.payload(operation, request)?;
                render(operation, &svc.governance.list_proposals(p.status)?)
            }
            Operation::SweepExpired => {
                render(operation, &json!({ "expired": svc.governance.sweep_expired()? }))
            }

            // -----------------------------------------------------------------
            // Direct actions
            // -----------------------------------------------------------------
            Operation::FreezeAccount
            | Operation::UnfreezeAccount
            | Operation::SeizeUtxo
            | Operation::RedeemStablecoin
            | Operation::AttestReserve => {
                let action = self.action_request(operation, request)?;
                render(operation, &svc.governance.execute_action(action, actor, sig)?)
            }

            // -----------------------------------------------------------------
            // Queries
            // -----------------------------------------------------------------
            Operation::GetPolicy => render(operation, &svc.governance.policy()?),
            Operation::GetMultisigConfig => render(operation, &svc.governance.multisig_config()?),
            Operation::GetLatestAttestation => render(operation, &svc.governance.latest_attestation()?),
            Operation::GetRedemption => {
                let p: RedemptionQuery = self.payload(operation, request)?;
                render(operation, &svc.governance.get_redemption(&p.redemption_id)?)
            }
            Operation::ListKeys => render(operation, &svc.verifier.list_keys()),
            Operation::GetKey => {
                let p: KeyQuery = self.payload(operation, request)?;
                let info = svc
                    .verifier
                    .get_key(&p.identifier)
                    .ok_or_else(|| gd_01_signature_verification::SignatureError::KeyNotFound(p.identifier.clone()))?;
                render(operation, &info)
            }
        }
    }

    /// Build the direct-path action from the operation's payload.
    fn action_request(&self, operation: Operation, request: &ContractRequest) -> Result<ActionRequest, RuntimeError> {
        let action = match operation {
            Operation::FreezeAccount => {
                let p: FreezeRequest = self.payload(operation, request)?;
                ActionRequest::FreezeAccount {
                    target: p.target,
                    reason: p.reason,
                }
            }
            Operation::UnfreezeAccount => {
                let p: UnfreezeRequest = self.payload(operation, request)?;
                ActionRequest::UnfreezeAccount { target: p.target }
            }
            Operation::SeizeUtxo => {
                let p: SeizeRequest = self.payload(operation, request)?;
                ActionRequest::SeizeUtxo {
                    utxo_id: p.utxo_id,
                    vault_owner: p.vault_owner,
                    reason: p.reason,
                }
            }
            Operation::RedeemStablecoin => {
                let p: RedeemRequest = self.payload(operation, request)?;
                ActionRequest::RedeemStablecoin {
                    user_id: p.user_id,
                    amount: p.amount,
                    bank_reference: p.bank_reference,
                }
            }
            Operation::AttestReserve => {
                let p: AttestRequest = self.payload(operation, request)?;
                ActionRequest::AttestReserve {
                    reserve_amount: p.reserve_amount,
                    report_hash: p.report_hash,
                    commitment: p.commitment,
                }
            }
            other => return Err(RuntimeError::UnknownOperation(other.to_string())),
        };
        Ok(action)
    }

    fn verify_envelope(&self, operation: Operation, request: &ContractRequest) -> Result<(), RuntimeError> {
        let message = request_message(
            &self.services.store.tx_id(),
            operation.as_str(),
            &request.actor_id,
            &request.payload,
        )?;
        SignatureGateway::verify_with_context(
            self.services.verifier.as_ref(),
            &message,
            &request.signature_bytes,
            &request.actor_id,
            REQUEST_CONTEXT,
        )?;
        Ok(())
    }

    /// Decode the payload, reporting a malformed one to the audit trail.
    fn payload<T: DeserializeOwned>(&self, operation: Operation, request: &ContractRequest) -> Result<T, RuntimeError> {
        let value = if request.payload.is_null() {
            json!({})
        } else {
            request.payload.clone()
        };
        match serde_json::from_value(value) {
            Ok(parsed) => Ok(parsed),
            Err(e) => self.reject(
                operation,
                request,
                RuntimeError::Payload {
                    operation: operation.to_string(),
                    reason: e.to_string(),
                },
            ),
        }
    }

    /// Failures caught before an engine runs still leave one audit event.
    fn reject<T>(&self, operation: Operation, request: &ContractRequest, error: RuntimeError) -> Result<T, RuntimeError> {
        let event = AuditEvent::new(
            operation.audit_type(),
            operation.as_str(),
            request.actor_id.as_str(),
            "",
            self.services.clock.now(),
            self.services.store.tx_id(),
        )
        .failed(&error);
        self.services.audit.log_event(event);
        Err(error)
    }
}

fn render<T: Serialize>(operation: Operation, value: &T) -> Result<Value, RuntimeError> {
    serde_json::to_value(value).map_err(|e| {
        RuntimeError::Store(StoreError::Encode {
            key: operation.to_string(),
            reason: e.to_string(),
        })
    })
}
