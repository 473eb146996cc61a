//! # Governance Flows
//!
//! Multisig proposals and direct actions observed through ledger state.

#[cfg(test)]
mod tests {
    use gd_03_ledger_engine::{LedgerApi, LedgerError, OutputSpec, UtxoStatus};
    use gd_04_governance::{
        ActionOutcome, ActionRequest, FreezeTarget, GovernanceApi, GovernanceError, PolicyChange, ProposalPayload,
        ProposalStatus,
    };
    use shared_types::{AuditEventType, AuditResult, Categorized, ErrorCategory};

    use crate::fixtures::{stack, Stack, ISSUER};

    fn freeze_user1() -> ProposalPayload {
        ProposalPayload::Freeze {
            target: FreezeTarget::Account("user1".into()),
            reason: "sanctions screening".into(),
        }
    }

    /// Create as admin, approve as compliance and auditor.
    fn reach_quorum(s: &Stack, payload: ProposalPayload) -> String {
        let proposal = s.propose("tx-p", "admin", payload).unwrap();
        s.approve("tx-a1", &proposal.id, "compliance").unwrap();
        let approved = s.approve("tx-a2", &proposal.id, "auditor").unwrap();
        assert_eq!(approved.status, ProposalStatus::Approved);
        proposal.id
    }

    /// Test: 2-of-3 freeze proposal executes exactly once
    #[test]
    fn test_multisig_freeze_executes_once() {
        let s = stack();
        s.mint("tx-1", &[OutputSpec::new("user1", 500)]).unwrap();

        let proposal = s.propose("tx-p", "admin", freeze_user1()).unwrap();
        assert_eq!(proposal.status, ProposalStatus::Pending);
        assert_eq!(proposal.required_signatures, 2);

        let after_one = s.approve("tx-a1", &proposal.id, "compliance").unwrap();
        assert_eq!(after_one.status, ProposalStatus::Pending);
        let err = s.execute("tx-x0", &proposal.id, "compliance").unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::InvalidState {
                status: ProposalStatus::Pending,
                ..
            }
        ));
        assert!(!s.ledger.get_account("user1").unwrap().frozen);
        let after_two = s.approve("tx-a2", &proposal.id, "auditor").unwrap();
        assert_eq!(after_two.status, ProposalStatus::Approved);

        let result = s.execute("tx-x", &proposal.id, "compliance").unwrap();
        assert_eq!(result.proposal.status, ProposalStatus::Executed);
        assert!(matches!(result.outcome, ActionOutcome::AccountFrozen { .. }));
        assert!(s.ledger.get_account("user1").unwrap().frozen);

        let err = s.execute("tx-x2", &proposal.id, "compliance").unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::InvalidState {
                status: ProposalStatus::Executed,
                ..
            }
        ));
    }

    /// Test: A second vote from the same signer is refused and not counted
    #[test]
    fn test_duplicate_approval_not_counted() {
        let s = stack();
        let proposal = s.propose("tx-p", "admin", freeze_user1()).unwrap();
        s.approve("tx-a1", &proposal.id, "compliance").unwrap();

        let err = s.approve("tx-a2", &proposal.id, "compliance").unwrap_err();
        assert!(matches!(err, GovernanceError::DuplicateApproval { .. }));
        assert_eq!(err.category(), ErrorCategory::Integrity);

        let stored = s.gov.get_proposal(&proposal.id).unwrap();
        assert_eq!(stored.approval_count(), 1);
        assert_eq!(stored.status, ProposalStatus::Pending);
    }

    /// Test: Executor must be one of the approvers
    #[test]
    fn test_executor_must_have_approved() {
        let s = stack();
        let id = reach_quorum(&s, freeze_user1());
        let err = s.execute("tx-x", &id, "admin").unwrap_err();
        assert!(matches!(err, GovernanceError::NotApprover { .. }));
        assert_eq!(s.gov.get_proposal(&id).unwrap().status, ProposalStatus::Approved);
    }

    /// Test: Frozen accounts cannot move funds until unfrozen
    #[test]
    fn test_frozen_account_cannot_transfer() {
        let s = stack();
        let minted = s.mint("tx-1", &[OutputSpec::new("user1", 500)]).unwrap();
        let request = ActionRequest::FreezeAccount {
            target: FreezeTarget::Account("user1".into()),
            reason: "court order".into(),
        };
        s.act("tx-f", request, "compliance").unwrap();

        let err = s
            .transfer("tx-2", "user1", &minted.created, &[OutputSpec::new("user2", 500)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountFrozen(_)));
        assert_eq!(s.balance("user1"), 500);

        // Unfreeze honours the cooldown anchored at the freeze
        let unfreeze = ActionRequest::UnfreezeAccount {
            target: FreezeTarget::Account("user1".into()),
        };
        let err = s.act("tx-u1", unfreeze.clone(), "compliance").unwrap_err();
        assert!(matches!(err, GovernanceError::CooldownViolation { .. }));

        s.clock.advance(86_400);
        s.act("tx-u2", unfreeze, "compliance").unwrap();
        s.transfer("tx-3", "user1", &minted.created, &[OutputSpec::new("user2", 500)])
            .unwrap();
        assert_eq!(s.balance("user2"), 500);
    }

    /// Test: Seizure moves value to the vault without changing supply
    #[test]
    fn test_seize_preserves_supply() {
        let s = stack();
        let minted = s.mint("tx-1", &[OutputSpec::new("user1", 7_500)]).unwrap();
        let utxo_id = minted.created[0].clone();

        let id = reach_quorum(
            &s,
            ProposalPayload::Seize {
                utxo_id: utxo_id.clone(),
                reason: "fraud".into(),
                vault_owner: "vault".into(),
            },
        );
        let result = s.execute("tx-x", &id, "auditor").unwrap();
        let ActionOutcome::Seized { vault_utxo, amount, .. } = result.outcome else {
            panic!("expected seizure outcome");
        };
        assert_eq!(amount, 7_500);

        assert_eq!(s.ledger.get_utxo(&utxo_id).unwrap().status, UtxoStatus::Seized);
        assert_eq!(s.ledger.get_utxo(&vault_utxo).unwrap().owner, "vault");
        assert_eq!(s.balance("user1"), 0);
        assert_eq!(s.balance("vault"), 7_500);
        assert_eq!(s.supply(), 7_500);
        assert!(s.ledger.audit_supply().unwrap().consistent);
    }

    /// Test: Redemption burns the user's value and records the bank reference
    #[test]
    fn test_redeem_reduces_supply() {
        let s = stack();
        s.mint("tx-1", &[OutputSpec::new("user1", 1_000)]).unwrap();

        let request = ActionRequest::RedeemStablecoin {
            user_id: "user1".into(),
            amount: 400,
            bank_reference: "WIRE-001".into(),
        };
        let outcome = s.act("tx-r", request, ISSUER).unwrap();
        let ActionOutcome::Redeemed { record } = outcome else {
            panic!("expected redemption outcome");
        };
        assert_eq!(record.amount, 400);
        assert_eq!(record.bank_reference, "WIRE-001");
        assert!(record.change_utxo.is_some());

        assert_eq!(s.balance("user1"), 600);
        assert_eq!(s.supply(), 600);
        assert_eq!(s.gov.get_redemption(&record.redemption_id).unwrap(), record);
    }

    /// Test: A halt proposal stops minting until lifted
    #[test]
    fn test_halt_blocks_mint() {
        let s = stack();
        let id = reach_quorum(
            &s,
            ProposalPayload::PolicyUpdate {
                change: PolicyChange::SetHalt { halted: true },
            },
        );
        s.execute("tx-x", &id, "compliance").unwrap();

        let err = s.mint("tx-1", &[OutputSpec::new("user1", 10)]).unwrap_err();
        assert!(matches!(err, LedgerError::LedgerHalted));
        assert_eq!(s.supply(), 0);

        s.clock.advance(1);
        let id = reach_quorum(
            &s,
            ProposalPayload::PolicyUpdate {
                change: PolicyChange::SetHalt { halted: false },
            },
        );
        s.execute("tx-x2", &id, "compliance").unwrap();
        s.mint("tx-2", &[OutputSpec::new("user1", 10)]).unwrap();
        assert_eq!(s.supply(), 10);
    }

    /// Test: Proposals past their TTL expire instead of executing
    #[test]
    fn test_expired_proposal_cannot_execute() {
        let s = stack();
        let id = reach_quorum(&s, freeze_user1());
        s.clock.advance(86_401);

        let err = s.execute("tx-x", &id, "compliance").unwrap_err();
        assert!(matches!(err, GovernanceError::ProposalExpired(_)));
        assert_eq!(s.gov.get_proposal(&id).unwrap().status, ProposalStatus::Expired);
    }

    /// Test: Every governance call leaves one audit event
    #[test]
    fn test_governance_audit_trail() {
        let s = stack();
        let before = s.audit.events_of(AuditEventType::Governance).len();
        let id = reach_quorum(&s, freeze_user1());
        let _ = s.approve("tx-a3", &id, "admin");

        let events = s.audit.events_of(AuditEventType::Governance);
        assert_eq!(events.len(), before + 4);
        assert_eq!(events.last().unwrap().result, AuditResult::Failure);
    }
}
