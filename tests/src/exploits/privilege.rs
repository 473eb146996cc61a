//! Privilege escalation and policy ceiling abuse.

#[cfg(test)]
mod tests {
    use gd_03_ledger_engine::domain::messages;
    use gd_03_ledger_engine::{LedgerAction, LedgerApi, LedgerError, OutputSpec};
    use gd_04_governance::{
        ActionRequest, FreezeTarget, GovernanceApi, GovernanceError, PolicyChange, ProposalPayload,
    };
    use shared_types::test_utils::digest_sign;
    use shared_types::{Categorized, ErrorCategory, Role};

    use crate::fixtures::{stack, ISSUER};

    fn freeze(account: &str) -> ActionRequest {
        ActionRequest::FreezeAccount {
            target: FreezeTarget::Account(account.to_string()),
            reason: "takeover".into(),
        }
    }

    /// Test: Outsiders cannot open or vote on proposals
    #[test]
    fn test_non_signer_cannot_govern() {
        let s = stack();
        let payload = ProposalPayload::PolicyUpdate {
            change: PolicyChange::SetHalt { halted: true },
        };
        let err = s.propose("tx-p", "mallory", payload.clone()).unwrap_err();
        assert!(matches!(err, GovernanceError::NotAuthorizedSigner(_)));

        let proposal = s.propose("tx-p2", "admin", payload).unwrap();
        let err = s.approve("tx-a", &proposal.id, "mallory").unwrap_err();
        assert!(matches!(err, GovernanceError::NotAuthorizedSigner(_)));
        assert_eq!(err.category(), ErrorCategory::Authorization);
        assert_eq!(s.gov.get_proposal(&proposal.id).unwrap().approval_count(), 0);
    }

    /// Test: Direct actions need a permitted role, not just a valid signature
    #[test]
    fn test_unprivileged_direct_actions() {
        let s = stack();
        let err = s.act("tx-1", freeze("admin"), "mallory").unwrap_err();
        assert!(matches!(err, GovernanceError::RoleNotPermitted { .. }));

        // Issuer may redeem but not freeze
        let err = s.act("tx-2", freeze("user1"), ISSUER).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Authorization);

        assert!(!s.ledger.get_account("admin").unwrap().frozen);
        assert!(!s.ledger.get_account("user1").unwrap().frozen);
    }

    /// Test: Only the issuer mints
    #[test]
    fn test_mint_without_issuer_role() {
        let s = stack();
        let outputs = [OutputSpec::new("mallory", 1_000_000)];
        let message = messages::mint_message("tx-1", "mallory", &outputs).unwrap();
        let sig = digest_sign("mallory", &message, LedgerAction::Mint.context());
        s.store.set_tx_id("tx-1");
        let err = s.ledger.mint(&outputs, "mallory", &sig).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Authorization);
        assert_eq!(s.supply(), 0);
    }

    /// Test: A revoked role stops working immediately
    #[test]
    fn test_revoked_role() {
        let s = stack();
        s.gateway.revoke("compliance", Role::Compliance);
        let err = s.act("tx-1", freeze("user1"), "compliance").unwrap_err();
        assert!(matches!(err, GovernanceError::RoleNotPermitted { .. }));
    }

    /// Test: Seizure above the policy ceiling is refused on the direct path
    #[test]
    fn test_seize_over_ceiling() {
        let s = stack();
        let minted = s.mint("tx-1", &[OutputSpec::new("user1", 10_000_000_001)]).unwrap();
        let request = ActionRequest::SeizeUtxo {
            utxo_id: minted.created[0].clone(),
            vault_owner: "admin".into(),
            reason: "dispute".into(),
        };
        let err = s.act("tx-2", request, "admin").unwrap_err();
        assert!(matches!(err, GovernanceError::LimitExceeded { .. }));
        assert_eq!(err.category(), ErrorCategory::Policy);
        assert_eq!(s.balance("user1"), 10_000_000_001);
    }

    /// Test: Direct mint above the threshold needs a MINT_LARGE proposal
    #[test]
    fn test_large_mint_needs_quorum() {
        let s = stack();
        let outputs = vec![OutputSpec::new("user1", 100_000_000_001)];
        let err = s.mint("tx-1", &outputs).unwrap_err();
        assert!(matches!(err, LedgerError::LimitExceeded { .. }));

        let proposal = s
            .propose("tx-p", "admin", ProposalPayload::MintLarge { outputs })
            .unwrap();
        s.approve("tx-a1", &proposal.id, "admin").unwrap();
        s.approve("tx-a2", &proposal.id, "compliance").unwrap();
        s.execute("tx-x", &proposal.id, "admin").unwrap();
        assert_eq!(s.supply(), 100_000_000_001);
    }

    /// Test: A halted ledger refuses transfers and burns as well as mints
    #[test]
    fn test_halt_blocks_movement() {
        let s = stack();
        let minted = s.mint("tx-1", &[OutputSpec::new("user1", 10)]).unwrap();

        let proposal = s
            .propose(
                "tx-p",
                "admin",
                ProposalPayload::PolicyUpdate {
                    change: PolicyChange::SetHalt { halted: true },
                },
            )
            .unwrap();
        s.approve("tx-a1", &proposal.id, "admin").unwrap();
        s.approve("tx-a2", &proposal.id, "auditor").unwrap();
        s.execute("tx-x", &proposal.id, "auditor").unwrap();

        let err = s
            .transfer("tx-2", "user1", &minted.created, &[OutputSpec::new("mallory", 10)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::LedgerHalted));
        assert!(matches!(
            s.burn("tx-3", "user1", &minted.created).unwrap_err(),
            LedgerError::LedgerHalted
        ));
        assert_eq!(s.balance("user1"), 10);
    }
}
