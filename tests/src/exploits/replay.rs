//! Signature replay across transactions, operations and proposals.

#[cfg(test)]
mod tests {
    use gd_03_ledger_engine::domain::messages;
    use gd_03_ledger_engine::{LedgerAction, LedgerApi, LedgerError, OutputSpec};
    use gd_04_governance::{
        FreezeTarget, GovernanceApi, GovernanceError, ProposalPayload, APPROVE_CONTEXT, REJECT_CONTEXT,
    };
    use shared_types::test_utils::digest_sign;
    use shared_types::{AuditEventType, Categorized, ErrorCategory};

    use crate::fixtures::{stack, ISSUER};

    /// Test: A mint signature authorises only the transaction it names
    #[test]
    fn test_mint_signature_replayed_in_new_tx() {
        let s = stack();
        let outputs = [OutputSpec::new("mallory", 1_000)];
        let message = messages::mint_message("tx-1", ISSUER, &outputs).unwrap();
        let sig = digest_sign(ISSUER, &message, LedgerAction::Mint.context());

        s.store.set_tx_id("tx-1");
        s.ledger.mint(&outputs, ISSUER, &sig).unwrap();

        s.store.set_tx_id("tx-2");
        let err = s.ledger.mint(&outputs, ISSUER, &sig).unwrap_err();
        assert!(matches!(err, LedgerError::Authority(_)));
        assert_eq!(err.category(), ErrorCategory::Signature);
        assert_eq!(s.supply(), 1_000);
        assert_eq!(s.audit.security_failures().len(), 1);
    }

    /// Test: A transfer signature does not authorise a burn of the same inputs
    #[test]
    fn test_signature_context_confusion() {
        let s = stack();
        let minted = s.mint("tx-1", &[OutputSpec::new("user1", 300)]).unwrap();

        s.store.set_tx_id("tx-2");
        let message = messages::burn_message("tx-2", "user1", &minted.created).unwrap();
        let wrong_context = digest_sign("user1", &message, LedgerAction::Transfer.context());
        let err = s.ledger.burn(&minted.created, "user1", &wrong_context).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Signature);
        assert_eq!(s.balance("user1"), 300);
    }

    /// Test: A signature by one identity cannot be presented as another's
    #[test]
    fn test_signature_bound_to_signer() {
        let s = stack();
        let minted = s.mint("tx-1", &[OutputSpec::new("user1", 300)]).unwrap();

        s.store.set_tx_id("tx-2");
        let outputs = [OutputSpec::new("mallory", 300)];
        let message = messages::transfer_message("tx-2", "user1", &minted.created, &outputs).unwrap();
        let mallory_sig = digest_sign("mallory", &message, LedgerAction::Transfer.context());
        let err = s
            .ledger
            .transfer(&minted.created, &outputs, "user1", &mallory_sig)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Signature);
        assert_eq!(s.balance("mallory"), 0);
    }

    /// Test: Votes are bound to one proposal and one direction
    #[test]
    fn test_vote_replay_across_proposals() {
        let s = stack();
        let freeze = |who: &str| ProposalPayload::Freeze {
            target: FreezeTarget::Account(who.to_string()),
            reason: "screening".into(),
        };
        let first = s.propose("tx-p1", "admin", freeze("user1")).unwrap();
        s.clock.advance(1);
        let second = s.propose("tx-p2", "admin", freeze("user2")).unwrap();

        let first_message = first.signing_message().unwrap();
        let vote = digest_sign("compliance", &first_message, APPROVE_CONTEXT);
        s.store.set_tx_id("tx-v1");
        let err = s.gov.approve_proposal(&second.id, "compliance", &vote).unwrap_err();
        assert!(matches!(err, GovernanceError::Authority(_)));

        let rejection = digest_sign("compliance", &first_message, REJECT_CONTEXT);
        let err = s.gov.approve_proposal(&first.id, "compliance", &rejection).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Signature);

        assert_eq!(s.gov.get_proposal(&first.id).unwrap().approval_count(), 0);
        assert_eq!(s.gov.get_proposal(&second.id).unwrap().approval_count(), 0);
        let failed = s
            .audit
            .events_of(AuditEventType::Governance)
            .into_iter()
            .filter(|e| e.error.is_some())
            .count();
        assert_eq!(failed, 2);
    }
}
