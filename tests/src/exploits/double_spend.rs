//! Double-spend attempts against the UTXO set.

#[cfg(test)]
mod tests {
    use gd_03_ledger_engine::{LedgerApi, LedgerError, OutputSpec, UtxoStatus};
    use gd_04_governance::{ActionRequest, FreezeTarget};
    use shared_types::{Categorized, ErrorCategory};

    use crate::fixtures::stack;

    /// Test: The same input listed twice is refused before any lookup
    #[test]
    fn test_duplicate_input_in_one_tx() {
        let s = stack();
        let minted = s.mint("tx-1", &[OutputSpec::new("mallory", 100)]).unwrap();
        let id = minted.created[0].clone();

        let err = s
            .transfer("tx-2", "mallory", &[id.clone(), id], &[OutputSpec::new("user2", 200)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateInput(_)));
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(s.balance("user2"), 0);
        assert_eq!(s.supply(), 100);
    }

    /// Test: Respending a spent output fails whichever operation is used
    #[test]
    fn test_respend_after_transfer() {
        let s = stack();
        let minted = s.mint("tx-1", &[OutputSpec::new("mallory", 100)]).unwrap();
        s.transfer("tx-2", "mallory", &minted.created, &[OutputSpec::new("user1", 100)])
            .unwrap();

        let err = s
            .transfer("tx-3", "mallory", &minted.created, &[OutputSpec::new("user2", 100)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotActive { status: UtxoStatus::Spent, .. }));
        assert_eq!(err.category(), ErrorCategory::State);

        assert!(s.burn("tx-4", "mallory", &minted.created).is_err());
        assert_eq!(s.balance("user1"), 100);
        assert_eq!(s.balance("user2"), 0);
        assert!(s.ledger.audit_supply().unwrap().consistent);
    }

    /// Test: One valid input cannot smuggle a spent one through
    #[test]
    fn test_mixed_fresh_and_spent_inputs() {
        let s = stack();
        let first = s.mint("tx-1", &[OutputSpec::new("mallory", 100)]).unwrap();
        let second = s.mint("tx-2", &[OutputSpec::new("mallory", 50)]).unwrap();
        s.burn("tx-3", "mallory", &first.created).unwrap();

        let inputs = [second.created[0].clone(), first.created[0].clone()];
        let err = s
            .transfer("tx-4", "mallory", &inputs, &[OutputSpec::new("user2", 150)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotActive { .. }));
        assert_eq!(s.ledger.get_utxo(&second.created[0]).unwrap().status, UtxoStatus::Active);
        assert_eq!(s.balance("mallory"), 50);
    }

    /// Test: A seized output is out of its former owner's reach
    #[test]
    fn test_spend_seized_utxo() {
        let s = stack();
        let minted = s.mint("tx-1", &[OutputSpec::new("mallory", 900)]).unwrap();
        let id = minted.created[0].clone();
        let seize = ActionRequest::SeizeUtxo {
            utxo_id: id.clone(),
            vault_owner: "vault".into(),
            reason: "stolen funds".into(),
        };
        s.act("tx-2", seize, "admin").unwrap();

        let err = s
            .transfer("tx-3", "mallory", &[id.clone()], &[OutputSpec::new("user2", 900)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotActive { status: UtxoStatus::Seized, .. }));
        assert!(matches!(s.burn("tx-4", "mallory", &[id]).unwrap_err(), LedgerError::NotActive { .. }));
        assert_eq!(s.balance("vault"), 900);
        assert_eq!(s.supply(), 900);
    }

    /// Test: A frozen output cannot be spent by its owner
    #[test]
    fn test_spend_frozen_utxo() {
        let s = stack();
        let minted = s.mint("tx-1", &[OutputSpec::new("mallory", 40)]).unwrap();
        let id = minted.created[0].clone();
        let freeze = ActionRequest::FreezeAccount {
            target: FreezeTarget::Utxo(id.clone()),
            reason: "investigation".into(),
        };
        s.act("tx-2", freeze, "compliance").unwrap();

        let err = s
            .transfer("tx-3", "mallory", &[id], &[OutputSpec::new("user2", 40)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotActive { status: UtxoStatus::Frozen, .. }));
        assert_eq!(s.supply(), 40);
        assert!(s.ledger.audit_supply().unwrap().consistent);
    }
}
