//! # Commitment Flows
//!
//! Nullifier uniqueness and commitment consumption by reserve attestations.

#[cfg(test)]
mod tests {
    use gd_02_commitment_tracker::{CommitmentError, CommitmentTrackerApi, TranscriptProver};
    use gd_03_ledger_engine::OutputSpec;
    use gd_04_governance::{ActionOutcome, ActionRequest, GovernanceApi, GovernanceError};

    use crate::fixtures::{stack, T0};

    fn attest(commitment: &str, reserve_amount: u64) -> ActionRequest {
        ActionRequest::AttestReserve {
            reserve_amount,
            report_hash: "sha3:report-q3".into(),
            commitment: Some(commitment.to_string()),
        }
    }

    /// Test: A nullifier is accepted once across distinct commitments
    #[test]
    fn test_nullifier_reuse_rejected() {
        let s = stack();
        s.store.set_tx_id("tx-zk1");
        let first = TranscriptProver.prove(vec!["reserve:5000".into()], "null-1", T0);
        s.tracker.verify_and_store(&first).unwrap();

        s.store.set_tx_id("tx-zk2");
        let second = TranscriptProver.prove(vec!["reserve:6000".into()], "null-1", T0);
        assert_ne!(first.commitment, second.commitment);
        let err = s.tracker.verify_and_store(&second).unwrap_err();
        assert!(matches!(err, CommitmentError::NullifierReused(_)));

        assert!(s.tracker.is_nullifier_used("null-1").unwrap());
        assert!(s.tracker.get_commitment(&second.commitment).is_err());
        assert!(s.tracker.audit_nullifiers().unwrap().is_consistent());
    }

    /// Test: An attestation consumes its commitment; reuse fails after cooldown
    #[test]
    fn test_attestation_consumes_commitment_once() {
        let s = stack();
        s.mint("tx-1", &[OutputSpec::new("user1", 4_000)]).unwrap();

        s.store.set_tx_id("tx-zk");
        let proof = TranscriptProver.prove(vec!["reserve:5000".into()], "null-a", T0);
        let record = s.tracker.verify_and_store(&proof).unwrap();
        assert!(!record.used);

        let outcome = s.act("tx-att", attest(&proof.commitment, 5_000), "auditor").unwrap();
        let ActionOutcome::Attested { record: attestation } = outcome else {
            panic!("expected attestation outcome");
        };
        assert_eq!(attestation.total_supply, 4_000);
        assert_eq!(attestation.collateral_ratio_bps, Some(12_500));
        assert!(attestation.is_fully_collateralized());
        assert_eq!(s.gov.latest_attestation().unwrap(), Some(attestation));

        let stored = s.tracker.get_commitment(&proof.commitment).unwrap();
        assert!(stored.used);
        assert_eq!(stored.transaction_id, "tx-att");

        s.clock.advance(21_600);
        let err = s.act("tx-att2", attest(&proof.commitment, 5_000), "auditor").unwrap_err();
        assert!(matches!(err, GovernanceError::Commitment(CommitmentError::AlreadyUsed(_))));
    }

    /// Test: Attestations are rate limited globally
    #[test]
    fn test_attestation_cooldown() {
        let s = stack();
        let request = ActionRequest::AttestReserve {
            reserve_amount: 0,
            report_hash: "sha3:report".into(),
            commitment: None,
        };
        s.act("tx-att", request.clone(), "auditor").unwrap();
        let err = s.act("tx-att2", request, "auditor").unwrap_err();
        assert!(matches!(err, GovernanceError::CooldownViolation { .. }));
    }
}
