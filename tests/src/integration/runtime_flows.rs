//! # Runtime Flows
//!
//! Requests as JSON text through the dispatcher, signed with Dilithium2.

#[cfg(test)]
mod tests {
    use contract_runtime::{request_message, REQUEST_CONTEXT};
    use gd_02_commitment_tracker::TranscriptProver;
    use gd_03_ledger_engine::domain::messages;
    use gd_03_ledger_engine::{LedgerAction, OutputSpec};
    use gd_04_governance::{
        direct_action_message, ActionRequest, FreezeTarget, GovernanceProposal, ProposalPayload, ProposalType,
        APPROVE_CONTEXT,
    };
    use serde_json::{json, Value};
    use shared_types::{ContractRequest, ContractResponse, ErrorCategory};

    use crate::fixtures::{dilithium_contract, DilithiumHarness, ISSUER, T0};

    fn send(h: &DilithiumHarness, tx: &str, request: ContractRequest) -> ContractResponse {
        h.store.set_tx_id(tx);
        let wire = serde_json::to_string(&request).unwrap();
        serde_json::from_str(&h.contract.handle_json(&wire)).unwrap()
    }

    fn signed(h: &DilithiumHarness, operation: &str, actor: &str, payload: Value, message: &[u8], context: &str) -> ContractRequest {
        let sig = h.signer(actor).sign_with_context(message, context.as_bytes()).unwrap();
        ContractRequest::new(operation, actor)
            .with_payload(payload)
            .with_signature(sig)
    }

    fn enveloped(h: &DilithiumHarness, tx: &str, operation: &str, actor: &str, payload: Value) -> ContractResponse {
        let message = request_message(tx, operation, actor, &payload).unwrap();
        let request = signed(h, operation, actor, payload, &message, REQUEST_CONTEXT);
        send(h, tx, request)
    }

    fn query(h: &DilithiumHarness, operation: &str, payload: Value) -> Value {
        let resp = send(h, "tx-query", ContractRequest::new(operation, "").with_payload(payload));
        assert!(resp.success, "{operation}: {:?}", resp.error);
        resp.data.unwrap()
    }

    fn mint(h: &DilithiumHarness, tx: &str, owner: &str, amount: u64) {
        let outputs = vec![OutputSpec::new(owner, amount)];
        let message = messages::mint_message(tx, ISSUER, &outputs).unwrap();
        let request = signed(h, "Mint", ISSUER, json!({ "outputs": outputs }), &message, LedgerAction::Mint.context());
        let resp = send(h, tx, request);
        assert!(resp.success, "{:?}", resp.error);
    }

    /// Test: Redemption passed by quorum, driven entirely over the JSON wire
    #[test]
    fn test_redeem_proposal_over_wire() {
        let h = dilithium_contract();
        mint(&h, "tx-1", "user1", 2_000);

        let payload = json!({
            "proposal_type": ProposalType::Redeem,
            "payload": ProposalPayload::Redeem {
                user_id: "user1".into(),
                amount: 500,
                bank_reference: "WIRE-77".into(),
            },
        });
        let resp = enveloped(&h, "tx-2", "CreateProposal", "admin", payload);
        assert!(resp.success, "{:?}", resp.error);
        let proposal: GovernanceProposal = serde_json::from_value(resp.data.unwrap()).unwrap();
        let message = proposal.signing_message().unwrap();

        for (tx, signer) in [("tx-3", "admin"), ("tx-4", "auditor")] {
            let request = signed(&h, "ApproveProposal", signer, json!({ "proposal_id": proposal.id }), &message, APPROVE_CONTEXT);
            assert!(send(&h, tx, request).success);
        }

        let resp = enveloped(&h, "tx-5", "ExecuteProposal", "auditor", json!({ "proposal_id": proposal.id }));
        assert!(resp.success, "{:?}", resp.error);
        let data = resp.data.unwrap();
        assert_eq!(data["proposal"]["status"], "executed");
        assert_eq!(data["outcome"]["outcome"], "redeemed");

        let redemption_id = data["outcome"]["record"]["redemption_id"].clone();
        let record = query(&h, "GetRedemption", json!({ "redemption_id": redemption_id }));
        assert_eq!(record["bank_reference"], "WIRE-77");
        assert_eq!(query(&h, "GetBalance", json!({ "owner": "user1" }))["balance"], 1_500);
        assert_eq!(query(&h, "GetTotalSupply", Value::Null)["total_supply"], 1_500);
        assert_eq!(query(&h, "AuditSupply", Value::Null)["consistent"], true);
    }

    /// Test: Proof submitted over the wire backs a signed reserve attestation
    #[test]
    fn test_attestation_over_wire() {
        let h = dilithium_contract();
        mint(&h, "tx-1", "user1", 1_000);

        let proof = TranscriptProver.prove(vec!["reserve:1000".into()], "null-r1", T0);
        let resp = send(&h, "tx-2", ContractRequest::new("VerifyProof", "auditor").with_payload(json!(proof)));
        assert!(resp.success, "{:?}", resp.error);

        let request = ActionRequest::AttestReserve {
            reserve_amount: 1_000,
            report_hash: "sha3:audit-2024".into(),
            commitment: Some(proof.commitment.clone()),
        };
        let message = direct_action_message("tx-3", "auditor", &request).unwrap();
        let payload = json!({
            "reserve_amount": 1_000,
            "report_hash": "sha3:audit-2024",
            "commitment": proof.commitment,
        });
        let signed_request = signed(&h, "AttestReserve", "auditor", payload, &message, request.action().context());
        let resp = send(&h, "tx-3", signed_request);
        assert!(resp.success, "{:?}", resp.error);

        let latest = query(&h, "GetLatestAttestation", Value::Null);
        assert_eq!(latest["collateral_ratio_bps"], 10_000);
        let commitment = query(&h, "GetCommitment", json!({ "commitment": proof.commitment }));
        assert_eq!(commitment["used"], true);
    }

    /// Test: A user key cannot drive a privileged action
    #[test]
    fn test_user_key_cannot_freeze() {
        let h = dilithium_contract();
        let request = ActionRequest::FreezeAccount {
            target: FreezeTarget::Account("admin".into()),
            reason: "takeover".into(),
        };
        let message = direct_action_message("tx-1", "user1", &request).unwrap();
        let payload = json!({ "target": { "account": "admin" }, "reason": "takeover" });
        let resp = send(&h, "tx-1", signed(&h, "FreezeAccount", "user1", payload, &message, request.action().context()));
        assert_eq!(resp.error_category(), Some(ErrorCategory::Authorization));
        assert_eq!(query(&h, "GetAccount", json!({ "account_id": "admin" }))["frozen"], false);
    }
}
