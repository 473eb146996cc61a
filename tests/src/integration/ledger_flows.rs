//! # Ledger Flows
//!
//! Conservation and spend-once across sequences of ledger operations.

#[cfg(test)]
mod tests {
    use gd_03_ledger_engine::domain::messages::simple_burn_message;
    use gd_03_ledger_engine::{LedgerAction, LedgerApi, LedgerError, OutputSpec, UtxoStatus};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use shared_types::test_utils::digest_sign;

    use crate::fixtures::{stack, Stack, ISSUER};

    fn active_sum(s: &Stack, owners: &[&str]) -> u64 {
        owners.iter().map(|o| s.balance(o)).sum()
    }

    fn burn_amount(s: &Stack, tx: &str, owner: &str, amount: u64) {
        s.store.set_tx_id(tx);
        let message = simple_burn_message(tx, owner, amount).unwrap();
        let sig = digest_sign(owner, &message, LedgerAction::SimpleBurn.context());
        s.ledger.simple_burn(owner, amount, &sig).unwrap();
    }

    /// Test: Mint 1000, transfer 200, burn 100
    #[test]
    fn test_mint_transfer_burn_scenario() {
        let s = stack();
        let minted = s.mint("tx-1", &[OutputSpec::new(ISSUER, 1000)]).unwrap();
        assert_eq!(s.balance(ISSUER), 1000);
        assert_eq!(s.supply(), 1000);

        s.transfer(
            "tx-2",
            ISSUER,
            &minted.created,
            &[OutputSpec::new("user1", 200), OutputSpec::new(ISSUER, 800)],
        )
        .unwrap();
        assert_eq!(s.balance(ISSUER), 800);
        assert_eq!(s.balance("user1"), 200);
        assert_eq!(s.supply(), 1000);

        burn_amount(&s, "tx-3", "user1", 100);
        assert_eq!(s.balance("user1"), 100);
        assert_eq!(s.supply(), 900);
        assert!(s.ledger.audit_supply().unwrap().consistent);
    }

    /// Test: Burning whole outputs removes their full value from supply
    #[test]
    fn test_burn_whole_outputs() {
        let s = stack();
        let minted = s
            .mint("tx-1", &[OutputSpec::new("user1", 200), OutputSpec::new("user1", 50)])
            .unwrap();
        let receipt = s.burn("tx-2", "user1", &minted.created).unwrap();
        assert_eq!(receipt.amount, 250);
        assert_eq!(receipt.spent.len(), 2);
        assert!(receipt.created.is_empty());
        assert_eq!(s.balance("user1"), 0);
        assert_eq!(s.supply(), 0);
    }

    /// Test: Outputs exceeding inputs are rejected with no status change
    #[test]
    fn test_conservation_violation_changes_nothing() {
        let s = stack();
        let minted = s.mint("tx-1", &[OutputSpec::new("user1", 100_000)]).unwrap();
        let before = s.store.snapshot();

        let err = s
            .transfer("tx-2", "user1", &minted.created, &[OutputSpec::new("user2", 110_000)])
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ConservationViolation {
                inputs: 100_000,
                outputs: 110_000
            }
        ));
        assert_eq!(s.store.snapshot(), before);
        assert_eq!(s.ledger.get_utxo(&minted.created[0]).unwrap().status, UtxoStatus::Active);
    }

    /// Test: A consumed output is never accepted again
    #[test]
    fn test_spend_once() {
        let s = stack();
        let minted = s.mint("tx-1", &[OutputSpec::new("user1", 50)]).unwrap();
        s.transfer("tx-2", "user1", &minted.created, &[OutputSpec::new("user2", 50)])
            .unwrap();

        let err = s
            .transfer("tx-3", "user1", &minted.created, &[OutputSpec::new("user2", 50)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotActive { status: UtxoStatus::Spent, .. }));

        let err = s.burn("tx-4", "user1", &minted.created).unwrap_err();
        assert!(matches!(err, LedgerError::NotActive { .. }));
        assert_eq!(s.supply(), 50);
    }

    /// Test: Supply equals active value after every step of a random walk
    #[test]
    fn test_supply_invariant_random_walk() {
        let s = stack();
        let owners = ["user1", "user2", ISSUER];
        let mut rng = StdRng::seed_from_u64(7);

        for step in 0..40 {
            let tx = format!("tx-{step}");
            let owner = owners[rng.gen_range(0..owners.len())];
            let utxos: Vec<_> = s
                .ledger
                .list_utxos(owner)
                .unwrap()
                .into_iter()
                .filter(|u| u.is_active())
                .collect();

            match (rng.gen_range(0..3), utxos.first()) {
                (1, Some(utxo)) => {
                    let recipient = owners[rng.gen_range(0..owners.len())];
                    let split = rng.gen_range(0..=utxo.amount);
                    let mut outputs = vec![OutputSpec::new(recipient, utxo.amount - split)];
                    if split > 0 {
                        outputs.push(OutputSpec::new(owner, split));
                    }
                    outputs.retain(|o| o.amount > 0);
                    if !outputs.is_empty() {
                        s.transfer(&tx, owner, &[utxo.id.clone()], &outputs).unwrap();
                    }
                }
                (2, Some(utxo)) => {
                    s.burn(&tx, owner, &[utxo.id.clone()]).unwrap();
                }
                _ => {
                    let amount = rng.gen_range(1..10_000);
                    s.mint(&tx, &[OutputSpec::new(owner, amount)]).unwrap();
                }
            }

            assert_eq!(s.supply(), active_sum(&s, &owners), "step {step}");
        }
        assert!(s.ledger.audit_supply().unwrap().consistent);
    }
}
