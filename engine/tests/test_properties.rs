//! Property tests for the treasury invariants
//!
//! Randomized submission streams against the demo roster: internal
//! transfers conserve the total balance, rejections never mutate state,
//! the daily limit is never overshot, and evaluation is pure.

use agent_treasury_core_rs::core::time::ManualClock;
use agent_treasury_core_rs::policy::evaluate;
use agent_treasury_core_rs::{seed, PaymentRequest, Treasury};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

const ROSTER: [&str; 3] = ["ag_1", "ag_2", "ag_3"];
const CATEGORIES: [&str; 6] = [
    "Dataset",
    "Compute",
    "Storage",
    "Infrastructure",
    "Power",
    "Maintenance",
];

fn arb_request() -> impl Strategy<Value = PaymentRequest> {
    (0..3usize, 0..3usize, 1..3_000i64, 0..CATEGORIES.len()).prop_filter_map(
        "self transfers are hard errors",
        |(from, to, amount, category)| {
            if from == to {
                return None;
            }
            Some(PaymentRequest {
                from_agent_id: ROSTER[from].to_string(),
                to_agent_id: ROSTER[to].to_string(),
                amount,
                category: CATEGORIES[category].to_string(),
                description: "Property stream".to_string(),
            })
        },
    )
}

fn seeded_treasury() -> Treasury {
    Treasury::with_clock(seed::initial_agents(), Arc::new(ManualClock::new(1_000)))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_internal_transfers_conserve_total_balance(
        requests in proptest::collection::vec(arb_request(), 1..40)
    ) {
        let mut treasury = seeded_treasury();
        let total = treasury.state().total_balance();

        for request in requests {
            treasury.submit_payment(request).unwrap();
            prop_assert_eq!(treasury.state().total_balance(), total);
        }
    }

    #[test]
    fn prop_rejections_leave_agents_untouched(request in arb_request()) {
        let mut treasury = seeded_treasury();
        let before = treasury.snapshot();

        let outcome = treasury.submit_payment(request).unwrap();
        if !outcome.is_settled() {
            let after = treasury.snapshot();
            prop_assert_eq!(&before.agents, &after.agents);
        }
    }

    #[test]
    fn prop_spent_today_never_exceeds_the_limit(
        requests in proptest::collection::vec(arb_request(), 1..60)
    ) {
        let mut treasury = seeded_treasury();

        for request in requests {
            treasury.submit_payment(request).unwrap();
        }

        for id in ROSTER {
            let agent = treasury.state().get_agent(id).unwrap();
            prop_assert!(agent.spent_today() <= agent.rules().daily_limit);
            prop_assert!(agent.balance() >= 0);
        }
    }

    #[test]
    fn prop_evaluation_is_pure_and_repeatable(
        amount in 1..5_000i64,
        category in 0..CATEGORIES.len()
    ) {
        let treasury = seeded_treasury();
        let agent = treasury.state().get_agent("ag_1").unwrap();

        let first = evaluate(agent, amount, CATEGORIES[category]);
        let second = evaluate(agent, amount, CATEGORIES[category]);
        prop_assert_eq!(first, second);
        prop_assert_eq!(agent.balance(), 5_000);
        prop_assert_eq!(agent.spent_today(), 120);
    }

    #[test]
    fn prop_every_submission_is_recorded(
        requests in proptest::collection::vec(arb_request(), 1..40)
    ) {
        let mut treasury = seeded_treasury();
        let count = requests.len();

        for request in requests {
            treasury.submit_payment(request).unwrap();
        }

        // Settled, rejected or failed: the ledger never drops an attempt.
        prop_assert_eq!(treasury.state().transactions().len(), count);
        for tx in treasury.state().transactions() {
            prop_assert!(tx.is_terminal());
        }
    }
}
