//! Integration tests for state snapshots
//!
//! Snapshots round-trip through JSON, hash to a canonical digest that is
//! insensitive to serialization order, and validate conservation across
//! a session.

use agent_treasury_core_rs::core::time::ManualClock;
use agent_treasury_core_rs::treasury::snapshot::{state_hash, validate_snapshot, StateSnapshot};
use agent_treasury_core_rs::{seed, PaymentRequest, Treasury};
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

fn seeded_treasury() -> Treasury {
    Treasury::with_clock(seed::initial_agents(), Arc::new(ManualClock::new(1_000)))
}

fn payment(from: &str, to: &str, amount: i64, category: &str) -> PaymentRequest {
    PaymentRequest {
        from_agent_id: from.to_string(),
        to_agent_id: to.to_string(),
        amount,
        category: category.to_string(),
        description: "Snapshot test".to_string(),
    }
}

// ============================================================================
// JSON round-trip
// ============================================================================

#[test]
fn test_snapshot_round_trips_through_json() {
    let mut treasury = seeded_treasury();
    treasury
        .submit_payment(payment("ag_1", "ag_2", 200, "Dataset"))
        .unwrap();

    let snapshot = treasury.snapshot();
    let json = snapshot.to_json().unwrap();
    let restored = StateSnapshot::from_json(&json).unwrap();

    assert_eq!(restored.agents.len(), 3);
    assert_eq!(restored.transactions.len(), 1);
    assert_eq!(restored.next_tx_seq, snapshot.next_tx_seq);
    assert_eq!(state_hash(&snapshot).unwrap(), state_hash(&restored).unwrap());
}

#[test]
fn test_snapshot_preserves_roster_order() {
    let treasury = seeded_treasury();
    let snapshot = treasury.snapshot();

    let ids: Vec<&str> = snapshot.agents.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["ag_1", "ag_2", "ag_3"]);
}

// ============================================================================
// Canonical digest
// ============================================================================

#[test]
fn test_state_hash_is_stable_for_identical_states() {
    let first = seeded_treasury();
    let second = seeded_treasury();

    assert_eq!(first.state_hash().unwrap(), second.state_hash().unwrap());
}

#[test]
fn test_state_hash_changes_with_the_state() {
    let mut treasury = seeded_treasury();
    let before = treasury.state_hash().unwrap();

    treasury
        .submit_payment(payment("ag_1", "ag_2", 200, "Dataset"))
        .unwrap();
    let after = treasury.state_hash().unwrap();

    assert_ne!(before, after);
}

#[test]
fn test_state_hash_restores_after_reset() {
    let mut treasury = seeded_treasury();
    let before = treasury.state_hash().unwrap();

    treasury
        .submit_payment(payment("ag_1", "ag_2", 200, "Dataset"))
        .unwrap();
    treasury.reset();

    assert_eq!(treasury.state_hash().unwrap(), before);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_validation_accepts_a_conserved_session() {
    let mut treasury = seeded_treasury();
    treasury
        .submit_payment(payment("ag_1", "ag_2", 200, "Dataset"))
        .unwrap();
    treasury
        .submit_payment(payment("ag_1", "ag_3", 300, "Compute"))
        .unwrap();

    // Internal transfers conserve the roster total.
    validate_snapshot(&treasury.snapshot(), 7_050).unwrap();
}

#[test]
fn test_validation_rejects_a_balance_mismatch() {
    let treasury = seeded_treasury();
    assert!(validate_snapshot(&treasury.snapshot(), 9_999).is_err());
}

#[test]
fn test_validation_rejects_dangling_agent_references() {
    let treasury = seeded_treasury();
    let mut snapshot = treasury.snapshot();
    snapshot.agents.retain(|a| a.id != "ag_2");

    // ag_2 no longer exists but the seeded roster total changed too, so
    // fix the expectation to isolate the reference check.
    let total: i64 = snapshot.agents.iter().map(|a| a.balance).sum();
    validate_snapshot(&snapshot, total).unwrap();

    // Now add a transaction pointing at the removed agent.
    let mut session = seeded_treasury();
    session
        .submit_payment(payment("ag_1", "ag_2", 200, "Dataset"))
        .unwrap();
    let mut snapshot = session.snapshot();
    snapshot.agents.retain(|a| a.id != "ag_2");
    let total: i64 = snapshot.agents.iter().map(|a| a.balance).sum();
    assert!(validate_snapshot(&snapshot, total).is_err());
}

#[test]
fn test_validation_rejects_duplicate_transaction_ids() {
    let mut treasury = seeded_treasury();
    treasury
        .submit_payment(payment("ag_1", "ag_2", 200, "Dataset"))
        .unwrap();

    let mut snapshot = treasury.snapshot();
    let duplicate = snapshot.transactions[0].clone();
    snapshot.transactions.push(duplicate);

    assert!(validate_snapshot(&snapshot, 7_050).is_err());
}
