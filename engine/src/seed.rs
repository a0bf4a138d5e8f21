//! Canonical demo roster and transaction history
//!
//! Fixed seed data for demos and tests: three agents with distinct roles
//! and spending rules, plus two already-confirmed transactions forming
//! the opening ledger. Balances are i64 MNEE base units.

use crate::models::agent::{Agent, AgentRole, SpendingRule};
use crate::models::transaction::{Transaction, TransactionStatus};
use crate::settlement::settlement_hash;

/// Timestamp given to the first seeded transaction (ms)
const SEED_EPOCH_MS: u64 = 1_760_000_000_000;

/// The three-agent demo roster
///
/// Total balance across the roster is 7,050 MNEE.
///
/// # Example
///
/// ```
/// use agent_treasury_core_rs::seed;
///
/// let agents = seed::initial_agents();
/// assert_eq!(agents.len(), 3);
/// assert_eq!(agents.iter().map(|a| a.balance()).sum::<i64>(), 7_050);
/// ```
pub fn initial_agents() -> Vec<Agent> {
    vec![
        Agent::new(
            "ag_1".to_string(),
            "Alpha Research Unit".to_string(),
            AgentRole::Researcher,
            "0x71C...9A21".to_string(),
            5_000,
            SpendingRule {
                daily_limit: 1_000,
                allowed_categories: vec![
                    "Dataset".to_string(),
                    "Compute".to_string(),
                    "Storage".to_string(),
                ],
                require_approval_above: 2_000,
            },
        )
        .with_spent_today(120),
        Agent::new(
            "ag_2".to_string(),
            "Omni Data Source".to_string(),
            AgentRole::DataProvider,
            "0xB23...11F9".to_string(),
            1_200,
            SpendingRule {
                daily_limit: 500,
                allowed_categories: vec!["Infrastructure".to_string()],
                require_approval_above: 500,
            },
        ),
        Agent::new(
            "ag_3".to_string(),
            "GPU Cluster Delta".to_string(),
            AgentRole::ComputeProvider,
            "0x99A...44C2".to_string(),
            850,
            SpendingRule {
                daily_limit: 2_000,
                allowed_categories: vec!["Power".to_string(), "Maintenance".to_string()],
                require_approval_above: 1_000,
            },
        )
        .with_spent_today(50),
    ]
}

/// The two confirmed transactions forming the opening ledger
///
/// IDs are `tx_00000001` and `tx_00000002`, matching the sequence the
/// treasury continues from when seeded via `Treasury::with_history`.
pub fn initial_history() -> Vec<Transaction> {
    let first_ts = SEED_EPOCH_MS;
    let second_ts = SEED_EPOCH_MS + 3_600_000;
    vec![
        seeded_transaction(
            "tx_00000001",
            "ag_1",
            "ag_2",
            150,
            "Dataset",
            "Purchase: Q3 Financial Dataset",
            first_ts,
        ),
        seeded_transaction(
            "tx_00000002",
            "ag_1",
            "ag_3",
            400,
            "Compute",
            "Lease: H100 GPU Instance (1hr)",
            second_ts,
        ),
    ]
}

fn seeded_transaction(
    id: &str,
    from: &str,
    to: &str,
    amount: i64,
    category: &str,
    description: &str,
    timestamp: u64,
) -> Transaction {
    let hash = settlement_hash(id, from, to, amount, timestamp);
    Transaction::from_snapshot(
        id.to_string(),
        from.to_string(),
        to.to_string(),
        amount,
        category.to_string(),
        description.to_string(),
        timestamp,
        TransactionStatus::Confirmed { timestamp },
        hash,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_ids_are_unique() {
        let agents = initial_agents();
        let mut ids: Vec<&str> = agents.iter().map(|a| a.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), agents.len());
    }

    #[test]
    fn test_history_references_roster_agents() {
        let agents = initial_agents();
        for tx in initial_history() {
            assert!(agents.iter().any(|a| a.id() == tx.from_agent_id()));
            assert!(agents.iter().any(|a| a.id() == tx.to_agent_id()));
            assert!(tx.is_confirmed());
            assert!(tx.hash().starts_with("0x"));
        }
    }

    #[test]
    fn test_roster_rules_permit_demo_scenarios() {
        let agents = initial_agents();
        let researcher = agents.iter().find(|a| a.id() == "ag_1").unwrap();
        assert!(researcher.rules().allows_category("Dataset"));
        assert!(researcher.rules().allows_category("Compute"));
        assert!(!researcher.rules().allows_category("Power"));
    }
}
