//! Treasury state
//!
//! Complete in-memory state of the agent treasury: all agents, the
//! creation-ordered transaction ledger, and the narration feed. The state
//! is owned by a single coordinator (`Treasury`); nothing else mutates it.
//!
//! # Critical Invariants
//!
//! 1. **Balance Conservation**: confirmed settlements never change the sum
//!    of agent balances (external top-ups are explicitly additive)
//! 2. **Transaction Uniqueness**: each transaction ID appears exactly once
//! 3. **Creation Ordering**: ledger and feed order equals commit order

use crate::models::agent::Agent;
use crate::models::log::LogFeed;
use crate::models::transaction::Transaction;
use std::collections::HashMap;

/// Complete treasury state
///
/// # Example
///
/// ```
/// use agent_treasury_core_rs::{seed, TreasuryState};
///
/// let state = TreasuryState::new(seed::initial_agents());
/// assert_eq!(state.num_agents(), 3);
/// assert_eq!(state.total_balance(), 7_050);
/// ```
#[derive(Debug, Clone)]
pub struct TreasuryState {
    /// All agents, indexed by ID
    agents: HashMap<String, Agent>,

    /// Agent IDs in provisioning order (stable display order)
    roster: Vec<String>,

    /// Transaction ledger in creation order
    transactions: Vec<Transaction>,

    /// Append-only narration feed
    logs: LogFeed,

    /// Next transaction sequence number
    next_tx_seq: u64,
}

impl TreasuryState {
    /// Create a new state with the given agents
    ///
    /// # Panics
    /// Panics on duplicate agent IDs.
    pub fn new(agents: Vec<Agent>) -> Self {
        let mut map = HashMap::new();
        let mut roster = Vec::new();
        for agent in agents {
            let id = agent.id().to_string();
            assert!(
                map.insert(id.clone(), agent).is_none(),
                "Agent ID {} already exists",
                id
            );
            roster.push(id);
        }
        Self {
            agents: map,
            roster,
            transactions: Vec::new(),
            logs: LogFeed::new(),
            next_tx_seq: 1,
        }
    }

    /// Get reference to an agent by ID
    pub fn get_agent(&self, id: &str) -> Option<&Agent> {
        self.agents.get(id)
    }

    /// Get mutable reference to an agent by ID
    pub fn get_agent_mut(&mut self, id: &str) -> Option<&mut Agent> {
        self.agents.get_mut(id)
    }

    /// Get mutable references to two distinct agents at once
    ///
    /// Returns `None` if either ID is unknown or both IDs are equal.
    /// Needed so the settlement applier can mutate source and destination
    /// in one atomic call.
    pub fn agent_pair_mut(&mut self, a: &str, b: &str) -> Option<(&mut Agent, &mut Agent)> {
        if a == b {
            return None;
        }
        let mut first = None;
        let mut second = None;
        for (id, agent) in self.agents.iter_mut() {
            if id == a {
                first = Some(agent);
            } else if id == b {
                second = Some(agent);
            }
        }
        Some((first?, second?))
    }

    /// Iterate agents in provisioning order
    pub fn agents_ordered(&self) -> impl Iterator<Item = &Agent> {
        self.roster
            .iter()
            .filter_map(move |id| self.agents.get(id))
    }

    /// Agent IDs in provisioning order
    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    /// Number of agents in the system
    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    /// Sum of all agent balances (for conservation checks)
    pub fn total_balance(&self) -> i64 {
        self.agents.values().map(|agent| agent.balance()).sum()
    }

    /// Allocate the next sequence-ordered transaction ID
    pub fn allocate_tx_id(&mut self) -> String {
        let id = format!("tx_{:08}", self.next_tx_seq);
        self.next_tx_seq += 1;
        id
    }

    /// Current value of the transaction sequence counter
    pub fn next_tx_seq(&self) -> u64 {
        self.next_tx_seq
    }

    /// Append a resolved transaction to the ledger
    ///
    /// # Panics
    /// Panics if the transaction ID already exists (duplicate record).
    pub fn record_transaction(&mut self, transaction: Transaction) {
        assert!(
            !self
                .transactions
                .iter()
                .any(|tx| tx.id() == transaction.id()),
            "Transaction ID {} already exists",
            transaction.id()
        );
        self.transactions.push(transaction);
    }

    /// Transaction ledger in creation order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Look up a transaction by ID
    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id() == id)
    }

    /// Narration feed
    pub fn logs(&self) -> &LogFeed {
        &self.logs
    }

    pub(crate) fn logs_mut(&mut self) -> &mut LogFeed {
        &mut self.logs
    }

    pub(crate) fn restore(
        &mut self,
        agents: Vec<Agent>,
        transactions: Vec<Transaction>,
        next_tx_seq: u64,
    ) {
        let mut map = HashMap::new();
        let mut roster = Vec::new();
        for agent in agents {
            let id = agent.id().to_string();
            map.insert(id.clone(), agent);
            roster.push(id);
        }
        self.agents = map;
        self.roster = roster;
        self.transactions = transactions;
        self.next_tx_seq = next_tx_seq;
        self.logs.clear();
    }
}
