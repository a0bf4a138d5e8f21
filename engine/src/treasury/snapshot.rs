//! Snapshot - capture and restore treasury state
//!
//! Serializable snapshots back the session reset ("restore the fixed
//! initial snapshot on demand") and give tests a canonical digest to
//! compare states with.
//!
//! # Critical Invariants
//!
//! - **Fidelity**: capture → restore reproduces agents, ledger and the
//!   transaction ID sequence exactly
//! - **Determinism**: the state hash is computed over canonical JSON
//!   (sorted keys), so equal states always hash equal

use crate::models::agent::{Agent, AgentRole, AgentStatus, SpendingRule};
use crate::models::state::TreasuryState;
use crate::models::transaction::{Transaction, TransactionStatus};
use crate::treasury::TreasuryError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete treasury state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// All agent states, in provisioning order
    pub agents: Vec<AgentSnapshot>,

    /// Transaction ledger, in creation order
    pub transactions: Vec<TransactionSnapshot>,

    /// Next transaction sequence number
    pub next_tx_seq: u64,
}

/// Agent state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: String,
    pub name: String,
    pub role: AgentRole,
    pub address: String,
    pub balance: i64,
    pub spent_today: i64,
    pub rules: SpendingRule,
    pub status: AgentStatus,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        AgentSnapshot {
            id: agent.id().to_string(),
            name: agent.name().to_string(),
            role: agent.role(),
            address: agent.address().to_string(),
            balance: agent.balance(),
            spent_today: agent.spent_today(),
            rules: agent.rules().clone(),
            status: agent.status(),
        }
    }
}

impl From<AgentSnapshot> for Agent {
    fn from(snapshot: AgentSnapshot) -> Self {
        Agent::from_snapshot(
            snapshot.id,
            snapshot.name,
            snapshot.role,
            snapshot.address,
            snapshot.balance,
            snapshot.spent_today,
            snapshot.rules,
            snapshot.status,
        )
    }
}

/// Transaction state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSnapshot {
    pub id: String,
    pub from_agent_id: String,
    pub to_agent_id: String,
    pub amount: i64,
    pub category: String,
    pub description: String,
    pub timestamp: u64,
    pub status: TransactionStatus,
    pub hash: String,
}

impl From<&Transaction> for TransactionSnapshot {
    fn from(tx: &Transaction) -> Self {
        TransactionSnapshot {
            id: tx.id().to_string(),
            from_agent_id: tx.from_agent_id().to_string(),
            to_agent_id: tx.to_agent_id().to_string(),
            amount: tx.amount(),
            category: tx.category().to_string(),
            description: tx.description().to_string(),
            timestamp: tx.timestamp(),
            status: tx.status().clone(),
            hash: tx.hash().to_string(),
        }
    }
}

impl From<TransactionSnapshot> for Transaction {
    fn from(snapshot: TransactionSnapshot) -> Self {
        Transaction::from_snapshot(
            snapshot.id,
            snapshot.from_agent_id,
            snapshot.to_agent_id,
            snapshot.amount,
            snapshot.category,
            snapshot.description,
            snapshot.timestamp,
            snapshot.status,
            snapshot.hash,
        )
    }
}

impl StateSnapshot {
    /// Capture the current state
    pub fn capture(state: &TreasuryState) -> Self {
        StateSnapshot {
            agents: state.agents_ordered().map(AgentSnapshot::from).collect(),
            transactions: state
                .transactions()
                .iter()
                .map(TransactionSnapshot::from)
                .collect(),
            next_tx_seq: state.next_tx_seq(),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, TreasuryError> {
        serde_json::to_string(self).map_err(|e| TreasuryError::Serialization(e.to_string()))
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, TreasuryError> {
        serde_json::from_str(json).map_err(|e| TreasuryError::Serialization(e.to_string()))
    }
}

// ============================================================================
// Hashing
// ============================================================================

/// Compute a canonical SHA256 digest of a snapshot
///
/// Serializes with recursively sorted object keys so the digest is stable
/// regardless of map iteration order.
pub fn state_hash(snapshot: &StateSnapshot) -> Result<String, TreasuryError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(snapshot)
        .map_err(|e| TreasuryError::Serialization(e.to_string()))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| TreasuryError::Serialization(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation
// ============================================================================

/// Validate snapshot integrity
///
/// Checks:
/// - total balance matches the expected figure
/// - transaction IDs are unique
/// - every transaction references agents present in the snapshot
pub fn validate_snapshot(
    snapshot: &StateSnapshot,
    expected_total_balance: i64,
) -> Result<(), TreasuryError> {
    let total_balance: i64 = snapshot.agents.iter().map(|a| a.balance).sum();
    if total_balance != expected_total_balance {
        return Err(TreasuryError::StateValidation(format!(
            "Balance conservation violated: expected {}, got {}",
            expected_total_balance, total_balance
        )));
    }

    let agent_ids: HashSet<&str> = snapshot.agents.iter().map(|a| a.id.as_str()).collect();
    let mut tx_ids = HashSet::new();
    for tx in &snapshot.transactions {
        if !tx_ids.insert(tx.id.as_str()) {
            return Err(TreasuryError::StateValidation(format!(
                "Duplicate transaction ID: {}",
                tx.id
            )));
        }
        if !agent_ids.contains(tx.from_agent_id.as_str())
            || !agent_ids.contains(tx.to_agent_id.as_str())
        {
            return Err(TreasuryError::StateValidation(format!(
                "Transaction {} references an unknown agent",
                tx.id
            )));
        }
    }

    Ok(())
}
