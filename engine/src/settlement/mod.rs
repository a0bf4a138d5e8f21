//! Settlement applier
//!
//! Applies an admitted payment to both parties: debit the source, bump its
//! daily-spend counter, credit the destination, and confirm the
//! transaction record.
//!
//! # Critical Invariants
//!
//! - **Atomicity**: every fallible check precedes the first mutation, so a
//!   settlement either applies completely or leaves no trace
//! - **Balance Conservation**: a confirmed settlement moves `amount` from
//!   source to destination and creates or destroys no value
//! - **Fail Closed**: the applier re-checks balance and daily limit even
//!   though the caller already obtained `Admit`; stale evaluations under
//!   interleaved mutation are refused, never partially applied

use crate::models::agent::{Agent, AgentError};
use crate::models::transaction::{Transaction, TransactionError};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors that can occur during settlement application
///
/// `InsufficientFunds` and `DailyLimitExceeded` out of this module signal
/// a settlement conflict: the agent's state no longer matches the
/// evaluation the caller admitted against.
#[derive(Debug, Error, PartialEq)]
pub enum SettlementError {
    #[error("Insufficient funds at settlement time: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Daily limit exceeded at settlement time: spent {spent_today} + {amount} > limit {daily_limit}")]
    DailyLimitExceeded {
        spent_today: i64,
        daily_limit: i64,
        amount: i64,
    },

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),
}

/// Apply a settlement to both parties and confirm the transaction
///
/// Preconditions: the caller obtained `Admit` from the policy evaluator
/// for this exact (source, amount, category) tuple. The applier does not
/// re-derive admission but defensively re-checks daily limit and balance
/// and fails closed if the state changed since evaluation.
///
/// On `Ok(())`: source debited, source `spent_today` incremented,
/// destination credited, transaction Confirmed at `timestamp`. On any
/// `Err`: no state was modified.
///
/// # Example
///
/// ```
/// use agent_treasury_core_rs::settlement::{settlement_hash, try_settle};
/// use agent_treasury_core_rs::{Agent, AgentRole, SpendingRule, Transaction};
///
/// let rules = SpendingRule {
///     daily_limit: 1_000,
///     allowed_categories: vec!["Dataset".to_string()],
///     require_approval_above: 2_000,
/// };
/// let mut source = Agent::new(
///     "ag_1".to_string(), "Alpha".to_string(), AgentRole::Researcher,
///     "0xA".to_string(), 5_000, rules.clone(),
/// );
/// let mut destination = Agent::new(
///     "ag_2".to_string(), "Omni".to_string(), AgentRole::DataProvider,
///     "0xB".to_string(), 1_200, rules,
/// );
/// let mut tx = Transaction::new(
///     "tx_00000001".to_string(), "ag_1".to_string(), "ag_2".to_string(),
///     200, "Dataset".to_string(), "Auto-Payment: Market Data".to_string(),
///     1_000, settlement_hash("tx_00000001", "ag_1", "ag_2", 200, 1_000),
/// );
///
/// try_settle(&mut source, &mut destination, &mut tx, 1_000).unwrap();
/// assert_eq!(source.balance(), 4_800);
/// assert_eq!(destination.balance(), 1_400);
/// assert!(tx.is_confirmed());
/// ```
pub fn try_settle(
    source: &mut Agent,
    destination: &mut Agent,
    transaction: &mut Transaction,
    timestamp: u64,
) -> Result<(), SettlementError> {
    if transaction.is_terminal() {
        return Err(SettlementError::Transaction(
            TransactionError::AlreadyResolved,
        ));
    }

    let amount = transaction.amount();

    // Defensive re-checks: fail closed before touching anything
    if !source.within_daily_limit(amount) {
        return Err(SettlementError::DailyLimitExceeded {
            spent_today: source.spent_today(),
            daily_limit: source.rules().daily_limit,
            amount,
        });
    }
    if !source.can_pay(amount) {
        return Err(SettlementError::InsufficientFunds {
            required: amount,
            available: source.balance(),
        });
    }

    // All checks passed; the remaining sequence cannot fail, so the
    // mutation is all-or-nothing per call.
    source.debit(amount)?;
    source.record_spend(amount);
    destination.credit(amount);
    transaction.confirm(timestamp)?;

    Ok(())
}

/// Generate the opaque settlement reference for a transaction
///
/// A "0x"-prefixed 64-hex-char digest over the transaction's identifying
/// fields. Display-only: downstream collaborators render it like an
/// on-chain hash, but it commits to nothing.
pub fn settlement_hash(
    tx_id: &str,
    from_agent_id: &str,
    to_agent_id: &str,
    amount: i64,
    timestamp: u64,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(tx_id.as_bytes());
    hasher.update(from_agent_id.as_bytes());
    hasher.update(to_agent_id.as_bytes());
    hasher.update(amount.to_be_bytes());
    hasher.update(timestamp.to_be_bytes());
    format!("0x{:x}", hasher.finalize())
}
