//! Transaction model
//!
//! Represents a payment between two agents. Each transaction has:
//! - Source and destination agent IDs
//! - Amount (i64 MNEE base units)
//! - Category label (checked against the source's allow-list)
//! - Description and creation timestamp (milliseconds)
//! - Status (Pending, Confirmed, Failed, Rejected)
//! - An opaque settlement hash (display-only)
//!
//! Pending is the only non-terminal status: a transaction is evaluated
//! once and immediately resolved to Confirmed, Failed or Rejected.
//!
//! CRITICAL: All money values are i64 (MNEE base units)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a proposed payment was refused by the spending policy
///
/// Policy rejections are expected outcomes, returned as values and
/// recorded on the transaction itself; they are never raised as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PolicyViolation {
    #[error("Source agent is not active")]
    AgentInactive,

    #[error("Category '{category}' is not on the agent's allow-list")]
    CategoryNotAllowed { category: String },

    #[error("Daily limit exceeded: spent {spent_today} + {amount} > limit {daily_limit}")]
    DailyLimitExceeded {
        spent_today: i64,
        daily_limit: i64,
        amount: i64,
    },

    #[error("Insufficient funds: balance {balance} < amount {amount}")]
    InsufficientFunds { balance: i64, amount: i64 },

    #[error("Amount {amount} exceeds approval threshold {threshold} and no approval was supplied")]
    ApprovalRequired { amount: i64, threshold: i64 },
}

/// Transaction status
///
/// Confirmed, Failed and Rejected are terminal; status transition methods
/// refuse to move a transaction out of a terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Intent recorded, not yet resolved
    Pending,

    /// Settlement applied to both parties' balances
    Confirmed {
        /// Millisecond timestamp of settlement
        timestamp: u64,
    },

    /// Settlement failed after admission (e.g., unresolved conflict with a
    /// concurrent modification)
    Failed { reason: String },

    /// Refused by the spending policy; no balances were touched
    Rejected { reason: PolicyViolation },
}

/// Errors that can occur during transaction status transitions
#[derive(Debug, Error, PartialEq)]
pub enum TransactionError {
    #[error("Transaction is already in a terminal state")]
    AlreadyResolved,
}

/// Represents a payment between two agents
///
/// # Example
/// ```
/// use agent_treasury_core_rs::Transaction;
///
/// let mut tx = Transaction::new(
///     "tx_00000001".to_string(),
///     "ag_1".to_string(),
///     "ag_2".to_string(),
///     200,
///     "Dataset".to_string(),
///     "Auto-Payment: Market Data".to_string(),
///     1_700_000_000_000,
///     "0xab...cd".to_string(),
/// );
/// assert!(tx.is_pending());
///
/// tx.confirm(1_700_000_000_500).unwrap();
/// assert!(tx.is_confirmed());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sequence-ordered identifier (e.g., "tx_00000042")
    id: String,

    /// Source agent ID
    from_agent_id: String,

    /// Destination agent ID
    to_agent_id: String,

    /// Payment amount (i64 MNEE base units, always positive)
    amount: i64,

    /// Category label the payment was proposed under
    category: String,

    /// Human-readable description
    description: String,

    /// Creation timestamp (milliseconds)
    timestamp: u64,

    /// Current status
    status: TransactionStatus,

    /// Opaque settlement reference ("0x" + 64 hex chars, display-only;
    /// not a cryptographic commitment)
    hash: String,
}

impl Transaction {
    /// Create a new pending transaction
    ///
    /// # Panics
    /// Panics if `amount` is not strictly positive.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        from_agent_id: String,
        to_agent_id: String,
        amount: i64,
        category: String,
        description: String,
        timestamp: u64,
        hash: String,
    ) -> Self {
        assert!(amount > 0, "amount must be positive");
        Self {
            id,
            from_agent_id,
            to_agent_id,
            amount,
            category,
            description,
            timestamp,
            status: TransactionStatus::Pending,
            hash,
        }
    }

    /// Restore a transaction from snapshot fields, preserving status
    #[allow(clippy::too_many_arguments)]
    pub fn from_snapshot(
        id: String,
        from_agent_id: String,
        to_agent_id: String,
        amount: i64,
        category: String,
        description: String,
        timestamp: u64,
        status: TransactionStatus,
        hash: String,
    ) -> Self {
        Self {
            id,
            from_agent_id,
            to_agent_id,
            amount,
            category,
            description,
            timestamp,
            status,
            hash,
        }
    }

    /// Get transaction ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get source agent ID
    pub fn from_agent_id(&self) -> &str {
        &self.from_agent_id
    }

    /// Get destination agent ID
    pub fn to_agent_id(&self) -> &str {
        &self.to_agent_id
    }

    /// Get payment amount (i64 MNEE base units)
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Get category label
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Get description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get creation timestamp (milliseconds)
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Get current status
    pub fn status(&self) -> &TransactionStatus {
        &self.status
    }

    /// Get opaque settlement hash
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Check if transaction is pending
    pub fn is_pending(&self) -> bool {
        matches!(self.status, TransactionStatus::Pending)
    }

    /// Check if transaction is confirmed
    pub fn is_confirmed(&self) -> bool {
        matches!(self.status, TransactionStatus::Confirmed { .. })
    }

    /// Check if transaction reached a terminal state
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Get the rejection reason, if the transaction was rejected
    pub fn rejection_reason(&self) -> Option<&PolicyViolation> {
        match &self.status {
            TransactionStatus::Rejected { reason } => Some(reason),
            _ => None,
        }
    }

    /// Mark the transaction confirmed at `timestamp`
    pub fn confirm(&mut self, timestamp: u64) -> Result<(), TransactionError> {
        if self.is_terminal() {
            return Err(TransactionError::AlreadyResolved);
        }
        self.status = TransactionStatus::Confirmed { timestamp };
        Ok(())
    }

    /// Mark the transaction rejected by policy
    pub fn reject(&mut self, reason: PolicyViolation) -> Result<(), TransactionError> {
        if self.is_terminal() {
            return Err(TransactionError::AlreadyResolved);
        }
        self.status = TransactionStatus::Rejected { reason };
        Ok(())
    }

    /// Mark the transaction failed after admission
    pub fn fail(&mut self, reason: String) -> Result<(), TransactionError> {
        if self.is_terminal() {
            return Err(TransactionError::AlreadyResolved);
        }
        self.status = TransactionStatus::Failed { reason };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx() -> Transaction {
        Transaction::new(
            "tx_00000001".to_string(),
            "ag_1".to_string(),
            "ag_2".to_string(),
            200,
            "Dataset".to_string(),
            "Auto-Payment: Market Data".to_string(),
            1_000,
            "0xabcd".to_string(),
        )
    }

    #[test]
    fn test_new_transaction_is_pending() {
        let t = tx();
        assert!(t.is_pending());
        assert!(!t.is_terminal());
    }

    #[test]
    fn test_confirm_is_terminal() {
        let mut t = tx();
        t.confirm(2_000).unwrap();
        assert!(t.is_confirmed());
        assert_eq!(
            t.status(),
            &TransactionStatus::Confirmed { timestamp: 2_000 }
        );

        // No transition out of a terminal state
        assert_eq!(
            t.reject(PolicyViolation::AgentInactive),
            Err(TransactionError::AlreadyResolved)
        );
        assert_eq!(
            t.fail("late".to_string()),
            Err(TransactionError::AlreadyResolved)
        );
    }

    #[test]
    fn test_reject_records_reason() {
        let mut t = tx();
        t.reject(PolicyViolation::DailyLimitExceeded {
            spent_today: 950,
            daily_limit: 1_000,
            amount: 200,
        })
        .unwrap();

        let reason = t.rejection_reason().unwrap();
        assert!(reason.to_string().contains("Daily limit exceeded"));
        assert_eq!(t.confirm(3_000), Err(TransactionError::AlreadyResolved));
    }

    #[test]
    fn test_fail_is_terminal() {
        let mut t = tx();
        t.fail("settlement conflict".to_string()).unwrap();
        assert!(t.is_terminal());
        assert!(!t.is_confirmed());
    }
}
