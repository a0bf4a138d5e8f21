//! Agent model
//!
//! Represents an autonomous economic actor with a wallet-like balance and
//! spending rules. Each agent has:
//! - Settlement balance in MNEE base units (i64)
//! - A daily spend counter checked against its rules
//! - An embedded `SpendingRule` (limit, category allow-list, approval threshold)
//!
//! Balances mutate only through `credit`, `debit` and `record_spend`; the
//! settlement path never drives a balance negative.
//!
//! CRITICAL: All money values are i64 (MNEE base units)

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during agent balance operations
#[derive(Debug, Error, PartialEq)]
pub enum AgentError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Debit amount must be positive, got {amount}")]
    NonPositiveDebit { amount: i64 },
}

/// Role an agent plays in the treasury economy
///
/// The closed set mirrors the roles used by the demo roster. Serialized
/// forms match the display strings consumed by the dashboard layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentRole {
    Researcher,
    #[serde(rename = "Data Provider")]
    DataProvider,
    #[serde(rename = "Compute Provider")]
    ComputeProvider,
    Auditor,
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgentRole::Researcher => "Researcher",
            AgentRole::DataProvider => "Data Provider",
            AgentRole::ComputeProvider => "Compute Provider",
            AgentRole::Auditor => "Auditor",
        };
        write!(f, "{}", label)
    }
}

/// Agent lifecycle status
///
/// A paused agent must not be the source of an admitted payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Active,
    Paused,
}

/// Per-agent spending policy
///
/// - `daily_limit`: maximum cumulative `spent_today` the agent may reach
///   as a payment source
/// - `allowed_categories`: category labels the agent may pay under
/// - `require_approval_above`: amounts strictly above this threshold need
///   an external approval signal before settlement (reserved hook; no
///   automatic approval workflow exists in this engine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingRule {
    pub daily_limit: i64,
    pub allowed_categories: Vec<String>,
    pub require_approval_above: i64,
}

impl SpendingRule {
    /// Check whether a category is on the allow-list
    pub fn allows_category(&self, category: &str) -> bool {
        self.allowed_categories.iter().any(|c| c == category)
    }
}

/// Represents an autonomous agent with a treasury wallet
///
/// # Example
/// ```
/// use agent_treasury_core_rs::{Agent, AgentRole, SpendingRule};
///
/// let mut agent = Agent::new(
///     "ag_1".to_string(),
///     "Alpha Research Unit".to_string(),
///     AgentRole::Researcher,
///     "0x71C...9A21".to_string(),
///     5_000,
///     SpendingRule {
///         daily_limit: 1_000,
///         allowed_categories: vec!["Dataset".to_string()],
///         require_approval_above: 2_000,
///     },
/// );
/// assert_eq!(agent.balance(), 5_000);
///
/// agent.debit(300).unwrap();
/// assert_eq!(agent.balance(), 4_700);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique agent identifier (e.g., "ag_1")
    id: String,

    /// Display name (e.g., "Alpha Research Unit")
    name: String,

    /// Role in the treasury economy
    role: AgentRole,

    /// On-chain-style address string (display-only; the engine never
    /// interprets it)
    address: String,

    /// Current wallet balance (i64 MNEE base units)
    balance: i64,

    /// Cumulative amount debited against the daily limit within the
    /// current accounting window. Reset only via `reset_daily_spend`.
    spent_today: i64,

    /// Embedded spending policy
    rules: SpendingRule,

    /// Lifecycle status
    status: AgentStatus,
}

impl Agent {
    /// Create a new active agent with a zero daily-spend counter
    ///
    /// # Panics
    /// Panics if `balance` is negative: agents are provisioned funded.
    pub fn new(
        id: String,
        name: String,
        role: AgentRole,
        address: String,
        balance: i64,
        rules: SpendingRule,
    ) -> Self {
        assert!(balance >= 0, "opening balance must be non-negative");
        Self {
            id,
            name,
            role,
            address,
            balance,
            spent_today: 0,
            rules,
            status: AgentStatus::Active,
        }
    }

    /// Set the daily-spend counter (builder pattern, for mid-window
    /// provisioning such as the demo roster)
    pub fn with_spent_today(mut self, spent_today: i64) -> Self {
        assert!(spent_today >= 0, "spent_today must be non-negative");
        self.spent_today = spent_today;
        self
    }

    /// Restore an agent from snapshot fields, preserving all state
    #[allow(clippy::too_many_arguments)]
    pub fn from_snapshot(
        id: String,
        name: String,
        role: AgentRole,
        address: String,
        balance: i64,
        spent_today: i64,
        rules: SpendingRule,
        status: AgentStatus,
    ) -> Self {
        Self {
            id,
            name,
            role,
            address,
            balance,
            spent_today,
            rules,
            status,
        }
    }

    /// Get agent ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get role
    pub fn role(&self) -> AgentRole {
        self.role
    }

    /// Get display address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Get current balance (i64 MNEE base units)
    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Get cumulative spend in the current accounting window
    pub fn spent_today(&self) -> i64 {
        self.spent_today
    }

    /// Get spending rules
    pub fn rules(&self) -> &SpendingRule {
        &self.rules
    }

    /// Get lifecycle status
    pub fn status(&self) -> AgentStatus {
        self.status
    }

    /// Check whether the agent may source payments
    pub fn is_active(&self) -> bool {
        self.status == AgentStatus::Active
    }

    /// Check whether the balance covers `amount`
    pub fn can_pay(&self, amount: i64) -> bool {
        self.balance >= amount
    }

    /// Check whether spending `amount` keeps the agent within its daily limit
    ///
    /// An amount large enough to overflow the spend counter can never be
    /// within the limit.
    pub fn within_daily_limit(&self, amount: i64) -> bool {
        match self.spent_today.checked_add(amount) {
            Some(total) => total <= self.rules.daily_limit,
            None => false,
        }
    }

    /// Debit the wallet
    ///
    /// Fails without mutating if the balance does not cover the amount;
    /// the settlement path never produces a negative balance.
    pub fn debit(&mut self, amount: i64) -> Result<(), AgentError> {
        if amount <= 0 {
            return Err(AgentError::NonPositiveDebit { amount });
        }
        if self.balance < amount {
            return Err(AgentError::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Credit the wallet
    ///
    /// Infallible: credits from settlements and external top-ups are
    /// always additive. The balance saturates at `i64::MAX` rather than
    /// wrapping on an extreme top-up.
    pub fn credit(&mut self, amount: i64) {
        assert!(amount > 0, "credit amount must be positive");
        self.balance = self.balance.saturating_add(amount);
    }

    /// Record an outgoing spend against the daily limit
    ///
    /// Callers must have checked `within_daily_limit` first; this only
    /// accumulates so that the settlement sequence has no fallible step
    /// after the first balance mutation.
    pub fn record_spend(&mut self, amount: i64) {
        assert!(amount > 0, "spend amount must be positive");
        self.spent_today += amount;
    }

    /// Reset the daily-spend counter to zero
    ///
    /// The accounting window rolls over only through this explicit call;
    /// there is no wall-clock rollover.
    pub fn reset_daily_spend(&mut self) {
        self.spent_today = 0;
    }

    /// Pause the agent (blocks it as a payment source)
    pub fn pause(&mut self) {
        self.status = AgentStatus::Paused;
    }

    /// Resume a paused agent
    pub fn resume(&mut self) {
        self.status = AgentStatus::Active;
    }
}
