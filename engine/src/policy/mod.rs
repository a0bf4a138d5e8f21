//! Spending policy evaluator
//!
//! Pure admissibility check gating every payment. Evaluation reads the
//! source agent's current state and never mutates anything, so it is
//! safely repeatable (a prerequisite for optimistic retry and for
//! testability).
//!
//! # Check order
//!
//! Checks short-circuit on the first failure, in this exact order, so
//! rejection reasons are deterministic and reproducible:
//!
//! 1. Source status must be Active → `AgentInactive`
//! 2. Category must be on the allow-list → `CategoryNotAllowed`
//! 3. `spent_today + amount ≤ daily_limit` → `DailyLimitExceeded`
//! 4. `balance ≥ amount` → `InsufficientFunds`
//! 5. `amount > require_approval_above` → `RequiresApproval` (an external
//!    collaborator must supply approval before settlement proceeds)

use crate::models::agent::Agent;
use crate::models::transaction::PolicyViolation;
use serde::{Deserialize, Serialize};

/// Outcome of a policy evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PolicyDecision {
    /// Payment may settle immediately
    Admit,

    /// All checks passed but the amount is above the agent's approval
    /// threshold; settlement must wait for an external approval signal.
    /// Callers with no approval path wired up must treat this as a
    /// rejection.
    RequiresApproval { threshold: i64 },

    /// Payment refused; the reason is recorded on the transaction
    Reject(PolicyViolation),
}

impl PolicyDecision {
    /// Check whether the decision admits automatic settlement
    pub fn is_admit(&self) -> bool {
        matches!(self, PolicyDecision::Admit)
    }
}

/// Evaluate a proposed payment against the source agent's spending policy
///
/// Read-only: identical inputs with no intervening state change yield the
/// identical decision. `amount` must already be validated strictly
/// positive and `category` non-empty by the caller (the coordinator treats
/// malformed inputs as hard errors, not policy rejections).
///
/// # Example
/// ```
/// use agent_treasury_core_rs::policy::{evaluate, PolicyDecision};
/// use agent_treasury_core_rs::{Agent, AgentRole, SpendingRule};
///
/// let agent = Agent::new(
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
///
/// assert_eq!(evaluate(&agent, 200, "Dataset"), PolicyDecision::Admit);
/// ```
pub fn evaluate(source: &Agent, amount: i64, category: &str) -> PolicyDecision {
    if !source.is_active() {
        return PolicyDecision::Reject(PolicyViolation::AgentInactive);
    }

    if !source.rules().allows_category(category) {
        return PolicyDecision::Reject(PolicyViolation::CategoryNotAllowed {
            category: category.to_string(),
        });
    }

    if !source.within_daily_limit(amount) {
        return PolicyDecision::Reject(PolicyViolation::DailyLimitExceeded {
            spent_today: source.spent_today(),
            daily_limit: source.rules().daily_limit,
            amount,
        });
    }

    if !source.can_pay(amount) {
        return PolicyDecision::Reject(PolicyViolation::InsufficientFunds {
            balance: source.balance(),
            amount,
        });
    }

    if amount > source.rules().require_approval_above {
        return PolicyDecision::RequiresApproval {
            threshold: source.rules().require_approval_above,
        };
    }

    PolicyDecision::Admit
}
