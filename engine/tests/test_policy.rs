//! Integration tests for the policy evaluator
//!
//! The evaluator runs a fixed check order and short-circuits on the first
//! violation: status, category, daily limit, balance, approval threshold.

use agent_treasury_core_rs::policy::{evaluate, PolicyDecision};
use agent_treasury_core_rs::{Agent, AgentRole, PolicyViolation, SpendingRule};

// ============================================================================
// Helper Functions
// ============================================================================

fn research_agent(balance: i64, spent_today: i64) -> Agent {
    Agent::new(
        "ag_test".to_string(),
        "Test Research Unit".to_string(),
        AgentRole::Researcher,
        "0xTEST...0001".to_string(),
        balance,
        SpendingRule {
            daily_limit: 1_000,
            allowed_categories: vec!["Dataset".to_string(), "Compute".to_string()],
            require_approval_above: 2_000,
        },
    )
    .with_spent_today(spent_today)
}

// ============================================================================
// Check order and short-circuiting
// ============================================================================

#[test]
fn test_inactive_agent_masks_all_other_violations() {
    // Paused agent, disallowed category, over limit, over balance, over
    // threshold: only the status violation is reported.
    let mut agent = research_agent(100, 990);
    agent.pause();

    let decision = evaluate(&agent, 5_000, "Power");
    assert_eq!(
        decision,
        PolicyDecision::Reject(PolicyViolation::AgentInactive)
    );
}

#[test]
fn test_category_violation_masks_limit_and_balance() {
    let agent = research_agent(100, 990);

    let decision = evaluate(&agent, 5_000, "Power");
    assert_eq!(
        decision,
        PolicyDecision::Reject(PolicyViolation::CategoryNotAllowed {
            category: "Power".to_string()
        })
    );
}

#[test]
fn test_limit_violation_masks_balance() {
    // spent 990 of a 1000 limit; 5000 breaches the limit before the
    // balance check ever runs.
    let agent = research_agent(100, 990);

    let decision = evaluate(&agent, 5_000, "Dataset");
    assert_eq!(
        decision,
        PolicyDecision::Reject(PolicyViolation::DailyLimitExceeded {
            spent_today: 990,
            daily_limit: 1_000,
            amount: 5_000,
        })
    );
}

#[test]
fn test_balance_violation_reported_after_limit_passes() {
    let agent = research_agent(100, 0);

    let decision = evaluate(&agent, 500, "Dataset");
    assert_eq!(
        decision,
        PolicyDecision::Reject(PolicyViolation::InsufficientFunds {
            balance: 100,
            amount: 500,
        })
    );
}

// ============================================================================
// Boundary semantics
// ============================================================================

#[test]
fn test_daily_limit_boundary_is_inclusive() {
    // spent 800 of 1000: exactly 200 more is admitted, 201 is not.
    let agent = research_agent(10_000, 800);

    assert!(evaluate(&agent, 200, "Dataset").is_admit());
    assert_eq!(
        evaluate(&agent, 201, "Dataset"),
        PolicyDecision::Reject(PolicyViolation::DailyLimitExceeded {
            spent_today: 800,
            daily_limit: 1_000,
            amount: 201,
        })
    );
}

#[test]
fn test_exact_balance_is_spendable() {
    let agent = research_agent(500, 0);
    assert!(evaluate(&agent, 500, "Dataset").is_admit());
}

#[test]
fn test_approval_threshold_is_strictly_above() {
    let agent = Agent::new(
        "ag_big".to_string(),
        "Big Spender".to_string(),
        AgentRole::Researcher,
        "0xTEST...0002".to_string(),
        100_000,
        SpendingRule {
            daily_limit: 50_000,
            allowed_categories: vec!["Dataset".to_string()],
            require_approval_above: 2_000,
        },
    );

    // At the threshold: admitted without approval.
    assert!(evaluate(&agent, 2_000, "Dataset").is_admit());
    // Strictly above: flagged for approval.
    assert_eq!(
        evaluate(&agent, 2_001, "Dataset"),
        PolicyDecision::RequiresApproval { threshold: 2_000 }
    );
}

#[test]
fn test_limit_check_precedes_approval_threshold() {
    // 2_500 is both over the approval threshold and over the remaining
    // daily headroom; the limit violation wins.
    let agent = research_agent(100_000, 0);

    let decision = evaluate(&agent, 2_500, "Dataset");
    assert_eq!(
        decision,
        PolicyDecision::Reject(PolicyViolation::DailyLimitExceeded {
            spent_today: 0,
            daily_limit: 1_000,
            amount: 2_500,
        })
    );
}

// ============================================================================
// Purity
// ============================================================================

#[test]
fn test_evaluate_is_repeatable_and_mutation_free() {
    let agent = research_agent(5_000, 120);

    let first = evaluate(&agent, 200, "Dataset");
    let second = evaluate(&agent, 200, "Dataset");
    assert_eq!(first, second);

    // The evaluator never touches the agent.
    assert_eq!(agent.balance(), 5_000);
    assert_eq!(agent.spent_today(), 120);
}
