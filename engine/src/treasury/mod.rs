//! Treasury coordinator
//!
//! The single writer that owns the treasury state and exposes `evaluate`
//! and the settlement operations as its only mutation surface. Everything
//! downstream (views, charts, automation) consumes the resulting entity
//! snapshots read-only.
//!
//! # Concurrency model
//!
//! Policy evaluation and settlement application run together under one
//! `&mut self` borrow, so two submissions that both debit the same source
//! can never both pass evaluation against a stale balance or spend
//! counter. The settlement applier still re-checks defensively; if that
//! re-check trips (a caller held an evaluation across other mutations),
//! the coordinator re-evaluates and retries exactly once before recording
//! the transaction as Failed.

pub mod snapshot;

use crate::bridge::{BridgeError, WalletBridge};
use crate::core::time::{Clock, SystemClock};
use crate::models::agent::Agent;
use crate::models::event::TreasuryEvent;
use crate::models::state::TreasuryState;
use crate::models::transaction::{PolicyViolation, Transaction};
use crate::policy::{self, PolicyDecision};
use crate::settlement::{self, SettlementError};
use crate::treasury::snapshot::StateSnapshot;
use std::sync::Arc;
use thiserror::Error;

/// Hard failures of the coordinator
///
/// Policy rejections are NOT errors: they come back as a
/// `PaymentOutcome::Rejected` with the transaction recorded. Only
/// genuinely exceptional conditions surface here.
#[derive(Debug, Error)]
pub enum TreasuryError {
    #[error("Unknown agent: {id}")]
    UnknownAgent { id: String },

    #[error("Payment amount must be positive, got {amount}")]
    NonPositiveAmount { amount: i64 },

    #[error("Payment category must not be empty")]
    EmptyCategory,

    #[error("Source and destination agent must differ")]
    SelfTransfer,

    #[error("Wallet bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("State validation error: {0}")]
    StateValidation(String),
}

/// A proposed payment between two agents
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub from_agent_id: String,
    pub to_agent_id: String,
    pub amount: i64,
    pub category: String,
    pub description: String,
}

/// Resolution of a submitted payment
///
/// Every variant corresponds to a transaction recorded in the ledger; the
/// engine never silently drops an attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// Settlement applied; the transaction is Confirmed
    Settled { transaction_id: String },

    /// Refused by policy; the transaction is Rejected with the reason
    Rejected {
        transaction_id: String,
        reason: PolicyViolation,
    },

    /// Admitted but the settlement conflict recurred after one retry;
    /// the transaction is Failed
    Failed {
        transaction_id: String,
        reason: String,
    },
}

impl PaymentOutcome {
    /// Check whether the payment settled
    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentOutcome::Settled { .. })
    }

    /// ID of the recorded transaction
    pub fn transaction_id(&self) -> &str {
        match self {
            PaymentOutcome::Settled { transaction_id } => transaction_id,
            PaymentOutcome::Rejected { transaction_id, .. } => transaction_id,
            PaymentOutcome::Failed { transaction_id, .. } => transaction_id,
        }
    }
}

/// The treasury coordinator
///
/// # Example
///
/// ```
/// use agent_treasury_core_rs::{seed, PaymentRequest, Treasury};
///
/// let mut treasury = Treasury::new(seed::initial_agents());
/// let outcome = treasury
///     .submit_payment(PaymentRequest {
///         from_agent_id: "ag_1".to_string(),
///         to_agent_id: "ag_2".to_string(),
///         amount: 200,
///         category: "Dataset".to_string(),
///         description: "Auto-Payment: Market Data".to_string(),
///     })
///     .unwrap();
/// assert!(outcome.is_settled());
/// assert_eq!(treasury.state().get_agent("ag_1").unwrap().balance(), 4_800);
/// ```
pub struct Treasury {
    state: TreasuryState,
    clock: Arc<dyn Clock>,
    initial: StateSnapshot,
    last_timestamp: u64,
}

impl Treasury {
    /// Create a treasury over the given agents, stamped by the system clock
    pub fn new(agents: Vec<Agent>) -> Self {
        Self::with_clock(agents, Arc::new(SystemClock))
    }

    /// Create a treasury with an injected time source
    pub fn with_clock(agents: Vec<Agent>, clock: Arc<dyn Clock>) -> Self {
        let state = TreasuryState::new(agents);
        let initial = StateSnapshot::capture(&state);
        Self {
            state,
            clock,
            initial,
            last_timestamp: 0,
        }
    }

    /// Create a treasury pre-loaded with already-resolved transactions
    ///
    /// Used by the demo seed: the given transactions are recorded in the
    /// ledger as history (balances are assumed to already reflect them)
    /// and the reset snapshot includes them.
    ///
    /// # Panics
    /// Panics if any seeded transaction is still pending or references an
    /// unknown agent.
    pub fn with_history(
        agents: Vec<Agent>,
        history: Vec<Transaction>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut state = TreasuryState::new(agents);
        for tx in history {
            assert!(
                tx.is_terminal(),
                "Seeded transaction {} must be resolved",
                tx.id()
            );
            assert!(
                state.get_agent(tx.from_agent_id()).is_some()
                    && state.get_agent(tx.to_agent_id()).is_some(),
                "Seeded transaction {} references an unknown agent",
                tx.id()
            );
            // Keep the ID sequence past the seeded history
            state.allocate_tx_id();
            state.record_transaction(tx);
        }
        let initial = StateSnapshot::capture(&state);
        Self {
            state,
            clock,
            initial,
            last_timestamp: 0,
        }
    }

    /// Read-only view of the complete treasury state
    pub fn state(&self) -> &TreasuryState {
        &self.state
    }

    /// Evaluate a proposed payment without mutating anything
    ///
    /// Resolves agent IDs and validates the inputs, then runs the pure
    /// policy check. Unknown agents, non-positive amounts and empty
    /// categories are hard errors, never policy rejections.
    pub fn evaluate(
        &self,
        from_agent_id: &str,
        to_agent_id: &str,
        amount: i64,
        category: &str,
    ) -> Result<PolicyDecision, TreasuryError> {
        self.validate_request(from_agent_id, to_agent_id, amount, category)?;
        let source = self
            .state
            .get_agent(from_agent_id)
            .expect("source validated");
        Ok(policy::evaluate(source, amount, category))
    }

    /// Submit a payment for evaluation and immediate settlement
    ///
    /// Runs evaluate → settle as one critical section. A
    /// `RequiresApproval` decision is recorded as a policy rejection on
    /// this path (no approval collaborator is wired in).
    pub fn submit_payment(
        &mut self,
        request: PaymentRequest,
    ) -> Result<PaymentOutcome, TreasuryError> {
        self.execute(request, false)
    }

    /// Submit a payment for which an external approval signal has arrived
    ///
    /// Identical pipeline with the approval-threshold check waived; every
    /// other policy check is still enforced.
    pub fn submit_approved_payment(
        &mut self,
        request: PaymentRequest,
    ) -> Result<PaymentOutcome, TreasuryError> {
        self.execute(request, true)
    }

    fn execute(
        &mut self,
        request: PaymentRequest,
        approved: bool,
    ) -> Result<PaymentOutcome, TreasuryError> {
        let PaymentRequest {
            from_agent_id,
            to_agent_id,
            amount,
            category,
            description,
        } = request;
        self.validate_request(&from_agent_id, &to_agent_id, amount, &category)?;

        let timestamp = self.now();
        let tx_id = self.state.allocate_tx_id();
        let hash =
            settlement::settlement_hash(&tx_id, &from_agent_id, &to_agent_id, amount, timestamp);
        let mut tx = Transaction::new(
            tx_id.clone(),
            from_agent_id.clone(),
            to_agent_id.clone(),
            amount,
            category.clone(),
            description,
            timestamp,
            hash,
        );

        let source = self
            .state
            .get_agent(&from_agent_id)
            .expect("source validated");
        let decision = resolve_decision(policy::evaluate(source, amount, &category), approved);

        match decision {
            PolicyDecision::Admit => {}
            PolicyDecision::RequiresApproval { threshold } => {
                let reason = PolicyViolation::ApprovalRequired { amount, threshold };
                return Ok(self.record_rejection(tx, reason));
            }
            PolicyDecision::Reject(reason) => {
                return Ok(self.record_rejection(tx, reason));
            }
        }

        // Admitted: apply the settlement, retrying once on a conflict.
        let (source, destination) = self
            .state
            .agent_pair_mut(&from_agent_id, &to_agent_id)
            .expect("agents validated");
        let first_attempt = settlement::try_settle(source, destination, &mut tx, timestamp);
        if first_attempt.is_ok() {
            return Ok(self.record_settlement(tx));
        }

        // Conflict: the state diverged from the evaluation. Re-evaluate
        // and retry exactly once.
        let source = self
            .state
            .get_agent(&from_agent_id)
            .expect("source validated");
        match resolve_decision(policy::evaluate(source, amount, &category), approved) {
            PolicyDecision::Admit => {
                let (source, destination) = self
                    .state
                    .agent_pair_mut(&from_agent_id, &to_agent_id)
                    .expect("agents validated");
                match settlement::try_settle(source, destination, &mut tx, timestamp) {
                    Ok(()) => Ok(self.record_settlement(tx)),
                    Err(recurred) => Ok(self.record_failure(tx, recurred)),
                }
            }
            PolicyDecision::RequiresApproval { threshold } => {
                let reason = PolicyViolation::ApprovalRequired { amount, threshold };
                Ok(self.record_rejection(tx, reason))
            }
            PolicyDecision::Reject(reason) => Ok(self.record_rejection(tx, reason)),
        }
    }

    /// Top up an agent's wallet through the external bridge
    ///
    /// Additive funding outside the conservation invariant. Returns the
    /// confirmed amount credited. On bridge failure no state changes; the
    /// failure is narrated and returned.
    pub fn fund_agent(
        &mut self,
        bridge: &mut dyn WalletBridge,
        agent_id: &str,
        amount: i64,
    ) -> Result<i64, TreasuryError> {
        if amount <= 0 {
            return Err(TreasuryError::NonPositiveAmount { amount });
        }
        let (name, address) = {
            let agent = self
                .state
                .get_agent(agent_id)
                .ok_or_else(|| TreasuryError::UnknownAgent {
                    id: agent_id.to_string(),
                })?;
            (agent.name().to_string(), agent.address().to_string())
        };

        self.log_event(TreasuryEvent::FundingInitiated {
            agent_name: name,
            amount,
        });

        match bridge.transfer(&address, amount) {
            Ok(credited) if credited > 0 => {
                self.state
                    .get_agent_mut(agent_id)
                    .expect("agent validated")
                    .credit(credited);
                self.log_event(TreasuryEvent::FundingConfirmed { amount: credited });
                Ok(credited)
            }
            Ok(credited) => {
                let err = BridgeError::TransferRejected(format!(
                    "bridge confirmed a non-positive amount: {}",
                    credited
                ));
                self.log_event(TreasuryEvent::FundingFailed {
                    error: err.to_string(),
                });
                Err(TreasuryError::Bridge(err))
            }
            Err(err) => {
                self.log_event(TreasuryEvent::FundingFailed {
                    error: err.to_string(),
                });
                Err(TreasuryError::Bridge(err))
            }
        }
    }

    /// Append a narration event to the feed
    ///
    /// Used by the coordinator itself and by scenario drivers for the
    /// steps that surround a settlement attempt.
    pub fn log_event(&mut self, event: TreasuryEvent) {
        let timestamp = self.now();
        self.state.logs_mut().append(
            timestamp,
            event.level(),
            event.message(),
            event.agent_name(),
        );
    }

    /// Reset the session to the initial snapshot
    ///
    /// Restores agents and ledger to their provisioning-time state and
    /// clears the narration feed.
    pub fn reset(&mut self) {
        let snapshot = self.initial.clone();
        let agents = snapshot.agents.into_iter().map(Agent::from).collect();
        let transactions = snapshot
            .transactions
            .into_iter()
            .map(Transaction::from)
            .collect();
        self.state.restore(agents, transactions, snapshot.next_tx_seq);
    }

    /// Roll the accounting window: zero every agent's daily-spend counter
    ///
    /// The window rolls only through this explicit call; there is no
    /// wall-clock rollover.
    pub fn reset_daily_spend(&mut self) {
        for id in self.state.roster().to_vec() {
            if let Some(agent) = self.state.get_agent_mut(&id) {
                agent.reset_daily_spend();
            }
        }
    }

    /// Capture a snapshot of the current state
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(&self.state)
    }

    /// Canonical digest of the current state (for snapshot validation)
    pub fn state_hash(&self) -> Result<String, TreasuryError> {
        snapshot::state_hash(&self.snapshot())
    }

    fn record_settlement(&mut self, tx: Transaction) -> PaymentOutcome {
        let transaction_id = tx.id().to_string();
        let amount = tx.amount();
        self.state.record_transaction(tx);
        self.log_event(TreasuryEvent::PaymentSettled { amount });
        PaymentOutcome::Settled { transaction_id }
    }

    fn record_rejection(&mut self, mut tx: Transaction, reason: PolicyViolation) -> PaymentOutcome {
        let transaction_id = tx.id().to_string();
        tx.reject(reason.clone()).expect("transaction was pending");
        self.state.record_transaction(tx);
        self.log_event(TreasuryEvent::PaymentRejected {
            reason: reason.clone(),
        });
        PaymentOutcome::Rejected {
            transaction_id,
            reason,
        }
    }

    fn record_failure(&mut self, mut tx: Transaction, err: SettlementError) -> PaymentOutcome {
        let transaction_id = tx.id().to_string();
        let reason = err.to_string();
        tx.fail(reason.clone()).expect("transaction was pending");
        self.state.record_transaction(tx);
        self.log_event(TreasuryEvent::PaymentFailed {
            reason: reason.clone(),
        });
        PaymentOutcome::Failed {
            transaction_id,
            reason,
        }
    }

    fn validate_request(
        &self,
        from_agent_id: &str,
        to_agent_id: &str,
        amount: i64,
        category: &str,
    ) -> Result<(), TreasuryError> {
        if amount <= 0 {
            return Err(TreasuryError::NonPositiveAmount { amount });
        }
        if category.is_empty() {
            return Err(TreasuryError::EmptyCategory);
        }
        if from_agent_id == to_agent_id {
            return Err(TreasuryError::SelfTransfer);
        }
        if self.state.get_agent(from_agent_id).is_none() {
            return Err(TreasuryError::UnknownAgent {
                id: from_agent_id.to_string(),
            });
        }
        if self.state.get_agent(to_agent_id).is_none() {
            return Err(TreasuryError::UnknownAgent {
                id: to_agent_id.to_string(),
            });
        }
        Ok(())
    }

    /// Next timestamp, clamped monotone non-decreasing so ledger and feed
    /// order always equals commit order
    fn now(&mut self) -> u64 {
        let ts = self.clock.now_ms().max(self.last_timestamp);
        self.last_timestamp = ts;
        ts
    }
}

/// Waive the approval threshold when an external approval was supplied
fn resolve_decision(decision: PolicyDecision, approved: bool) -> PolicyDecision {
    match decision {
        PolicyDecision::RequiresApproval { .. } if approved => PolicyDecision::Admit,
        other => other,
    }
}
