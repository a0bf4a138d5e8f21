//! Agent Treasury Core - Rust Engine
//!
//! Treasury and settlement engine for autonomous agent payments, with
//! policy-gated spending and deterministic scenario playback.
//!
//! # Architecture
//!
//! - **core**: Time sources (system and manual clocks)
//! - **models**: Domain types (Agent, Transaction, LogFeed, State)
//! - **policy**: Ordered spending-rule evaluation
//! - **settlement**: Atomic balance transfer and transaction hashing
//! - **treasury**: Single-writer coordinator and snapshots
//! - **scenario**: Synthetic payment scenario catalog and driver
//! - **bridge**: External wallet funding seam
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (MNEE base units)
//! 2. Policy checks run in a fixed order and short-circuit
//! 3. Settlement is all-or-nothing; no partial ledger writes
//! 4. The log feed is append-only

// Module declarations
pub mod bridge;
pub mod core;
pub mod models;
pub mod policy;
pub mod rng;
pub mod scenario;
pub mod seed;
pub mod settlement;
pub mod treasury;

// Re-exports for convenience
pub use bridge::{BridgeError, WalletBridge};
pub use core::time::{Clock, ManualClock, SystemClock};
pub use models::{
    agent::{Agent, AgentError, AgentRole, AgentStatus, SpendingRule},
    event::TreasuryEvent,
    log::{LogEntry, LogFeed, LogLevel},
    state::TreasuryState,
    transaction::{PolicyViolation, Transaction, TransactionError, TransactionStatus},
};
pub use policy::{evaluate, PolicyDecision};
pub use rng::RngManager;
pub use scenario::{ScenarioDriver, ScenarioKind, ScenarioScript, ScenarioStep, StepAction};
pub use settlement::{settlement_hash, try_settle, SettlementError};
pub use treasury::{
    snapshot::StateSnapshot, PaymentOutcome, PaymentRequest, Treasury, TreasuryError,
};
