//! Domain models: agents, transactions, logs, events, and treasury state.

pub mod agent;
pub mod event;
pub mod log;
pub mod state;
pub mod transaction;

pub use agent::{Agent, AgentError, AgentRole, AgentStatus, SpendingRule};
pub use event::TreasuryEvent;
pub use log::{LogEntry, LogFeed, LogLevel};
pub use state::TreasuryState;
pub use transaction::{PolicyViolation, Transaction, TransactionError, TransactionStatus};
