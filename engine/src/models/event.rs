//! Treasury events
//!
//! `TreasuryEvent` is the narration vocabulary: every significant step
//! around a settlement attempt or a funding action is captured as one
//! event, and each event knows its severity, its rendered message and its
//! attribution. The coordinator translates events into immutable
//! `LogEntry` records on the feed.

use crate::models::log::LogLevel;
use crate::models::transaction::PolicyViolation;
use serde::{Deserialize, Serialize};

/// A narratable step in the treasury lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreasuryEvent {
    /// A scenario agent announced what it is about to do
    OpportunityIdentified {
        agent_name: String,
        message: String,
    },

    /// An agent asked a counterparty for a priced item
    PaymentRequested {
        requester_name: String,
        provider_name: String,
        item: String,
    },

    /// A provider issued an invoice ahead of settlement
    InvoiceIssued {
        provider_name: String,
        invoice_no: u32,
        amount: i64,
    },

    /// A settlement was applied to both parties' balances
    PaymentSettled { amount: i64 },

    /// The spending policy refused the payment
    PaymentRejected { reason: PolicyViolation },

    /// An admitted payment failed during settlement
    PaymentFailed { reason: String },

    /// An external wallet top-up was started
    FundingInitiated { agent_name: String, amount: i64 },

    /// The external wallet confirmed the top-up
    FundingConfirmed { amount: i64 },

    /// The external wallet reported a failure; no credit was applied
    FundingFailed { error: String },
}

impl TreasuryEvent {
    /// Severity this event is logged at
    ///
    /// Rejections and failures are always Error; confirmations Success.
    pub fn level(&self) -> LogLevel {
        match self {
            TreasuryEvent::OpportunityIdentified { .. } => LogLevel::Info,
            TreasuryEvent::PaymentRequested { .. } => LogLevel::Info,
            TreasuryEvent::InvoiceIssued { .. } => LogLevel::Warning,
            TreasuryEvent::PaymentSettled { .. } => LogLevel::Success,
            TreasuryEvent::PaymentRejected { .. } => LogLevel::Error,
            TreasuryEvent::PaymentFailed { .. } => LogLevel::Error,
            TreasuryEvent::FundingInitiated { .. } => LogLevel::Info,
            TreasuryEvent::FundingConfirmed { .. } => LogLevel::Success,
            TreasuryEvent::FundingFailed { .. } => LogLevel::Error,
        }
    }

    /// Rendered human-readable message
    pub fn message(&self) -> String {
        match self {
            TreasuryEvent::OpportunityIdentified { message, .. } => message.clone(),
            TreasuryEvent::PaymentRequested {
                provider_name, item, ..
            } => format!("Requesting \"{}\" from {}", item, provider_name),
            TreasuryEvent::InvoiceIssued {
                invoice_no, amount, ..
            } => format!("Invoice #INV-{} received for {} MNEE", invoice_no, amount),
            TreasuryEvent::PaymentSettled { amount } => {
                format!("Payment authorized. {} MNEE transferred.", amount)
            }
            TreasuryEvent::PaymentRejected { reason } => {
                format!("Transaction Blocked: {}", reason)
            }
            TreasuryEvent::PaymentFailed { reason } => {
                format!("Settlement Failed: {}", reason)
            }
            TreasuryEvent::FundingInitiated { agent_name, amount } => {
                format!("Initiating transfer of {} MNEE to {}...", amount, agent_name)
            }
            TreasuryEvent::FundingConfirmed { .. } => "Transfer Confirmed on-chain.".to_string(),
            TreasuryEvent::FundingFailed { error } => format!("Transfer failed: {}", error),
        }
    }

    /// Attribution shown next to the log line
    pub fn agent_name(&self) -> Option<String> {
        match self {
            TreasuryEvent::OpportunityIdentified { agent_name, .. } => Some(agent_name.clone()),
            TreasuryEvent::PaymentRequested { requester_name, .. } => {
                Some(requester_name.clone())
            }
            TreasuryEvent::InvoiceIssued { provider_name, .. } => Some(provider_name.clone()),
            TreasuryEvent::PaymentSettled { .. } => Some("AgentWallet".to_string()),
            TreasuryEvent::PaymentRejected { .. } => Some("PolicyEngine".to_string()),
            TreasuryEvent::PaymentFailed { .. } => Some("PolicyEngine".to_string()),
            TreasuryEvent::FundingInitiated { .. } => Some("Wallet".to_string()),
            TreasuryEvent::FundingConfirmed { .. } => Some("Blockchain".to_string()),
            TreasuryEvent::FundingFailed { .. } => Some("Wallet".to_string()),
        }
    }
}
