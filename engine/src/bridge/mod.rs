//! External wallet bridge
//!
//! The only seam between the treasury and a real browser-injected wallet.
//! The bridge is constructor-argument injected wherever it is used, so the
//! core can be exercised without any external dependency. Top-ups routed
//! through the bridge are additive and sit outside the balance
//! conservation invariant.

use thiserror::Error;

/// Errors reported by the external wallet bridge
///
/// The bridge's own retry semantics are opaque to the engine; only the
/// final outcome crosses this boundary. A failed transfer never corrupts
/// in-memory agent state (no partial credit).
#[derive(Debug, Error, PartialEq)]
pub enum BridgeError {
    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Transfer rejected by wallet: {0}")]
    TransferRejected(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// External token-transfer collaborator
///
/// Implementations talk to the real wallet extension; tests supply
/// scripted doubles.
pub trait WalletBridge {
    /// Transfer `amount` MNEE to `destination_address`
    ///
    /// Returns the confirmed on-chain amount on success. The engine
    /// credits exactly what the bridge confirms, not what was requested.
    fn transfer(&mut self, destination_address: &str, amount: i64) -> Result<i64, BridgeError>;
}
