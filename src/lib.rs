//! Property Registry: ledger-backed property registration client
//!
//! This crate drives the lifecycle of a property registration transaction:
//! it connects an injected wallet, builds the `register_property` entry
//! function payload, has the wallet sign and submit it, waits for ledger
//! finality, and reconciles the outcome into session-local state.
//!
//! # Architecture
//!
//! - **Wallet Session**: detects and connects the wallet capability
//! - **Transaction Builder**: validates the form draft into a payload
//! - **Transaction Submitter**: signs and broadcasts through the wallet
//! - **Confirmation Waiter**: polls the ledger until finality or timeout
//! - **Local State Reconciler**: registration state machine and property list
//!
//! # Example
//!
//! ```ignore
//! use property_registry::{PropertyRegistrar, RegistryConfig};
//!
//! let config = RegistryConfig::from_env()?;
//! let registrar = PropertyRegistrar::with_rest_ledger(Some(wallet), &config);
//!
//! registrar.detect_wallet();
//! registrar.connect_wallet().await?;
//! registrar.update_draft(|draft| {
//!     draft.property_id = "7".to_string();
//!     draft.value = 19.99;
//!     draft.address = "123 Main St".to_string();
//! });
//!
//! let record = registrar.register_property().await?;
//! ```

// Public modules
pub mod builder;
pub mod config;
pub mod confirmation;
pub mod error;
pub mod ledger;
pub mod reconciler;
pub mod registrar;
pub mod submitter;
pub mod wallet;

// Re-exports for convenience
pub use builder::{build, scale_value, PropertyDraft, TransactionPayload};
pub use config::{LedgerNetwork, RegistryConfig};
pub use confirmation::{
    CommittedTransaction, ConfirmationWaiter, FinalityOutcome, LedgerClient, TransactionLookup,
};
pub use error::{ConfigError, LedgerFault, RegistrationError, WalletConnectionError, WalletFault};
pub use ledger::RestLedgerClient;
pub use reconciler::{LocalStateReconciler, PropertyRecord, RegistrationAttempt, RegistrationState};
pub use registrar::PropertyRegistrar;
pub use submitter::{PendingTransaction, TransactionSubmitter};
pub use wallet::{
    SubmittedTransaction, WalletAccount, WalletAvailability, WalletCapability, WalletSession,
    WalletSessionManager,
};

// Common result type
pub type Result<T> = std::result::Result<T, RegistrationError>;
