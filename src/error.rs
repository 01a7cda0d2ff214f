//! Error types for property registration
//!
//! Every stage of the registration pipeline converts its own boundary
//! failures into one of these kinds. The `Display` text is what gets
//! surfaced to the user in the advisory slot.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Core error type for the registration pipeline
#[derive(Error, Clone, Debug, PartialEq)]
pub enum RegistrationError {
    /// No wallet capability present in the host environment
    #[error("Wallet not installed. Please install a compatible wallet extension.")]
    WalletMissing,

    /// Wallet authorization failed
    #[error("Failed to connect wallet: {0}")]
    WalletConnection(#[from] WalletConnectionError),

    /// On-ledger module address not configured
    #[error("Module address not configured")]
    ConfigMissing,

    /// Draft failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Submission attempted without a connected wallet session
    #[error("No wallet session. Connect a wallet before registering.")]
    NoSession,

    /// User declined the signing prompt
    #[error("Transaction rejected in wallet: {0}")]
    SubmissionRejected(String),

    /// Wallet failed to sign or broadcast
    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(String),

    /// Ledger gave no final answer within the wait budget
    #[error("Transaction {hash} not confirmed within {}s", .waited.as_secs_f64())]
    ConfirmationTimeout { hash: String, waited: Duration },

    /// Transaction was included but its execution reverted
    #[error("Transaction {hash} failed on-ledger: {vm_status}")]
    TransactionExecutionFailed { hash: String, vm_status: String },

    /// A registration attempt is already in flight
    #[error("A property registration is already in progress")]
    RegistrationInProgress,

    /// Anything unclassified, original message preserved
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Why a wallet connect request failed
#[derive(Error, Clone, Debug, PartialEq)]
pub enum WalletConnectionError {
    #[error("request rejected by user: {0}")]
    UserRejected(String),

    #[error("{0}")]
    ConnectionFailed(String),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Raw failure reported by a wallet capability
///
/// Wallet extensions report errors as loosely shaped objects with an
/// optional numeric code and a message. This is that shape, before it is
/// classified into a [`RegistrationError`].
#[derive(Clone, Debug, PartialEq)]
pub struct WalletFault {
    pub code: Option<i64>,
    pub message: String,
}

impl WalletFault {
    /// Code used by injected wallets when the user dismisses a prompt
    pub const USER_REJECTED_CODE: i64 = 4001;

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// Convenience constructor for a user rejection
    pub fn user_rejected() -> Self {
        Self::with_code(Self::USER_REJECTED_CODE, "The user rejected the request")
    }

    pub fn is_user_rejection(&self) -> bool {
        if self.code == Some(Self::USER_REJECTED_CODE) {
            return true;
        }
        let message = self.message.to_lowercase();
        message.contains("user rejected") || message.contains("rejected by user")
    }
}

impl fmt::Display for WalletFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for WalletFault {}

/// Raw failure reported by a ledger lookup
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerFault {
    /// HTTP status, when the fault came from a response
    pub status: Option<u16>,
    pub message: String,
}

impl LedgerFault {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

impl fmt::Display for LedgerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "ledger returned HTTP {}: {}", status, self.message),
            None => write!(f, "ledger unreachable: {}", self.message),
        }
    }
}

impl std::error::Error for LedgerFault {}

// Boundary classification
impl RegistrationError {
    /// Classify a fault raised while requesting wallet authorization
    pub fn from_connect_fault(fault: WalletFault) -> Self {
        if fault.is_user_rejection() {
            WalletConnectionError::UserRejected(fault.to_string()).into()
        } else {
            WalletConnectionError::ConnectionFailed(fault.to_string()).into()
        }
    }

    /// Classify a fault raised while signing and submitting a transaction
    pub fn from_submit_fault(fault: WalletFault) -> Self {
        if fault.is_user_rejection() {
            Self::SubmissionRejected(fault.to_string())
        } else {
            Self::SubmissionFailed(fault.to_string())
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an unknown error
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }
}
