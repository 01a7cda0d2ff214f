/// Fullnode API request/response types
///
/// Transaction JSON follows the fullnode REST shape so the registry client
/// can consume it transparently.

use serde::{Deserialize, Serialize};

/// Transaction response from /v1/transactions/by_hash/{hash}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionResponse {
    PendingTransaction {
        hash: String,
    },
    UserTransaction {
        hash: String,
        /// u64 encoded as a decimal string, as the fullnode does
        version: String,
        success: bool,
        vm_status: String,
    },
}

/// Error body returned for failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error_code: String,
}

/// Status requested when seeding a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStatus {
    Pending,
    Success,
    Failed,
}

/// Body of POST /v1/mock/transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTransactionRequest {
    pub hash: String,
    pub status: SeedStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_status: Option<String>,
}

/// Body of POST /v1/mock/transactions/{hash}/commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRequest {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_status: Option<String>,
}
