/// In-memory transaction store
///
/// Stands in for the fullnode's view of the ledger: transactions are either
/// pending or committed at a monotonically increasing version.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use thiserror::Error;

use crate::types::{SeedStatus, TransactionResponse};

pub const SUCCESS_VM_STATUS: &str = "Executed successfully";
pub const DEFAULT_ABORT_VM_STATUS: &str = "Move abort: EXECUTION_FAILED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Committed {
        version: u64,
        success: bool,
        vm_status: String,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Transaction not found: {0}")]
    UnknownTransaction(String),

    #[error("Transaction already committed: {0}")]
    AlreadyCommitted(String),
}

struct Ledger {
    transactions: HashMap<String, TransactionStatus>,
    next_version: u64,
}

impl Ledger {
    fn commit(
        &mut self,
        hash: &str,
        success: bool,
        vm_status: Option<String>,
    ) -> Result<TransactionStatus, StoreError> {
        match self.transactions.get(hash) {
            None => Err(StoreError::UnknownTransaction(hash.to_string())),
            Some(TransactionStatus::Committed { .. }) => {
                Err(StoreError::AlreadyCommitted(hash.to_string()))
            }
            Some(TransactionStatus::Pending) => Ok(self.commit_pending(hash, success, vm_status)),
        }
    }

    /// Caller holds the write lock and has checked the hash is pending
    fn commit_pending(
        &mut self,
        hash: &str,
        success: bool,
        vm_status: Option<String>,
    ) -> TransactionStatus {
        let version = self.next_version;
        self.next_version += 1;
        let status = TransactionStatus::Committed {
            version,
            success,
            vm_status: vm_status.unwrap_or_else(|| default_vm_status(success)),
        };
        self.transactions.insert(hash.to_string(), status.clone());
        log::info!("⛓️  Committed {} at version {} (success={})", hash, version, success);

        status
    }
}

pub struct LedgerStore {
    ledger: RwLock<Ledger>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self {
            ledger: RwLock::new(Ledger {
                transactions: HashMap::new(),
                next_version: 1,
            }),
        }
    }

    /// Record a transaction as pending (overwrites any previous state)
    pub fn submit_pending(&self, hash: &str) {
        let mut ledger = self.ledger.write().unwrap_or_else(PoisonError::into_inner);
        ledger
            .transactions
            .insert(hash.to_string(), TransactionStatus::Pending);
        log::info!("📥 Pending: {}", hash);
    }

    /// Commit a pending transaction at the next version
    pub fn commit(
        &self,
        hash: &str,
        success: bool,
        vm_status: Option<String>,
    ) -> Result<TransactionStatus, StoreError> {
        let mut ledger = self.ledger.write().unwrap_or_else(PoisonError::into_inner);
        ledger.commit(hash, success, vm_status)
    }

    /// Seed a transaction directly into the requested state
    ///
    /// Insert and commit happen under one write lock, so the returned status
    /// is what lookups will see.
    pub fn seed(
        &self,
        hash: &str,
        status: SeedStatus,
        vm_status: Option<String>,
    ) -> TransactionStatus {
        let mut ledger = self.ledger.write().unwrap_or_else(PoisonError::into_inner);
        ledger
            .transactions
            .insert(hash.to_string(), TransactionStatus::Pending);

        let success = match status {
            SeedStatus::Pending => {
                log::info!("📥 Seeded pending: {}", hash);
                return TransactionStatus::Pending;
            }
            SeedStatus::Success => true,
            SeedStatus::Failed => false,
        };
        ledger.commit_pending(hash, success, vm_status)
    }

    pub fn get(&self, hash: &str) -> Option<TransactionStatus> {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .transactions
            .get(hash)
            .cloned()
    }

    /// Fullnode-shaped JSON for a known transaction
    pub fn response(&self, hash: &str) -> Option<TransactionResponse> {
        self.get(hash).map(|status| to_response(hash, status))
    }

    pub fn len(&self) -> usize {
        self.ledger
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .transactions
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn to_response(hash: &str, status: TransactionStatus) -> TransactionResponse {
    match status {
        TransactionStatus::Pending => TransactionResponse::PendingTransaction {
            hash: hash.to_string(),
        },
        TransactionStatus::Committed {
            version,
            success,
            vm_status,
        } => TransactionResponse::UserTransaction {
            hash: hash.to_string(),
            version: version.to_string(),
            success,
            vm_status,
        },
    }
}

fn default_vm_status(success: bool) -> String {
    if success {
        SUCCESS_VM_STATUS.to_string()
    } else {
        DEFAULT_ABORT_VM_STATUS.to_string()
    }
}
