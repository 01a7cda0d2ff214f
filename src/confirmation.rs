//! Confirmation waiting
//!
//! The ledger is an opaque collaborator that can look up a transaction by
//! hash. [`ConfirmationWaiter`] polls it until the transaction is committed
//! or the wait budget runs out.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LedgerFault;
use crate::submitter::PendingTransaction;

/// A transaction the ledger has committed, successfully or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedTransaction {
    pub hash: String,
    /// Ledger version the transaction was committed at
    pub version: Option<u64>,
    /// False when execution reverted (e.g. a Move abort)
    pub success: bool,
    pub vm_status: String,
}

/// What the ledger currently knows about a hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionLookup {
    NotFound,
    Pending,
    Committed(CommittedTransaction),
}

/// Read access to the ledger
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn transaction_by_hash(&self, hash: &str) -> Result<TransactionLookup, LedgerFault>;
}

/// How a confirmation wait ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalityOutcome {
    Confirmed(CommittedTransaction),
    /// Included, but on-ledger execution reverted
    TransactionFailed(CommittedTransaction),
    /// No final answer within the wait budget
    Timeout { waited: Duration },
}

/// Waits for submitted transactions to reach finality
pub struct ConfirmationWaiter {
    ledger: Arc<dyn LedgerClient>,
    timeout: Duration,
    poll_interval: Duration,
}

impl ConfirmationWaiter {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            ledger,
            timeout,
            poll_interval,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Suspend until the ledger reports the transaction as committed
    ///
    /// Lookup faults are treated as transient and polling continues; only the
    /// timeout ends a wait without an answer.
    pub async fn await_finality(&self, tx: &PendingTransaction) -> FinalityOutcome {
        log::info!(
            "⏳ Waiting for finality of {} (timeout {:?})",
            tx.hash,
            self.timeout
        );

        match tokio::time::timeout(self.timeout, self.poll_until_committed(&tx.hash)).await {
            Ok(committed) if committed.success => {
                log::info!(
                    "   ✅ Confirmed! Hash: {}, version: {:?}",
                    committed.hash,
                    committed.version
                );
                FinalityOutcome::Confirmed(committed)
            }
            Ok(committed) => {
                log::error!(
                    "   ❌ Execution failed: {} ({})",
                    committed.hash,
                    committed.vm_status
                );
                FinalityOutcome::TransactionFailed(committed)
            }
            Err(_) => {
                log::error!("   ❌ No finality for {} within {:?}", tx.hash, self.timeout);
                FinalityOutcome::Timeout {
                    waited: self.timeout,
                }
            }
        }
    }

    async fn poll_until_committed(&self, hash: &str) -> CommittedTransaction {
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            match self.ledger.transaction_by_hash(hash).await {
                Ok(TransactionLookup::Committed(committed)) => return committed,
                Ok(TransactionLookup::Pending) => {
                    log::debug!("   Attempt {}: {} pending", attempt, hash);
                }
                Ok(TransactionLookup::NotFound) => {
                    log::debug!("   Attempt {}: {} not yet visible", attempt, hash);
                }
                Err(fault) => {
                    log::warn!("   ⚠️  Attempt {}: lookup failed: {}", attempt, fault);
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays lookups in order, repeating the last one forever
    struct ScriptedLedger {
        script: Mutex<VecDeque<Result<TransactionLookup, LedgerFault>>>,
    }

    impl ScriptedLedger {
        fn new(script: Vec<Result<TransactionLookup, LedgerFault>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
            })
        }
    }

    #[async_trait]
    impl LedgerClient for ScriptedLedger {
        async fn transaction_by_hash(&self, _hash: &str) -> Result<TransactionLookup, LedgerFault> {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().cloned().unwrap()
            }
        }
    }

    fn committed(success: bool, vm_status: &str) -> TransactionLookup {
        TransactionLookup::Committed(CommittedTransaction {
            hash: "0xHASH".to_string(),
            version: Some(42),
            success,
            vm_status: vm_status.to_string(),
        })
    }

    fn pending() -> PendingTransaction {
        PendingTransaction {
            hash: "0xHASH".to_string(),
            sender: "0xABCD".to_string(),
        }
    }

    fn waiter(ledger: Arc<ScriptedLedger>) -> ConfirmationWaiter {
        ConfirmationWaiter::new(ledger, Duration::from_secs(2), Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_confirmed_after_polling() {
        let ledger = ScriptedLedger::new(vec![
            Ok(TransactionLookup::NotFound),
            Ok(TransactionLookup::Pending),
            Err(LedgerFault::http(503, "fullnode overloaded")),
            Ok(committed(true, "Executed successfully")),
        ]);

        match waiter(ledger).await_finality(&pending()).await {
            FinalityOutcome::Confirmed(tx) => {
                assert_eq!(tx.hash, "0xHASH");
                assert_eq!(tx.version, Some(42));
            }
            other => panic!("expected confirmation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reverted_execution_is_transaction_failed() {
        let ledger = ScriptedLedger::new(vec![Ok(committed(false, "Move abort: 0x1"))]);

        match waiter(ledger).await_finality(&pending()).await {
            FinalityOutcome::TransactionFailed(tx) => assert_eq!(tx.vm_status, "Move abort: 0x1"),
            other => panic!("expected execution failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_times_out_when_never_committed() {
        let ledger = ScriptedLedger::new(vec![Ok(TransactionLookup::Pending)]);
        let waiter =
            ConfirmationWaiter::new(ledger, Duration::from_millis(50), Duration::from_millis(5));

        assert_eq!(
            waiter.await_finality(&pending()).await,
            FinalityOutcome::Timeout {
                waited: Duration::from_millis(50)
            }
        );
    }

    #[tokio::test]
    async fn test_persistent_faults_end_in_timeout() {
        let ledger = ScriptedLedger::new(vec![Err(LedgerFault::transport("connection refused"))]);
        let waiter =
            ConfirmationWaiter::new(ledger, Duration::from_millis(50), Duration::from_millis(5));

        assert!(matches!(
            waiter.await_finality(&pending()).await,
            FinalityOutcome::Timeout { .. }
        ));
    }
}
