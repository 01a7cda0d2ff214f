//! Property Registrar - Orchestration Layer
//!
//! Wires the wallet session, builder, submitter, confirmation waiter and
//! local state reconciler into the user-facing registration flow:
//!
//! 1. `connect_wallet()` establishes the session
//! 2. `update_draft()` edits the form
//! 3. `register_property()` runs build -> submit -> confirm -> reconcile
//!
//! Each stage either advances the pipeline or ends it with a classified
//! error; nothing is retried.

use std::sync::Arc;

use crate::builder::{self, PropertyDraft};
use crate::config::RegistryConfig;
use crate::confirmation::{
    CommittedTransaction, ConfirmationWaiter, FinalityOutcome, LedgerClient,
};
use crate::error::RegistrationError;
use crate::ledger::RestLedgerClient;
use crate::reconciler::{
    LocalStateReconciler, PropertyRecord, RegistrationAttempt, RegistrationState,
};
use crate::submitter::{PendingTransaction, TransactionSubmitter};
use crate::wallet::{WalletAvailability, WalletCapability, WalletSession, WalletSessionManager};

pub struct PropertyRegistrar {
    module_address: Option<String>,
    session: WalletSessionManager,
    submitter: TransactionSubmitter,
    waiter: ConfirmationWaiter,
    state: LocalStateReconciler,
}

impl PropertyRegistrar {
    // ============================================================================
    // Constructors
    // ============================================================================

    /// Create a registrar with an explicit ledger client
    ///
    /// `wallet` is `None` when the host exposes no wallet capability.
    pub fn new(
        wallet: Option<Arc<dyn WalletCapability>>,
        ledger: Arc<dyn LedgerClient>,
        config: &RegistryConfig,
    ) -> Self {
        Self {
            module_address: config.module_address.clone(),
            session: WalletSessionManager::new(wallet.clone()),
            submitter: TransactionSubmitter::new(wallet),
            waiter: ConfirmationWaiter::new(
                ledger,
                config.confirmation_timeout,
                config.poll_interval,
            ),
            state: LocalStateReconciler::new(),
        }
    }

    /// Create a registrar that confirms through the configured fullnode
    pub fn with_rest_ledger(
        wallet: Option<Arc<dyn WalletCapability>>,
        config: &RegistryConfig,
    ) -> Self {
        let ledger = Arc::new(RestLedgerClient::new(config.ledger_url.clone()));
        Self::new(wallet, ledger, config)
    }

    // ============================================================================
    // Wallet session
    // ============================================================================

    /// Probe for the wallet; a missing wallet is reported as an advisory
    pub fn detect_wallet(&self) -> WalletAvailability {
        let availability = self.session.detect();
        if availability == WalletAvailability::Missing {
            self.state.report(RegistrationError::WalletMissing);
        }
        availability
    }

    /// Connect the wallet and return the session address
    pub async fn connect_wallet(&self) -> Result<String, RegistrationError> {
        match self.session.connect().await {
            Ok(address) => {
                self.state.clear_advisory();
                Ok(address)
            }
            Err(err) => {
                self.state.report(err.clone());
                Err(err)
            }
        }
    }

    // ============================================================================
    // Registration
    // ============================================================================

    /// Edit the registration form
    pub fn update_draft<F>(&self, edit: F)
    where
        F: FnOnce(&mut PropertyDraft),
    {
        self.state.update_draft(edit);
    }

    /// Run one registration attempt end to end
    ///
    /// Refused with `RegistrationInProgress` while another attempt is in
    /// flight. On success the record is appended and the draft cleared; on
    /// failure the error is reported and local state is left untouched.
    pub async fn register_property(&self) -> Result<PropertyRecord, RegistrationError> {
        let attempt = self.state.begin()?;

        match self.drive(&attempt).await {
            Ok((pending, committed)) => match attempt.confirm(&pending, &committed) {
                Ok(record) => Ok(record),
                Err(err) => {
                    self.state.report(err.clone());
                    Err(err)
                }
            },
            Err(err) => Err(attempt.fail(err)),
        }
    }

    /// Building -> Submitting -> Confirming
    async fn drive(
        &self,
        attempt: &RegistrationAttempt<'_>,
    ) -> Result<(PendingTransaction, CommittedTransaction), RegistrationError> {
        let payload = builder::build(attempt.draft(), self.module_address.as_deref())?;

        attempt.advance(RegistrationState::Submitting)?;
        let session = self.session.session();
        let pending = self.submitter.submit(&session, &payload).await?;

        attempt.advance(RegistrationState::Confirming)?;
        match self.waiter.await_finality(&pending).await {
            FinalityOutcome::Confirmed(committed) => Ok((pending, committed)),
            FinalityOutcome::TransactionFailed(committed) => {
                Err(RegistrationError::TransactionExecutionFailed {
                    hash: committed.hash,
                    vm_status: committed.vm_status,
                })
            }
            FinalityOutcome::Timeout { waited } => Err(RegistrationError::ConfirmationTimeout {
                hash: pending.hash,
                waited,
            }),
        }
    }

    // ============================================================================
    // Read accessors
    // ============================================================================

    pub fn session(&self) -> WalletSession {
        self.session.session()
    }

    pub fn state(&self) -> RegistrationState {
        self.state.state()
    }

    pub fn draft(&self) -> PropertyDraft {
        self.state.draft()
    }

    pub fn properties(&self) -> Vec<PropertyRecord> {
        self.state.properties()
    }

    /// Most recent error, if any
    pub fn advisory(&self) -> Option<RegistrationError> {
        self.state.advisory()
    }

    /// Advisory text as shown to the user
    pub fn advisory_message(&self) -> Option<String> {
        self.advisory().map(|err| err.to_string())
    }
}
