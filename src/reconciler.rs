//! Local state reconciliation
//!
//! Owns the registration state machine, the form draft, the in-memory list of
//! registered properties and the single advisory slot shown to the user.
//!
//! ```text
//! Idle -> Building -> Submitting -> Confirming -> Confirmed -> Idle
//!            |            |             |
//!            +------------+-------------+-------> Failed ----> Idle
//! ```
//!
//! Records are appended only on `Confirmed`. They are an optimistic,
//! session-scoped projection and are never re-read from the ledger.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::builder::PropertyDraft;
use crate::confirmation::CommittedTransaction;
use crate::error::RegistrationError;
use crate::submitter::PendingTransaction;

/// Registration state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationState {
    Idle,
    Building,
    Submitting,
    Confirming,
    Confirmed,
    Failed,
}

impl RegistrationState {
    pub fn can_advance_to(self, next: RegistrationState) -> bool {
        use RegistrationState::*;
        matches!(
            (self, next),
            (Idle, Building)
                | (Building, Submitting)
                | (Building, Failed)
                | (Submitting, Confirming)
                | (Submitting, Failed)
                | (Confirming, Confirmed)
                | (Confirming, Failed)
                | (Confirmed, Idle)
                | (Failed, Idle)
        )
    }

    pub fn is_idle(self) -> bool {
        self == RegistrationState::Idle
    }
}

/// A property registered during this session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub property_id: String,
    /// Session address that signed the registration
    pub owner: String,
    pub value: f64,
    pub address: String,
    pub transaction_hash: String,
    pub ledger_version: Option<u64>,
    pub registered_at: DateTime<Utc>,
}

struct ReconcilerState {
    state: RegistrationState,
    draft: PropertyDraft,
    properties: Vec<PropertyRecord>,
    advisory: Option<RegistrationError>,
    next_attempt: u64,
}

impl ReconcilerState {
    fn transition(&mut self, next: RegistrationState) -> Result<(), RegistrationError> {
        if !self.state.can_advance_to(next) {
            log::error!("   ❌ Invalid transition {:?} -> {:?}", self.state, next);
            return Err(RegistrationError::unknown(format!(
                "invalid registration transition {:?} -> {:?}",
                self.state, next
            )));
        }
        log::debug!("   🔁 {:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(())
    }
}

/// Owner of the property list, draft, advisory slot and state machine
///
/// All mutation goes through one mutex, never held across an await. At most
/// one [`RegistrationAttempt`] exists at a time.
pub struct LocalStateReconciler {
    inner: Mutex<ReconcilerState>,
}

impl LocalStateReconciler {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ReconcilerState {
                state: RegistrationState::Idle,
                draft: PropertyDraft::default(),
                properties: Vec::new(),
                advisory: None,
                next_attempt: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ReconcilerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> RegistrationState {
        self.lock().state
    }

    pub fn draft(&self) -> PropertyDraft {
        self.lock().draft.clone()
    }

    /// Edit the form draft
    pub fn update_draft<F>(&self, edit: F)
    where
        F: FnOnce(&mut PropertyDraft),
    {
        edit(&mut self.lock().draft);
    }

    pub fn properties(&self) -> Vec<PropertyRecord> {
        self.lock().properties.clone()
    }

    /// Most recent error, if it has not been cleared by a success
    pub fn advisory(&self) -> Option<RegistrationError> {
        self.lock().advisory.clone()
    }

    /// Replace the advisory slot with a new error
    pub fn report(&self, error: RegistrationError) {
        log::warn!("⚠️  {}", error);
        self.lock().advisory = Some(error);
    }

    pub fn clear_advisory(&self) {
        self.lock().advisory = None;
    }

    /// Start a registration attempt
    ///
    /// Moves `Idle -> Building` and snapshots the draft. Refused with
    /// [`RegistrationError::RegistrationInProgress`] while another attempt is
    /// in flight; the in-flight attempt and the advisory slot are untouched.
    pub fn begin(&self) -> Result<RegistrationAttempt<'_>, RegistrationError> {
        let mut inner = self.lock();
        if !inner.state.is_idle() {
            log::warn!(
                "⚠️  Registration refused, attempt in flight ({:?})",
                inner.state
            );
            return Err(RegistrationError::RegistrationInProgress);
        }

        inner.transition(RegistrationState::Building)?;
        let id = inner.next_attempt;
        inner.next_attempt += 1;
        log::info!("🏠 Registration attempt #{} started", id);

        Ok(RegistrationAttempt {
            reconciler: self,
            draft: inner.draft.clone(),
            id,
            finished: false,
        })
    }
}

impl Default for LocalStateReconciler {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-flight token for one registration attempt
///
/// Consumed by [`confirm`](Self::confirm) or [`fail`](Self::fail). Dropping it
/// unfinished returns the machine to `Idle` without touching records, draft
/// or advisory.
pub struct RegistrationAttempt<'a> {
    reconciler: &'a LocalStateReconciler,
    draft: PropertyDraft,
    id: u64,
    finished: bool,
}

impl RegistrationAttempt<'_> {
    /// Draft as it was when the attempt started
    pub fn draft(&self) -> &PropertyDraft {
        &self.draft
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Move to the next in-flight state (`Submitting` or `Confirming`)
    pub fn advance(&self, next: RegistrationState) -> Result<(), RegistrationError> {
        match next {
            RegistrationState::Submitting | RegistrationState::Confirming => {
                self.reconciler.lock().transition(next)
            }
            other => Err(RegistrationError::unknown(format!(
                "{:?} is entered via confirm or fail, not advance",
                other
            ))),
        }
    }

    /// Enter `Confirmed`: append the record, clear draft and advisory
    pub fn confirm(
        mut self,
        pending: &PendingTransaction,
        committed: &CommittedTransaction,
    ) -> Result<PropertyRecord, RegistrationError> {
        let mut inner = self.reconciler.lock();
        inner.transition(RegistrationState::Confirmed)?;

        let record = PropertyRecord {
            property_id: self.draft.property_id.clone(),
            owner: pending.sender.clone(),
            value: self.draft.value,
            address: self.draft.address.clone(),
            transaction_hash: committed.hash.clone(),
            ledger_version: committed.version,
            registered_at: Utc::now(),
        };
        inner.properties.push(record.clone());
        inner.draft = PropertyDraft::default();
        inner.advisory = None;
        inner.transition(RegistrationState::Idle)?;
        self.finished = true;

        log::info!(
            "   ✅ Attempt #{} confirmed: property {} owned by {}",
            self.id,
            record.property_id,
            record.owner
        );
        Ok(record)
    }

    /// Enter `Failed`: report the error, keep draft and records
    pub fn fail(mut self, error: RegistrationError) -> RegistrationError {
        let mut inner = self.reconciler.lock();
        if let Err(e) = inner.transition(RegistrationState::Failed) {
            log::error!("   ❌ Attempt #{}: {}", self.id, e);
            inner.state = RegistrationState::Failed;
        }
        log::error!("   ❌ Attempt #{} failed: {}", self.id, error);
        inner.advisory = Some(error.clone());
        inner.state = RegistrationState::Idle;
        self.finished = true;
        error
    }
}

impl Drop for RegistrationAttempt<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut inner = self.reconciler.lock();
        log::warn!(
            "⚠️  Attempt #{} abandoned in {:?}, resetting to Idle",
            self.id,
            inner.state
        );
        inner.state = RegistrationState::Idle;
    }
}
