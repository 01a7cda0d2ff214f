//! Wallet capability and session management
//!
//! The wallet is an injected capability: it custodies keys, shows the
//! authorization and signing prompts, and broadcasts on the user's behalf.
//! This module only detects it, connects to it, and remembers the connected
//! address for the rest of the session.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::builder::TransactionPayload;
use crate::error::{RegistrationError, WalletConnectionError, WalletFault};

/// Account returned by a successful wallet authorization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

/// Wallet's answer to a sign-and-submit request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedTransaction {
    pub hash: String,
}

/// Operations every wallet capability must provide
///
/// Implementations surface their failures as raw [`WalletFault`]s; the
/// session manager and submitter classify them.
#[async_trait]
pub trait WalletCapability: Send + Sync {
    /// Human-readable wallet name for logs
    fn name(&self) -> &str {
        "wallet"
    }

    /// Request authorization and return the connected account
    async fn connect(&self) -> Result<WalletAccount, WalletFault>;

    /// Sign the payload and broadcast it as one request
    async fn sign_and_submit_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> Result<SubmittedTransaction, WalletFault>;
}

/// Connected wallet address, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSession {
    pub address: Option<String>,
}

impl WalletSession {
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }
}

/// Result of probing the host for a wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletAvailability {
    Installed,
    Missing,
}

/// Detects the wallet capability and owns the current session
pub struct WalletSessionManager {
    wallet: Option<Arc<dyn WalletCapability>>,
    session: RwLock<WalletSession>,
}

impl WalletSessionManager {
    /// `wallet` is `None` when the host environment exposes no wallet
    pub fn new(wallet: Option<Arc<dyn WalletCapability>>) -> Self {
        Self {
            wallet,
            session: RwLock::new(WalletSession::default()),
        }
    }

    /// Check whether a wallet capability is present
    ///
    /// Never fails: a missing wallet is an advisory condition, the page is
    /// still usable without one.
    pub fn detect(&self) -> WalletAvailability {
        match &self.wallet {
            Some(wallet) => {
                log::debug!("🔌 Wallet detected: {}", wallet.name());
                WalletAvailability::Installed
            }
            None => {
                log::warn!("⚠️  No wallet capability detected");
                WalletAvailability::Missing
            }
        }
    }

    /// Request wallet authorization and record the connected address
    ///
    /// On any error the session is left as it was. There is no automatic
    /// retry, the caller must invoke `connect` again.
    pub async fn connect(&self) -> Result<String, RegistrationError> {
        let wallet = self.wallet.as_ref().ok_or_else(|| {
            log::error!("   ❌ Cannot connect: wallet not installed");
            RegistrationError::WalletMissing
        })?;

        log::info!("🔑 Requesting authorization from {}", wallet.name());
        let account = wallet.connect().await.map_err(|fault| {
            log::error!("   ❌ Wallet connect failed: {}", fault);
            RegistrationError::from_connect_fault(fault)
        })?;

        let address = account.address.trim();
        if address.is_empty() {
            log::error!("   ❌ Wallet returned an empty address");
            return Err(WalletConnectionError::ConnectionFailed(
                "wallet returned an empty address".to_string(),
            )
            .into());
        }

        *self.session.write().unwrap_or_else(PoisonError::into_inner) =
            WalletSession::connected(address);
        log::info!("   ✅ Wallet connected: {}", address);

        Ok(address.to_string())
    }

    /// Snapshot of the current session
    pub fn session(&self) -> WalletSession {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Wallet handle for submission, if one is installed
    pub fn wallet(&self) -> Option<Arc<dyn WalletCapability>> {
        self.wallet.clone()
    }
}
