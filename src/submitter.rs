//! Transaction submission through the wallet capability

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::builder::TransactionPayload;
use crate::error::RegistrationError;
use crate::wallet::{WalletCapability, WalletSession};

/// Handle for a transaction the wallet signed and broadcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    /// Ledger transaction hash, opaque to this client
    pub hash: String,
    /// Session address that signed the transaction
    pub sender: String,
}

/// Hands payloads to the wallet for signing and broadcast
///
/// One call is one outbound request. Failed submissions are never retried;
/// the user starts a fresh build/submit cycle.
pub struct TransactionSubmitter {
    wallet: Option<Arc<dyn WalletCapability>>,
}

impl TransactionSubmitter {
    pub fn new(wallet: Option<Arc<dyn WalletCapability>>) -> Self {
        Self { wallet }
    }

    pub async fn submit(
        &self,
        session: &WalletSession,
        payload: &TransactionPayload,
    ) -> Result<PendingTransaction, RegistrationError> {
        let sender = session.address.clone().ok_or_else(|| {
            log::error!("   ❌ Submit attempted without a wallet session");
            RegistrationError::NoSession
        })?;
        let wallet = self.wallet.as_ref().ok_or_else(|| {
            log::error!("   ❌ Submit attempted without a wallet");
            RegistrationError::WalletMissing
        })?;

        log::info!(
            "✍️  Requesting signature from {} for {}",
            wallet.name(),
            payload.function_path()
        );
        log::debug!("   Sender: {}", sender);
        log::debug!("   Payload: {}", payload.to_json());

        let submitted = wallet
            .sign_and_submit_transaction(payload)
            .await
            .map_err(|fault| {
                log::error!("   ❌ Submission failed: {}", fault);
                RegistrationError::from_submit_fault(fault)
            })?;

        let hash = submitted.hash.trim();
        if hash.is_empty() {
            log::error!("   ❌ Wallet returned an empty transaction hash");
            return Err(RegistrationError::SubmissionFailed(
                "wallet returned an empty transaction hash".to_string(),
            ));
        }

        log::info!("   ✅ Submitted! Hash: {}", hash);
        Ok(PendingTransaction {
            hash: hash.to_string(),
            sender,
        })
    }
}
