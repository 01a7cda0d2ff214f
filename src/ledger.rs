//! Fullnode REST ledger client
//!
//! Looks transactions up via `GET {ledger_url}/transactions/by_hash/{hash}`.
//! The fullnode answers 404 for unknown hashes, `"type": "pending_transaction"`
//! while the transaction sits in the mempool, and a committed transaction
//! (with `success`, `vm_status` and a string-encoded `version`) once executed.

use async_trait::async_trait;
use serde::Deserialize;

use crate::confirmation::{CommittedTransaction, LedgerClient, TransactionLookup};
use crate::error::LedgerFault;

const PENDING_TYPE: &str = "pending_transaction";

/// Subset of the fullnode transaction JSON this client reads
#[derive(Debug, Deserialize)]
struct TransactionResponse {
    #[serde(rename = "type")]
    kind: String,
    hash: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    vm_status: Option<String>,
}

impl TransactionResponse {
    fn into_lookup(self) -> Result<TransactionLookup, LedgerFault> {
        if self.kind == PENDING_TYPE {
            return Ok(TransactionLookup::Pending);
        }

        let success = self.success.ok_or_else(|| {
            LedgerFault::transport(format!(
                "committed transaction {} has no success flag",
                self.hash
            ))
        })?;
        let version = match self.version {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| {
                LedgerFault::transport(format!("invalid version {:?}: {}", raw, e))
            })?),
            None => None,
        };

        Ok(TransactionLookup::Committed(CommittedTransaction {
            hash: self.hash,
            version,
            success,
            vm_status: self.vm_status.unwrap_or_default(),
        }))
    }
}

/// Ledger client backed by a fullnode's REST API
#[derive(Clone)]
pub struct RestLedgerClient {
    base_url: String,
    /// reqwest::Client is internally Arc-based
    http_client: reqwest::Client,
}

impl RestLedgerClient {
    /// `base_url` includes the API version prefix, e.g. `https://fullnode.devnet.aptoslabs.com/v1`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transaction_url(&self, hash: &str) -> String {
        format!("{}/transactions/by_hash/{}", self.base_url, hash)
    }
}

#[async_trait]
impl LedgerClient for RestLedgerClient {
    async fn transaction_by_hash(&self, hash: &str) -> Result<TransactionLookup, LedgerFault> {
        let url = self.transaction_url(hash);
        log::debug!("   🔍 GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| LedgerFault::transport(format!("HTTP error: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(TransactionLookup::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerFault::http(status.as_u16(), body));
        }

        let body: TransactionResponse = response
            .json()
            .await
            .map_err(|e| LedgerFault::transport(format!("Invalid JSON: {}", e)))?;

        body.into_lookup()
    }
}
