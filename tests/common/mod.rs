//! Shared test doubles for the registration integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use property_registry::{
    LedgerClient, LedgerFault, RegistryConfig, SubmittedTransaction, TransactionLookup,
    TransactionPayload, WalletAccount, WalletCapability, WalletFault,
};
use tokio::sync::Notify;

pub const MODULE_ADDRESS: &str = "0xMOD";
pub const OWNER: &str = "0xABCD";
pub const TX_HASH: &str = "0xHASH";

/// Quiet logger, enable with RUST_LOG=debug
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Config with the module address set and a short confirmation budget
pub fn test_config() -> RegistryConfig {
    RegistryConfig {
        confirmation_timeout: Duration::from_millis(300),
        poll_interval: Duration::from_millis(10),
        ..RegistryConfig::default()
    }
    .with_module_address(MODULE_ADDRESS)
}

/// Wallet that answers from fixed results and records what it signed
pub struct ScriptedWallet {
    connect_result: Result<WalletAccount, WalletFault>,
    submit_result: Result<SubmittedTransaction, WalletFault>,
    signed: Mutex<Vec<TransactionPayload>>,
    connect_calls: AtomicUsize,
}

impl ScriptedWallet {
    pub fn new(address: &str, hash: &str) -> Self {
        Self {
            connect_result: Ok(WalletAccount {
                address: address.to_string(),
                public_key: None,
            }),
            submit_result: Ok(SubmittedTransaction {
                hash: hash.to_string(),
            }),
            signed: Mutex::new(Vec::new()),
            connect_calls: AtomicUsize::new(0),
        }
    }

    pub fn connect_fails(mut self, fault: WalletFault) -> Self {
        self.connect_result = Err(fault);
        self
    }

    pub fn submit_fails(mut self, fault: WalletFault) -> Self {
        self.submit_result = Err(fault);
        self
    }

    pub fn signed(&self) -> Vec<TransactionPayload> {
        self.signed.lock().unwrap().clone()
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletCapability for ScriptedWallet {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn connect(&self) -> Result<WalletAccount, WalletFault> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        self.connect_result.clone()
    }

    async fn sign_and_submit_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> Result<SubmittedTransaction, WalletFault> {
        self.signed.lock().unwrap().push(payload.clone());
        self.submit_result.clone()
    }
}

/// Wallet whose signing prompt stays open until `release` is notified
pub struct GatedWallet {
    pub prompt_open: Notify,
    pub release: Notify,
    submissions: AtomicUsize,
}

impl GatedWallet {
    pub fn new() -> Self {
        Self {
            prompt_open: Notify::new(),
            release: Notify::new(),
            submissions: AtomicUsize::new(0),
        }
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletCapability for GatedWallet {
    async fn connect(&self) -> Result<WalletAccount, WalletFault> {
        Ok(WalletAccount {
            address: OWNER.to_string(),
            public_key: None,
        })
    }

    async fn sign_and_submit_transaction(
        &self,
        _payload: &TransactionPayload,
    ) -> Result<SubmittedTransaction, WalletFault> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        self.prompt_open.notify_one();
        self.release.notified().await;
        Ok(SubmittedTransaction {
            hash: TX_HASH.to_string(),
        })
    }
}

/// Ledger that replays lookups in order, repeating the last one
pub struct ScriptedLedger {
    script: Mutex<VecDeque<Result<TransactionLookup, LedgerFault>>>,
    queried: Mutex<Vec<String>>,
}

impl ScriptedLedger {
    pub fn new(script: Vec<Result<TransactionLookup, LedgerFault>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            queried: Mutex::new(Vec::new()),
        })
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    async fn transaction_by_hash(&self, hash: &str) -> Result<TransactionLookup, LedgerFault> {
        self.queried.lock().unwrap().push(hash.to_string());
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap_or(Ok(TransactionLookup::NotFound))
        } else {
            script.front().cloned().unwrap_or(Ok(TransactionLookup::NotFound))
        }
    }
}
