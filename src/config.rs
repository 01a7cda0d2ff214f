/// Registry configuration from environment variables
///
/// Controls the on-ledger module address, the fullnode endpoint used for
/// confirmation lookups, and the confirmation wait budget.
/// Defaults to Devnet with no module address.
use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEVNET_URL: &str = "https://fullnode.devnet.aptoslabs.com/v1";
pub const TESTNET_URL: &str = "https://fullnode.testnet.aptoslabs.com/v1";
pub const MAINNET_URL: &str = "https://fullnode.mainnet.aptoslabs.com/v1";
pub const LOCAL_URL: &str = "http://127.0.0.1:8080/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Ledger network the client talks to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerNetwork {
    Devnet,
    Testnet,
    Mainnet,
    Local,
}

impl LedgerNetwork {
    /// Default fullnode REST endpoint for this network
    pub fn default_url(&self) -> &'static str {
        match self {
            Self::Devnet => DEVNET_URL,
            Self::Testnet => TESTNET_URL,
            Self::Mainnet => MAINNET_URL,
            Self::Local => LOCAL_URL,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Address of the account hosting the `PropertyRegistry` module
    pub module_address: Option<String>,
    pub network: LedgerNetwork,
    /// Fullnode REST base URL, including the `/v1` prefix
    pub ledger_url: String,
    /// Total time to wait for a transaction to reach finality
    pub confirmation_timeout: Duration,
    /// Delay between transaction lookups while waiting
    pub poll_interval: Duration,
}

impl RegistryConfig {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// Environment variables:
    /// - `MODULE_ADDRESS`: module account address (blank counts as unset)
    /// - `LEDGER_NETWORK`: "devnet" (default), "testnet", "mainnet" or "local"
    /// - `LEDGER_URL`: fullnode endpoint (optional, overrides the network default)
    /// - `CONFIRMATION_TIMEOUT_SECS`: confirmation wait budget (default 20)
    /// - `CONFIRMATION_POLL_INTERVAL_MS`: lookup interval (default 500)
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Devnet with a published module
    /// MODULE_ADDRESS=0x42 cargo test
    ///
    /// # Local ledger-mock
    /// LEDGER_NETWORK=local LEDGER_URL=http://localhost:8080/v1 cargo test
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let module_address = lookup("MODULE_ADDRESS")
            .map(|addr| addr.trim().to_string())
            .filter(|addr| !addr.is_empty());
        match module_address {
            Some(ref addr) => log::info!("📦 Module address: {}", addr),
            None => log::warn!("⚠️  MODULE_ADDRESS not set, registrations will fail"),
        }

        let network_str = lookup("LEDGER_NETWORK")
            .unwrap_or_else(|| "devnet".to_string())
            .to_lowercase();

        let network = match network_str.as_str() {
            "devnet" | "" => LedgerNetwork::Devnet,
            "testnet" => LedgerNetwork::Testnet,
            "mainnet" => LedgerNetwork::Mainnet,
            "local" => LedgerNetwork::Local,
            other => {
                log::warn!("⚠️  Unknown network '{}', defaulting to Devnet", other);
                LedgerNetwork::Devnet
            }
        };

        let ledger_url = lookup("LEDGER_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| network.default_url().to_string());
        log::info!("📡 Ledger URL: {} ({:?})", ledger_url, network);

        let timeout_secs = parse_u64(
            "CONFIRMATION_TIMEOUT_SECS",
            lookup("CONFIRMATION_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;
        let poll_ms = parse_u64(
            "CONFIRMATION_POLL_INTERVAL_MS",
            lookup("CONFIRMATION_POLL_INTERVAL_MS"),
            DEFAULT_POLL_INTERVAL_MS,
        )?;

        Ok(Self {
            module_address,
            network,
            ledger_url,
            confirmation_timeout: Duration::from_secs(timeout_secs),
            poll_interval: Duration::from_millis(poll_ms),
        })
    }

    /// Replace the module address (builder style)
    pub fn with_module_address(mut self, address: impl Into<String>) -> Self {
        self.module_address = Some(address.into());
        self
    }
}

impl Default for RegistryConfig {
    /// Default configuration (Devnet, no module address)
    fn default() -> Self {
        Self {
            module_address: None,
            network: LedgerNetwork::Devnet,
            ledger_url: DEVNET_URL.to_string(),
            confirmation_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

fn parse_u64(key: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                key,
                value: value.clone(),
                reason: e.to_string(),
            }),
    }
}
