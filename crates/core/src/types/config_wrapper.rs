use eyre::{Result, eyre};
use std::str::FromStr;
use std::time::Duration;
use std::{env, fs};
use toml::Value;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub id: u64,
    pub name: String,
    /// Raw endpoint, may be an `env:VAR` reference.
    pub rpc_url: Option<String>,
}

impl ChainConfig {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            rpc_url: None,
        }
    }

    pub fn rpc_url(&self) -> Result<String> {
        let raw = self
            .rpc_url
            .as_deref()
            .ok_or_else(|| eyre!("RPC URL not configured for chain: {}", self.id))?;
        resolve_env_value(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSettings {
    /// JSON-RPC endpoint of the wallet, may be an `env:VAR` reference.
    pub endpoint: Option<String>,
    pub poll_interval: Duration,
    pub max_polls: u32,
    pub atomic_required: bool,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            poll_interval: Duration::from_millis(1_000),
            max_polls: 120,
            atomic_required: true,
        }
    }
}

impl WalletSettings {
    pub fn endpoint(&self) -> Result<String> {
        let raw = self
            .endpoint
            .as_deref()
            .ok_or_else(|| eyre!("Wallet endpoint not configured"))?;
        resolve_env_value(raw)
    }
}

/// Application configuration, built once at startup and passed to whatever
/// needs chain or wallet settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub chains: Vec<ChainConfig>,
    pub default_chain: u64,
    pub wallet: WalletSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chains: default_chains(),
            default_chain: 1,
            wallet: WalletSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn chain(&self, chain_id: u64) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.id == chain_id)
    }

    /// Endpoint to reach the wallet through when sending on `chain_id`. The
    /// `[wallet]` endpoint wins; otherwise the chain's own `rpc_url` is used.
    pub fn endpoint_for(&self, chain_id: u64) -> Result<String> {
        if self.wallet.endpoint.is_some() {
            return self.wallet.endpoint();
        }
        let chain = self
            .chain(chain_id)
            .ok_or_else(|| eyre!("Chain {} is not configured", chain_id))?;
        chain
            .rpc_url()
            .map_err(|_| eyre!("No wallet endpoint or RPC URL configured for chain: {}", chain_id))
    }
}

pub fn default_chains() -> Vec<ChainConfig> {
    vec![
        ChainConfig::new(1, "Ethereum"),
        ChainConfig::new(8453, "Base"),
        ChainConfig::new(42161, "Arbitrum One"),
    ]
}

fn resolve_env_value(raw: &str) -> Result<String> {
    if let Some(env_var) = raw.strip_prefix("env:") {
        env::var(env_var).map_err(|_| eyre!("Environment variable {} not set", env_var))
    } else {
        Ok(raw.to_string())
    }
}

pub struct ConfigWrapper {
    raw_config: Value,
}

impl ConfigWrapper {
    pub fn new(raw_config: Value) -> Self {
        Self { raw_config }
    }

    pub fn from_file(path: Option<&str>) -> Result<Self> {
        let config_content = fs::read_to_string(path.unwrap_or(DEFAULT_CONFIG_PATH))?;
        config_content.parse()
    }

    /// Chains from the `[chains.<id>]` tables, or the built-in set when the
    /// file declares none. Sorted by chain id.
    pub fn get_chains(&self) -> Result<Vec<ChainConfig>> {
        let Some(table) = self.raw_config.get("chains") else {
            return Ok(default_chains());
        };
        let table = table
            .as_table()
            .ok_or_else(|| eyre!("chains must be a table keyed by chain id"))?;

        let mut chains = Vec::with_capacity(table.len());
        for (key, entry) in table {
            let id: u64 = key
                .parse()
                .map_err(|_| eyre!("Invalid chain id: {}", key))?;
            let name = entry
                .get("name")
                .and_then(|n| n.as_str())
                .ok_or_else(|| eyre!("name not found for chain: {}", id))?;
            let rpc_url = entry
                .get("rpc_url")
                .and_then(|u| u.as_str())
                .map(|u| u.to_string());
            chains.push(ChainConfig {
                id,
                name: name.to_string(),
                rpc_url,
            });
        }
        chains.sort_by_key(|c| c.id);

        if chains.is_empty() {
            return Err(eyre!("chains table is empty"));
        }
        Ok(chains)
    }

    pub fn get_default_chain(&self, chains: &[ChainConfig]) -> Result<u64> {
        match self.raw_config.get("default_chain") {
            Some(value) => {
                let id = value
                    .as_integer()
                    .and_then(|i| u64::try_from(i).ok())
                    .ok_or_else(|| eyre!("default_chain must be a positive integer"))?;
                if !chains.iter().any(|c| c.id == id) {
                    return Err(eyre!("default_chain {} is not in the chains table", id));
                }
                Ok(id)
            }
            None => chains
                .first()
                .map(|c| c.id)
                .ok_or_else(|| eyre!("No chains configured")),
        }
    }

    pub fn get_wallet_settings(&self) -> Result<WalletSettings> {
        let mut settings = WalletSettings::default();
        let Some(wallet) = self.raw_config.get("wallet") else {
            return Ok(settings);
        };

        if let Some(endpoint) = wallet.get("endpoint") {
            let endpoint = endpoint
                .as_str()
                .ok_or_else(|| eyre!("wallet.endpoint must be a string"))?;
            settings.endpoint = Some(endpoint.to_string());
        }
        if let Some(interval) = wallet.get("poll_interval_ms") {
            let interval = interval
                .as_integer()
                .and_then(|i| u64::try_from(i).ok())
                .ok_or_else(|| eyre!("wallet.poll_interval_ms must be a positive integer"))?;
            settings.poll_interval = Duration::from_millis(interval);
        }
        if let Some(max_polls) = wallet.get("max_polls") {
            settings.max_polls = max_polls
                .as_integer()
                .and_then(|i| u32::try_from(i).ok())
                .ok_or_else(|| eyre!("wallet.max_polls must be a positive integer"))?;
        }
        if let Some(atomic) = wallet.get("atomic_required") {
            settings.atomic_required = atomic
                .as_bool()
                .ok_or_else(|| eyre!("wallet.atomic_required must be a boolean"))?;
        }

        Ok(settings)
    }

    pub fn app_config(&self) -> Result<AppConfig> {
        let chains = self.get_chains()?;
        let default_chain = self.get_default_chain(&chains)?;
        let wallet = self.get_wallet_settings()?;
        Ok(AppConfig {
            chains,
            default_chain,
            wallet,
        })
    }
}

impl FromStr for ConfigWrapper {
    type Err = eyre::Report;

    fn from_str(config_content: &str) -> Result<Self> {
        let raw_config: Value = config_content.parse::<Value>()?;
        Ok(Self::new(raw_config))
    }
}
