use crate::domain::{BalanceKeying, ChainId, Denom};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

pub const DEFAULT_POSITIONS_CHAIN_ID: &str = "osmosis-1";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub chains: ChainRegistry,
    pub positions_chain_id: ChainId,
    pub bond_contract: Option<String>,
    pub balance_keying: BalanceKeying,
    pub feed_path: Option<String>,
}

/// Per-chain settings: accepted denominations and the monitored pool allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChainSettings {
    #[serde(default)]
    pub denoms: Vec<String>,
    #[serde(default)]
    pub pool_ids: Vec<String>,
}

/// Chain id -> settings, resolved once at startup and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainRegistry {
    chains: HashMap<ChainId, ChainSettings>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ChainRegistry {
    pub fn new(chains: HashMap<ChainId, ChainSettings>) -> Self {
        Self { chains }
    }

    /// Parse `{"<chain-id>": {"denoms": [...], "pool_ids": [...]}}`.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let parsed: HashMap<String, ChainSettings> = serde_json::from_str(raw)?;
        Ok(Self::new(
            parsed
                .into_iter()
                .map(|(id, settings)| (ChainId::new(id), settings))
                .collect(),
        ))
    }

    pub fn with_chain(mut self, chain_id: &str, settings: ChainSettings) -> Self {
        self.chains.insert(ChainId::new(chain_id), settings);
        self
    }

    pub fn settings(&self, chain_id: &ChainId) -> Option<&ChainSettings> {
        self.chains.get(chain_id)
    }

    pub fn accepts_denom(&self, chain_id: &ChainId, denom: &Denom) -> bool {
        self.settings(chain_id)
            .map(|s| s.denoms.iter().any(|d| d == denom.as_str()))
            .unwrap_or(false)
    }

    /// Pool allow-list for a chain; empty when the chain is not configured.
    pub fn pool_allow_list(&self, chain_id: &ChainId) -> HashSet<String> {
        self.settings(chain_id)
            .map(|s| s.pool_ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let chains = parse_chain_registry_from_map(&env_map)?;

        let positions_chain_id = ChainId::new(
            env_map
                .get("POSITIONS_CHAIN_ID")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_POSITIONS_CHAIN_ID),
        );

        let bond_contract = env_map
            .get("BOND_CONTRACT")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let balance_keying = match env_map
            .get("BALANCE_KEYING")
            .map(|s| s.as_str())
            .unwrap_or("account")
        {
            "account" => BalanceKeying::Account,
            "account_denom" => BalanceKeying::AccountDenom,
            other => {
                return Err(ConfigError::InvalidValue(
                    "BALANCE_KEYING".to_string(),
                    format!("must be account or account_denom, got {}", other),
                ))
            }
        };

        let feed_path = env_map
            .get("FEED_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Config {
            port,
            database_path,
            chains,
            positions_chain_id,
            bond_contract,
            balance_keying,
            feed_path,
        })
    }

    /// Pool allow-list of the chain whose positions are tracked.
    pub fn position_pools(&self) -> HashSet<String> {
        self.chains.pool_allow_list(&self.positions_chain_id)
    }
}

fn parse_chain_registry_from_map(
    env_map: &HashMap<String, String>,
) -> Result<ChainRegistry, ConfigError> {
    let (key, raw) = if let Some(inline) = env_map.get("CHAIN_CONFIG") {
        ("CHAIN_CONFIG", inline.clone())
    } else if let Some(file_path) = env_map.get("CHAIN_CONFIG_FILE") {
        let content = std::fs::read_to_string(file_path).map_err(|_| {
            ConfigError::InvalidValue(
                "CHAIN_CONFIG_FILE".to_string(),
                "file not found or unreadable".to_string(),
            )
        })?;
        ("CHAIN_CONFIG_FILE", content)
    } else {
        return Err(ConfigError::MissingEnv(
            "CHAIN_CONFIG or CHAIN_CONFIG_FILE".to_string(),
        ));
    };

    ChainRegistry::from_json(&raw)
        .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))
}
