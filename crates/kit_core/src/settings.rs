use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use kit_infra::{AlchemyTransportConfig, alchemy, arbitrum_sepolia, chain_by_id, sepolia};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::create_config::{ChainConfig, CreateConfigProps};
use crate::error::KitError;
use crate::storage::Storage;
use crate::store::{ConnectionConfig, DEFAULT_STORAGE_KEY};

/// One supported chain in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSettings {
    pub chain_id: u64,
    pub rpc_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
}

/// SDK settings stored at `~/.account-kit/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitSettings {
    pub default_chain_id: u64,
    pub signer_rpc_url: String,
    pub storage_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    /// Level for the kit's own crates; dependencies log at `warn`.
    pub log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    pub log_to_console: bool,
    pub chains: Vec<ChainSettings>,
}

impl Default for KitSettings {
    fn default() -> Self {
        let chains = [sepolia(), arbitrum_sepolia()]
            .into_iter()
            .map(|chain| ChainSettings {
                chain_id: chain.id,
                rpc_url: chain.default_http_url().unwrap_or_default().to_string(),
                policy_id: None,
            })
            .collect();

        Self {
            default_chain_id: sepolia().id,
            signer_rpc_url: "/api/signer".into(),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            storage_dir: None,
            log_level: "info".into(),
            log_dir: None,
            log_to_console: true,
            chains,
        }
    }
}

impl KitSettings {
    /// Returns the base directory: `~/.account-kit/`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".account-kit"))
    }

    /// Returns the settings file path: `~/.account-kit/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    /// Returns the logs directory: `~/.account-kit/logs/`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Directory for persisted store state; `storage_dir` if set, otherwise
    /// `~/.account-kit/state/`.
    pub fn resolved_storage_dir(&self) -> Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::base_dir()?.join("state")),
        }
    }

    /// Directory for log files; `log_dir` if set, otherwise
    /// `~/.account-kit/logs/`.
    pub fn resolved_log_dir(&self) -> Result<PathBuf> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::logs_dir(),
        }
    }

    /// Loads settings from `~/.account-kit/config.toml`, creating it if missing.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from_path(&path)
    }

    /// Load settings from a specific file, writing defaults there if it does
    /// not exist yet.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings: {}", path.display()))?;
            let settings: Self = toml::from_str(&content)
                .with_context(|| format!("Failed to parse settings: {}", path.display()))?;
            info!("Loaded settings from {}", path.display());
            Ok(settings)
        } else {
            let settings = Self::default();
            settings.save_to_path(path)?;
            info!("Created default settings at {}", path.display());
            Ok(settings)
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings: {}", path.display()))?;
        Ok(())
    }

    /// Resolve chain ids against the built-in chains and build the input for
    /// [`crate::create_config`].
    pub fn into_props(self, storage: Arc<dyn Storage>) -> crate::error::Result<CreateConfigProps> {
        let chains = self
            .chains
            .into_iter()
            .map(|entry| {
                let chain = chain_by_id(entry.chain_id).ok_or_else(|| {
                    KitError::InvalidConfig(format!("unknown chain id {}", entry.chain_id))
                })?;
                let transport = alchemy(AlchemyTransportConfig::rpc_url(entry.rpc_url));
                Ok(ChainConfig {
                    chain,
                    transport,
                    policy_id: entry.policy_id,
                })
            })
            .collect::<crate::error::Result<Vec<_>>>()?;

        let chain = chain_by_id(self.default_chain_id).ok_or_else(|| {
            KitError::InvalidConfig(format!("unknown default chain id {}", self.default_chain_id))
        })?;

        Ok(CreateConfigProps::new(
            chain,
            chains,
            ConnectionConfig::rpc_url(self.signer_rpc_url),
        )
        .storage(storage)
        .storage_key(self.storage_key))
    }
}
