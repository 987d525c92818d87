use kit_infra::InfraError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the config store and its collaborators.
#[derive(Error, Debug)]
pub enum KitError {
    #[error("chain {chain_id} is not registered in this config")]
    UnregisteredChain { chain_id: u64 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Transport(#[from] InfraError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KitError>;

/// Broad classification used for logging and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// The caller asked for something the config does not allow.
    UserError,
    /// Invalid or missing configuration.
    ConfigError,
    /// Storage or serialization failure.
    SystemError,
}

impl KitError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnregisteredChain { .. } => ErrorCategory::UserError,
            Self::InvalidConfig(_) | Self::Transport(_) => ErrorCategory::ConfigError,
            Self::Storage(_) | Self::Serialization(_) => ErrorCategory::SystemError,
        }
    }

    /// Returns a user-friendly message (hides internal details).
    pub fn user_message(&self) -> String {
        match self {
            Self::UnregisteredChain { chain_id } => {
                format!("Chain {chain_id} is not configured for this app.")
            }
            Self::InvalidConfig(msg) => format!("Configuration issue: {msg}"),
            Self::Transport(err) => format!("Transport issue: {err}"),
            Self::Storage(_) => "Storage error. Check disk space and permissions.".into(),
            Self::Serialization(_) => "Saved state could not be encoded.".into(),
        }
    }

    pub(crate) fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}
