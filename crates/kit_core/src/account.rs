use indexmap::IndexMap;
use kit_infra::ChainDefinition;
use serde::{Deserialize, Serialize};

/// Smart account implementations the kit can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportedAccountType {
    LightAccount,
    MultiOwnerLightAccount,
    MultiOwnerModularAccount,
    ModularAccountV2,
}

/// What is needed to reconnect to a previously created account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_code: Option<String>,
}

/// Runtime status of an account object. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountState {
    Initializing,
    Reconnecting { address: String },
    Ready { address: String },
    Error { message: String },
}

impl AccountState {
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Reconnecting { address } | Self::Ready { address } => Some(address),
            Self::Initializing | Self::Error { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Runtime handle of a smart account client. Persisted as an empty entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartAccountClientState {
    pub chain_id: u64,
    pub account_address: Option<String>,
    pub policy_id: Option<String>,
}

pub type AccountConfigs = IndexMap<u64, IndexMap<SupportedAccountType, AccountConfig>>;
pub type Accounts = IndexMap<u64, IndexMap<SupportedAccountType, AccountState>>;
pub type SmartAccountClients = IndexMap<u64, IndexMap<SupportedAccountType, SmartAccountClientState>>;

fn empty_per_chain<V>(chains: &[ChainDefinition]) -> IndexMap<u64, IndexMap<SupportedAccountType, V>> {
    chains
        .iter()
        .map(|chain| (chain.id, IndexMap::new()))
        .collect()
}

/// One empty account map per chain.
pub fn create_default_account_state(chains: &[ChainDefinition]) -> Accounts {
    empty_per_chain(chains)
}

pub fn create_empty_account_config_state(chains: &[ChainDefinition]) -> AccountConfigs {
    empty_per_chain(chains)
}

pub fn create_empty_smart_account_client_state(chains: &[ChainDefinition]) -> SmartAccountClients {
    empty_per_chain(chains)
}
