use indexmap::IndexMap;
use kit_infra::{AlchemyTransport, AlchemyTransportConfig, ChainDefinition};
use serde::{Deserialize, Serialize};

use crate::account::{
    AccountConfig, AccountConfigs, AccountState, Accounts, SmartAccountClients,
    SupportedAccountType, create_default_account_state, create_empty_account_config_state,
    create_empty_smart_account_client_state,
};
use crate::error::{KitError, Result};
use crate::signer::{AlchemySignerStatus, SignerStatus};

/// Connection settings for the signer's backend.
pub type ConnectionConfig = AlchemyTransportConfig;

/// A chain the config can switch to, with its transport and gas policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub chain: ChainDefinition,
    pub transport: AlchemyTransport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
}

/// Client for the active chain's bundler. Rebuilt on every chain switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlerClient {
    pub chain: ChainDefinition,
    pub transport: AlchemyTransport,
}

impl BundlerClient {
    pub fn new(connection: &Connection) -> Self {
        Self {
            chain: connection.chain.clone(),
            transport: connection.transport.clone(),
        }
    }

    pub fn rpc_url(&self) -> Result<String> {
        Ok(self.transport.resolve_url(&self.chain)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerClientConfig {
    pub connection: ConnectionConfig,
}

/// Settings the signer is created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerConfig {
    pub client: SignerClientConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_config: Option<SessionConfig>,
}

/// Everything the store holds.
///
/// `chain` is always a registered connection's chain and `bundler_client`
/// always points at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreState {
    pub chain: ChainDefinition,
    pub connections: IndexMap<u64, Connection>,
    pub bundler_client: BundlerClient,
    pub accounts: Accounts,
    pub account_configs: AccountConfigs,
    pub smart_account_clients: SmartAccountClients,
    pub signer_status: SignerStatus,
    pub config: SignerConfig,
}

impl StoreState {
    pub(crate) fn new(
        connections: IndexMap<u64, Connection>,
        chain_id: u64,
        config: SignerConfig,
    ) -> Result<Self> {
        let active = connections
            .get(&chain_id)
            .ok_or(KitError::UnregisteredChain { chain_id })?;
        let chain = active.chain.clone();
        let bundler_client = BundlerClient::new(active);

        let chains: Vec<ChainDefinition> = connections.values().map(|c| c.chain.clone()).collect();
        Ok(Self {
            chain,
            bundler_client,
            accounts: create_default_account_state(&chains),
            account_configs: create_empty_account_config_state(&chains),
            smart_account_clients: create_empty_smart_account_client_state(&chains),
            signer_status: SignerStatus::default(),
            config,
            connections,
        })
    }

    pub fn connection(&self, chain_id: u64) -> Option<&Connection> {
        self.connections.get(&chain_id)
    }

    /// Connection of the active chain.
    pub fn active_connection(&self) -> Option<&Connection> {
        self.connection(self.chain.id)
    }

    pub fn chains(&self) -> impl Iterator<Item = &ChainDefinition> {
        self.connections.values().map(|c| &c.chain)
    }

    /// Make `chain` active. The chain must have a registered connection.
    pub(crate) fn switch_chain(&mut self, chain: ChainDefinition) -> Result<()> {
        let connection = self
            .connections
            .get(&chain.id)
            .ok_or(KitError::UnregisteredChain { chain_id: chain.id })?;
        self.bundler_client = BundlerClient {
            chain: chain.clone(),
            transport: connection.transport.clone(),
        };
        self.chain = chain;
        Ok(())
    }

    /// Shallow-merge `update`. Fails without side effects if the update
    /// names an unregistered chain.
    pub(crate) fn apply(&mut self, update: StateUpdate) -> Result<()> {
        if let Some(chain) = update.chain {
            self.switch_chain(chain)?;
        }
        if let Some(accounts) = update.accounts {
            self.accounts = accounts;
        }
        if let Some(account_configs) = update.account_configs {
            self.account_configs = account_configs;
        }
        if let Some(clients) = update.smart_account_clients {
            self.smart_account_clients = clients;
        }
        if let Some(status) = update.signer_status {
            self.signer_status = status.into();
        }
        Ok(())
    }

    /// Record a created account for the active chain.
    pub(crate) fn install_account(
        &mut self,
        account_type: SupportedAccountType,
        config: AccountConfig,
    ) {
        let chain_id = self.chain.id;
        let state = match &config.account_address {
            Some(address) => AccountState::Ready {
                address: address.clone(),
            },
            None => AccountState::Initializing,
        };
        self.accounts
            .entry(chain_id)
            .or_default()
            .insert(account_type, state);
        self.account_configs
            .entry(chain_id)
            .or_default()
            .insert(account_type, config);
    }
}

/// Typed partial update for [`crate::store::Store::set_state`].
///
/// Connections and signer config come from configuration and cannot be
/// replaced after creation.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub chain: Option<ChainDefinition>,
    pub accounts: Option<Accounts>,
    pub account_configs: Option<AccountConfigs>,
    pub smart_account_clients: Option<SmartAccountClients>,
    pub signer_status: Option<AlchemySignerStatus>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain(mut self, chain: ChainDefinition) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn accounts(mut self, accounts: Accounts) -> Self {
        self.accounts = Some(accounts);
        self
    }

    pub fn account_configs(mut self, account_configs: AccountConfigs) -> Self {
        self.account_configs = Some(account_configs);
        self
    }

    pub fn smart_account_clients(mut self, clients: SmartAccountClients) -> Self {
        self.smart_account_clients = Some(clients);
        self
    }

    pub fn signer_status(mut self, status: AlchemySignerStatus) -> Self {
        self.signer_status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_none()
            && self.accounts.is_none()
            && self.account_configs.is_none()
            && self.smart_account_clients.is_none()
            && self.signer_status.is_none()
    }
}
