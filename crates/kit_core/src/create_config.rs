use std::sync::Arc;

use indexmap::IndexMap;
use kit_infra::{AlchemyTransport, ChainDefinition};
use tracing::info;

use crate::error::{KitError, Result};
use crate::storage::{MemoryStorage, NoopStorage, Storage};
use crate::store::{
    Connection, ConnectionConfig, DEFAULT_STORAGE_KEY, SessionConfig, SignerClientConfig,
    SignerConfig, Store, StoreState,
};

/// A chain the app supports, with the transport used to reach it.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub chain: ChainDefinition,
    pub transport: AlchemyTransport,
    pub policy_id: Option<String>,
}

impl ChainConfig {
    pub fn new(chain: ChainDefinition, transport: AlchemyTransport) -> Self {
        Self {
            chain,
            transport,
            policy_id: None,
        }
    }

    /// Sponsor gas on this chain with the given policy.
    pub fn with_policy_id(mut self, policy_id: impl Into<String>) -> Self {
        self.policy_id = Some(policy_id.into());
        self
    }
}

/// Input to [`create_config`].
pub struct CreateConfigProps {
    /// Chain that is active before anything is rehydrated.
    pub chain: ChainDefinition,
    pub chains: Vec<ChainConfig>,
    pub signer_connection: ConnectionConfig,
    pub session_config: Option<SessionConfig>,
    /// Defaults to in-memory storage, or no-op storage when `ssr` is set.
    pub storage: Option<Arc<dyn Storage>>,
    pub storage_key: Option<String>,
    pub ssr: bool,
}

impl CreateConfigProps {
    pub fn new(
        chain: ChainDefinition,
        chains: Vec<ChainConfig>,
        signer_connection: ConnectionConfig,
    ) -> Self {
        Self {
            chain,
            chains,
            signer_connection,
            session_config: None,
            storage: None,
            storage_key: None,
            ssr: false,
        }
    }

    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    pub fn session_config(mut self, session_config: SessionConfig) -> Self {
        self.session_config = Some(session_config);
        self
    }

    pub fn ssr(mut self, ssr: bool) -> Self {
        self.ssr = ssr;
        self
    }
}

/// A configured account kit: the store plus how it was created.
#[derive(Debug)]
pub struct AlchemyAccountsConfig {
    pub store: Store,
    pub ssr: bool,
}

/// Validate `props` and build the store. Nothing is read from or written to
/// storage until [`Store::rehydrate`] is awaited.
pub fn create_config(props: CreateConfigProps) -> Result<AlchemyAccountsConfig> {
    if props.chains.is_empty() {
        return Err(KitError::InvalidConfig("at least one chain is required".into()));
    }
    props.signer_connection.validate()?;

    let mut connections = IndexMap::with_capacity(props.chains.len());
    for ChainConfig {
        chain,
        transport,
        policy_id,
    } in props.chains
    {
        transport.config().validate()?;
        let chain_id = chain.id;
        if connections.contains_key(&chain_id) {
            return Err(KitError::InvalidConfig(format!(
                "chain {chain_id} is configured more than once"
            )));
        }
        connections.insert(
            chain_id,
            Connection {
                chain,
                transport,
                policy_id,
            },
        );
    }

    let default_id = props.chain.id;
    if !connections.contains_key(&default_id) {
        return Err(KitError::InvalidConfig(format!(
            "default chain {default_id} has no configured transport"
        )));
    }

    let signer_config = SignerConfig {
        client: SignerClientConfig {
            connection: props.signer_connection,
        },
        session_config: props.session_config,
    };
    let chain_count = connections.len();
    let mut state = StoreState::new(connections, default_id, signer_config)?;
    // The caller's descriptor for the default chain wins over the list entry.
    state.switch_chain(props.chain)?;

    let storage: Arc<dyn Storage> = match props.storage {
        Some(storage) => storage,
        None if props.ssr => Arc::new(NoopStorage),
        None => Arc::new(MemoryStorage::new()),
    };
    let storage_key = props
        .storage_key
        .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());

    info!(
        chain_id = default_id,
        chains = chain_count,
        storage_key = %storage_key,
        ssr = props.ssr,
        "created account kit config"
    );

    Ok(AlchemyAccountsConfig {
        store: Store::new(state, storage, storage_key),
        ssr: props.ssr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kit_infra::{AlchemyTransportConfig, InfraError, alchemy, arbitrum_sepolia, base_sepolia, sepolia};

    fn chains() -> Vec<ChainConfig> {
        vec![
            ChainConfig::new(
                sepolia(),
                alchemy(AlchemyTransportConfig::rpc_url("/api/sepolia")),
            )
            .with_policy_id("test-policy-id"),
            ChainConfig::new(
                arbitrum_sepolia(),
                alchemy(AlchemyTransportConfig::rpc_url("/api/arbitrumSepolia")),
            ),
        ]
    }

    fn props(chain: ChainDefinition) -> CreateConfigProps {
        CreateConfigProps::new(chain, chains(), ConnectionConfig::rpc_url("/api/signer"))
    }

    #[test]
    fn active_chain_is_the_default() {
        let config = create_config(props(sepolia())).unwrap();
        let state = config.store.get_state();
        assert_eq!(state.chain.id, sepolia().id);
        assert_eq!(state.connections.len(), 2);
        assert_eq!(config.store.storage_key(), DEFAULT_STORAGE_KEY);
        assert!(!config.store.has_hydrated());
    }

    #[test]
    fn default_chain_can_be_any_listed_chain() {
        let config = create_config(props(arbitrum_sepolia())).unwrap();
        assert_eq!(config.store.get_state().chain.id, 421614);
    }

    #[test]
    fn connection_order_follows_chain_list() {
        let config = create_config(props(sepolia())).unwrap();
        let ids: Vec<u64> = config.store.get_state().connections.keys().copied().collect();
        assert_eq!(ids, vec![11155111, 421614]);
    }

    #[test]
    fn default_chain_must_be_listed() {
        let err = create_config(props(base_sepolia())).unwrap_err();
        assert!(matches!(err, KitError::InvalidConfig(msg) if msg.contains("84532")));
    }

    #[test]
    fn empty_chain_list_is_rejected() {
        let mut props = props(sepolia());
        props.chains.clear();
        assert!(matches!(
            create_config(props).unwrap_err(),
            KitError::InvalidConfig(_)
        ));
    }

    #[test]
    fn duplicate_chains_are_rejected() {
        let mut props = props(sepolia());
        props.chains.push(ChainConfig::new(
            sepolia(),
            alchemy(AlchemyTransportConfig::rpc_url("/api/other")),
        ));
        let err = create_config(props).unwrap_err();
        assert!(matches!(err, KitError::InvalidConfig(msg) if msg.contains("more than once")));
    }

    #[test]
    fn invalid_transport_is_rejected() {
        let mut props = props(sepolia());
        props.chains[1].transport = alchemy(AlchemyTransportConfig::api_key(""));
        let err = create_config(props).unwrap_err();
        assert!(matches!(
            err,
            KitError::Transport(InfraError::EmptyCredential("apiKey"))
        ));
    }

    #[test]
    fn invalid_signer_connection_is_rejected() {
        let mut props = props(sepolia());
        props.signer_connection = ConnectionConfig::rpc_url("signer");
        assert!(matches!(
            create_config(props).unwrap_err(),
            KitError::Transport(InfraError::InvalidRpcUrl(_))
        ));
    }

    #[tokio::test]
    async fn ssr_without_storage_persists_nothing() {
        let config = create_config(props(sepolia()).ssr(true)).unwrap();
        config.store.rehydrate().await.unwrap();

        crate::actions::set_chain(&config, arbitrum_sepolia()).await.unwrap();

        // A second ssr config never sees the first one's writes.
        let other = create_config(props(sepolia()).ssr(true)).unwrap();
        other.store.rehydrate().await.unwrap();
        assert_eq!(other.store.get_state().chain.id, 11155111);
    }

    #[test]
    fn custom_storage_key() {
        let config = create_config(props(sepolia()).storage_key("my-app")).unwrap();
        assert_eq!(config.store.storage_key(), "my-app");
    }

    #[test]
    fn session_config_lands_in_signer_config() {
        let config = create_config(props(sepolia()).session_config(SessionConfig {
            expiration_time_ms: Some(60_000),
        }))
        .unwrap();
        let state = config.store.get_state();
        assert_eq!(
            state.config.session_config.as_ref().and_then(|s| s.expiration_time_ms),
            Some(60_000)
        );
    }
}
