pub mod account;
pub mod actions;
pub mod create_config;
pub mod error;
pub mod logging;
pub mod settings;
pub mod signer;
pub mod storage;
pub mod store;

pub use account::{
    AccountConfig, AccountConfigs, AccountState, Accounts, SmartAccountClientState,
    SmartAccountClients, SupportedAccountType, create_default_account_state,
};
pub use actions::{
    get_account_config, get_alchemy_transport, get_bundler_client, get_chain, get_connection,
    get_signer_status, install_account, set_chain, set_signer_status,
};
pub use create_config::{AlchemyAccountsConfig, ChainConfig, CreateConfigProps, create_config};
pub use error::{ErrorCategory, KitError, Result};
pub use settings::{ChainSettings, KitSettings};
pub use signer::{AlchemySignerStatus, SignerStatus};
pub use storage::{FileStorage, MemoryStorage, NoopStorage, Storage};
pub use store::{
    BundlerClient, Connection, ConnectionConfig, DEFAULT_STORAGE_KEY, PersistedEnvelope,
    STORE_VERSION, SessionConfig, SignerConfig, StateUpdate, Store, StoreState,
};
