//! Operations consumers run against a config.

use kit_infra::{AlchemyTransport, ChainDefinition};
use tracing::info;

use crate::account::{AccountConfig, SupportedAccountType};
use crate::create_config::AlchemyAccountsConfig;
use crate::error::{KitError, Result};
use crate::signer::{AlchemySignerStatus, SignerStatus};
use crate::store::{BundlerClient, Connection};

pub fn get_chain(config: &AlchemyAccountsConfig) -> ChainDefinition {
    config.store.get_state().chain.clone()
}

/// Connection registered for the active chain.
pub fn get_connection(config: &AlchemyAccountsConfig) -> Result<Connection> {
    let state = config.store.get_state();
    state
        .active_connection()
        .cloned()
        .ok_or(KitError::UnregisteredChain {
            chain_id: state.chain.id,
        })
}

/// Transport of the active chain.
pub fn get_alchemy_transport(config: &AlchemyAccountsConfig) -> AlchemyTransport {
    config.store.get_state().bundler_client.transport.clone()
}

pub fn get_bundler_client(config: &AlchemyAccountsConfig) -> BundlerClient {
    config.store.get_state().bundler_client.clone()
}

pub fn get_signer_status(config: &AlchemyAccountsConfig) -> SignerStatus {
    config.store.get_state().signer_status
}

/// Switch the active chain and its transport.
///
/// Fails with [`KitError::UnregisteredChain`] if `chain` was not part of the
/// config's chain list; the state is left as it was.
pub async fn set_chain(config: &AlchemyAccountsConfig, chain: ChainDefinition) -> Result<()> {
    let from = config.store.get_state().chain.id;
    let to = chain.id;
    config.store.mutate(|state| state.switch_chain(chain)).await?;
    info!(from, to, "switched chain");
    Ok(())
}

pub async fn set_signer_status(
    config: &AlchemyAccountsConfig,
    status: AlchemySignerStatus,
) -> Result<()> {
    config
        .store
        .mutate(|state| {
            state.signer_status = status.into();
            Ok(())
        })
        .await
}

/// Saved config of an account on the active chain.
pub fn get_account_config(
    config: &AlchemyAccountsConfig,
    account_type: SupportedAccountType,
) -> Option<AccountConfig> {
    let state = config.store.get_state();
    state
        .account_configs
        .get(&state.chain.id)
        .and_then(|configs| configs.get(&account_type))
        .cloned()
}

/// Record an account created on the active chain so it can be reconnected
/// after a reload.
pub async fn install_account(
    config: &AlchemyAccountsConfig,
    account_type: SupportedAccountType,
    account_config: AccountConfig,
) -> Result<()> {
    config
        .store
        .mutate(|state| {
            state.install_account(account_type, account_config);
            Ok(())
        })
        .await?;
    info!(?account_type, "installed account");
    Ok(())
}
