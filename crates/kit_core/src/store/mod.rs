pub mod persist;
pub mod state;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::storage::Storage;

pub use persist::{DEFAULT_STORAGE_KEY, PersistedEnvelope, PersistedState, STORE_VERSION, TaggedMap};
pub use state::{
    BundlerClient, Connection, ConnectionConfig, SessionConfig, SignerClientConfig, SignerConfig,
    StateUpdate, StoreState,
};

/// Holds the session state and writes it through to storage.
///
/// Lifecycle: created by [`crate::create_config`], rehydrated once with
/// [`Store::rehydrate`], then mutated through [`Store::set_state`] and the
/// actions in [`crate::actions`]. Every mutation is persisted; a failed write
/// is logged and does not undo the in-memory change.
pub struct Store {
    state: watch::Sender<Arc<StoreState>>,
    storage: Arc<dyn Storage>,
    storage_key: String,
    hydrated: AtomicBool,
}

impl Store {
    pub(crate) fn new(initial: StoreState, storage: Arc<dyn Storage>, storage_key: String) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        Self {
            state,
            storage,
            storage_key,
            hydrated: AtomicBool::new(false),
        }
    }

    /// Immutable snapshot of the current state.
    pub fn get_state(&self) -> Arc<StoreState> {
        self.state.borrow().clone()
    }

    /// Receive a new snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreState>> {
        self.state.subscribe()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn has_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::Acquire)
    }

    /// Shallow-merge `update` into the state and persist it.
    pub async fn set_state(&self, update: StateUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        self.mutate(|state| state.apply(update)).await
    }

    /// Load the persisted envelope and merge it over the current state.
    ///
    /// Missing, malformed, or version-mismatched snapshots leave the state
    /// untouched. Only a failing storage read is an error.
    pub async fn rehydrate(&self) -> Result<()> {
        let raw = self.storage.get_item(&self.storage_key).await?;

        let restored = match raw.as_deref().map(PersistedEnvelope::from_json) {
            None => {
                debug!(key = %self.storage_key, "nothing persisted, keeping defaults");
                None
            }
            Some(Err(e)) => {
                debug!(key = %self.storage_key, error = %e, "persisted state is malformed, keeping defaults");
                None
            }
            Some(Ok(envelope)) if envelope.version != STORE_VERSION => {
                warn!(
                    found = envelope.version,
                    expected = STORE_VERSION,
                    "discarding persisted state with mismatched version"
                );
                None
            }
            Some(Ok(envelope)) => Some(envelope.state),
        };

        if let Some(persisted) = restored {
            let mut next = (*self.get_state()).clone();
            merge_persisted(&mut next, persisted);
            self.state.send_replace(Arc::new(next));
        }
        self.hydrated.store(true, Ordering::Release);
        info!(chain_id = self.get_state().chain.id, "store rehydrated");

        self.persist().await;
        Ok(())
    }

    /// Remove the persisted envelope. In-memory state is kept.
    pub async fn clear_storage(&self) -> Result<()> {
        self.storage.remove_item(&self.storage_key).await?;
        info!(key = %self.storage_key, "cleared persisted state");
        Ok(())
    }

    /// Apply `f` to a copy of the state; on success publish and persist it.
    pub(crate) async fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut StoreState) -> Result<()>,
    {
        let mut next = (*self.get_state()).clone();
        f(&mut next)?;
        self.state.send_replace(Arc::new(next));
        self.persist().await;
        Ok(())
    }

    async fn persist(&self) {
        let envelope = PersistedEnvelope::from_state(&self.get_state());
        let json = match envelope.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to encode store state");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(&self.storage_key, &json).await {
            warn!(key = %self.storage_key, error = %e, "failed to persist store state");
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("storage_key", &self.storage_key)
            .field("hydrated", &self.has_hydrated())
            .field("chain_id", &self.get_state().chain.id)
            .finish()
    }
}

/// Overlay a persisted snapshot onto freshly configured state.
///
/// Connections, signer config and client handles always come from
/// configuration; the persisted copies are not restored.
fn merge_persisted(state: &mut StoreState, persisted: PersistedState) {
    // Only the id is restored; the descriptor comes from the configured
    // connection so updated chain data takes effect.
    if let Some(chain_id) = persisted.chain.map(|chain| chain.id) {
        match state.connection(chain_id).map(|c| c.chain.clone()) {
            Some(chain) => {
                if let Err(e) = state.switch_chain(chain) {
                    debug!(chain_id, error = %e, "failed to restore persisted chain");
                }
            }
            None => debug!(chain_id, "persisted chain is no longer configured"),
        }
    }

    if let Some(TaggedMap(connections)) = persisted.connections {
        let unknown = connections
            .keys()
            .filter(|id| !state.connections.contains_key(*id))
            .count();
        if unknown > 0 {
            debug!(unknown, "ignoring persisted connections that are no longer configured");
        }
    }

    if let Some(account_configs) = persisted.account_configs {
        for (chain_id, configs) in account_configs {
            if let Some(slot) = state.account_configs.get_mut(&chain_id) {
                *slot = configs;
            }
        }
    }

    if let Some(signer_status) = persisted.signer_status {
        state.signer_status = signer_status;
    }
}
