//! Persisted envelope written to storage after every mutation.
//!
//! ```json
//! { "state": { "chain": .., "connections": { "__type": "Map", "value": [[id, ..]] },
//!              "accountConfigs": .., "smartAccountClients": .., "signerStatus": ..,
//!              "config": .. },
//!   "version": 8 }
//! ```

use std::hash::Hash;

use indexmap::IndexMap;
use kit_infra::ChainDefinition;
use serde::de::{self, DeserializeOwned};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::account::{AccountConfig, AccountConfigs, SupportedAccountType};
use crate::signer::SignerStatus;
use crate::store::state::{Connection, SignerConfig, StoreState};

/// Storage key used when the caller does not pick one.
pub const DEFAULT_STORAGE_KEY: &str = "alchemy-account-state";

/// Schema tag of the envelope. Bump when the persisted shape changes.
pub const STORE_VERSION: u32 = 8;

const MAP_TYPE: &str = "Map";

/// An ordered map written as `{"__type": "Map", "value": [[key, value], ..]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedMap<K: Hash + Eq, V>(pub IndexMap<K, V>);

impl<K: Hash + Eq + Serialize, V: Serialize> Serialize for TaggedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let pairs: Vec<(&K, &V)> = self.0.iter().collect();
        let mut map = serializer.serialize_struct("TaggedMap", 2)?;
        map.serialize_field("__type", MAP_TYPE)?;
        map.serialize_field("value", &pairs)?;
        map.end()
    }
}

impl<'de, K, V> Deserialize<'de> for TaggedMap<K, V>
where
    K: Hash + Eq + DeserializeOwned,
    V: DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(bound = "K: DeserializeOwned, V: DeserializeOwned")]
        struct Tagged<K, V> {
            #[serde(rename = "__type")]
            kind: String,
            value: Vec<(K, V)>,
        }

        let tagged = Tagged::<K, V>::deserialize(deserializer)?;
        if tagged.kind != MAP_TYPE {
            return Err(de::Error::custom(format!(
                "expected {MAP_TYPE}, found {}",
                tagged.kind
            )));
        }
        Ok(Self(tagged.value.into_iter().collect()))
    }
}

/// Persisted subset of [`StoreState`]. Every field is optional on read so a
/// partial snapshot still restores what it has.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<ChainDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<TaggedMap<u64, Connection>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_account_configs"
    )]
    pub account_configs: Option<AccountConfigs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_account_clients: Option<IndexMap<u64, serde_json::Map<String, serde_json::Value>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_status: Option<SignerStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SignerConfig>,
}

impl From<&StoreState> for PersistedState {
    fn from(state: &StoreState) -> Self {
        Self {
            chain: Some(state.chain.clone()),
            connections: Some(TaggedMap(state.connections.clone())),
            account_configs: Some(state.account_configs.clone()),
            // Client handles are runtime objects; only the per-chain slots persist.
            smart_account_clients: Some(
                state
                    .smart_account_clients
                    .keys()
                    .map(|id| (*id, serde_json::Map::new()))
                    .collect(),
            ),
            signer_status: Some(state.signer_status),
            config: Some(state.config.clone()),
        }
    }
}

/// Read `accountConfigs` entry by entry. Account types or configs this build
/// does not understand are skipped so the rest of the snapshot still loads.
fn lenient_account_configs<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<AccountConfigs>, D::Error> {
    let raw: Option<IndexMap<u64, IndexMap<String, Value>>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|chains| {
        chains
            .into_iter()
            .map(|(chain_id, entries)| {
                let configs = entries
                    .into_iter()
                    .filter_map(|(kind, value)| match parse_account_config(&kind, value) {
                        Ok(entry) => Some(entry),
                        Err(e) => {
                            debug!(chain_id, account_type = %kind, error = %e, "skipping persisted account config");
                            None
                        }
                    })
                    .collect();
                (chain_id, configs)
            })
            .collect()
    }))
}

fn parse_account_config(
    kind: &str,
    value: Value,
) -> serde_json::Result<(SupportedAccountType, AccountConfig)> {
    let account_type = serde_json::from_value(Value::String(kind.to_string()))?;
    Ok((account_type, serde_json::from_value(value)?))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedEnvelope {
    pub state: PersistedState,
    pub version: u32,
}

impl PersistedEnvelope {
    pub fn from_state(state: &StoreState) -> Self {
        Self {
            state: state.into(),
            version: STORE_VERSION,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
