use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name under which a chain lists its Alchemy endpoints in `rpcUrls`.
pub const ALCHEMY_RPC_KEY: &str = "alchemy";

/// Name of the public fallback entry in `rpcUrls` and `blockExplorers`.
pub const DEFAULT_KEY: &str = "default";

/// The chain's native gas token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcUrls {
    pub http: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_socket: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainContract {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_created: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockExplorer {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Full descriptor of an EVM network.
///
/// The JSON form is the camelCase shape wallets and RPC tooling already
/// exchange, so a descriptor read back from storage compares equal to the
/// one that was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDefinition {
    pub id: u64,
    pub name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: IndexMap<String, RpcUrls>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub block_explorers: IndexMap<String, BlockExplorer>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub contracts: IndexMap<String, ChainContract>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testnet: Option<bool>,
}

impl ChainDefinition {
    /// First HTTP endpoint of the Alchemy RPC entry, if the chain has one.
    pub fn alchemy_http_url(&self) -> Option<&str> {
        self.rpc_urls
            .get(ALCHEMY_RPC_KEY)
            .and_then(|urls| urls.http.first())
            .map(String::as_str)
    }

    /// First HTTP endpoint of the public `default` RPC entry.
    pub fn default_http_url(&self) -> Option<&str> {
        self.rpc_urls
            .get(DEFAULT_KEY)
            .and_then(|urls| urls.http.first())
            .map(String::as_str)
    }

    pub fn default_block_explorer(&self) -> Option<&BlockExplorer> {
        self.block_explorers.get(DEFAULT_KEY)
    }

    pub fn is_testnet(&self) -> bool {
        self.testnet.unwrap_or(false)
    }
}

impl fmt::Display for ChainDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::{arbitrum_sepolia, sepolia};

    #[test]
    fn alchemy_and_default_urls() {
        let chain = sepolia();
        assert_eq!(
            chain.alchemy_http_url(),
            Some("https://eth-sepolia.g.alchemy.com/v2")
        );
        assert_eq!(chain.default_http_url(), Some("https://rpc.sepolia.org"));
        assert!(chain.is_testnet());
    }

    #[test]
    fn missing_alchemy_entry_returns_none() {
        let mut chain = arbitrum_sepolia();
        chain.rpc_urls.shift_remove(ALCHEMY_RPC_KEY);
        assert!(chain.alchemy_http_url().is_none());
    }

    #[test]
    fn serializes_in_camel_case() {
        let json = serde_json::to_value(sepolia()).unwrap();
        assert_eq!(json["nativeCurrency"]["symbol"], "ETH");
        assert_eq!(
            json["blockExplorers"]["default"]["apiUrl"],
            "https://api-sepolia.etherscan.io/api"
        );
        assert_eq!(json["contracts"]["multicall3"]["blockCreated"], 751532);
        // Contracts without a creation block omit the field entirely.
        assert!(json["contracts"]["ensRegistry"].get("blockCreated").is_none());
        // No websocket endpoints configured, so the key is skipped.
        assert!(json["rpcUrls"]["default"].get("webSocket").is_none());
    }

    #[test]
    fn minimal_descriptor_deserializes_with_defaults() {
        let chain: ChainDefinition = serde_json::from_str(
            r#"{
                "id": 31337,
                "name": "Anvil",
                "nativeCurrency": { "name": "Ether", "symbol": "ETH", "decimals": 18 },
                "rpcUrls": { "default": { "http": ["http://127.0.0.1:8545"] } }
            }"#,
        )
        .unwrap();

        assert_eq!(chain.id, 31337);
        assert!(chain.contracts.is_empty());
        assert!(chain.block_explorers.is_empty());
        assert!(!chain.is_testnet());
        assert_eq!(chain.to_string(), "Anvil (31337)");
    }
}
