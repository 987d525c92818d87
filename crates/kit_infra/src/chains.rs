use indexmap::IndexMap;

use crate::chain::{
    ALCHEMY_RPC_KEY, BlockExplorer, ChainContract, ChainDefinition, DEFAULT_KEY, NativeCurrency,
    RpcUrls,
};

const MULTICALL3: &str = "0xca11bde05977b3631167028862be2a173976ca11";
const ENS_REGISTRY: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

fn ether(name: &str) -> NativeCurrency {
    NativeCurrency {
        name: name.into(),
        symbol: "ETH".into(),
        decimals: 18,
    }
}

fn rpc_urls(alchemy: &str, public: &str) -> IndexMap<String, RpcUrls> {
    IndexMap::from([
        (
            ALCHEMY_RPC_KEY.to_string(),
            RpcUrls {
                http: vec![alchemy.into()],
                web_socket: Vec::new(),
            },
        ),
        (
            DEFAULT_KEY.to_string(),
            RpcUrls {
                http: vec![public.into()],
                web_socket: Vec::new(),
            },
        ),
    ])
}

fn explorer(name: &str, url: &str, api_url: &str) -> IndexMap<String, BlockExplorer> {
    IndexMap::from([(
        DEFAULT_KEY.to_string(),
        BlockExplorer {
            name: name.into(),
            url: url.into(),
            api_url: Some(api_url.into()),
        },
    )])
}

fn contract(address: &str, block_created: Option<u64>) -> ChainContract {
    ChainContract {
        address: address.into(),
        block_created,
    }
}

/// Ethereum mainnet.
pub fn mainnet() -> ChainDefinition {
    ChainDefinition {
        id: 1,
        name: "Ethereum".into(),
        native_currency: ether("Ether"),
        rpc_urls: rpc_urls("https://eth-mainnet.g.alchemy.com/v2", "https://cloudflare-eth.com"),
        block_explorers: explorer("Etherscan", "https://etherscan.io", "https://api.etherscan.io/api"),
        contracts: IndexMap::from([
            ("ensRegistry".to_string(), contract(ENS_REGISTRY, None)),
            (
                "ensUniversalResolver".to_string(),
                contract("0xce01f8eee7E479C928F8919abD53E553a36CeF67", Some(19_258_213)),
            ),
            ("multicall3".to_string(), contract(MULTICALL3, Some(14_353_601))),
        ]),
        testnet: None,
    }
}

/// Ethereum Sepolia testnet.
pub fn sepolia() -> ChainDefinition {
    ChainDefinition {
        id: 11_155_111,
        name: "Sepolia".into(),
        native_currency: ether("Sepolia Ether"),
        rpc_urls: rpc_urls("https://eth-sepolia.g.alchemy.com/v2", "https://rpc.sepolia.org"),
        block_explorers: explorer(
            "Etherscan",
            "https://sepolia.etherscan.io",
            "https://api-sepolia.etherscan.io/api",
        ),
        contracts: IndexMap::from([
            ("ensRegistry".to_string(), contract(ENS_REGISTRY, None)),
            (
                "ensUniversalResolver".to_string(),
                contract("0xc8Af999e38273D658BE1b921b88A9Ddf005769cC", Some(5_317_080)),
            ),
            ("multicall3".to_string(), contract(MULTICALL3, Some(751_532))),
        ]),
        testnet: Some(true),
    }
}

/// Arbitrum Sepolia testnet.
pub fn arbitrum_sepolia() -> ChainDefinition {
    ChainDefinition {
        id: 421_614,
        name: "Arbitrum Sepolia".into(),
        native_currency: ether("Arbitrum Sepolia Ether"),
        rpc_urls: rpc_urls(
            "https://arb-sepolia.g.alchemy.com/v2",
            "https://sepolia-rollup.arbitrum.io/rpc",
        ),
        block_explorers: explorer(
            "Arbiscan",
            "https://sepolia.arbiscan.io",
            "https://api-sepolia.arbiscan.io/api",
        ),
        contracts: IndexMap::from([(
            "multicall3".to_string(),
            contract(MULTICALL3, Some(81_930)),
        )]),
        testnet: Some(true),
    }
}

/// Base Sepolia testnet.
pub fn base_sepolia() -> ChainDefinition {
    ChainDefinition {
        id: 84_532,
        name: "Base Sepolia".into(),
        native_currency: ether("Sepolia Ether"),
        rpc_urls: rpc_urls("https://base-sepolia.g.alchemy.com/v2", "https://sepolia.base.org"),
        block_explorers: explorer(
            "Basescan",
            "https://sepolia.basescan.org",
            "https://api-sepolia.basescan.org/api",
        ),
        contracts: IndexMap::from([(
            "multicall3".to_string(),
            contract(MULTICALL3, Some(1_059_647)),
        )]),
        testnet: Some(true),
    }
}

/// Every built-in chain, mainnet first.
pub fn all_chains() -> Vec<ChainDefinition> {
    vec![mainnet(), sepolia(), arbitrum_sepolia(), base_sepolia()]
}

/// Look up a built-in chain by its EVM chain id.
pub fn chain_by_id(id: u64) -> Option<ChainDefinition> {
    all_chains().into_iter().find(|chain| chain.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_ids() {
        assert_eq!(mainnet().id, 1);
        assert_eq!(sepolia().id, 11155111);
        assert_eq!(arbitrum_sepolia().id, 421614);
        assert_eq!(base_sepolia().id, 84532);
    }

    #[test]
    fn built_in_ids_are_unique() {
        let chains = all_chains();
        let mut ids: Vec<u64> = chains.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), chains.len());
    }

    #[test]
    fn every_built_in_chain_has_alchemy_endpoint() {
        for chain in all_chains() {
            assert!(chain.alchemy_http_url().is_some(), "{chain} lacks alchemy rpc");
            assert!(chain.default_block_explorer().is_some());
        }
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(chain_by_id(421614).unwrap().name, "Arbitrum Sepolia");
        assert!(chain_by_id(999_999).is_none());
    }

    #[test]
    fn mainnet_is_not_testnet() {
        assert!(!mainnet().is_testnet());
        assert!(sepolia().is_testnet());
    }
}
