// Chain descriptors and Alchemy transports

pub mod chain;
pub mod chains;
pub mod error;
pub mod rpc_url;
pub mod transport;

// Re-export primary types for convenient access.
pub use chain::{BlockExplorer, ChainContract, ChainDefinition, NativeCurrency, RpcUrls};
pub use chains::{all_chains, arbitrum_sepolia, base_sepolia, chain_by_id, mainnet, sepolia};
pub use error::InfraError;
pub use rpc_url::validate_rpc_url;
pub use transport::{AlchemyTransport, AlchemyTransportConfig, alchemy};
