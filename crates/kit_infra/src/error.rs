use thiserror::Error;

/// Errors raised while validating chains and transports.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InfraError {
    #[error("invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("empty {0} in transport config")]
    EmptyCredential(&'static str),

    #[error("chain {chain_id} has no Alchemy RPC endpoint")]
    NoAlchemyEndpoint { chain_id: u64 },
}
