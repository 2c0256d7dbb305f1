//! The closed error taxonomy, implemented as a single `thiserror` sum type
//! so every call site can propagate with `?` instead of downcasting a
//! boxed error at the boundary.

use crate::chain::ChainAlias;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid address for chain {chain_alias}: {address:?} ({reason})")]
    InvalidAddress { chain_alias: ChainAlias, address: String, reason: String },

    #[error("invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: String, available: String },

    #[error("unsupported chain alias: {alias}")]
    UnsupportedChain { alias: String },

    #[error("unsupported operation {op:?} on chain {chain_alias}")]
    UnsupportedOperation { chain_alias: ChainAlias, op: String },

    #[error("signature count mismatch on {chain_alias}: expected {expected}, got {got}")]
    Signature { chain_alias: ChainAlias, expected: usize, got: usize },

    #[error("PSBT error during {phase}: {cause}")]
    Psbt { phase: &'static str, cause: String },

    #[error("RPC error calling {method}: status {status:?}, body {body}")]
    Rpc { method: String, status: Option<u16>, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("invalid transaction hash: {0:?}")]
    InvalidTransactionHash(String),

    #[error("transaction already signed, cannot re-derive a signing payload")]
    AlreadySigned,
}

impl EngineError {
    pub fn invalid_address(chain_alias: &ChainAlias, address: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidAddress { chain_alias: chain_alias.clone(), address: address.into(), reason: reason.into() }
    }

    pub fn unsupported_operation(chain_alias: &ChainAlias, op: impl Into<String>) -> Self {
        EngineError::UnsupportedOperation { chain_alias: chain_alias.clone(), op: op.into() }
    }
}
