//! The EVM ecosystem: Ethereum mainnet and any EIP-1559-or-legacy chain
//! reachable over standard `eth_*` JSON-RPC.

pub mod address;
pub mod applier;
pub mod balance;
pub mod broadcast;
pub mod builder;
pub mod codec;
pub mod decoder;
pub mod fee;
pub mod raw;
pub mod sighash;

use raw::EvmRawTx;
use std::sync::Arc;
use wallet_primitives::{
    BroadcastResult, ChainConfig, EngineError, FeeEstimate, NativeBalance, NormalisedTransaction, RawSignature,
    SignedTransaction, SigningPayload, TransferIntent,
};
use wallet_rpc::RpcCapability;

pub use raw::EvmOverrides;

/// The EVM provider the Dispatcher holds one of per `(chain alias, rpc url)`
/// pair. Bundles the chain's static configuration with the RPC capability
/// used to reach it.
#[derive(Clone, Debug)]
pub struct EvmProvider {
    pub chain_config: ChainConfig,
    pub rpc: Arc<dyn RpcCapability>,
}

impl EvmProvider {
    pub fn new(chain_config: ChainConfig, rpc: Arc<dyn RpcCapability>) -> Self {
        EvmProvider { chain_config, rpc }
    }

    pub async fn build_transaction(&self, intent: &TransferIntent, overrides: &EvmOverrides) -> Result<EvmRawTx, EngineError> {
        builder::build(&self.chain_config, intent, overrides, self.rpc.as_ref()).await
    }

    pub fn signing_payload(&self, tx: &EvmRawTx) -> Result<SigningPayload, EngineError> {
        sighash::signing_payload(&self.chain_config.alias, tx)
    }

    pub fn apply_signature(
        &self,
        tx: EvmRawTx,
        signatures: Vec<RawSignature>,
        expected_from: &str,
    ) -> Result<SignedTransaction, EngineError> {
        applier::apply_signature(&self.chain_config.alias, tx, signatures, expected_from)
    }

    pub fn validate_address(&self, address: &str) -> Result<String, EngineError> {
        address::normalise(&self.chain_config.alias, address)
    }

    pub async fn decode(&self, tx_hash: &str) -> Result<NormalisedTransaction, EngineError> {
        decoder::decode(&self.chain_config, tx_hash, self.rpc.as_ref()).await
    }

    /// Parses an already-serialised unsigned transaction without any
    /// network lookup, the counterpart to [`Self::serialize_unsigned`].
    pub fn parse_unsigned(&self, serialized: &str) -> Result<EvmRawTx, EngineError> {
        codec::parse_unsigned(serialized)
    }

    pub async fn estimate_fee(&self) -> Result<FeeEstimate, EngineError> {
        fee::estimate(&self.chain_config, self.rpc.as_ref()).await
    }

    pub fn serialize_unsigned(&self, tx: &EvmRawTx) -> Result<String, EngineError> {
        codec::serialize_unsigned(tx)
    }

    pub async fn broadcast(&self, tx: &SignedTransaction) -> Result<BroadcastResult, EngineError> {
        broadcast::broadcast(&self.chain_config.rpc_url, tx, self.rpc.as_ref()).await
    }

    pub async fn get_native_balance(&self, address: &str) -> Result<NativeBalance, EngineError> {
        balance::get_native_balance(&self.chain_config, address, self.rpc.as_ref()).await
    }

    pub async fn get_token_balance(&self, token_contract: &str, owner: &str, decimals: u8) -> Result<NativeBalance, EngineError> {
        balance::get_token_balance(&self.chain_config, token_contract, owner, decimals, self.rpc.as_ref()).await
    }
}
