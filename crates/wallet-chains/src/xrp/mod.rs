//! The XRP Ledger ecosystem, reached over its JSON-RPC API.

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

use raw::XrpRawTx;
use std::sync::Arc;
use wallet_primitives::{
    BroadcastResult, ChainConfig, EngineError, FeeEstimate, NativeBalance, NormalisedTransaction, RawSignature,
    SignedTransaction, SigningPayload, TransferIntent,
};
use wallet_rpc::RpcCapability;

pub use raw::XrpOverrides;

#[derive(Clone, Debug)]
pub struct XrpProvider {
    pub chain_config: ChainConfig,
    pub rpc: Arc<dyn RpcCapability>,
}

impl XrpProvider {
    pub fn new(chain_config: ChainConfig, rpc: Arc<dyn RpcCapability>) -> Self {
        XrpProvider { chain_config, rpc }
    }

    pub async fn build_transaction(&self, intent: &TransferIntent, overrides: &XrpOverrides) -> Result<XrpRawTx, EngineError> {
        builder::build(&self.chain_config, intent, overrides, self.rpc.as_ref()).await
    }

    pub fn signing_payload(&self, tx: &XrpRawTx) -> Result<SigningPayload, EngineError> {
        sighash::signing_payload(&self.chain_config.alias, tx)
    }

    pub fn apply_signature(&self, tx: XrpRawTx, signatures: Vec<RawSignature>) -> Result<SignedTransaction, EngineError> {
        applier::apply_signature(&self.chain_config.alias, tx, signatures)
    }

    pub fn validate_address(&self, address_str: &str) -> Result<String, EngineError> {
        address::validate(&self.chain_config.alias, address_str).map(|_| address_str.to_string())
    }

    pub async fn decode(&self, tx_hash: &str) -> Result<NormalisedTransaction, EngineError> {
        decoder::decode(&self.chain_config, tx_hash, self.rpc.as_ref()).await
    }

    pub async fn estimate_fee(&self) -> Result<FeeEstimate, EngineError> {
        fee::estimate(&self.chain_config, self.rpc.as_ref()).await
    }

    pub fn serialize_unsigned(&self, tx: &XrpRawTx) -> Result<String, EngineError> {
        Ok(hex::encode(codec::serialize_for_signing(tx)?).to_uppercase())
    }

    pub async fn broadcast(&self, tx: &SignedTransaction) -> Result<BroadcastResult, EngineError> {
        broadcast::broadcast(&self.chain_config.rpc_url, tx, self.rpc.as_ref()).await
    }

    pub async fn get_native_balance(&self, address: &str) -> Result<NativeBalance, EngineError> {
        balance::get_native_balance(&self.chain_config, address, self.rpc.as_ref()).await
    }
}
