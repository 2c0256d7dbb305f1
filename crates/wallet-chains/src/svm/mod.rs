//! The SVM ecosystem: Solana and compatible forks reachable over standard
//! JSON-RPC.

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

use raw::SvmRawTx;
use std::sync::Arc;
use wallet_primitives::{
    BroadcastResult, ChainConfig, EngineError, FeeEstimate, NativeBalance, NormalisedTransaction, RawSignature,
    SignedTransaction, SigningPayload, TransferIntent,
};
use wallet_rpc::RpcCapability;

pub use raw::SvmOverrides;

#[derive(Clone, Debug)]
pub struct SvmProvider {
    pub chain_config: ChainConfig,
    pub rpc: Arc<dyn RpcCapability>,
}

impl SvmProvider {
    pub fn new(chain_config: ChainConfig, rpc: Arc<dyn RpcCapability>) -> Self {
        SvmProvider { chain_config, rpc }
    }

    pub async fn build_transaction(&self, intent: &TransferIntent, overrides: &SvmOverrides) -> Result<SvmRawTx, EngineError> {
        builder::build(&self.chain_config, intent, overrides, self.rpc.as_ref()).await
    }

    pub fn signing_payload(&self, tx: &SvmRawTx) -> Result<SigningPayload, EngineError> {
        sighash::signing_payload(&self.chain_config.alias, tx)
    }

    pub fn apply_signature(&self, tx: SvmRawTx, signatures: Vec<RawSignature>) -> Result<SignedTransaction, EngineError> {
        applier::apply_signature(&self.chain_config.alias, tx, signatures)
    }

    pub fn validate_address(&self, address_str: &str) -> Result<String, EngineError> {
        address::validate(&self.chain_config.alias, address_str).map(|_| address_str.to_string())
    }

    pub async fn decode(&self, signature: &str) -> Result<NormalisedTransaction, EngineError> {
        decoder::decode(&self.chain_config, signature, self.rpc.as_ref()).await
    }

    pub async fn estimate_fee(&self) -> Result<FeeEstimate, EngineError> {
        fee::estimate(&self.chain_config, self.rpc.as_ref()).await
    }

    pub fn serialize_unsigned(&self, tx: &SvmRawTx) -> Result<String, EngineError> {
        codec::serialize_unsigned(tx)
    }

    pub async fn broadcast(&self, tx: &SignedTransaction) -> Result<BroadcastResult, EngineError> {
        broadcast::broadcast(&self.chain_config.rpc_url, tx, self.rpc.as_ref()).await
    }

    pub async fn get_native_balance(&self, address: &str) -> Result<NativeBalance, EngineError> {
        balance::get_native_balance(&self.chain_config, address, self.rpc.as_ref()).await
    }

    pub async fn get_token_balance(&self, mint: &str, owner: &str) -> Result<NativeBalance, EngineError> {
        balance::get_token_balance(&self.chain_config, mint, owner, self.rpc.as_ref()).await
    }
}
