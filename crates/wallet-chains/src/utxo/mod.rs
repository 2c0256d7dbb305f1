//! The UTXO ecosystem: Bitcoin and Bitcoin-family forks. SegWit/Taproot
//! addresses only — legacy P2PKH is rejected at validation.

pub mod address;
pub mod applier;
pub mod balance;
pub mod broadcast;
pub mod builder;
pub mod codec;
pub mod coin_select;
pub mod decoder;
pub mod fee;
pub mod raw;
pub mod sighash;

use raw::UtxoRawTx;
use std::sync::Arc;
use wallet_primitives::{
    BroadcastResult, ChainConfig, EngineError, FeeEstimate, NativeBalance, NormalisedTransaction, RawSignature,
    SignedTransaction, SigningPayload, TransferIntent,
};
use wallet_rpc::RpcCapability;

pub use raw::UtxoOverrides;

#[derive(Clone, Debug)]
pub struct UtxoProvider {
    pub chain_config: ChainConfig,
    pub rpc: Arc<dyn RpcCapability>,
}

impl UtxoProvider {
    pub fn new(chain_config: ChainConfig, rpc: Arc<dyn RpcCapability>) -> Self {
        UtxoProvider { chain_config, rpc }
    }

    pub async fn build_transaction(&self, intent: &TransferIntent, overrides: &UtxoOverrides) -> Result<UtxoRawTx, EngineError> {
        builder::build(&self.chain_config, intent, overrides, self.rpc.as_ref()).await
    }

    pub fn signing_payload(&self, tx: &UtxoRawTx) -> Result<SigningPayload, EngineError> {
        sighash::signing_payload(&self.chain_config.alias, tx)
    }

    pub fn apply_signature(
        &self,
        tx: UtxoRawTx,
        signatures: Vec<RawSignature>,
        signer_pubkeys: &[Vec<u8>],
    ) -> Result<SignedTransaction, EngineError> {
        applier::apply_signature(&self.chain_config.alias, tx, signatures, signer_pubkeys)
    }

    pub fn validate_address(&self, address: &str) -> Result<String, EngineError> {
        address::validate(&self.chain_config.alias, address).map(|_| address.to_string())
    }

    pub async fn decode(&self, tx_hash: &str) -> Result<NormalisedTransaction, EngineError> {
        decoder::decode(&self.chain_config, tx_hash, self.rpc.as_ref()).await
    }

    /// Parses an already-serialised unsigned PSBT without any network
    /// lookup, the counterpart to [`Self::serialize_unsigned`].
    pub fn parse_unsigned(&self, serialized: &str) -> Result<UtxoRawTx, EngineError> {
        codec::parse_unsigned_psbt(serialized)
    }

    pub async fn estimate_fee(&self) -> Result<FeeEstimate, EngineError> {
        fee::estimate(&self.chain_config, self.rpc.as_ref()).await
    }

    pub fn serialize_unsigned(&self, tx: &UtxoRawTx, signer_pubkeys: &[Vec<u8>]) -> Result<String, EngineError> {
        codec::serialize_unsigned_psbt(tx, signer_pubkeys)
    }

    pub async fn broadcast(&self, tx: &SignedTransaction) -> Result<BroadcastResult, EngineError> {
        broadcast::broadcast(&self.chain_config.rpc_url, tx, self.rpc.as_ref()).await
    }

    pub async fn get_native_balance(&self, address: &str) -> Result<NativeBalance, EngineError> {
        balance::get_native_balance(&self.chain_config, address, self.rpc.as_ref()).await
    }
}
