//! The single entry point: `Dispatcher::get_chain_provider` resolves a
//! [`ChainAlias`] to the ecosystem-appropriate provider, caching instances
//! by `(alias, rpc url)` so repeated lookups return the same one. RPC URL
//! resolution order: caller override → per-process config override → the
//! chain registry's default.

use crate::{
    evm::{EvmOverrides, EvmProvider},
    raw::{Overrides, SignatureContext, UnsignedTransaction},
    registry,
    substrate::{SubstrateOverrides, SubstrateProvider},
    svm::{SvmOverrides, SvmProvider},
    tvm::{TvmOverrides, TvmProvider},
    utxo::{UtxoOverrides, UtxoProvider},
    xrp::{XrpOverrides, XrpProvider},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
};
use wallet_primitives::{
    BroadcastResult, ChainAlias, ChainConfig, EngineError, Ecosystem, FeeEstimate, NativeBalance, NormalisedTransaction,
    RawSignature, SignedTransaction, SigningPayload, TransferIntent,
};
use wallet_rpc::RpcCapability;

#[derive(Clone, Debug)]
pub enum Provider {
    Evm(EvmProvider),
    Svm(SvmProvider),
    Utxo(UtxoProvider),
    Tvm(TvmProvider),
    Xrp(XrpProvider),
    Substrate(SubstrateProvider),
}

impl Provider {
    pub fn chain_config(&self) -> &ChainConfig {
        match self {
            Provider::Evm(p) => &p.chain_config,
            Provider::Svm(p) => &p.chain_config,
            Provider::Utxo(p) => &p.chain_config,
            Provider::Tvm(p) => &p.chain_config,
            Provider::Xrp(p) => &p.chain_config,
            Provider::Substrate(p) => &p.chain_config,
        }
    }

    pub async fn build_transaction(&self, intent: &TransferIntent, overrides: Overrides) -> Result<UnsignedTransaction, EngineError> {
        let alias = &self.chain_config().alias;
        match self {
            Provider::Evm(p) => {
                let overrides = match overrides {
                    Overrides::Evm(o) => o,
                    Overrides::None => EvmOverrides::default(),
                    _ => return Err(mismatched_overrides(alias)),
                };
                p.build_transaction(intent, &overrides).await.map(UnsignedTransaction::Evm)
            }
            Provider::Svm(p) => {
                let overrides = match overrides {
                    Overrides::Svm(o) => o,
                    Overrides::None => SvmOverrides::default(),
                    _ => return Err(mismatched_overrides(alias)),
                };
                p.build_transaction(intent, &overrides).await.map(UnsignedTransaction::Svm)
            }
            Provider::Utxo(p) => {
                let overrides = match overrides {
                    Overrides::Utxo(o) => o,
                    Overrides::None => UtxoOverrides::default(),
                    _ => return Err(mismatched_overrides(alias)),
                };
                p.build_transaction(intent, &overrides).await.map(UnsignedTransaction::Utxo)
            }
            Provider::Tvm(p) => {
                let overrides = match overrides {
                    Overrides::Tvm(o) => o,
                    Overrides::None => TvmOverrides::default(),
                    _ => return Err(mismatched_overrides(alias)),
                };
                p.build_transaction(intent, &overrides).await.map(UnsignedTransaction::Tvm)
            }
            Provider::Xrp(p) => {
                let overrides = match overrides {
                    Overrides::Xrp(o) => o,
                    Overrides::None => XrpOverrides::default(),
                    _ => return Err(mismatched_overrides(alias)),
                };
                p.build_transaction(intent, &overrides).await.map(UnsignedTransaction::Xrp)
            }
            Provider::Substrate(p) => {
                let overrides = match overrides {
                    Overrides::Substrate(o) => o,
                    Overrides::None => SubstrateOverrides::default(),
                    _ => return Err(mismatched_overrides(alias)),
                };
                p.build_transaction(intent, &overrides).await.map(UnsignedTransaction::Substrate)
            }
        }
    }

    pub fn signing_payload(&self, tx: &UnsignedTransaction) -> Result<SigningPayload, EngineError> {
        match (self, tx) {
            (Provider::Evm(p), UnsignedTransaction::Evm(tx)) => p.signing_payload(tx),
            (Provider::Svm(p), UnsignedTransaction::Svm(tx)) => p.signing_payload(tx),
            (Provider::Utxo(p), UnsignedTransaction::Utxo(tx)) => p.signing_payload(tx),
            (Provider::Tvm(p), UnsignedTransaction::Tvm(tx)) => p.signing_payload(tx),
            (Provider::Xrp(p), UnsignedTransaction::Xrp(tx)) => p.signing_payload(tx),
            (Provider::Substrate(p), UnsignedTransaction::Substrate(tx)) => p.signing_payload(tx),
            _ => Err(mismatched_transaction(&self.chain_config().alias)),
        }
    }

    pub fn apply_signature(
        &self,
        tx: UnsignedTransaction,
        signatures: Vec<RawSignature>,
        context: SignatureContext,
    ) -> Result<SignedTransaction, EngineError> {
        let alias = self.chain_config().alias.clone();
        match (self, tx) {
            (Provider::Evm(p), UnsignedTransaction::Evm(tx)) => {
                let SignatureContext::Evm { expected_from } = context else { return Err(crate::raw::wrong_context(&alias, "Evm")) };
                p.apply_signature(tx, signatures, &expected_from)
            }
            (Provider::Svm(p), UnsignedTransaction::Svm(tx)) => p.apply_signature(tx, signatures),
            (Provider::Utxo(p), UnsignedTransaction::Utxo(tx)) => {
                let SignatureContext::Utxo { signer_pubkeys } = context else { return Err(crate::raw::wrong_context(&alias, "Utxo")) };
                p.apply_signature(tx, signatures, &signer_pubkeys)
            }
            (Provider::Tvm(p), UnsignedTransaction::Tvm(tx)) => {
                let SignatureContext::Tvm { expected_owner_identifier } = context else { return Err(crate::raw::wrong_context(&alias, "Tvm")) };
                p.apply_signature(tx, signatures, &expected_owner_identifier)
            }
            (Provider::Xrp(p), UnsignedTransaction::Xrp(tx)) => p.apply_signature(tx, signatures),
            (Provider::Substrate(p), UnsignedTransaction::Substrate(tx)) => p.apply_signature(tx, signatures),
            _ => Err(mismatched_transaction(&alias)),
        }
    }

    pub fn validate_address(&self, address: &str) -> Result<String, EngineError> {
        match self {
            Provider::Evm(p) => p.validate_address(address),
            Provider::Svm(p) => p.validate_address(address),
            Provider::Utxo(p) => p.validate_address(address),
            Provider::Tvm(p) => p.validate_address(address),
            Provider::Xrp(p) => p.validate_address(address),
            Provider::Substrate(p) => p.validate_address(address),
        }
    }

    pub async fn decode(&self, tx_hash: &str) -> Result<NormalisedTransaction, EngineError> {
        match self {
            Provider::Evm(p) => p.decode(tx_hash).await,
            Provider::Svm(p) => p.decode(tx_hash).await,
            Provider::Utxo(p) => p.decode(tx_hash).await,
            Provider::Tvm(p) => p.decode(tx_hash).await,
            Provider::Xrp(p) => p.decode(tx_hash).await,
            Provider::Substrate(p) => p.decode(tx_hash).await,
        }
    }

    /// Reconstructs an [`UnsignedTransaction`] directly from its serialised
    /// form, with no RPC round trip: the "own transaction" counterpart to
    /// [`Self::decode`], which instead fetches and classifies by hash.
    /// Implemented for Evm and Utxo, whose wire formats (RLP, PSBT) are
    /// self-describing; the other ecosystems' serialised forms don't carry
    /// enough information to rebuild the raw transaction without the
    /// context the builder had (e.g. Substrate's metadata-derived call
    /// index), so they report unsupported rather than guess.
    pub fn parse_unsigned(&self, serialized: &str) -> Result<UnsignedTransaction, EngineError> {
        match self {
            Provider::Evm(p) => p.parse_unsigned(serialized).map(UnsignedTransaction::Evm),
            Provider::Utxo(p) => p.parse_unsigned(serialized).map(UnsignedTransaction::Utxo),
            Provider::Svm(p) => Err(EngineError::unsupported_operation(&p.chain_config.alias, "parse_unsigned")),
            Provider::Tvm(p) => Err(EngineError::unsupported_operation(&p.chain_config.alias, "parse_unsigned")),
            Provider::Xrp(p) => Err(EngineError::unsupported_operation(&p.chain_config.alias, "parse_unsigned")),
            Provider::Substrate(p) => Err(EngineError::unsupported_operation(&p.chain_config.alias, "parse_unsigned")),
        }
    }

    /// `tx` is required only for Substrate, whose weight-based fee is
    /// queried against the extrinsic being submitted; every other
    /// ecosystem ignores it.
    pub async fn estimate_fee(&self, tx: Option<&UnsignedTransaction>) -> Result<FeeEstimate, EngineError> {
        match self {
            Provider::Evm(p) => p.estimate_fee().await,
            Provider::Svm(p) => p.estimate_fee().await,
            Provider::Utxo(p) => p.estimate_fee().await,
            Provider::Tvm(p) => p.estimate_fee().await,
            Provider::Xrp(p) => p.estimate_fee().await,
            Provider::Substrate(p) => match tx {
                Some(UnsignedTransaction::Substrate(tx)) => p.estimate_fee(tx).await,
                _ => Err(EngineError::unsupported_operation(&p.chain_config.alias, "estimate_fee requires a built extrinsic on Substrate")),
            },
        }
    }

    /// `context` is required only for Utxo, whose PSBT embeds each input's
    /// signer public key; every other ecosystem ignores it.
    pub fn serialize_unsigned(&self, tx: &UnsignedTransaction, context: &SignatureContext) -> Result<String, EngineError> {
        match (self, tx) {
            (Provider::Evm(p), UnsignedTransaction::Evm(tx)) => p.serialize_unsigned(tx),
            (Provider::Svm(p), UnsignedTransaction::Svm(tx)) => p.serialize_unsigned(tx),
            (Provider::Utxo(p), UnsignedTransaction::Utxo(tx)) => {
                let SignatureContext::Utxo { signer_pubkeys } = context else {
                    return Err(crate::raw::wrong_context(&self.chain_config().alias, "Utxo"));
                };
                p.serialize_unsigned(tx, signer_pubkeys)
            }
            (Provider::Tvm(p), UnsignedTransaction::Tvm(tx)) => p.serialize_unsigned(tx),
            (Provider::Xrp(p), UnsignedTransaction::Xrp(tx)) => p.serialize_unsigned(tx),
            (Provider::Substrate(p), UnsignedTransaction::Substrate(tx)) => p.serialize_unsigned(tx),
            _ => Err(mismatched_transaction(&self.chain_config().alias)),
        }
    }

    /// Submits a signed transaction to the network. A remote refusal comes
    /// back as `BroadcastResult{success: false, ..}`; a local failure
    /// reaching the node at all (transport, malformed response) is thrown.
    pub async fn broadcast(&self, tx: &SignedTransaction) -> Result<BroadcastResult, EngineError> {
        match self {
            Provider::Evm(p) => p.broadcast(tx).await,
            Provider::Svm(p) => p.broadcast(tx).await,
            Provider::Utxo(p) => p.broadcast(tx).await,
            Provider::Tvm(p) => p.broadcast(tx).await,
            Provider::Xrp(p) => p.broadcast(tx).await,
            Provider::Substrate(p) => p.broadcast(tx).await,
        }
    }

    pub async fn get_native_balance(&self, address: &str) -> Result<NativeBalance, EngineError> {
        match self {
            Provider::Evm(p) => p.get_native_balance(address).await,
            Provider::Svm(p) => p.get_native_balance(address).await,
            Provider::Utxo(p) => p.get_native_balance(address).await,
            Provider::Tvm(p) => p.get_native_balance(address).await,
            Provider::Xrp(p) => p.get_native_balance(address).await,
            Provider::Substrate(p) => p.get_native_balance(address).await,
        }
    }

    /// Token balances only exist on the ecosystems that natively support a
    /// token standard (ERC-20/TRC-20/SPL); `decimals` is the token's own
    /// decimals, not the chain's native currency, and is ignored on SVM
    /// since `getTokenAccountBalance` reports it directly.
    pub async fn get_token_balance(&self, token_identifier: &str, owner: &str, decimals: u8) -> Result<NativeBalance, EngineError> {
        match self {
            Provider::Evm(p) => p.get_token_balance(token_identifier, owner, decimals).await,
            Provider::Svm(p) => p.get_token_balance(token_identifier, owner).await,
            Provider::Tvm(p) => p.get_token_balance(token_identifier, owner, decimals).await,
            Provider::Utxo(_) | Provider::Xrp(_) | Provider::Substrate(_) => {
                Err(EngineError::unsupported_operation(&self.chain_config().alias, "get_token_balance"))
            }
        }
    }
}

fn mismatched_overrides(alias: &ChainAlias) -> EngineError {
    EngineError::unsupported_operation(alias, "overrides variant does not match this chain's ecosystem")
}

fn mismatched_transaction(alias: &ChainAlias) -> EngineError {
    EngineError::unsupported_operation(alias, "transaction variant does not match this chain's ecosystem")
}

/// Resolves a chain alias to a provider and caches the instance by
/// `(alias, rpc url)`. Writers are serialised by the mutex around insert;
/// readers never block on each other — the cache is an optimisation, not
/// a correctness requirement.
pub struct Dispatcher {
    rpc: Arc<dyn RpcCapability>,
    process_rpc_overrides: RwLock<HashMap<String, String>>,
    providers: Mutex<HashMap<(String, String), Provider>>,
}

impl Dispatcher {
    pub fn new(rpc: Arc<dyn RpcCapability>) -> Self {
        Dispatcher { rpc, process_rpc_overrides: RwLock::new(HashMap::new()), providers: Mutex::new(HashMap::new()) }
    }

    /// Pins an RPC URL for every future lookup of `alias` on this
    /// dispatcher, unless a caller passes its own override.
    pub fn set_rpc_override(&self, alias: &ChainAlias, rpc_url: String) {
        self.process_rpc_overrides.write().unwrap().insert(alias.as_str().to_string(), rpc_url);
    }

    pub fn get_chain_provider(&self, alias: &ChainAlias, rpc_url_override: Option<String>) -> Result<Provider, EngineError> {
        let mut chain_config = registry::lookup(alias)?;
        if let Some(url) = rpc_url_override.or_else(|| self.process_rpc_overrides.read().unwrap().get(alias.as_str()).cloned()) {
            chain_config.rpc_url = url;
        }

        let cache_key = (alias.as_str().to_string(), chain_config.rpc_url.clone());
        {
            let cache = self.providers.lock().unwrap();
            if let Some(provider) = cache.get(&cache_key) {
                return Ok(provider.clone());
            }
        }

        let provider = match chain_config.ecosystem {
            Ecosystem::Evm => Provider::Evm(EvmProvider::new(chain_config, self.rpc.clone())),
            Ecosystem::Svm => Provider::Svm(SvmProvider::new(chain_config, self.rpc.clone())),
            Ecosystem::Utxo => Provider::Utxo(UtxoProvider::new(chain_config, self.rpc.clone())),
            Ecosystem::Tvm => Provider::Tvm(TvmProvider::new(chain_config, self.rpc.clone())),
            Ecosystem::Xrp => Provider::Xrp(XrpProvider::new(chain_config, self.rpc.clone())),
            Ecosystem::Substrate => Provider::Substrate(SubstrateProvider::new(chain_config, self.rpc.clone())),
        };

        let mut cache = self.providers.lock().unwrap();
        let provider = cache.entry(cache_key).or_insert(provider).clone();
        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_rpc::mock::MockRpc;

    #[test]
    fn repeated_lookups_return_the_same_cached_provider() {
        let dispatcher = Dispatcher::new(Arc::new(MockRpc::new()));
        let alias = ChainAlias::new("ethereum");
        let first = dispatcher.get_chain_provider(&alias, None).unwrap();
        let second = dispatcher.get_chain_provider(&alias, None).unwrap();
        assert_eq!(first.chain_config().rpc_url, second.chain_config().rpc_url);
    }

    #[test]
    fn caller_override_beats_process_override_and_default() {
        let dispatcher = Dispatcher::new(Arc::new(MockRpc::new()));
        let alias = ChainAlias::new("ethereum");
        dispatcher.set_rpc_override(&alias, "https://process-override.example".into());
        let provider = dispatcher.get_chain_provider(&alias, Some("https://caller-override.example".into())).unwrap();
        assert_eq!(provider.chain_config().rpc_url, "https://caller-override.example");
    }

    #[test]
    fn process_override_beats_registry_default() {
        let dispatcher = Dispatcher::new(Arc::new(MockRpc::new()));
        let alias = ChainAlias::new("ethereum");
        dispatcher.set_rpc_override(&alias, "https://process-override.example".into());
        let provider = dispatcher.get_chain_provider(&alias, None).unwrap();
        assert_eq!(provider.chain_config().rpc_url, "https://process-override.example");
    }

    #[test]
    fn unknown_alias_is_unsupported_chain() {
        let dispatcher = Dispatcher::new(Arc::new(MockRpc::new()));
        let err = dispatcher.get_chain_provider(&ChainAlias::new("dogecoin"), None).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedChain { .. }));
    }
}
