//! The ecosystem-polymorphic wrappers the Dispatcher hands back to callers:
//! an [`UnsignedTransaction`] tagged union over each ecosystem's raw
//! intermediate representation, a matching [`Overrides`] union, and the
//! out-of-band key material some appliers need beyond the signatures
//! themselves ([`SignatureContext`]).

use crate::{
    evm::raw::{EvmOverrides, EvmRawTx},
    substrate::raw::{SubstrateOverrides, SubstrateRawTx},
    svm::raw::{SvmOverrides, SvmRawTx},
    tvm::raw::{TvmOverrides, TvmRawTx},
    utxo::raw::{UtxoOverrides, UtxoRawTx},
    xrp::raw::{XrpOverrides, XrpRawTx},
};
use wallet_primitives::ChainAlias;

#[derive(Debug, Clone)]
pub enum UnsignedTransaction {
    Evm(EvmRawTx),
    Svm(SvmRawTx),
    Utxo(UtxoRawTx),
    Tvm(TvmRawTx),
    Xrp(XrpRawTx),
    Substrate(SubstrateRawTx),
}

impl UnsignedTransaction {
    pub fn ecosystem_name(&self) -> &'static str {
        match self {
            UnsignedTransaction::Evm(_) => "evm",
            UnsignedTransaction::Svm(_) => "svm",
            UnsignedTransaction::Utxo(_) => "utxo",
            UnsignedTransaction::Tvm(_) => "tvm",
            UnsignedTransaction::Xrp(_) => "xrp",
            UnsignedTransaction::Substrate(_) => "substrate",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum Overrides {
    Evm(EvmOverrides),
    Svm(SvmOverrides),
    Utxo(UtxoOverrides),
    Tvm(TvmOverrides),
    Xrp(XrpOverrides),
    Substrate(SubstrateOverrides),
    #[default]
    None,
}

/// Key material an applier needs beyond the raw signatures: EVM and TVM
/// recover their ECDSA `v` byte against the signer's known address/pubkey
/// hash; UTXO's P2WPKH witness needs the signer's raw pubkey (the
/// scriptPubKey only carries its hash). XRPL and Substrate need nothing
/// extra — XRPL's pubkey is already part of the built transaction, and
/// Substrate signatures don't require recovery.
#[derive(Debug, Clone)]
pub enum SignatureContext {
    Evm { expected_from: String },
    Tvm { expected_owner_identifier: [u8; 20] },
    Utxo { signer_pubkeys: Vec<Vec<u8>> },
    None,
}

pub(crate) fn wrong_context(chain_alias: &ChainAlias, expected: &str) -> wallet_primitives::EngineError {
    wallet_primitives::EngineError::unsupported_operation(chain_alias, format!("apply_signature called without the {expected} signature context"))
}
