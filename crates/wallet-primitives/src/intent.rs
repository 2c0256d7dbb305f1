//! `TransferIntent` — the tagged union describing what the caller wants to
//! happen, before any network context has been consulted.

use crate::amount::Amount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenStandard {
    Erc20,
    Trc20,
    Spl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TransferIntent {
    NativeTransfer {
        from: String,
        to: String,
        value: Amount,
    },
    TokenTransfer {
        from: String,
        to: String,
        token_contract: String,
        value: Amount,
        standard: TokenStandard,
    },
    ContractCall {
        from: String,
        contract: String,
        data: Vec<u8>,
        value: Option<Amount>,
    },
    ContractDeploy {
        from: String,
        bytecode: Vec<u8>,
        constructor_args: Option<Vec<u8>>,
    },
}

impl TransferIntent {
    pub fn from_address(&self) -> &str {
        match self {
            TransferIntent::NativeTransfer { from, .. }
            | TransferIntent::TokenTransfer { from, .. }
            | TransferIntent::ContractCall { from, .. }
            | TransferIntent::ContractDeploy { from, .. } => from,
        }
    }
}
