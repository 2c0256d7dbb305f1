//! `NormalisedTransaction` — the uniform cross-chain view the Decoder
//! produces.

use crate::chain::ChainAlias;
use serde::{Deserialize, Serialize};

/// The seven classification types a decoder may assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TransactionType {
    NativeTransfer,
    TokenTransfer,
    NftTransfer,
    ContractCall,
    ContractDeployment,
    Approval,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransferEvent {
    pub standard: String,
    pub token_address: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub decimals: Option<u8>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalisedMetadata {
    pub is_contract_deployment: bool,
    pub input_count: Option<u32>,
    pub output_count: Option<u32>,
    pub token_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalisedTransaction {
    pub chain_alias: ChainAlias,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub from: String,
    pub to: Option<String>,
    /// Native-unit decimal string.
    pub value: String,
    pub formatted_value: String,
    pub symbol: String,
    pub fee: Option<String>,
    pub metadata: NormalisedMetadata,
    pub token_transfers: Vec<TokenTransferEvent>,
    pub internal_transactions: Vec<String>,
    pub status: Option<String>,
    pub block_number: Option<u64>,
    pub timestamp: Option<u64>,
    pub confirmations: Option<u64>,
    pub finalized: Option<bool>,
}
