//! The EVM intermediate representation: everything needed to re-serialise
//! a legacy or EIP-1559 transaction.

use serde::{Deserialize, Serialize};
use wallet_primitives::Amount;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessListEntry {
    pub address: String,
    pub storage_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmRawTx {
    pub chain_id: u64,
    pub nonce: u64,
    pub to: Option<String>,
    pub value: Amount,
    pub data: Vec<u8>,
    pub gas_limit: u64,
    /// `Some` selects a legacy (type-0) transaction; `None` + the
    /// EIP-1559 fields selects type-2.
    pub gas_price: Option<Amount>,
    pub max_fee_per_gas: Option<Amount>,
    pub max_priority_fee_per_gas: Option<Amount>,
    pub access_list: Vec<AccessListEntry>,
}

impl EvmRawTx {
    pub fn is_eip1559(&self) -> bool {
        self.gas_price.is_none()
    }
}

/// Optional fields a caller may pin instead of letting the builder query
/// the network for them.
#[derive(Debug, Clone, Default)]
pub struct EvmOverrides {
    pub nonce: Option<u64>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<Amount>,
    pub max_fee_per_gas: Option<Amount>,
    pub max_priority_fee_per_gas: Option<Amount>,
    pub force_legacy: bool,
    pub chain_id: Option<u64>,
}
