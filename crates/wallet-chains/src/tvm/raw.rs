//! The Tron raw-transaction intermediate representation: just enough of
//! `Transaction.raw_data` to build, sign and broadcast a `TransferContract`,
//! `TriggerSmartContract`, or `CreateSmartContract`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TvmContract {
    Transfer { owner_address: Vec<u8>, to_address: Vec<u8>, amount: i64 },
    TriggerSmartContract { owner_address: Vec<u8>, contract_address: Vec<u8>, data: Vec<u8>, call_value: i64 },
    CreateSmartContract { owner_address: Vec<u8>, bytecode: Vec<u8>, call_value: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TvmRawTx {
    pub ref_block_bytes: Vec<u8>,
    pub ref_block_hash: Vec<u8>,
    pub expiration: u64,
    pub timestamp: u64,
    pub contract: TvmContract,
    pub fee_limit: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct TvmOverrides {
    pub fee_limit: Option<u64>,
}

/// Default `feeLimit` (in SUN) applied to TRC-20 calls and contract
/// deploys when the caller doesn't pin one.
pub const DEFAULT_FEE_LIMIT_SUN: u64 = 1_000_000_000;
/// How far past the reference block an unsigned transaction remains valid.
pub const EXPIRATION_WINDOW_MS: u64 = 60 * 60 * 1000;
