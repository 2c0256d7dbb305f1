//! The Substrate extrinsic-v4 intermediate representation.

use serde::{Deserialize, Serialize};

/// A runtime call identified by its pallet/call indices, with the
/// arguments already SCALE-encoded by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstrateCall {
    pub pallet_index: u8,
    pub call_index: u8,
    pub args: Vec<u8>,
}

/// Mortality window: `Immortal` extrinsics are valid forever (and so are
/// replayable indefinitely, which is why the builder defaults to `Mortal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Era {
    Immortal,
    Mortal { period: u64, phase: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstrateRawTx {
    pub call: SubstrateCall,
    pub era: Era,
    pub nonce: u64,
    pub tip: u128,
    pub spec_version: u32,
    pub transaction_version: u32,
    pub genesis_hash: [u8; 32],
    pub block_hash: [u8; 32],
    /// The signing account's raw 32-byte public key, decoded from the
    /// intent's `from` SS58 address.
    pub signer_account_id: [u8; 32],
}

#[derive(Debug, Clone, Default)]
pub struct SubstrateOverrides {
    pub nonce: Option<u64>,
    pub tip: Option<u128>,
    pub era: Option<Era>,
    pub spec_version: Option<u32>,
    pub transaction_version: Option<u32>,
    pub genesis_hash: Option<[u8; 32]>,
    pub block_hash: Option<[u8; 32]>,
}

/// Default mortality window, in blocks, when the caller doesn't pin an era.
pub const DEFAULT_MORTAL_PERIOD: u64 = 64;
