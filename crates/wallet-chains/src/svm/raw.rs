//! The Solana message intermediate representation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvmRawTx {
    /// `Some(0)` selects a v0 message (empty address-table-lookups section
    /// still written); `None` selects a legacy message with no version byte.
    pub version: Option<u8>,
    pub header: MessageHeader,
    /// Base58 public keys, fee payer first, signer keys before read-only
    /// keys, matching `header`'s counts.
    pub account_keys: Vec<String>,
    pub recent_blockhash: String,
    pub instructions: Vec<CompiledInstruction>,
}

/// Optional fields a caller may pin instead of letting the builder query
/// the network for them.
#[derive(Debug, Clone, Default)]
pub struct SvmOverrides {
    pub recent_blockhash: Option<String>,
    pub use_versioned_message: bool,
}
