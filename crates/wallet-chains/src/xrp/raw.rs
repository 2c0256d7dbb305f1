//! The XRPL transaction intermediate representation: `Payment` (native
//! XRP or issued-currency) and `TrustSet`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum XrpAmount {
    Native { drops: u64 },
    Issued { value: String, currency: String, issuer: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum XrpTransactionData {
    Payment { destination: String, amount: XrpAmount },
    TrustSet { limit_amount: XrpAmount },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XrpRawTx {
    pub account: String,
    pub fee_drops: u64,
    pub sequence: u32,
    pub last_ledger_sequence: Option<u32>,
    pub signing_pub_key: Vec<u8>,
    pub data: XrpTransactionData,
}

#[derive(Debug, Clone, Default)]
pub struct XrpOverrides {
    pub fee_drops: Option<u64>,
    pub sequence: Option<u32>,
    pub last_ledger_sequence: Option<u32>,
    /// The signing account's public key. Required: `SigningPubKey` is part
    /// of the signed payload itself, so the builder can't leave it blank
    /// and fill it in later the way a fee or nonce can be defaulted.
    pub signing_pub_key: Option<Vec<u8>>,
}
