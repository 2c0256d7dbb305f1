//! `{slow, standard, fast}` fee estimate shape. Monotonicity
//! (`fast >= standard >= slow`) is an invariant of every estimator, checked
//! in `wallet-chains`'s per-ecosystem fee tests.

use crate::amount::Amount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLevel {
    pub fee: String,
    pub formatted_fee: String,
}

impl FeeLevel {
    pub fn from_amount(amount: &Amount, decimals: u8) -> Self {
        FeeLevel { fee: amount.to_decimal_string(), formatted_fee: amount.format_with_decimals(decimals) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeEstimate {
    pub slow: FeeLevel,
    pub standard: FeeLevel,
    pub fast: FeeLevel,
}
