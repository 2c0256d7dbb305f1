//! Native-currency balance shape returned by each ecosystem's balance
//! query: the raw smallest-unit amount, its human-formatted rendering,
//! and the portion actually spendable once reserves/holds are accounted
//! for (relevant for Substrate's `reserved`/`frozen` balance and XRPL's
//! account reserve; equal to `balance` everywhere else).

use crate::amount::Amount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeBalance {
    pub balance: String,
    pub formatted_balance: String,
    pub transferable: String,
}

impl NativeBalance {
    pub fn new(balance: &Amount, transferable: &Amount, decimals: u8) -> Self {
        NativeBalance {
            balance: balance.to_decimal_string(),
            formatted_balance: balance.format_with_decimals(decimals),
            transferable: transferable.to_decimal_string(),
        }
    }
}
