//! Largest-first coin selection with dynamic fee recalculation as each
//! candidate is added, dust folding on the change output, and
//! `InsufficientFundsError` when the candidate set can't cover the target.

use super::raw::UtxoCandidate;
use wallet_primitives::EngineError;

/// Bytes of overhead independent of input/output count (`10.5` per the
/// segwit vsize formula: 4 version + 2 segwit marker/flag amortised + 4
/// locktime, discounted for witness weighting).
const BASE_OVERHEAD_VBYTES: f64 = 10.5;
/// vbytes per P2WPKH input.
const P2WPKH_INPUT_VBYTES: f64 = 68.0;
/// vbytes per P2TR key-path input.
const P2TR_INPUT_VBYTES: f64 = 57.5;
/// vbytes per output (assumes a SegWit-sized scriptPubKey).
const OUTPUT_VBYTES: f64 = 31.0;
/// Below this many satoshis a change output is folded into the fee
/// instead of being emitted.
pub const DUST_LIMIT_SAT: u64 = 546;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    P2wpkh,
    P2tr,
}

impl InputKind {
    fn vbytes(self) -> f64 {
        match self {
            InputKind::P2wpkh => P2WPKH_INPUT_VBYTES,
            InputKind::P2tr => P2TR_INPUT_VBYTES,
        }
    }
}

pub fn estimated_vsize(input_count: usize, input_kind: InputKind, output_count: usize) -> u64 {
    (BASE_OVERHEAD_VBYTES + input_count as f64 * input_kind.vbytes() + output_count as f64 * OUTPUT_VBYTES).ceil() as u64
}

#[derive(Debug, Clone)]
pub struct SelectionResult {
    pub selected: Vec<UtxoCandidate>,
    pub fee_sat: u64,
    pub change_sat: u64,
    pub has_change_output: bool,
}

/// Selects UTXOs largest-first to cover `target_sat` plus a fee computed
/// from `fee_rate_sat_per_vb` (or a caller-pinned `absolute_fee_sat`).
/// Always assumes a two-output transaction (recipient + change) while
/// accumulating, then folds the change output into the fee if it would be
/// dust.
pub fn select(
    candidates: &[UtxoCandidate],
    target_sat: u64,
    input_kind: InputKind,
    fee_rate_sat_per_vb: Option<f64>,
    absolute_fee_sat: Option<u64>,
) -> Result<SelectionResult, EngineError> {
    let mut sorted: Vec<&UtxoCandidate> = candidates.iter().collect();
    sorted.sort_by(|a, b| b.value_sat.cmp(&a.value_sat));

    let mut selected: Vec<UtxoCandidate> = Vec::new();
    let mut total_input: u64 = 0;

    for candidate in sorted {
        selected.push(candidate.clone());
        total_input += candidate.value_sat;

        let fee = match absolute_fee_sat {
            Some(fee) => fee,
            None => {
                let rate = fee_rate_sat_per_vb.unwrap_or(1.0);
                let vsize = estimated_vsize(selected.len(), input_kind, 2);
                (vsize as f64 * rate).ceil() as u64
            }
        };

        if total_input >= target_sat + fee {
            let change = total_input - target_sat - fee;
            if change < DUST_LIMIT_SAT {
                // Fold the dust change into the fee: one fewer output.
                let fee_without_change = match absolute_fee_sat {
                    Some(fee) => fee,
                    None => {
                        let rate = fee_rate_sat_per_vb.unwrap_or(1.0);
                        let vsize = estimated_vsize(selected.len(), input_kind, 1);
                        (vsize as f64 * rate).ceil() as u64
                    }
                };
                if total_input >= target_sat + fee_without_change {
                    return Ok(SelectionResult {
                        selected,
                        fee_sat: total_input - target_sat,
                        change_sat: 0,
                        has_change_output: false,
                    });
                }
                continue;
            }
            return Ok(SelectionResult { selected, fee_sat: fee, change_sat: change, has_change_output: true });
        }
    }

    Err(EngineError::InsufficientFunds {
        required: target_sat.to_string(),
        available: total_input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_input_send_matches_the_documented_fee_and_change() {
        let candidates = vec![UtxoCandidate {
            txid: "a".repeat(64),
            vout: 0,
            value_sat: 100_000_000,
            address: "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq".into(),
        }];
        let result = select(&candidates, 50_000_000, InputKind::P2wpkh, Some(10.0), None).unwrap();
        assert_eq!(estimated_vsize(1, InputKind::P2wpkh, 2), 141);
        assert_eq!(result.fee_sat, 1410);
        assert_eq!(result.change_sat, 49_998_590);
        assert!(result.has_change_output);
    }

    #[test]
    fn insufficient_funds_reports_required_and_available() {
        let candidates = vec![UtxoCandidate { txid: "b".repeat(64), vout: 0, value_sat: 1_000, address: "x".into() }];
        let err = select(&candidates, 1_000_000, InputKind::P2wpkh, Some(10.0), None).unwrap_err();
        match err {
            EngineError::InsufficientFunds { required, available } => {
                assert_eq!(required, "1000000");
                assert_eq!(available, "1000");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn conservation_holds_inputs_equal_outputs_plus_fee() {
        let candidates = vec![UtxoCandidate { txid: "c".repeat(64), vout: 0, value_sat: 5_000_000, address: "x".into() }];
        let result = select(&candidates, 1_000_000, InputKind::P2wpkh, Some(5.0), None).unwrap();
        let total_in: u64 = result.selected.iter().map(|c| c.value_sat).sum();
        let total_out = 1_000_000 + result.change_sat;
        assert_eq!(total_in, total_out + result.fee_sat);
    }
}
