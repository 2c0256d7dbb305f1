//! The Tron signing preimage is simply the protobuf-encoded `raw_data`;
//! the digest fed to the signer is its SHA-256, which doubles as the
//! transaction's `txID`.

use super::{codec, raw::TvmRawTx};
use wallet_codec::hash::sha256;
use wallet_primitives::{ChainAlias, EngineError, SigningAlgorithm, SigningPayload};

pub fn tx_id(tx: &TvmRawTx) -> [u8; 32] {
    sha256(&codec::encode_raw_data(tx))
}

pub fn signing_payload(chain_alias: &ChainAlias, tx: &TvmRawTx) -> Result<SigningPayload, EngineError> {
    Ok(SigningPayload { chain_alias: chain_alias.clone(), data: vec![tx_id(tx).to_vec()], algorithm: SigningAlgorithm::Secp256k1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tvm::raw::TvmContract;

    fn sample_tx() -> TvmRawTx {
        TvmRawTx {
            ref_block_bytes: vec![0x01, 0x02],
            ref_block_hash: vec![0x03; 8],
            expiration: 1_700_000_060_000,
            timestamp: 1_700_000_000_000,
            contract: TvmContract::Transfer { owner_address: vec![0x41; 21], to_address: vec![0x42; 21], amount: 1_000_000 },
            fee_limit: None,
        }
    }

    #[test]
    fn tx_id_is_stable_for_the_same_transaction() {
        let tx = sample_tx();
        assert_eq!(tx_id(&tx), tx_id(&tx));
    }

    #[test]
    fn changing_the_amount_changes_the_tx_id() {
        let tx = sample_tx();
        let mut changed = tx.clone();
        if let TvmContract::Transfer { amount, .. } = &mut changed.contract {
            *amount += 1;
        }
        assert_ne!(tx_id(&tx), tx_id(&changed));
    }

    #[test]
    fn signing_payload_carries_exactly_one_digest() {
        let payload = signing_payload(&ChainAlias::new("tron"), &sample_tx()).unwrap();
        assert_eq!(payload.data.len(), 1);
        assert_eq!(payload.data[0].len(), 32);
    }
}
