//! The XRPL signing preimage: the `0x53545800` ("STX\0") prefix followed by
//! the canonical binary serialisation without `TxnSignature`. The MPC
//! signer signs `SHA-512-half` of that preimage.

use super::{codec, raw::XrpRawTx};
use wallet_codec::hash::sha512_half;
use wallet_primitives::{ChainAlias, EngineError, SigningAlgorithm, SigningPayload};

const STX_PREFIX: [u8; 4] = [0x53, 0x54, 0x58, 0x00];

pub fn preimage(tx: &XrpRawTx) -> Result<Vec<u8>, EngineError> {
    let mut buf = STX_PREFIX.to_vec();
    buf.extend_from_slice(&codec::serialize_for_signing(tx)?);
    Ok(buf)
}

pub fn signing_payload(chain_alias: &ChainAlias, tx: &XrpRawTx) -> Result<SigningPayload, EngineError> {
    let digest = sha512_half(&preimage(tx)?);
    Ok(SigningPayload { chain_alias: chain_alias.clone(), data: vec![digest.to_vec()], algorithm: SigningAlgorithm::Secp256k1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xrp::{address, raw::{XrpAmount, XrpTransactionData}};

    fn sample_tx() -> XrpRawTx {
        XrpRawTx {
            account: address::encode(&[0x11u8; 20]),
            fee_drops: 12,
            sequence: 5,
            last_ledger_sequence: Some(1000),
            signing_pub_key: vec![0x02; 33],
            data: XrpTransactionData::Payment { destination: address::encode(&[0x22u8; 20]), amount: XrpAmount::Native { drops: 1_000_000 } },
        }
    }

    #[test]
    fn signing_payload_has_one_thirty_two_byte_digest() {
        let payload = signing_payload(&ChainAlias::new("xrpl"), &sample_tx()).unwrap();
        assert_eq!(payload.data.len(), 1);
        assert_eq!(payload.data[0].len(), 32);
    }

    #[test]
    fn preimage_starts_with_the_stx_prefix() {
        let bytes = preimage(&sample_tx()).unwrap();
        assert_eq!(&bytes[0..4], &STX_PREFIX);
    }
}
