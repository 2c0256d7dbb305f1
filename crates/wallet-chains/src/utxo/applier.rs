//! Finalises a [`UtxoRawTx`] into a broadcast-ready signed transaction:
//! builds the per-input witness stack and serialises with BIP-144 framing.
//! The transaction hash is the double-SHA256 of the *non-witness*
//! serialisation, rendered in little-endian display order.
//!
//! P2WPKH witnesses need the signer's compressed public key alongside the
//! signature (the scriptPubKey only carries its hash); the caller supplies
//! one `signer_pubkey` per input, the same way the EVM applier is given an
//! `expected_from` address to recover against.

use super::{address::ScriptType, codec, raw::UtxoRawTx};
use wallet_codec::hash::sha256d;
use wallet_primitives::{ChainAlias, EngineError, RawSignature, SignedTransaction};

pub fn apply_signature(
    chain_alias: &ChainAlias,
    tx: UtxoRawTx,
    signatures: Vec<RawSignature>,
    signer_pubkeys: &[Vec<u8>],
) -> Result<SignedTransaction, EngineError> {
    if signatures.len() != tx.inputs.len() {
        return Err(EngineError::Signature { chain_alias: chain_alias.clone(), expected: tx.inputs.len(), got: signatures.len() });
    }
    if signer_pubkeys.len() != tx.inputs.len() {
        return Err(EngineError::Psbt { phase: "finalize", cause: "one signer pubkey is required per input".into() });
    }

    let witnesses: Vec<Vec<Vec<u8>>> = tx
        .inputs
        .iter()
        .zip(signatures.iter())
        .zip(signer_pubkeys.iter())
        .map(|((input, signature), pubkey)| match input.script_type {
            Some(ScriptType::P2tr) => vec![signature.0.to_vec()],
            Some(ScriptType::P2wpkh) | None => {
                let mut sig_with_hashtype = signature.0.to_vec();
                sig_with_hashtype.push(0x01); // SIGHASH_ALL
                vec![sig_with_hashtype, pubkey.clone()]
            }
        })
        .collect();

    let serialized = codec::serialize_with_witness(&tx, &witnesses)?;
    let non_witness = codec::serialize_non_witness(&tx)?;
    let mut txid = sha256d(&non_witness).to_vec();
    txid.reverse(); // internal order -> display order

    Ok(SignedTransaction { chain_alias: chain_alias.clone(), serialized: hex::encode(serialized), hash: hex::encode(txid) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utxo::raw::{UtxoInput, UtxoOutput};

    fn sample_tx() -> UtxoRawTx {
        UtxoRawTx {
            version: 2,
            locktime: 0,
            rbf: true,
            inputs: vec![UtxoInput {
                txid: "a".repeat(64),
                vout: 0,
                value_sat: 100_000_000,
                script_pubkey: {
                    let mut v = vec![0x00, 0x14];
                    v.extend_from_slice(&[0xbbu8; 20]);
                    v
                },
                script_type: Some(ScriptType::P2wpkh),
            }],
            outputs: vec![UtxoOutput { address: "recipient".into(), script_pubkey: vec![0x00, 0x14, 1, 2, 3], value_sat: 50_000_000 }],
        }
    }

    #[test]
    fn applying_a_p2wpkh_signature_produces_a_witness_and_hash() {
        let tx = sample_tx();
        let signatures = vec![RawSignature([9u8; 64])];
        let signed = apply_signature(&ChainAlias::new("bitcoin"), tx, signatures, &[vec![2u8; 33]]).unwrap();
        assert_eq!(signed.hash.len(), 64);
        assert!(hex::decode(&signed.serialized).is_ok());
    }

    #[test]
    fn mismatched_signature_count_is_rejected() {
        let tx = sample_tx();
        let err = apply_signature(&ChainAlias::new("bitcoin"), tx, vec![], &[]).unwrap_err();
        assert!(matches!(err, EngineError::Signature { .. }));
    }
}
