//! Raw Bitcoin transaction serialisation: Bitcoin's CompactSize varint,
//! the legacy (non-witness) encoding used for txid computation, the
//! BIP-144 witness encoding used for broadcast, and the BIP-174 PSBT
//! encoding used for the unsigned transaction handed to a signer.

use super::address::{self, ScriptType};
use super::raw::{UtxoInput, UtxoOutput, UtxoRawTx};
use bitcoin::absolute::LockTime;
use bitcoin::bip32::{DerivationPath, Fingerprint};
use bitcoin::psbt::{Psbt, PsbtSighashType};
use bitcoin::secp256k1::{PublicKey as SecpPublicKey, XOnlyPublicKey};
use bitcoin::sighash::{EcdsaSighashType, TapSighashType};
use bitcoin::transaction::Version;
use bitcoin::{Address, Amount as BtcAmount, Network, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use std::str::FromStr;
use wallet_primitives::EngineError;

fn psbt_error(cause: impl ToString) -> EngineError {
    EngineError::Psbt { phase: "build", cause: cause.to_string() }
}

fn write_compact_size(buf: &mut Vec<u8>, value: u64) {
    if value < 0xfd {
        buf.push(value as u8);
    } else if value <= 0xffff {
        buf.push(0xfd);
        buf.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xffff_ffff {
        buf.push(0xfe);
        buf.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        buf.push(0xff);
        buf.extend_from_slice(&value.to_le_bytes());
    }
}

fn txid_to_internal_order(txid_hex: &str) -> Result<[u8; 32], EngineError> {
    let mut bytes = hex::decode(txid_hex)
        .map_err(|e| EngineError::Psbt { phase: "parse", cause: e.to_string() })?;
    if bytes.len() != 32 {
        return Err(EngineError::Psbt { phase: "parse", cause: "txid must be 32 bytes".into() });
    }
    bytes.reverse();
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

fn write_outpoints_and_scriptsigs(buf: &mut Vec<u8>, tx: &UtxoRawTx) -> Result<(), EngineError> {
    write_compact_size(buf, tx.inputs.len() as u64);
    for input in &tx.inputs {
        buf.extend_from_slice(&txid_to_internal_order(&input.txid)?);
        buf.extend_from_slice(&input.vout.to_le_bytes());
        write_compact_size(buf, 0); // empty scriptSig: every input is SegWit.
        buf.extend_from_slice(&tx.sequence().to_le_bytes());
    }
    Ok(())
}

fn write_outputs(buf: &mut Vec<u8>, tx: &UtxoRawTx) {
    write_compact_size(buf, tx.outputs.len() as u64);
    for output in &tx.outputs {
        buf.extend_from_slice(&output.value_sat.to_le_bytes());
        write_compact_size(buf, output.script_pubkey.len() as u64);
        buf.extend_from_slice(&output.script_pubkey);
    }
}

/// The legacy (non-witness) serialisation: what the txid is computed over.
pub fn serialize_non_witness(tx: &UtxoRawTx) -> Result<Vec<u8>, EngineError> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&tx.version.to_le_bytes());
    write_outpoints_and_scriptsigs(&mut buf, tx)?;
    write_outputs(&mut buf, tx);
    buf.extend_from_slice(&tx.locktime.to_le_bytes());
    Ok(buf)
}

/// The BIP-144 witness serialisation, with each input's witness stack
/// supplied separately (signature application fills these in).
pub fn serialize_with_witness(tx: &UtxoRawTx, witnesses: &[Vec<Vec<u8>>]) -> Result<Vec<u8>, EngineError> {
    if witnesses.len() != tx.inputs.len() {
        return Err(EngineError::Psbt { phase: "finalize", cause: "witness count must equal input count".into() });
    }
    let mut buf = Vec::new();
    buf.extend_from_slice(&tx.version.to_le_bytes());
    buf.push(0x00); // segwit marker
    buf.push(0x01); // segwit flag
    write_outpoints_and_scriptsigs(&mut buf, tx)?;
    write_outputs(&mut buf, tx);
    for witness in witnesses {
        write_compact_size(&mut buf, witness.len() as u64);
        for item in witness {
            write_compact_size(&mut buf, item.len() as u64);
            buf.extend_from_slice(item);
        }
    }
    buf.extend_from_slice(&tx.locktime.to_le_bytes());
    Ok(buf)
}

fn to_xonly(pubkey_bytes: &[u8]) -> Result<XOnlyPublicKey, EngineError> {
    match pubkey_bytes.len() {
        32 => XOnlyPublicKey::from_slice(pubkey_bytes).map_err(psbt_error),
        33 => XOnlyPublicKey::from_slice(&pubkey_bytes[1..]).map_err(psbt_error),
        other => Err(psbt_error(format!("signer public key must be 32 (x-only) or 33 (compressed) bytes, got {other}"))),
    }
}

/// Builds a BIP-174 PSBT for `tx` and returns its base64 encoding. Each
/// input carries its previous output's `witnessUtxo` (value and
/// scriptPubKey, which fixes its script type) plus the signer's public
/// key and sighash type, so a compliant signer can finalise the PSBT
/// without a further network lookup. `signer_pubkeys` must have one
/// entry per input, in input order.
pub fn serialize_unsigned_psbt(tx: &UtxoRawTx, signer_pubkeys: &[Vec<u8>]) -> Result<String, EngineError> {
    if signer_pubkeys.len() != tx.inputs.len() {
        return Err(psbt_error("signer_pubkeys must have exactly one entry per input"));
    }

    let input = tx
        .inputs
        .iter()
        .map(|i| {
            Ok(TxIn {
                previous_output: OutPoint { txid: Txid::from_str(&i.txid).map_err(psbt_error)?, vout: i.vout },
                script_sig: ScriptBuf::new(),
                sequence: Sequence(tx.sequence()),
                witness: Witness::new(),
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;
    let output = tx
        .outputs
        .iter()
        .map(|o| TxOut { value: BtcAmount::from_sat(o.value_sat), script_pubkey: ScriptBuf::from(o.script_pubkey.clone()) })
        .collect();
    let unsigned_tx =
        Transaction { version: Version::non_standard(tx.version as i32), lock_time: LockTime::from_consensus(tx.locktime), input, output };

    let mut psbt = Psbt::from_unsigned_tx(unsigned_tx).map_err(psbt_error)?;

    for (i, txin) in tx.inputs.iter().enumerate() {
        let psbt_input = &mut psbt.inputs[i];
        psbt_input.witness_utxo =
            Some(TxOut { value: BtcAmount::from_sat(txin.value_sat), script_pubkey: ScriptBuf::from(txin.script_pubkey.clone()) });

        match txin.script_type {
            Some(ScriptType::P2tr) => {
                psbt_input.tap_internal_key = Some(to_xonly(&signer_pubkeys[i])?);
                psbt_input.sighash_type = Some(PsbtSighashType::from(TapSighashType::Default));
            }
            Some(ScriptType::P2wpkh) | None => {
                let pubkey = SecpPublicKey::from_slice(&signer_pubkeys[i]).map_err(psbt_error)?;
                psbt_input.bip32_derivation.insert(pubkey, (Fingerprint::default(), DerivationPath::default()));
                psbt_input.sighash_type = Some(PsbtSighashType::from(EcdsaSighashType::All));
            }
        }
    }

    Ok(psbt.to_string())
}

/// Parses a base64 PSBT back into a [`UtxoRawTx`]. Each input's value,
/// scriptPubKey and script type are read from its `witnessUtxo`; the
/// signer public key embedded per input is not part of the raw tx and is
/// supplied again out of band when re-serialising. Re-encoding the result
/// with the same `signer_pubkeys` reproduces the original PSBT.
pub fn parse_unsigned_psbt(serialized: &str) -> Result<UtxoRawTx, EngineError> {
    let psbt = Psbt::from_str(serialized).map_err(psbt_error)?;
    let unsigned_tx = &psbt.unsigned_tx;

    let rbf = unsigned_tx.input.first().map(|i| i.sequence.0 == 0xffff_fffd).unwrap_or(false);

    let inputs = unsigned_tx
        .input
        .iter()
        .zip(psbt.inputs.iter())
        .map(|(txin, psbt_input)| {
            let witness_utxo = psbt_input.witness_utxo.as_ref().ok_or_else(|| psbt_error("PSBT input is missing witnessUtxo"))?;
            let script_pubkey = witness_utxo.script_pubkey.to_bytes();
            let script_type = address::classify_script_pubkey(&script_pubkey);
            Ok(UtxoInput {
                txid: txin.previous_output.txid.to_string(),
                vout: txin.previous_output.vout,
                value_sat: witness_utxo.value.to_sat(),
                script_pubkey,
                script_type,
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    let outputs = unsigned_tx
        .output
        .iter()
        .map(|out| {
            let script_pubkey = out.script_pubkey.to_bytes();
            let address =
                Address::from_script(&out.script_pubkey, Network::Bitcoin).map(|a| a.to_string()).unwrap_or_default();
            UtxoOutput { address, script_pubkey, value_sat: out.value.to_sat() }
        })
        .collect();

    Ok(UtxoRawTx { version: unsigned_tx.version.0 as u32, locktime: unsigned_tx.lock_time.to_consensus_u32(), inputs, outputs, rbf })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> UtxoRawTx {
        UtxoRawTx {
            version: 2,
            locktime: 0,
            rbf: true,
            inputs: vec![UtxoInput {
                txid: "a".repeat(64),
                vout: 0,
                value_sat: 100_000_000,
                script_pubkey: vec![0x00, 0x14],
                script_type: None,
            }],
            outputs: vec![UtxoOutput { address: "x".into(), script_pubkey: vec![0x00, 0x14], value_sat: 50_000_000 }],
        }
    }

    #[test]
    fn non_witness_serialisation_has_no_marker_flag() {
        let bytes = serialize_non_witness(&sample_tx()).unwrap();
        // version(4) + compact_size(1) + [outpoint(36)+scriptsig(1)+sequence(4)] + ...
        assert_eq!(&bytes[0..4], &2u32.to_le_bytes());
        assert_eq!(bytes[4], 1); // one input
    }

    #[test]
    fn witness_serialisation_has_marker_and_flag() {
        let bytes = serialize_with_witness(&sample_tx(), &[vec![vec![1, 2, 3]]]).unwrap();
        assert_eq!(bytes[4], 0x00);
        assert_eq!(bytes[5], 0x01);
    }

    fn compressed_pubkey() -> Vec<u8> {
        hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798").unwrap()
    }

    #[test]
    fn p2wpkh_input_carries_witness_utxo_and_bip32_derivation() {
        let mut tx = sample_tx();
        tx.inputs[0].script_type = Some(ScriptType::P2wpkh);
        let pubkey = compressed_pubkey();

        let encoded = serialize_unsigned_psbt(&tx, &[pubkey.clone()]).unwrap();
        let psbt = Psbt::from_str(&encoded).unwrap();

        let input = &psbt.inputs[0];
        assert_eq!(input.witness_utxo.as_ref().unwrap().value, BtcAmount::from_sat(100_000_000));
        assert_eq!(input.sighash_type, Some(PsbtSighashType::from(EcdsaSighashType::All)));
        let key = SecpPublicKey::from_slice(&pubkey).unwrap();
        assert!(input.bip32_derivation.contains_key(&key));
    }

    #[test]
    fn p2tr_input_carries_tap_internal_key() {
        let mut tx = sample_tx();
        tx.inputs[0].script_type = Some(ScriptType::P2tr);
        let xonly = hex::decode("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798").unwrap();

        let encoded = serialize_unsigned_psbt(&tx, &[xonly.clone()]).unwrap();
        let psbt = Psbt::from_str(&encoded).unwrap();

        let input = &psbt.inputs[0];
        assert_eq!(input.tap_internal_key, Some(XOnlyPublicKey::from_slice(&xonly).unwrap()));
        assert_eq!(input.sighash_type, Some(PsbtSighashType::from(TapSighashType::Default)));
    }

    #[test]
    fn signer_pubkey_count_must_match_input_count() {
        let err = serialize_unsigned_psbt(&sample_tx(), &[]).unwrap_err();
        assert!(matches!(err, EngineError::Psbt { .. }));
    }

    #[test]
    fn psbt_round_trips_back_to_an_equal_raw_tx() {
        let chain = wallet_primitives::ChainAlias::new("bitcoin");
        let recipient_addr = "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq";
        let (script_pubkey, script_type) = address::validate(&chain, recipient_addr).unwrap();
        let tx = UtxoRawTx {
            version: 2,
            locktime: 0,
            rbf: true,
            inputs: vec![UtxoInput {
                txid: "b".repeat(64),
                vout: 1,
                value_sat: 100_000_000,
                script_pubkey: script_pubkey.clone(),
                script_type: Some(script_type),
            }],
            outputs: vec![UtxoOutput { address: recipient_addr.into(), script_pubkey, value_sat: 50_000_000 }],
        };
        let pubkeys = vec![compressed_pubkey()];

        let serialized = serialize_unsigned_psbt(&tx, &pubkeys).unwrap();
        let parsed = parse_unsigned_psbt(&serialized).unwrap();

        assert_eq!(parsed.version, tx.version);
        assert_eq!(parsed.inputs[0].value_sat, tx.inputs[0].value_sat);
        assert_eq!(parsed.inputs[0].script_type, tx.inputs[0].script_type);
        assert_eq!(parsed.outputs[0].address, tx.outputs[0].address);
        assert_eq!(serialize_unsigned_psbt(&parsed, &pubkeys).unwrap(), serialized);
    }
}
