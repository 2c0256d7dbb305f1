//! BIP143 (P2WPKH) and BIP341 key-path (P2TR) sighash computation. One
//! preimage per input, matching `SigningPayload.data.length = input count`.

use super::{
    address::ScriptType,
    raw::UtxoRawTx,
};
use wallet_codec::hash::{sha256, sha256d};
use wallet_primitives::{ChainAlias, EngineError, SigningAlgorithm, SigningPayload};

const SIGHASH_ALL: u32 = 0x01;

fn hash_prevouts(tx: &UtxoRawTx) -> Result<[u8; 32], EngineError> {
    let mut buf = Vec::new();
    for input in &tx.inputs {
        let mut txid = hex::decode(&input.txid).map_err(|e| EngineError::Psbt { phase: "parse", cause: e.to_string() })?;
        txid.reverse();
        buf.extend_from_slice(&txid);
        buf.extend_from_slice(&input.vout.to_le_bytes());
    }
    Ok(sha256d(&buf))
}

fn hash_sequence(tx: &UtxoRawTx) -> [u8; 32] {
    let mut buf = Vec::new();
    for _ in &tx.inputs {
        buf.extend_from_slice(&tx.sequence().to_le_bytes());
    }
    sha256d(&buf)
}

fn hash_outputs(tx: &UtxoRawTx) -> [u8; 32] {
    let mut buf = Vec::new();
    for output in &tx.outputs {
        buf.extend_from_slice(&output.value_sat.to_le_bytes());
        write_varint(&mut buf, output.script_pubkey.len() as u64);
        buf.extend_from_slice(&output.script_pubkey);
    }
    sha256d(&buf)
}

fn write_varint(buf: &mut Vec<u8>, value: u64) {
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

/// The P2PKH-shaped scriptCode BIP143 signs over for a P2WPKH input:
/// `OP_DUP OP_HASH160 <20-byte-hash> OP_EQUALVERIFY OP_CHECKSIG`, derived
/// from the witness program embedded in the P2WPKH scriptPubKey.
fn p2wpkh_script_code(script_pubkey: &[u8]) -> Vec<u8> {
    let program = &script_pubkey[2..22];
    let mut script_code = Vec::with_capacity(25);
    script_code.push(0x76); // OP_DUP
    script_code.push(0xa9); // OP_HASH160
    script_code.push(0x14); // push 20 bytes
    script_code.extend_from_slice(program);
    script_code.push(0x88); // OP_EQUALVERIFY
    script_code.push(0xac); // OP_CHECKSIG
    script_code
}

fn bip143_preimage(tx: &UtxoRawTx, input_index: usize) -> Result<Vec<u8>, EngineError> {
    let input = &tx.inputs[input_index];
    let mut preimage = Vec::new();
    preimage.extend_from_slice(&tx.version.to_le_bytes());
    preimage.extend_from_slice(&hash_prevouts(tx)?);
    preimage.extend_from_slice(&hash_sequence(tx));

    let mut txid = hex::decode(&input.txid).map_err(|e| EngineError::Psbt { phase: "parse", cause: e.to_string() })?;
    txid.reverse();
    preimage.extend_from_slice(&txid);
    preimage.extend_from_slice(&input.vout.to_le_bytes());

    let script_code = p2wpkh_script_code(&input.script_pubkey);
    write_varint(&mut preimage, script_code.len() as u64);
    preimage.extend_from_slice(&script_code);

    preimage.extend_from_slice(&input.value_sat.to_le_bytes());
    preimage.extend_from_slice(&tx.sequence().to_le_bytes());
    preimage.extend_from_slice(&hash_outputs(tx));
    preimage.extend_from_slice(&tx.locktime.to_le_bytes());
    preimage.extend_from_slice(&SIGHASH_ALL.to_le_bytes());
    Ok(preimage)
}

fn tagged_hash(tag: &str, message: &[u8]) -> [u8; 32] {
    let tag_hash = sha256(tag.as_bytes());
    let mut buf = Vec::with_capacity(64 + message.len());
    buf.extend_from_slice(&tag_hash);
    buf.extend_from_slice(&tag_hash);
    buf.extend_from_slice(message);
    sha256(&buf)
}

/// BIP341 key-path sighash for SIGHASH_DEFAULT (no annex, no
/// ANYONECANPAY/SINGLE/NONE).
fn bip341_preimage(tx: &UtxoRawTx, input_index: usize) -> [u8; 32] {
    let mut sha_prevouts = Vec::new();
    let mut sha_amounts = Vec::new();
    let mut sha_script_pubkeys = Vec::new();
    let mut sha_sequences = Vec::new();
    for input in &tx.inputs {
        let mut txid = hex::decode(&input.txid).unwrap_or_default();
        txid.reverse();
        sha_prevouts.extend_from_slice(&txid);
        sha_prevouts.extend_from_slice(&input.vout.to_le_bytes());
        sha_amounts.extend_from_slice(&input.value_sat.to_le_bytes());
        write_varint(&mut sha_script_pubkeys, input.script_pubkey.len() as u64);
        sha_script_pubkeys.extend_from_slice(&input.script_pubkey);
        sha_sequences.extend_from_slice(&tx.sequence().to_le_bytes());
    }
    let sha_outputs = {
        let mut buf = Vec::new();
        for output in &tx.outputs {
            buf.extend_from_slice(&output.value_sat.to_le_bytes());
            write_varint(&mut buf, output.script_pubkey.len() as u64);
            buf.extend_from_slice(&output.script_pubkey);
        }
        sha256(&buf)
    };

    let mut preimage = Vec::new();
    preimage.push(0x00); // epoch
    preimage.push(0x00); // hash_type: SIGHASH_DEFAULT
    preimage.extend_from_slice(&tx.version.to_le_bytes());
    preimage.extend_from_slice(&tx.locktime.to_le_bytes());
    preimage.extend_from_slice(&sha256(&sha_prevouts));
    preimage.extend_from_slice(&sha256(&sha_amounts));
    preimage.extend_from_slice(&sha256(&sha_script_pubkeys));
    preimage.extend_from_slice(&sha256(&sha_sequences));
    preimage.extend_from_slice(&sha_outputs);
    preimage.push(0x00); // spend_type: key path, no annex
    preimage.extend_from_slice(&(input_index as u32).to_le_bytes());

    tagged_hash("TapSighash", &preimage)
}

pub fn signing_payload(chain_alias: &ChainAlias, tx: &UtxoRawTx) -> Result<SigningPayload, EngineError> {
    let mut digests = Vec::with_capacity(tx.inputs.len());
    for (index, input) in tx.inputs.iter().enumerate() {
        let digest = match input.script_type {
            Some(ScriptType::P2wpkh) | None => bip143_preimage(tx, index).map(|preimage| sha256d(&preimage))?,
            Some(ScriptType::P2tr) => bip341_preimage(tx, index),
        };
        digests.push(digest.to_vec());
    }
    Ok(SigningPayload { chain_alias: chain_alias.clone(), data: digests, algorithm: SigningAlgorithm::Secp256k1 })
}
