//! Splices `r‖s` (plus a recovered `v`) into the RLP envelope.
//!
//! The applier never holds a private key; it recovers `v` by trying both
//! ECDSA recovery ids against the address the caller expects to have signed.

use super::{address, codec, raw::EvmRawTx};
use rlp::RlpStream;
use secp256k1::{ecdsa::{RecoverableSignature, RecoveryId}, Message, Secp256k1};
use wallet_codec::hash::keccak256;
use wallet_primitives::{ChainAlias, EngineError, RawSignature, SignedTransaction};

fn append_address(stream: &mut RlpStream, address: &Option<String>) {
    match address {
        Some(addr) => {
            stream.append(&hex::decode(addr.trim_start_matches("0x")).unwrap_or_default());
        }
        None => {
            stream.append_empty_data();
        }
    }
}

fn amount_bytes(amount: &wallet_primitives::Amount) -> Vec<u8> {
    let bytes = amount.as_biguint().to_bytes_be();
    if bytes == [0] { Vec::new() } else { bytes }
}

/// Recovers the recovery id (0 or 1) that makes `signature` verify against
/// `expected_address` for `digest`.
fn recover_parity(digest: &[u8; 32], signature: &RawSignature, expected_address: &str) -> Result<u8, EngineError> {
    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(*digest);
    let expected = expected_address.trim_start_matches("0x").to_lowercase();

    for recovery_id in [0u8, 1u8] {
        let Ok(rec_id) = RecoveryId::from_i32(recovery_id as i32) else { continue };
        let Ok(rec_sig) = RecoverableSignature::from_compact(&signature.0, rec_id) else { continue };
        let Ok(pubkey) = secp.recover_ecdsa(&message, &rec_sig) else { continue };
        let uncompressed = pubkey.serialize_uncompressed();
        let addr_hash = keccak256(&uncompressed[1..]);
        let derived = hex::encode(&addr_hash[12..]);
        if derived == expected {
            return Ok(recovery_id);
        }
    }
    Err(EngineError::Signature { chain_alias: ChainAlias::new("evm"), expected: 1, got: 0 })
}

pub fn apply_signature(
    chain_alias: &ChainAlias,
    tx: EvmRawTx,
    signatures: Vec<RawSignature>,
    expected_from: &str,
) -> Result<SignedTransaction, EngineError> {
    if signatures.len() != 1 {
        return Err(EngineError::Signature { chain_alias: chain_alias.clone(), expected: 1, got: signatures.len() });
    }
    let signature = &signatures[0];
    let preimage = if tx.is_eip1559() { codec::eip1559_preimage(&tx)? } else { codec::legacy_preimage(&tx)? };
    let digest = keccak256(&preimage);
    let parity = recover_parity(&digest, signature, expected_from)?;

    let r = signature.r().to_vec();
    let s = signature.s().to_vec();
    let normalised_from = address::normalise(chain_alias, expected_from).unwrap_or_else(|_| expected_from.to_string());
    let _ = normalised_from;

    let signed_bytes = if tx.is_eip1559() {
        let mut stream = RlpStream::new_list(12);
        stream.append(&tx.chain_id);
        stream.append(&tx.nonce);
        stream.append(&amount_bytes(tx.max_priority_fee_per_gas.as_ref().unwrap_or(&wallet_primitives::Amount::zero())));
        stream.append(&amount_bytes(tx.max_fee_per_gas.as_ref().unwrap_or(&wallet_primitives::Amount::zero())));
        stream.append(&tx.gas_limit);
        append_address(&mut stream, &tx.to);
        stream.append(&amount_bytes(&tx.value));
        stream.append(&tx.data);
        stream.begin_list(tx.access_list.len());
        for entry in &tx.access_list {
            stream.begin_list(2);
            stream.append(&hex::decode(entry.address.trim_start_matches("0x")).unwrap_or_default());
            stream.begin_list(entry.storage_keys.len());
            for key in &entry.storage_keys {
                stream.append(&hex::decode(key.trim_start_matches("0x")).unwrap_or_default());
            }
        }
        stream.append(&(parity as u64));
        stream.append(&r);
        stream.append(&s);
        let mut out = vec![0x02u8];
        out.extend_from_slice(&stream.out());
        out
    } else {
        let v = (tx.chain_id * 2 + 35 + parity as u64).to_be_bytes();
        let v_trimmed: Vec<u8> = {
            let mut v = v.to_vec();
            while v.len() > 1 && v[0] == 0 {
                v.remove(0);
            }
            v
        };
        let mut stream = RlpStream::new_list(9);
        stream.append(&tx.nonce);
        stream.append(&amount_bytes(tx.gas_price.as_ref().unwrap_or(&wallet_primitives::Amount::zero())));
        stream.append(&tx.gas_limit);
        append_address(&mut stream, &tx.to);
        stream.append(&amount_bytes(&tx.value));
        stream.append(&tx.data);
        stream.append(&v_trimmed);
        stream.append(&r);
        stream.append(&s);
        stream.out().to_vec()
    };

    let hash = keccak256(&signed_bytes);
    Ok(SignedTransaction {
        chain_alias: chain_alias.clone(),
        serialized: format!("0x{}", hex::encode(signed_bytes)),
        hash: format!("0x{}", hex::encode(hash)),
    })
}
