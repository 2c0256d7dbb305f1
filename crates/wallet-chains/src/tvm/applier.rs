//! Recovers the ECDSA recovery byte (Tron uses plain `27`/`28`, no
//! EIP-155 offset) against the expected owner address, then wraps
//! `raw_data` and the 65-byte `r‖s‖v` signature in the outer `Transaction`
//! protobuf message.

use super::{codec, raw::TvmRawTx, sighash};
use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, Secp256k1,
};
use wallet_codec::{hash::keccak256, protobuf::write_bytes_field};
use wallet_primitives::{ChainAlias, EngineError, RawSignature, SignedTransaction};

fn recover_recid(digest: &[u8; 32], signature: &RawSignature, expected_identifier: &[u8; 20]) -> Result<u8, EngineError> {
    let secp = Secp256k1::verification_only();
    let message = Message::from_digest(*digest);

    for recovery_id in [0u8, 1u8] {
        let Ok(rec_id) = RecoveryId::from_i32(recovery_id as i32) else { continue };
        let Ok(rec_sig) = RecoverableSignature::from_compact(&signature.0, rec_id) else { continue };
        let Ok(pubkey) = secp.recover_ecdsa(&message, &rec_sig) else { continue };
        let uncompressed = pubkey.serialize_uncompressed();
        let address_hash = keccak256(&uncompressed[1..]);
        if &address_hash[12..] == expected_identifier {
            return Ok(27 + recovery_id);
        }
    }
    Err(EngineError::Signature { chain_alias: ChainAlias::new("tron"), expected: 1, got: 0 })
}

pub fn apply_signature(
    chain_alias: &ChainAlias,
    tx: TvmRawTx,
    signatures: Vec<RawSignature>,
    expected_owner_identifier: &[u8; 20],
) -> Result<SignedTransaction, EngineError> {
    if signatures.len() != 1 {
        return Err(EngineError::Signature { chain_alias: chain_alias.clone(), expected: 1, got: signatures.len() });
    }
    let signature = &signatures[0];
    let digest = sighash::tx_id(&tx);
    let v = recover_recid(&digest, signature, expected_owner_identifier)?;

    let mut sig_65 = Vec::with_capacity(65);
    sig_65.extend_from_slice(signature.r());
    sig_65.extend_from_slice(signature.s());
    sig_65.push(v);

    let raw_data = codec::encode_raw_data(&tx);
    let mut wire = Vec::new();
    write_bytes_field(&mut wire, 1, &raw_data);
    write_bytes_field(&mut wire, 2, &sig_65);

    Ok(SignedTransaction { chain_alias: chain_alias.clone(), serialized: hex::encode(wire), hash: hex::encode(digest) })
}
